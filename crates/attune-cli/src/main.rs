use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use attune_etl::Config;
use attune_search::Strategy;

mod commands;

#[derive(Debug, Parser)]
#[command(name = "attune", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the catalog CSV (default: corpus_path from the config file)
    #[arg(long, global = true)]
    corpus: Option<PathBuf>,
}

/// How the reference bands are derived.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct BandArgs {
    /// Reference statistics CSV; its rows are averaged into band centres
    #[arg(long)]
    reference: Option<PathBuf>,

    /// Catalog track to centre the bands on (repeatable; overrides --reference)
    #[arg(long = "seed", value_name = "NAME")]
    seeds: Vec<String>,

    /// Band half-width in standard deviations
    #[arg(short = 'k', long, allow_negative_numbers = true)]
    tolerance: Option<f64>,

    /// Features to constrain, comma separated
    #[arg(long, value_delimiter = ',', value_name = "FEATURE")]
    features: Option<Vec<String>>,
}

impl BandArgs {
    /// Fold CLI values over the loaded configuration.
    fn apply(&self, config: &mut Config) -> Result<()> {
        if let Some(reference) = &self.reference {
            config.reference_path = Some(reference.clone());
        }
        if let Some(tolerance) = self.tolerance {
            config.tolerance = tolerance;
        }
        if let Some(features) = &self.features {
            config.features = attune_core::FeatureSet::parse(features)?;
        }
        Ok(())
    }
}

/// Output layout for matched tracks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON array of track names
    #[default]
    Names,
    /// JSON array of full track records
    Records,
    /// One "name - artists" line per track
    Plain,
}

#[derive(Debug, clap::Subcommand)]
enum Commands {
    /// Recommend catalog tracks similar to a reference
    ///
    /// Builds one band per audio feature, centred on the reference averages
    /// and extending `k` standard deviations either side, then lists every
    /// catalog track whose features all fall inside their bands.
    ///
    /// The reference is taken from, in order of preference:
    ///
    /// - The tracks named with --seed (looked up in the catalog, ignoring case)
    /// - The rows of the --reference file (or reference_path from config)
    ///
    /// Standard deviations are always measured over the whole catalog,
    /// around the reference averages.
    ///
    /// Output: a JSON array of track names by default. Use --format records
    /// for full track records or --format plain for one line per track.
    #[command(visible_alias = "query")]
    Recommend {
        #[command(flatten)]
        bands: BandArgs,

        /// Tree traversal that orders the results: in-order (by name) or level-order
        #[arg(long)]
        strategy: Option<Strategy>,

        /// Output format
        #[arg(long, value_enum, default_value_t)]
        format: OutputFormat,
    },
    /// Show the averages, standard deviations and bands for a reference
    Stats {
        #[command(flatten)]
        bands: BandArgs,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Suggest catalog track names starting with a prefix
    Suggest {
        /// Beginning of a track name (case-insensitive)
        prefix: String,

        /// Maximum number of suggestions (default: suggestion_limit from config)
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, clap::Subcommand)]
enum ConfigAction {
    /// Show the current effective configuration
    Show,
    /// Print one config value, or the whole config file
    Get {
        /// Config key (omit to print the file)
        key: Option<String>,
    },
    /// Print the config file path
    Path,
    /// Print an example config file
    Example,
    /// Create the config file with defaults if it does not exist
    Init,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load()?;
    if let Err(e) = twyg::setup(config.logging.clone()) {
        eprintln!("Failed to set up logging: {e}");
    }

    if let Some(corpus) = cli.corpus {
        config.corpus_path = Some(corpus);
    }

    match cli.command {
        Commands::Recommend {
            bands,
            strategy,
            format,
        } => {
            bands.apply(&mut config)?;
            if let Some(strategy) = strategy {
                config.strategy = strategy;
            }
            config.validate()?;
            commands::run_recommend(&config, &bands.seeds, format)?;
        }
        Commands::Stats { bands, json } => {
            bands.apply(&mut config)?;
            config.validate()?;
            commands::show_stats(&config, &bands.seeds, json)?;
        }
        Commands::Suggest { prefix, limit } => {
            if let Some(limit) = limit {
                config.suggestion_limit = limit;
            }
            commands::run_suggest(&config, &prefix)?;
        }
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config::show_config()?,
            ConfigAction::Get { key } => commands::config::get_config(key)?,
            ConfigAction::Path => commands::config::show_path()?,
            ConfigAction::Example => commands::config::show_example()?,
            ConfigAction::Init => commands::config::init_config()?,
        },
    }

    Ok(())
}
