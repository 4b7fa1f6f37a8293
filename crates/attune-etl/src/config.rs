use anyhow::{Context, Result};
use confyg::{env, Confygery};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use attune_core::stats::DEFAULT_TOLERANCE;
use attune_core::FeatureSet;
use attune_search::{Strategy, DEFAULT_SUGGESTION_LIMIT};

/// Configuration for attune.
///
/// Configuration is loaded from multiple sources with the following priority:
/// 1. CLI arguments (highest priority)
/// 2. Environment variables (ATTUNE_* prefix)
/// 3. Config file (~/.config/attune/config.toml)
/// 4. Built-in defaults (lowest priority)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to the catalog CSV (the corpus).
    ///
    /// Can be set via:
    /// - CLI: --corpus /path/to/tracks.csv
    /// - ENV: ATTUNE_CORPUS_PATH
    /// - Config: corpus_path = "/path/to/tracks.csv"
    pub corpus_path: Option<PathBuf>,

    /// Path to the reference statistics CSV (a row of feature means).
    ///
    /// Can be set via:
    /// - CLI: --reference /path/to/averages.csv
    /// - ENV: ATTUNE_REFERENCE_PATH
    /// - Config: reference_path = "/path/to/averages.csv"
    pub reference_path: Option<PathBuf>,

    /// Band half-width in standard deviations (`k`).
    ///
    /// Default: 0.5
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,

    /// Tree traversal used for queries: "in-order" or "level-order".
    #[serde(default)]
    pub strategy: Strategy,

    /// Features that must fall within their band.
    ///
    /// Default: danceability, energy, valence, tempo, loudness,
    /// acousticness, instrumentalness, speechiness
    #[serde(default)]
    pub features: FeatureSet,

    /// Maximum number of name suggestions.
    #[serde(default = "default_suggestion_limit")]
    pub suggestion_limit: usize,

    /// Logger options.
    #[serde(default)]
    pub logging: twyg::Opts,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            corpus_path: None,
            reference_path: None,
            tolerance: default_tolerance(),
            strategy: Strategy::default(),
            features: FeatureSet::default(),
            suggestion_limit: default_suggestion_limit(),
            logging: twyg::Opts::default(),
        }
    }
}

impl Config {
    /// Load configuration from file and environment variables.
    ///
    /// Searches for config file at: ~/.config/attune/config.toml
    /// Reads environment variables with ATTUNE_ prefix.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed.
    pub fn load() -> Result<Self> {
        let config_path = config_file_path();

        let mut builder = Confygery::new()
            .context("Failed to create config builder")?;

        if config_path.exists() {
            let path_str = config_path.to_str()
                .ok_or_else(|| anyhow::anyhow!("Config path contains invalid UTF-8"))?;
            builder.add_file(path_str)
                .context("Failed to load config file")?;
        }

        let env_opts = env::Options::with_top_level("attune");
        builder.add_env(env_opts)
            .context("Failed to load environment variables")?;

        let config: Self = builder.build()
            .context("Failed to build configuration")?;

        Ok(config)
    }

    /// Check values that deserialize fine but cannot drive a query.
    ///
    /// A negative tolerance is allowed: it inverts every band, which then
    /// matches nothing.
    pub fn validate(&self) -> Result<()> {
        if !self.tolerance.is_finite() {
            anyhow::bail!("tolerance must be a finite number, got {}", self.tolerance);
        }
        if self.tolerance < 0.0 {
            log::warn!(
                "tolerance {} is negative; every band will be inverted",
                self.tolerance
            );
        }
        Ok(())
    }

    /// The corpus path, or an error explaining how to set one.
    pub fn require_corpus(&self) -> Result<PathBuf> {
        self.corpus_path.clone().ok_or_else(|| {
            anyhow::anyhow!(
                "No catalog configured. Pass --corpus, set ATTUNE_CORPUS_PATH, \
                 or add corpus_path to {}",
                config_file_path().display()
            )
        })
    }
}

fn default_tolerance() -> f64 {
    DEFAULT_TOLERANCE
}

fn default_suggestion_limit() -> usize {
    DEFAULT_SUGGESTION_LIMIT
}

/// Get the config file path.
///
/// Returns:
/// - Linux: ~/.config/attune/config.toml
/// - macOS: ~/Library/Application Support/attune/config.toml
/// - Windows: %APPDATA%\attune\config.toml
pub fn config_file_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("attune")
        .join("config.toml")
}

/// Get the example config file content.
pub fn example_config() -> &'static str {
    r#"# Attune Configuration File
#
# Configuration is loaded from multiple sources with the following priority:
# 1. CLI arguments (highest priority)
# 2. Environment variables (ATTUNE_* prefix)
# 3. This config file
# 4. Built-in defaults (lowest priority)

# Catalog of tracks to search (CSV with a header row; `name` is required)
#
# Can also be set via:
# - CLI: attune recommend --corpus /path/to/tracks.csv
# - Environment: ATTUNE_CORPUS_PATH=/path/to/tracks.csv
#corpus_path = "/path/to/tracks.csv"

# Reference statistics: a CSV whose header names audio features and whose
# row(s) hold the values to centre each band on
#
# Can also be set via:
# - CLI: attune recommend --reference /path/to/averages.csv
# - Environment: ATTUNE_REFERENCE_PATH=/path/to/averages.csv
#reference_path = "/path/to/averages.csv"

# Band half-width in standard deviations
tolerance = 0.5

# Tree traversal for results: "in-order" (by name) or "level-order"
strategy = "in-order"

# Features each match must fall within
features = [
    "danceability",
    "energy",
    "valence",
    "tempo",
    "loudness",
    "acousticness",
    "instrumentalness",
    "speechiness",
]

# Maximum number of name suggestions
suggestion_limit = 10
"#
}

/// Create default config file if it doesn't exist.
///
/// Returns true if a new file was created, false if it already existed.
pub fn ensure_config_file() -> Result<bool> {
    let config_path = config_file_path();

    if config_path.exists() {
        return Ok(false);
    }

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)
            .context("Failed to create config directory")?;
    }

    std::fs::write(&config_path, example_config())
        .context("Failed to write config file")?;

    Ok(true)
}
