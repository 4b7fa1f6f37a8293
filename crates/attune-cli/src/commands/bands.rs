//! Catalog loading and band derivation shared by `recommend` and `stats`.

use anyhow::{Context, Result};

use attune_core::{compute_averages, compute_std_devs, make_range, AttributeRange, Averages, StdDevs};
use attune_etl::{load_catalog, load_reference, Catalog, Config};

/// Where the band centres came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReferenceSource {
    Seeds { matched: usize, missing: Vec<String> },
    File(std::path::PathBuf),
}

impl std::fmt::Display for ReferenceSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Seeds { matched, .. } => write!(f, "{matched} seed track(s)"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Reference statistics and the bands derived from them.
#[derive(Debug, Clone)]
pub struct Bands {
    pub source: ReferenceSource,
    pub averages: Averages,
    pub std_devs: StdDevs,
    pub range: AttributeRange,
}

/// Load the configured catalog.
pub fn open_catalog(config: &Config) -> Result<Catalog> {
    let path = config.require_corpus()?;
    load_catalog(&path).with_context(|| format!("Failed to load catalog {}", path.display()))
}

/// Derive the bands for `catalog`.
///
/// Seeds take precedence over the reference file. Standard deviations are
/// measured over the whole catalog around the reference averages.
pub fn derive_bands(config: &Config, catalog: &Catalog, seeds: &[String]) -> Result<Bands> {
    let (source, averages) = if seeds.is_empty() {
        let Some(path) = config.reference_path.clone() else {
            anyhow::bail!(
                "No reference given. Pass --seed NAME or --reference FILE, \
                 or set reference_path in the config"
            );
        };
        let reference = load_reference(&path)
            .with_context(|| format!("Failed to load reference {}", path.display()))?;
        let averages = compute_averages(&reference.rows, &config.features)
            .with_context(|| format!("{} has no usable rows", path.display()))?;
        (ReferenceSource::File(path), averages)
    } else {
        let selection = catalog.select_named(seeds);
        let averages = compute_averages(selection.matched.iter().copied(), &config.features)
            .with_context(|| format!("None of the seed tracks are in the catalog: {}", seeds.join(", ")))?;
        let source = ReferenceSource::Seeds {
            matched: selection.matched.len(),
            missing: selection.missing,
        };
        (source, averages)
    };

    let std_devs = compute_std_devs(&catalog.tracks, &averages)
        .context("The catalog has no tracks to measure spread against")?;
    let range = make_range(&averages, &std_devs, config.tolerance);

    log::info!(
        "Bands from {} on {} feature(s), k = {}",
        source,
        range.len(),
        config.tolerance
    );

    Ok(Bands {
        source,
        averages,
        std_devs,
        range,
    })
}
