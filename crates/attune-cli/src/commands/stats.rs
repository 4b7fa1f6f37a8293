use anyhow::Result;
use serde::Serialize;

use attune_core::stats::{summarize, FeatureSummary};
use attune_etl::{Config, IngestReport};

use super::bands::{derive_bands, open_catalog, ReferenceSource};

#[derive(Debug, Serialize)]
struct StatsReport {
    reference: String,
    missing_seeds: Vec<String>,
    tolerance: f64,
    catalog: IngestReport,
    features: Vec<FeatureSummary>,
}

/// Show the reference statistics and bands.
pub fn show_stats(config: &Config, seeds: &[String], json: bool) -> Result<()> {
    let catalog = open_catalog(config)?;
    let bands = derive_bands(config, &catalog, seeds)?;

    let missing_seeds = match &bands.source {
        ReferenceSource::Seeds { missing, .. } => missing.clone(),
        ReferenceSource::File(_) => Vec::new(),
    };
    let report = StatsReport {
        reference: bands.source.to_string(),
        missing_seeds,
        tolerance: config.tolerance,
        catalog: catalog.report,
        features: summarize(&bands.averages, &bands.std_devs, config.tolerance),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("\nAttune Statistics\n");
    println!("  Reference: {}", report.reference);
    if !report.missing_seeds.is_empty() {
        println!("  Not in catalog: {}", report.missing_seeds.join(", "));
    }
    println!(
        "  Catalog: {} tracks ({} rows skipped)",
        report.catalog.rows_accepted, report.catalog.rows_skipped
    );
    println!("  k: {}\n", report.tolerance);

    println!(
        "  {:<18} {:>12} {:>12} {:>12} {:>12}",
        "feature", "mean", "std dev", "min", "max"
    );
    for row in &report.features {
        println!(
            "  {:<18} {:>12.4} {:>12.4} {:>12.4} {:>12.4}{}",
            row.feature.name(),
            row.mean,
            row.std_dev,
            row.band.min,
            row.band.max,
            if row.band.is_inverted() { "  (inverted)" } else { "" }
        );
    }

    Ok(())
}
