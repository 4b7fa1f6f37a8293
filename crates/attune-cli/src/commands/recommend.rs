use anyhow::{Context, Result};
use std::io::Write;

use attune_core::Track;
use attune_etl::Config;
use attune_search::query;

use super::bands::{derive_bands, open_catalog, ReferenceSource};
use crate::OutputFormat;

/// Print every catalog track inside the reference bands.
pub fn run_recommend(config: &Config, seeds: &[String], format: OutputFormat) -> Result<()> {
    let catalog = open_catalog(config)?;
    let bands = derive_bands(config, &catalog, seeds)?;

    if let ReferenceSource::Seeds { missing, .. } = &bands.source {
        if !missing.is_empty() {
            eprintln!("Not in catalog: {}", missing.join(", "));
        }
    }
    let inverted = bands.range.inverted_features();
    if !inverted.is_empty() {
        log::warn!("{} band(s) are inverted and match nothing", inverted.len());
    }

    let tree = catalog.into_tree();
    let found = query(&tree, &bands.range, config.strategy);
    log::info!(
        "{} of {} tracks match ({} traversal)",
        found.len(),
        tree.len(),
        config.strategy
    );

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    render(&mut out, &found, format)?;
    out.flush().context("Failed to write results")?;

    Ok(())
}

/// Write `tracks` to `out` in the requested layout.
pub fn render<W: Write>(out: &mut W, tracks: &[&Track], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Names => {
            let names: Vec<&str> = tracks.iter().map(|t| t.name.as_str()).collect();
            serde_json::to_writer_pretty(&mut *out, &names)?;
            writeln!(out)?;
        }
        OutputFormat::Records => {
            serde_json::to_writer_pretty(&mut *out, tracks)?;
            writeln!(out)?;
        }
        OutputFormat::Plain => {
            for track in tracks {
                let artists = track.artist_line();
                if artists.is_empty() {
                    writeln!(out, "{}", track.name)?;
                } else {
                    writeln!(out, "{} - {}", track.name, artists)?;
                }
            }
        }
    }
    Ok(())
}
