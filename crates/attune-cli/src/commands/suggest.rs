use anyhow::Result;

use attune_etl::Config;
use attune_search::suggest;

use super::bands::open_catalog;

/// Print catalog names completing `prefix`, one per line.
pub fn run_suggest(config: &Config, prefix: &str) -> Result<()> {
    let tree = open_catalog(config)?.into_tree();
    let suggestions = suggest(&tree, prefix, config.suggestion_limit);

    if suggestions.is_empty() {
        log::info!("No track names start with {:?}", prefix);
    }
    for name in suggestions {
        println!("{name}");
    }

    Ok(())
}
