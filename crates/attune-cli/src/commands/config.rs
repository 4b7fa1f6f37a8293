use anyhow::{Context, Result};
use attune_etl::{config, Config};

const VALID_KEYS: &str = "corpus_path, reference_path, tolerance, strategy, features, suggestion_limit";

fn path_or_unset(path: Option<&std::path::Path>) -> String {
    path.map_or_else(|| String::from("<not set>"), |p| p.display().to_string())
}

/// Look up a single config value by key.
fn config_value(config: &Config, key: &str) -> Result<String> {
    let value = match key {
        "corpus_path" => path_or_unset(config.corpus_path.as_deref()),
        "reference_path" => path_or_unset(config.reference_path.as_deref()),
        "tolerance" => config.tolerance.to_string(),
        "strategy" => config.strategy.to_string(),
        "features" => config.features.to_string(),
        "suggestion_limit" => config.suggestion_limit.to_string(),
        _ => anyhow::bail!("Unknown config key: {}\n\nValid keys: {}", key, VALID_KEYS),
    };
    Ok(value)
}

/// Show the current effective configuration.
pub fn show_config() -> Result<()> {
    let config = Config::load()?;

    println!("Current Configuration");
    println!("=====================\n");

    println!("Config file: {}", config::config_file_path().display());

    let exists = config::config_file_path().exists();
    println!("File exists: {}\n", if exists { "yes" } else { "no (using defaults)" });

    println!("Settings:");
    for key in VALID_KEYS.split(", ") {
        println!("  {}: {}", key, config_value(&config, key)?);
    }
    println!("  logging.level: {:?}", config.logging.level());
    println!("  logging.coloured: {}", config.logging.coloured());
    println!("  logging.output: {:?}", config.logging.output());

    println!("\nPriority: CLI args > ENV vars (ATTUNE_*) > Config file > Defaults");

    Ok(())
}

/// Get a specific config value.
pub fn get_config(key: Option<String>) -> Result<()> {
    if let Some(key) = key {
        let config = Config::load()?;
        println!("{}", config_value(&config, &key)?);
    } else {
        // No key provided, show entire config file contents
        let config_path = config::config_file_path();

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path)
                .context("Failed to read config file")?;
            print!("{}", contents);
        } else {
            println!("Config file does not exist: {}", config_path.display());
            println!("\nRun 'attune config init' to create it.");
        }
    }

    Ok(())
}

/// Show the config file path.
pub fn show_path() -> Result<()> {
    let config_path = config::config_file_path();
    println!("{}", config_path.display());
    Ok(())
}

/// Show example configuration.
pub fn show_example() -> Result<()> {
    print!("{}", config::example_config());
    Ok(())
}

/// Initialize config file with defaults.
pub fn init_config() -> Result<()> {
    let created = config::ensure_config_file()?;
    let config_path = config::config_file_path();

    if created {
        println!("✓ Created config file: {}", config_path.display());
        println!("\nEdit this file to point attune at your catalog.");
    } else {
        println!("Config file already exists: {}", config_path.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_config_value_known_keys() {
        let config = Config {
            corpus_path: Some(PathBuf::from("/data/tracks.csv")),
            ..Config::default()
        };
        assert_eq!(config_value(&config, "corpus_path").unwrap(), "/data/tracks.csv");
        assert_eq!(config_value(&config, "reference_path").unwrap(), "<not set>");
        assert_eq!(config_value(&config, "tolerance").unwrap(), "0.5");
        assert_eq!(config_value(&config, "strategy").unwrap(), "in-order");
        assert_eq!(config_value(&config, "suggestion_limit").unwrap(), "10");
        assert!(config_value(&config, "features").unwrap().contains("danceability"));
    }

    #[test]
    fn test_config_value_unknown_key() {
        let err = config_value(&Config::default(), "database_path").unwrap_err();
        assert!(err.to_string().contains("Valid keys"));
    }
}
