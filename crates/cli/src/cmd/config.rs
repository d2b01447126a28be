//! Configuration management command
//!
//! Provides CLI interface to view and edit system configuration.

use crate::system_config::{self, SystemConfig};
use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use std::path::PathBuf;

/// List all configuration values
pub async fn run_list() -> Result<()> {
    let config = system_config::load()?;
    let config_path = system_config::config_file_path()
        .context("Could not determine config file path")?;

    println!("{}", "System Configuration".bold());
    println!("{}: {}\n", "Location".dimmed(), config_path.display().dimmed());

    println!("{}", "[store]".yellow());
    println!(
        "  {} = {}",
        "path".cyan(),
        config.store_dir()?.display()
    );

    println!("\n{}", "[sync]".yellow());
    println!(
        "  {} = {} {}",
        "cooldown_ms".cyan(),
        config.sync.cooldown_ms,
        format!("({:?})", config.sync.cooldown()).dimmed()
    );
    println!(
        "  {} = {}",
        "missing_key".cyan(),
        config.sync.missing_key
    );

    println!("\n{}", "Valid Ranges:".bold());
    println!("  cooldown_ms: 0-{}", sync::config::MAX_COOLDOWN_MS);
    println!("  missing_key: unsynced | adopt_default");

    Ok(())
}

/// Get a single configuration value
pub async fn run_get(key: &str) -> Result<()> {
    let config = system_config::load()?;
    println!("{}", get_value(&config, key)?);
    Ok(())
}

/// Set a configuration value
pub async fn run_set(key: &str, value: &str) -> Result<()> {
    let mut config = system_config::load()?;
    set_value(&mut config, key, value)?;

    // Validate before saving
    config.validate()
        .context("Invalid configuration value")?;

    system_config::save(&config)?;

    println!("{} {} = {}", "✓".green(), key.cyan(), value);
    Ok(())
}

/// Show the config file path and optionally create it
pub async fn run_path(create: bool) -> Result<()> {
    let config_path = system_config::config_file_path()
        .context("Could not determine config file path")?;

    if create && !config_path.exists() {
        system_config::init_if_missing()?;
        println!("{} Created config file at: {}", "✓".green(), config_path.display());
    } else if config_path.exists() {
        println!("{}", config_path.display());
    } else {
        println!("{}", config_path.display());
        println!("{}", "File does not exist. Use --create to create it.".yellow());
    }

    Ok(())
}

/// Show example configuration
pub async fn run_example() -> Result<()> {
    println!("{}", system_config::example_config());
    Ok(())
}

fn get_value(config: &SystemConfig, key: &str) -> Result<String> {
    let value = match key {
        "store.path" => config.store_dir()?.display().to_string(),
        "sync.cooldown_ms" => config.sync.cooldown_ms.to_string(),
        "sync.missing_key" => config.sync.missing_key.to_string(),
        _ => anyhow::bail!(
            "Unknown config key: {}. Use 'liftlog config --list' to see available keys.",
            key
        ),
    };
    Ok(value)
}

fn set_value(config: &mut SystemConfig, key: &str, value: &str) -> Result<()> {
    match key {
        "store.path" => {
            config.store.path = Some(PathBuf::from(value));
        }
        "sync.cooldown_ms" => {
            let val: u64 = value.parse()
                .context("Invalid value: must be a non-negative integer")?;
            config.sync.cooldown_ms = val;
        }
        "sync.missing_key" => {
            config.sync.missing_key = value.parse()?;
        }
        _ => anyhow::bail!(
            "Unknown config key: {}. Use 'liftlog config --list' to see available keys.",
            key
        ),
    }
    Ok(())
}
