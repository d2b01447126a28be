//! System-wide configuration file
//!
//! Stored as TOML at `<config dir>/liftlog/config.toml`. The
//! `LIFTLOG_CONFIG` environment variable points at a different file.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use sync::{MissingKeyPolicy, SyncConfig};

/// Environment variable overriding the config file location
pub const CONFIG_ENV: &str = "LIFTLOG_CONFIG";

/// Full configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    pub store: StoreSection,
    pub sync: SyncConfig,
}

/// Where the durable store lives
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSection {
    /// Store directory (default: `<data dir>/liftlog`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            store: StoreSection::default(),
            // The CLI creates keys, so absent keys start syncing
            sync: SyncConfig {
                missing_key: MissingKeyPolicy::AdoptDefault,
                ..SyncConfig::default()
            },
        }
    }
}

impl SystemConfig {
    /// Check value ranges
    pub fn validate(&self) -> Result<()> {
        self.sync.validate()?;
        if let Some(path) = &self.store.path {
            if path.as_os_str().is_empty() {
                anyhow::bail!("store.path must not be empty");
            }
        }
        Ok(())
    }

    /// Store directory, falling back to the platform data directory
    pub fn store_dir(&self) -> Result<PathBuf> {
        match &self.store.path {
            Some(path) => Ok(path.clone()),
            None => default_store_dir(),
        }
    }
}

/// Platform default store directory
pub fn default_store_dir() -> Result<PathBuf> {
    let data_dir = dirs::data_dir().context("Could not determine data directory")?;
    Ok(data_dir.join("liftlog"))
}

/// Path of the config file
pub fn config_file_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os(CONFIG_ENV) {
        return Some(PathBuf::from(path));
    }
    dirs::config_dir().map(|dir| dir.join("liftlog").join("config.toml"))
}

/// Load configuration, using defaults when no file exists
pub fn load() -> Result<SystemConfig> {
    match config_file_path() {
        Some(path) if path.exists() => load_from(&path),
        _ => Ok(SystemConfig::default()),
    }
}

/// Load configuration from a specific file
pub fn load_from(path: &Path) -> Result<SystemConfig> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    let config: SystemConfig = toml::from_str(&contents)
        .with_context(|| format!("Failed to parse config file {}", path.display()))?;
    config
        .validate()
        .with_context(|| format!("Invalid config file {}", path.display()))?;
    Ok(config)
}

/// Save configuration to the config file
pub fn save(config: &SystemConfig) -> Result<()> {
    let path = config_file_path().context("Could not determine config file path")?;
    save_to(config, &path)
}

/// Save configuration to a specific file
pub fn save_to(config: &SystemConfig, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).context("Failed to create config directory")?;
    }
    let contents = toml::to_string_pretty(config).context("Failed to serialize config")?;
    std::fs::write(path, contents)
        .with_context(|| format!("Failed to write config file {}", path.display()))?;
    Ok(())
}

/// Write the default configuration if no file exists yet
pub fn init_if_missing() -> Result<()> {
    let path = config_file_path().context("Could not determine config file path")?;
    if !path.exists() {
        save_to(&SystemConfig::default(), &path)?;
    }
    Ok(())
}

/// Annotated example configuration
pub fn example_config() -> String {
    format!(
        r#"# liftlog configuration

[store]
# Directory holding the state database
# path = "/home/me/.local/share/liftlog"

[sync]
# Cooldown between coalesced writes, in milliseconds (0-{max})
cooldown_ms = {cooldown}

# Keys with no stored value: "adopt_default" starts persisting,
# "unsynced" keeps changes in memory only
missing_key = "adopt_default"
"#,
        max = sync::config::MAX_COOLDOWN_MS,
        cooldown = sync::config::DEFAULT_COOLDOWN_MS,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_save_and_load_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested/config.toml");

        let mut config = SystemConfig::default();
        config.sync.cooldown_ms = 250;
        config.store.path = Some(temp_dir.path().join("store"));

        save_to(&config, &path).unwrap();
        assert_eq!(load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_example_config_parses_to_defaults() {
        let config: SystemConfig = toml::from_str(&example_config()).unwrap();
        assert_eq!(config, SystemConfig::default());
    }

    #[test]
    fn test_rejects_out_of_range_cooldown() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[sync]\ncooldown_ms = 999999\n").unwrap();

        assert!(load_from(&path).is_err());
    }

    #[test]
    fn test_store_dir_override() {
        let config = SystemConfig {
            store: StoreSection {
                path: Some(PathBuf::from("/tmp/liftlog-test")),
            },
            ..Default::default()
        };
        assert_eq!(config.store_dir().unwrap(), PathBuf::from("/tmp/liftlog-test"));
    }
}
