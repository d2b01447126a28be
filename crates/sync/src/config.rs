//! Synchronization settings for persistent cells

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Longest accepted cooldown window
pub const MAX_COOLDOWN_MS: u64 = 60_000;

/// Default cooldown window
pub const DEFAULT_COOLDOWN_MS: u64 = 1_000;

/// Configuration errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("cooldown_ms must be between 0 and {max}, got {0}", max = MAX_COOLDOWN_MS)]
    CooldownOutOfRange(u64),

    #[error("unknown missing-key policy '{0}' (expected 'unsynced' or 'adopt_default')")]
    UnknownPolicy(String),
}

/// What a cell does when its key has never been saved
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingKeyPolicy {
    /// Treat absence as a failed load: keep the default, never persist
    #[default]
    Unsynced,
    /// Keep the default and start persisting changes
    AdoptDefault,
}

impl fmt::Display for MissingKeyPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unsynced => f.write_str("unsynced"),
            Self::AdoptDefault => f.write_str("adopt_default"),
        }
    }
}

impl FromStr for MissingKeyPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unsynced" => Ok(Self::Unsynced),
            "adopt_default" => Ok(Self::AdoptDefault),
            other => Err(ConfigError::UnknownPolicy(other.to_string())),
        }
    }
}

/// Settings shared by the cells of one process
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Cooldown window between coalesced writes (milliseconds)
    pub cooldown_ms: u64,

    /// Behavior for keys with no stored value
    pub missing_key: MissingKeyPolicy,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            cooldown_ms: DEFAULT_COOLDOWN_MS,
            missing_key: MissingKeyPolicy::default(),
        }
    }
}

impl SyncConfig {
    /// Cooldown window as a duration
    pub fn cooldown(&self) -> Duration {
        Duration::from_millis(self.cooldown_ms)
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cooldown_ms > MAX_COOLDOWN_MS {
            return Err(ConfigError::CooldownOutOfRange(self.cooldown_ms));
        }
        Ok(())
    }
}
