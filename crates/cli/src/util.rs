//! Shared utilities for CLI commands

use crate::system_config::SystemConfig;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use store::{DurableStore, SledStore};

/// Resolve the store directory: explicit flag first, then config
pub fn resolve_store_dir(flag: Option<&Path>, config: &SystemConfig) -> Result<PathBuf> {
    match flag {
        Some(dir) => Ok(dir.to_path_buf()),
        None => config.store_dir(),
    }
}

/// Open the sled store, creating its directory if needed
pub fn open_store(dir: &Path) -> Result<Arc<dyn DurableStore>> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create store directory {}", dir.display()))?;
    let store = SledStore::open(dir)
        .with_context(|| format!("Failed to open store at {}", dir.display()))?;
    Ok(Arc::new(store))
}

/// Parse a command-line value as JSON, falling back to a plain string
///
/// `42`, `true` and `{"reps":5}` parse as JSON; `kg` becomes `"kg"`.
pub fn parse_value(raw: &str) -> serde_json::Value {
    serde_json::from_str(raw).unwrap_or_else(|_| serde_json::Value::String(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_value() {
        assert_eq!(parse_value("42"), json!(42));
        assert_eq!(parse_value("true"), json!(true));
        assert_eq!(parse_value(r#"{"reps":5}"#), json!({"reps": 5}));
        assert_eq!(parse_value("kg"), json!("kg"));
    }

    #[test]
    fn test_flag_wins_over_config() {
        let config = SystemConfig::default();
        let dir = resolve_store_dir(Some(Path::new("/tmp/elsewhere")), &config).unwrap();
        assert_eq!(dir, PathBuf::from("/tmp/elsewhere"));
    }
}
