//! Print a stored value

use anyhow::{Context, Result};
use std::sync::Arc;
use store::{DurableStore, DurableStoreExt};

pub async fn run(store: Arc<dyn DurableStore>, key: &str) -> Result<()> {
    let value: serde_json::Value = store
        .load_value(key)
        .await
        .with_context(|| format!("Failed to load '{}'", key))?
        .with_context(|| format!("No value stored for '{}'", key))?;

    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}
