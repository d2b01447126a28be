//! Remove a stored key

use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use std::sync::Arc;
use store::DurableStore;

pub async fn run(store: Arc<dyn DurableStore>, key: &str) -> Result<()> {
    let existed = store
        .remove(key)
        .await
        .with_context(|| format!("Failed to remove '{}'", key))?;

    if !existed {
        anyhow::bail!("No value stored for '{}'", key);
    }

    println!("{} Removed {}", "✓".green(), key.cyan());
    Ok(())
}
