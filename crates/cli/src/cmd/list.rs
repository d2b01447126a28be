//! List stored keys

use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use std::sync::Arc;
use store::DurableStore;

pub async fn run(store: Arc<dyn DurableStore>) -> Result<()> {
    let keys = store.keys().await.context("Failed to list keys")?;

    if keys.is_empty() {
        println!("{}", "No keys stored".dimmed());
        return Ok(());
    }

    for key in &keys {
        let size = store.load(key).await?.map(|p| p.len()).unwrap_or(0);
        println!("{}  {}", key.cyan(), format!("({} bytes)", size).dimmed());
    }
    println!("\n{} keys", keys.len());
    Ok(())
}
