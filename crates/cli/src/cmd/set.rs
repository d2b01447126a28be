//! Write values through a persistent cell
//!
//! Values are applied in order exactly like an app would: the first one
//! is written right away, later ones are coalesced by the cooldown
//! window, and the last one is flushed before the command exits.

use crate::util::parse_value;
use anyhow::Result;
use owo_colors::OwoColorize;
use std::sync::Arc;
use std::time::Duration;
use store::DurableStore;
use sync::{CellState, PersistentCell, SyncConfig};

pub async fn run(
    store: Arc<dyn DurableStore>,
    config: &SyncConfig,
    key: &str,
    values: &[String],
    interval_ms: u64,
) -> Result<()> {
    let cell = PersistentCell::spawn(store, key, serde_json::Value::Null, config)?;

    let state = cell.ready().await;
    if state != CellState::Syncing {
        anyhow::bail!(
            "'{}' is not syncing ({:?}); nothing will be written. \
             Set sync.missing_key = adopt_default to create new keys.",
            key,
            state
        );
    }

    for (i, raw) in values.iter().enumerate() {
        if i > 0 && interval_ms > 0 {
            tokio::time::sleep(Duration::from_millis(interval_ms)).await;
        }
        cell.set(parse_value(raw));
    }

    cell.flush().await;
    let writes = cell.writes();
    let value = cell.get();
    cell.close().await;

    println!(
        "{} {} = {} {}",
        "✓".green(),
        key.cyan(),
        value,
        format!("({} of {} values written)", writes, values.len()).dimmed()
    );
    Ok(())
}
