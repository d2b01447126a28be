//! Persistent key-value store using sled

use crate::{validate_key, DurableStore, Result};
use async_trait::async_trait;
use sled::Db;
use std::path::Path;
use tokio::task;

/// File name of the database inside the store directory
const DB_NAME: &str = "state.db";

/// Sled-backed durable store
///
/// Each key maps to one payload. Writes are flushed before `save`
/// returns, so a completed save survives a crash. Sled serializes
/// concurrent writes to the same key; the last one to land wins.
#[derive(Clone)]
pub struct SledStore {
    db: Db,
}

impl SledStore {
    /// Open or create a store in the given directory
    pub fn open(dir: &Path) -> Result<Self> {
        let db = sled::open(dir.join(DB_NAME))?;
        tracing::debug!("Opened store at {} ({} keys)", dir.display(), db.len());
        Ok(Self { db })
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.db.len()
    }

    /// Whether the store holds no keys
    pub fn is_empty(&self) -> bool {
        self.db.is_empty()
    }
}

#[async_trait]
impl DurableStore for SledStore {
    async fn load(&self, key: &str) -> Result<Option<Vec<u8>>> {
        validate_key(key)?;
        let db = self.db.clone();
        let key = key.to_owned();

        let value = task::spawn_blocking(move || db.get(key.as_bytes())).await??;
        Ok(value.map(|v| v.to_vec()))
    }

    async fn save(&self, key: &str, payload: Vec<u8>) -> Result<()> {
        validate_key(key)?;
        let db = self.db.clone();
        let key = key.to_owned();

        task::spawn_blocking(move || -> Result<()> {
            db.insert(key.as_bytes(), payload)?;
            // Flush to ensure durability
            db.flush()?;
            Ok(())
        })
        .await?
    }

    async fn remove(&self, key: &str) -> Result<bool> {
        validate_key(key)?;
        let db = self.db.clone();
        let key = key.to_owned();

        task::spawn_blocking(move || -> Result<bool> {
            let existed = db.remove(key.as_bytes())?.is_some();
            db.flush()?;
            Ok(existed)
        })
        .await?
    }

    async fn keys(&self) -> Result<Vec<String>> {
        let db = self.db.clone();

        task::spawn_blocking(move || -> Result<Vec<String>> {
            let mut keys = Vec::new();
            for item in db.iter().keys() {
                let key = item?;
                keys.push(String::from_utf8(key.to_vec())?);
            }
            Ok(keys)
        })
        .await?
    }
}
