//! In-memory key-value store

use crate::{validate_key, DurableStore, Result};
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;

/// Volatile store backed by a concurrent map
///
/// Clones share the same map, so a test can keep a handle and inspect
/// what a cell wrote.
#[derive(Clone, Default)]
pub struct MemoryStore {
    entries: Arc<DashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with raw payloads
    pub fn with_entries<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, Vec<u8>)>,
        K: Into<String>,
    {
        let store = Self::new();
        for (key, payload) in entries {
            store.entries.insert(key.into(), payload);
        }
        store
    }

    /// Raw payload for a key, without going through the async API
    pub fn get_raw(&self, key: &str) -> Option<Vec<u8>> {
        self.entries.get(key).map(|entry| entry.value().clone())
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store holds no keys
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl DurableStore for MemoryStore {
    async fn load(&self, key: &str) -> Result<Option<Vec<u8>>> {
        validate_key(key)?;
        Ok(self.get_raw(key))
    }

    async fn save(&self, key: &str, payload: Vec<u8>) -> Result<()> {
        validate_key(key)?;
        self.entries.insert(key.to_owned(), payload);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<bool> {
        validate_key(key)?;
        Ok(self.entries.remove(key).is_some())
    }

    async fn keys(&self) -> Result<Vec<String>> {
        let mut keys: Vec<String> = self.entries.iter().map(|e| e.key().clone()).collect();
        keys.sort_unstable();
        Ok(keys)
    }
}
