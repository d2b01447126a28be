//! Durable key-value storage for liftlog
//!
//! This crate provides:
//! - The `DurableStore` trait (async load/save by string key)
//! - Typed JSON helpers validated at the boundary (`DurableStoreExt`)
//! - Sled-backed persistent store
//! - In-memory store for tests and ephemeral runs

pub mod error;
pub mod memory;
pub mod sled_store;
pub mod typed;

// Re-exports
pub use error::StoreError;
pub use memory::MemoryStore;
pub use sled_store::SledStore;
pub use typed::DurableStoreExt;

use async_trait::async_trait;

/// Result type for store operations
pub type Result<T> = std::result::Result<T, StoreError>;

/// Durable key-value store addressed by string keys
///
/// Payloads are opaque bytes; use [`DurableStoreExt`] for typed access.
/// Implementations must tolerate overlapping saves to the same key.
#[async_trait]
pub trait DurableStore: Send + Sync + 'static {
    /// Load the payload stored under `key`, `None` if absent
    async fn load(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Persist `payload` under `key`, replacing any previous value
    async fn save(&self, key: &str, payload: Vec<u8>) -> Result<()>;

    /// Remove `key`. Returns whether a value was present.
    async fn remove(&self, key: &str) -> Result<bool>;

    /// All keys currently stored, in ascending order
    async fn keys(&self) -> Result<Vec<String>>;
}

/// Reject keys the store cannot address
pub fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(StoreError::InvalidKey("key must not be empty".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_key() {
        assert!(validate_key("workouts").is_ok());
        assert!(validate_key("exercises/custom").is_ok());
        assert!(matches!(validate_key(""), Err(StoreError::InvalidKey(_))));
    }
}
