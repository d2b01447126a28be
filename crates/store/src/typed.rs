//! Typed access to a durable store
//!
//! Values are stored as JSON. Decoding happens on load, so a payload
//! with the wrong shape is reported as `StoreError::Codec` instead of
//! leaking into application state.

use crate::{DurableStore, Result, StoreError};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Encode a value into the payload format used by the store
pub fn encode<T: Serialize + ?Sized>(key: &str, value: &T) -> Result<Vec<u8>> {
    serde_json::to_vec(value).map_err(|source| StoreError::Codec {
        key: key.to_owned(),
        source,
    })
}

/// Decode a payload read from the store
pub fn decode<T: DeserializeOwned>(key: &str, payload: &[u8]) -> Result<T> {
    serde_json::from_slice(payload).map_err(|source| StoreError::Codec {
        key: key.to_owned(),
        source,
    })
}

/// Typed load/save on top of any [`DurableStore`]
#[async_trait]
pub trait DurableStoreExt: DurableStore {
    /// Load and decode the value under `key`
    async fn load_value<T>(&self, key: &str) -> Result<Option<T>>
    where
        T: DeserializeOwned + Send,
    {
        match self.load(key).await? {
            Some(payload) => decode(key, &payload).map(Some),
            None => Ok(None),
        }
    }

    /// Encode and save `value` under `key`
    async fn save_value<T>(&self, key: &str, value: &T) -> Result<()>
    where
        T: Serialize + Sync,
    {
        let payload = encode(key, value)?;
        self.save(key, payload).await
    }
}

impl<S: DurableStore + ?Sized> DurableStoreExt for S {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryStore;
    use serde::Deserialize;
    use std::sync::Arc;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Set {
        reps: u32,
        mass_kg: f32,
    }

    #[tokio::test]
    async fn test_typed_values() {
        let store = MemoryStore::new();
        let sets = vec![
            Set { reps: 5, mass_kg: 100.0 },
            Set { reps: 3, mass_kg: 110.0 },
        ];

        store.save_value("squat", &sets).await.unwrap();
        let loaded: Option<Vec<Set>> = store.load_value("squat").await.unwrap();
        assert_eq!(loaded, Some(sets));

        let missing: Option<Vec<Set>> = store.load_value("bench").await.unwrap();
        assert_eq!(missing, None);
    }

    #[tokio::test]
    async fn test_shape_mismatch_is_codec_error() {
        let store = MemoryStore::with_entries([("squat", b"\"not a list\"".to_vec())]);

        let err = store.load_value::<Vec<Set>>("squat").await.unwrap_err();
        match err {
            StoreError::Codec { key, .. } => assert_eq!(key, "squat"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_works_through_trait_object() {
        let store: Arc<dyn DurableStore> = Arc::new(MemoryStore::new());

        store.save_value("rest_secs", &90u32).await.unwrap();
        assert_eq!(store.load_value::<u32>("rest_secs").await.unwrap(), Some(90));
    }
}
