//! Instrumented store for cell tests

use async_trait::async_trait;
use parking_lot::Mutex;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use store::{DurableStore, StoreError};
use tokio::time::Instant;

/// One save attempt, successful or not
#[derive(Debug, Clone)]
pub(crate) struct Save {
    pub at: Instant,
    pub key: String,
    pub payload: String,
}

#[derive(Default)]
struct Inner {
    entries: Mutex<HashMap<String, Vec<u8>>>,
    saves: Mutex<Vec<Save>>,
    hang_loads: AtomicBool,
    fail_loads: AtomicBool,
    fail_saves: AtomicBool,
}

/// Memory store that records every save attempt with its timestamp
#[derive(Clone, Default)]
pub(crate) struct RecordingStore {
    inner: Arc<Inner>,
}

impl RecordingStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_value<T: Serialize>(self, key: &str, value: &T) -> Self {
        let payload = serde_json::to_vec(value).unwrap();
        self.with_raw(key, &payload)
    }

    pub(crate) fn with_raw(self, key: &str, payload: &[u8]) -> Self {
        self.inner
            .entries
            .lock()
            .insert(key.to_string(), payload.to_vec());
        self
    }

    /// Loads never complete
    pub(crate) fn hang_loads(self) -> Self {
        self.inner.hang_loads.store(true, Ordering::SeqCst);
        self
    }

    pub(crate) fn fail_loads(self) -> Self {
        self.inner.fail_loads.store(true, Ordering::SeqCst);
        self
    }

    pub(crate) fn fail_saves(self) -> Self {
        self.inner.fail_saves.store(true, Ordering::SeqCst);
        self
    }

    pub(crate) fn shared(&self) -> Arc<dyn DurableStore> {
        Arc::new(self.clone())
    }

    pub(crate) fn saves(&self) -> Vec<Save> {
        self.inner.saves.lock().clone()
    }

    /// (key, payload) of every save attempt, in order
    pub(crate) fn saved_values(&self) -> Vec<(String, String)> {
        self.saves()
            .into_iter()
            .map(|save| (save.key, save.payload))
            .collect()
    }
}

#[async_trait]
impl DurableStore for RecordingStore {
    async fn load(&self, key: &str) -> store::Result<Option<Vec<u8>>> {
        if self.inner.hang_loads.load(Ordering::SeqCst) {
            std::future::pending::<()>().await;
        }
        if self.inner.fail_loads.load(Ordering::SeqCst) {
            return Err(refused(format!("load of '{key}' refused")));
        }
        Ok(self.inner.entries.lock().get(key).cloned())
    }

    async fn save(&self, key: &str, payload: Vec<u8>) -> store::Result<()> {
        self.inner.saves.lock().push(Save {
            at: Instant::now(),
            key: key.to_string(),
            payload: String::from_utf8_lossy(&payload).into_owned(),
        });
        if self.inner.fail_saves.load(Ordering::SeqCst) {
            return Err(refused(format!("save of '{key}' refused")));
        }
        self.inner.entries.lock().insert(key.to_string(), payload);
        Ok(())
    }

    async fn remove(&self, key: &str) -> store::Result<bool> {
        Ok(self.inner.entries.lock().remove(key).is_some())
    }

    async fn keys(&self) -> store::Result<Vec<String>> {
        let mut keys: Vec<String> = self.inner.entries.lock().keys().cloned().collect();
        keys.sort_unstable();
        Ok(keys)
    }
}

/// Backend failure as sled would report an I/O error
fn refused(message: String) -> StoreError {
    StoreError::Backend(sled::Error::Io(std::io::Error::new(
        std::io::ErrorKind::Other,
        message,
    )))
}
