//! Persistent state cell
//!
//! Binds an in-memory value to one key of a durable store. The value is
//! loaded in the background when the cell is created, and every later
//! change is written back through a [`Debouncer`].
//!
//! ```text
//! [Uninitialized] --load ok------> [Syncing]   (terminal)
//! [Uninitialized] --load failed--> [Unsynced]  (terminal)
//! ```
//!
//! Changes made before the load settles, or after it failed, stay in
//! memory only.

use crate::config::{MissingKeyPolicy, SyncConfig};
use crate::debounce::Debouncer;
use crate::error::Result;
use crate::writer::{spawn_writer, WriteLog};
use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use store::DurableStore;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Synchronization state of a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellState {
    /// Initial load has not finished
    Uninitialized,
    /// Load succeeded; changes are persisted
    Syncing,
    /// Load failed; changes stay in memory
    Unsynced,
}

impl CellState {
    /// Whether the initial load has finished, successfully or not
    pub fn is_settled(self) -> bool {
        self != Self::Uninitialized
    }
}

/// Value shared with the load task
struct Shared<T> {
    value: RwLock<T>,
    state: watch::Sender<CellState>,
}

/// In-memory value mirrored to a durable store key
pub struct PersistentCell<T> {
    key: Arc<str>,
    shared: Arc<Shared<T>>,
    debouncer: Debouncer<T>,
    log: Arc<WriteLog>,
    load_task: JoinHandle<()>,
}

impl<T> PersistentCell<T>
where
    T: Clone + Serialize + DeserializeOwned + Send + Sync + 'static,
{
    /// Create a cell for `key`, starting from `default`
    ///
    /// Returns immediately with `default` visible; the stored value is
    /// loaded in the background. Fails if the key is invalid or the config
    /// is out of range.
    ///
    /// # Panics
    ///
    /// Panics when called outside a Tokio runtime.
    pub fn spawn(
        store: Arc<dyn DurableStore>,
        key: impl Into<String>,
        default: T,
        config: &SyncConfig,
    ) -> Result<Self> {
        config.validate()?;
        let key: Arc<str> = Arc::from(key.into());
        store::validate_key(&key)?;

        let (state, _) = watch::channel(CellState::Uninitialized);
        let shared = Arc::new(Shared {
            value: RwLock::new(default),
            state,
        });

        let log = Arc::new(WriteLog::new());
        let dispatcher = spawn_writer(Arc::clone(&store), Arc::clone(&key), Arc::clone(&log));
        let debouncer = Debouncer::new(config.cooldown(), move |value: T| {
            dispatcher.dispatch(&value);
        });

        let load_task = tokio::spawn(load_initial(
            store,
            Arc::clone(&key),
            Arc::clone(&shared),
            Arc::clone(&log),
            config.missing_key,
        ));

        Ok(Self {
            key,
            shared,
            debouncer,
            log,
            load_task,
        })
    }

    /// Current in-memory value
    pub fn get(&self) -> T {
        self.shared.value.read().clone()
    }

    /// Borrow the current value without cloning
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.shared.value.read())
    }

    /// Replace the value
    ///
    /// The new value is visible immediately. It is persisted only once the
    /// cell is syncing.
    pub fn set(&self, value: T) {
        // Scheduling under the value lock keeps writes in `set` order
        let mut current = self.shared.value.write();
        if self.is_syncing() {
            *current = value.clone();
            self.debouncer.schedule(value);
        } else {
            *current = value;
        }
    }

    /// Modify the value in place, then persist it like [`set`](Self::set)
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        let mut current = self.shared.value.write();
        f(&mut current);
        if self.is_syncing() {
            self.debouncer.schedule(current.clone());
        }
    }

    /// Write any change still waiting for the cooldown window, then wait
    /// for every save of this cell to finish
    pub async fn flush(&self) {
        self.debouncer.flush();
        self.log.settled().await;
    }

    /// Flush and stop persisting
    pub async fn close(self) {
        self.flush().await;
        self.debouncer.cancel();
    }
}

impl<T> PersistentCell<T> {
    /// Store key this cell mirrors
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Current synchronization state
    pub fn state(&self) -> CellState {
        *self.shared.state.borrow()
    }

    /// Whether changes are being persisted
    pub fn is_syncing(&self) -> bool {
        self.state() == CellState::Syncing
    }

    /// Wait for the initial load to settle and return the resulting state
    pub async fn ready(&self) -> CellState {
        let mut rx = self.shared.state.subscribe();
        let state = match rx.wait_for(|state| state.is_settled()).await {
            Ok(state) => *state,
            Err(_) => self.state(),
        };
        state
    }

    /// Number of saves that completed successfully
    pub fn writes(&self) -> u64 {
        self.log.writes()
    }
}

impl<T> Drop for PersistentCell<T> {
    fn drop(&mut self) {
        self.load_task.abort();
    }
}

/// Initial load; runs once per cell
async fn load_initial<T>(
    store: Arc<dyn DurableStore>,
    key: Arc<str>,
    shared: Arc<Shared<T>>,
    log: Arc<WriteLog>,
    missing_key: MissingKeyPolicy,
) where
    T: DeserializeOwned,
{
    let next = match store.load(&key).await {
        Ok(Some(payload)) => match store::typed::decode::<T>(&key, &payload) {
            Ok(value) => {
                *shared.value.write() = value;
                log.remember(payload);
                CellState::Syncing
            }
            Err(e) => {
                warn!("Ignoring stored value for '{}': {}", key, e);
                CellState::Unsynced
            }
        },
        Ok(None) => match missing_key {
            MissingKeyPolicy::AdoptDefault => CellState::Syncing,
            MissingKeyPolicy::Unsynced => {
                warn!("No stored value for '{}'; changes will not be persisted", key);
                CellState::Unsynced
            }
        },
        Err(e) => {
            warn!("Failed to load '{}': {}; changes will not be persisted", key, e);
            CellState::Unsynced
        }
    };

    if next == CellState::Syncing {
        info!("Cell '{}' is syncing", key);
    }
    shared.state.send_replace(next);
}
