//! Ordered write-behind for one cell
//!
//! Payloads handed to a [`Dispatcher`] are saved by a dedicated task in
//! dispatch order, so a slow save never reorders with a later one and
//! never blocks the caller.

use parking_lot::Mutex;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use store::DurableStore;
use tokio::sync::{mpsc, watch};
use tracing::{debug, warn};

/// Write bookkeeping shared between a cell and its writer task
pub(crate) struct WriteLog {
    /// Payload most recently dispatched (or loaded); used to skip rewrites
    last_payload: Mutex<Option<Vec<u8>>>,
    /// Saves dispatched but not yet finished
    in_flight: watch::Sender<usize>,
    /// Saves that completed successfully
    writes: AtomicU64,
}

impl WriteLog {
    pub(crate) fn new() -> Self {
        let (in_flight, _) = watch::channel(0);
        Self {
            last_payload: Mutex::new(None),
            in_flight,
            writes: AtomicU64::new(0),
        }
    }

    /// Record a payload known to be in the store already
    pub(crate) fn remember(&self, payload: Vec<u8>) {
        *self.last_payload.lock() = Some(payload);
    }

    pub(crate) fn writes(&self) -> u64 {
        self.writes.load(Ordering::Acquire)
    }

    /// Wait until every dispatched save has finished
    pub(crate) async fn settled(&self) {
        let mut rx = self.in_flight.subscribe();
        // Sender lives in self, so the channel cannot close while we wait
        let _ = rx.wait_for(|count| *count == 0).await;
    }
}

/// Sending half of a cell's writer
pub(crate) struct Dispatcher {
    key: Arc<str>,
    tx: mpsc::UnboundedSender<Vec<u8>>,
    log: Arc<WriteLog>,
}

impl Dispatcher {
    /// Encode `value` and queue it for saving unless it is already stored
    pub(crate) fn dispatch<T: Serialize>(&self, value: &T) {
        let payload = match store::typed::encode(&self.key, value) {
            Ok(payload) => payload,
            Err(e) => {
                warn!("Dropping write for '{}': {}", self.key, e);
                return;
            }
        };

        {
            let mut last = self.log.last_payload.lock();
            if last.as_deref() == Some(payload.as_slice()) {
                debug!("Skipping unchanged write for '{}'", self.key);
                return;
            }
            *last = Some(payload.clone());
        }

        self.log.in_flight.send_modify(|count| *count += 1);
        if self.tx.send(payload).is_err() {
            // Writer task is gone; nothing will ever settle this write
            self.log.in_flight.send_modify(|count| *count -= 1);
            warn!("Writer for '{}' has stopped, write dropped", self.key);
        }
    }
}

/// Start the writer task for `key` and return its dispatcher
///
/// The task exits once the dispatcher is dropped and the queue drains.
pub(crate) fn spawn_writer(
    store: Arc<dyn DurableStore>,
    key: Arc<str>,
    log: Arc<WriteLog>,
) -> Dispatcher {
    let (tx, mut rx) = mpsc::unbounded_channel::<Vec<u8>>();
    let task_log = Arc::clone(&log);
    let task_key = Arc::clone(&key);

    tokio::spawn(async move {
        while let Some(payload) = rx.recv().await {
            match store.save(&task_key, payload.clone()).await {
                Ok(()) => {
                    task_log.writes.fetch_add(1, Ordering::AcqRel);
                    debug!("Saved '{}' ({} bytes)", task_key, payload.len());
                }
                Err(e) => {
                    warn!("Failed to save '{}': {}", task_key, e);
                    // Forget the payload so the same value is retried next time
                    let mut last = task_log.last_payload.lock();
                    if last.as_deref() == Some(payload.as_slice()) {
                        *last = None;
                    }
                }
            }
            task_log.in_flight.send_modify(|count| *count -= 1);
        }
    });

    Dispatcher { key, tx, log }
}
