//! Debounced persistence for liftlog state
//!
//! This crate provides:
//! - Leading + trailing call coalescing (`Debouncer`)
//! - Persistent state cells mirrored to a durable store key
//! - Sync configuration (cooldown window, missing-key policy)

pub mod cell;
pub mod config;
pub mod debounce;
pub mod error;
mod writer;

#[cfg(test)]
mod testing;

// Re-exports
pub use cell::{CellState, PersistentCell};
pub use config::{ConfigError, MissingKeyPolicy, SyncConfig};
pub use debounce::Debouncer;
pub use error::{CellError, Result};
