//! Cell error types

use crate::config::ConfigError;
use store::StoreError;
use thiserror::Error;

/// Errors raised when creating a persistent cell
#[derive(Debug, Error)]
pub enum CellError {
    /// Key rejected by the store
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Sync settings out of range
    #[error("invalid sync config: {0}")]
    Config(#[from] ConfigError),
}

/// Result type for cell operations
pub type Result<T> = std::result::Result<T, CellError>;
