//! Store error types

use thiserror::Error;

/// Errors raised by durable stores
#[derive(Debug, Error)]
pub enum StoreError {
    /// Underlying database failure
    #[error("storage backend error: {0}")]
    Backend(#[from] sled::Error),

    /// Payload could not be encoded or decoded
    #[error("invalid payload for key '{key}': {source}")]
    Codec {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// Stored key is not valid UTF-8
    #[error("stored key is not valid UTF-8")]
    KeyEncoding(#[from] std::string::FromUtf8Error),

    /// Blocking storage task panicked or was cancelled
    #[error("storage task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    /// Key rejected before reaching the backend
    #[error("invalid key: {0}")]
    InvalidKey(String),
}
