//! Storage error model shared by every store port.

use thiserror::Error;

/// Result type returned by store ports.
pub type StoreResult<T> = Result<T, StoreError>;

/// Store-level error (adapter agnostic).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The addressed row does not exist.
    #[error("not found")]
    NotFound,

    /// A uniqueness constraint rejected the write.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Any other backend failure (connection, decoding, poisoned lock).
    #[error("storage error: {0}")]
    Backend(String),
}

impl StoreError {
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }
}
