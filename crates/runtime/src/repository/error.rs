//! Error types raised by store adapters.

use thiserror::Error;

/// Errors surfaced by store adapters.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store has no open connection or is not ready yet.
    #[error("store not ready")]
    NotReady,

    #[error("store lock was poisoned")]
    LockPoisoned,

    #[error("invalid collection name: {0:?}")]
    InvalidCollection(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("corrupted data: {0}")]
    CorruptedData(String),

    #[error("store backend failure: {0}")]
    Backend(String),
}

impl StoreError {
    /// `true` for the one error kind the initial load retries on.
    pub fn is_not_ready(&self) -> bool {
        matches!(self, StoreError::NotReady)
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_not_ready_is_retryable() {
        assert!(StoreError::NotReady.is_not_ready());
        assert!(!StoreError::Backend("aborted".into()).is_not_ready());
        assert!(!StoreError::LockPoisoned.is_not_ready());
    }
}
