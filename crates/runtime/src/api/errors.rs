//! Unified error type surfaced by collection handles.
//!
//! Wraps store failures and worker coordination failures so callers can bubble
//! them up with consistent context.
use thiserror::Error;
use tokio::sync::oneshot;

pub use crate::repository::StoreError;

pub type Result<T> = std::result::Result<T, CollectionError>;

#[derive(Debug, Error)]
pub enum CollectionError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("collection worker is shut down")]
    WorkerClosed,

    #[error("collection worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("collection worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    #[error("collection requires a store adapter before building")]
    MissingStore,
}

impl CollectionError {
    /// The underlying store error, if this failure came from the store.
    pub fn store_error(&self) -> Option<&StoreError> {
        match self {
            CollectionError::Store(e) => Some(e),
            _ => None,
        }
    }
}
