//! Initial-load lifecycle of a collection.

/// Progress of a collection's initial load.
///
/// Add, clear, delete and sort are accepted in every state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    /// Constructed; the worker has not attempted the load yet.
    Uninitialized,
    /// A load attempt is in flight.
    Loading,
    /// The store was not ready; another attempt is scheduled.
    Retrying { attempts: u32 },
    /// The load finished and `loaded` records were merged into the list.
    Ready { loaded: usize },
    /// The store failed for a reason other than readiness. No further attempts.
    Failed { reason: String },
}

impl LoadState {
    /// `true` once no further load attempt will happen.
    pub fn is_settled(&self) -> bool {
        matches!(self, LoadState::Ready { .. } | LoadState::Failed { .. })
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, LoadState::Ready { .. })
    }
}
