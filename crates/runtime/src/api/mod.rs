//! Public API surface shared by collection handles.
//!
//! Gathers the error type and the pending-operation future so the engine and
//! worker modules can stay focused on list and store bookkeeping.

pub mod errors;
pub mod pending;

pub use errors::{CollectionError, Result};
pub use pending::Pending;
