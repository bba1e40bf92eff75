//! Store adapters for persisted score collections.
//!
//! The collection engine talks to persistence only through [`StoreAdapter`].
//! Two adapters ship with the crate:
//! - [`MemoryStore`] keeps collections in process memory (tests, demos)
//! - [`FileStore`] keeps one JSON document per collection on disk

mod error;
mod file;
mod memory;
mod traits;

pub use error::{Result, StoreError};
pub use file::FileStore;
pub use memory::MemoryStore;
pub use traits::{StoreAdapter, ensure_available};
