//! Score collections: one in-memory list mirrored into one store collection.
//!
//! - [`config`] holds the per-collection parameters and the named presets
//! - [`ScoreCollection`] owns the background worker of a collection
//! - [`CollectionHandle`] is the cloneable façade used to read and mutate it

pub mod config;
mod engine;
mod handle;
mod list;
mod state;

pub use config::{
    CollectionConfig, HIGH_SCORES, InsertionPolicy, MutationPolicy, RECENT_SCORES, RetryPolicy,
};
pub use engine::{ScoreCollection, ScoreCollectionBuilder};
pub use handle::CollectionHandle;
pub use state::LoadState;

pub(crate) use list::{EntryId, ScoreList, SharedList, read_list, write_list};
