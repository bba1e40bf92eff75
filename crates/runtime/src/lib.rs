//! List/store synchronization for memory-game score collections.
//!
//! This crate keeps an in-memory, ordered list of [`Statistic`] records in
//! step with one named collection of a [`StoreAdapter`]. Consumers build a
//! [`ScoreCollection`] per collection, then read and mutate it through the
//! cloneable [`CollectionHandle`] and observe changes as [`ScoreEvent`]s.
//!
//! Modules are organized by responsibility:
//! - [`collection`] hosts the collection owner, handle, and configuration
//! - [`api`] exposes the error type and the pending-operation future
//! - [`events`] provides the per-collection change notification bus
//! - [`repository`] defines the store contract and ships two adapters
//! - `workers` keeps the background store worker internal to the crate
pub mod api;
pub mod collection;
pub mod events;
pub mod repository;

mod workers;

pub use api::{CollectionError, Pending, Result};
pub use collection::{
    CollectionConfig, CollectionHandle, HIGH_SCORES, InsertionPolicy, LoadState, MutationPolicy,
    RECENT_SCORES, RetryPolicy, ScoreCollection, ScoreCollectionBuilder,
};
pub use events::{EventBus, Operation, ScoreEvent};
pub use game_core::{Statistic, StatisticKey};
pub use repository::{FileStore, MemoryStore, StoreAdapter, StoreError};
