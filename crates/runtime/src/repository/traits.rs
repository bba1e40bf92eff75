//! Store adapter contract consumed by the collection engine.

use async_trait::async_trait;
use game_core::{Statistic, StatisticKey};

use super::{Result, StoreError};

/// Asynchronous key-value store holding named collections of statistics.
///
/// Connection management belongs to the implementation; the engine only reads
/// the two readiness flags and issues operations scoped to one collection.
/// Implementations assign keys on [`insert`](Self::insert) and must never hand
/// out the same key twice within a collection.
#[async_trait]
pub trait StoreAdapter: Send + Sync {
    /// Whether the store finished opening and accepts transactions.
    fn is_ready(&self) -> bool;

    /// Whether a connection to the backing store exists.
    fn has_connection(&self) -> bool;

    /// All records of `collection`, in store order.
    ///
    /// Store order is unspecified; callers sort if they need ranking order.
    async fn get_all(&self, collection: &str) -> Result<Vec<Statistic>>;

    /// Persist `statistic` and return the key the store assigned to it.
    async fn insert(&self, collection: &str, statistic: &Statistic) -> Result<StatisticKey>;

    /// Remove the record stored under `key`. Missing keys are not an error.
    async fn delete(&self, collection: &str, key: StatisticKey) -> Result<()>;

    /// Remove every record of `collection`.
    async fn clear(&self, collection: &str) -> Result<()>;
}

/// Fails with [`StoreError::NotReady`] unless the store is connected and ready.
pub fn ensure_available(store: &dyn StoreAdapter) -> Result<()> {
    if store.has_connection() && store.is_ready() {
        Ok(())
    } else {
        Err(StoreError::NotReady)
    }
}
