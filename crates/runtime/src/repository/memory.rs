//! In-memory StoreAdapter implementation for tests and local runs.

use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use game_core::{Statistic, StatisticKey};

use super::{Result, StoreAdapter, StoreError};

#[derive(Default)]
struct MemoryCollection {
    /// Keys keep counting across clears, like a browser key generator.
    next_key: u64,
    records: BTreeMap<StatisticKey, Statistic>,
}

impl MemoryCollection {
    fn insert(&mut self, statistic: &Statistic) -> StatisticKey {
        self.next_key += 1;
        let key = StatisticKey(self.next_key);
        self.records.insert(key, statistic.clone().with_key(key));
        key
    }
}

/// In-memory store keyed by collection name.
///
/// Records come back from [`get_all`](StoreAdapter::get_all) in key order.
/// Readiness can be toggled to exercise the engine's retry path.
pub struct MemoryStore {
    collections: RwLock<HashMap<String, MemoryCollection>>,
    connected: AtomicBool,
    ready: AtomicBool,
}

impl MemoryStore {
    /// Create an empty store that is connected and ready.
    pub fn new() -> Self {
        Self {
            collections: RwLock::new(HashMap::new()),
            connected: AtomicBool::new(true),
            ready: AtomicBool::new(true),
        }
    }

    /// Create an empty store that has not connected yet.
    pub fn disconnected() -> Self {
        let store = Self::new();
        store.set_connected(false);
        store.set_ready(false);
        store
    }

    pub fn set_ready(&self, ready: bool) {
        self.ready.store(ready, Ordering::SeqCst);
    }

    pub fn set_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::SeqCst);
    }

    /// Connect and mark ready in one step.
    pub fn open(&self) {
        self.set_connected(true);
        self.set_ready(true);
    }

    /// Store `statistics` directly, bypassing readiness checks.
    ///
    /// Returns the assigned keys in input order.
    pub fn seed(
        &self,
        collection: &str,
        statistics: impl IntoIterator<Item = Statistic>,
    ) -> Result<Vec<StatisticKey>> {
        let mut collections = self
            .collections
            .write()
            .map_err(|_| StoreError::LockPoisoned)?;
        let target = collections.entry(collection.to_string()).or_default();
        Ok(statistics
            .into_iter()
            .map(|statistic| target.insert(&statistic))
            .collect())
    }

    /// Number of records currently stored in `collection`.
    pub fn count(&self, collection: &str) -> usize {
        self.collections
            .read()
            .map(|collections| {
                collections
                    .get(collection)
                    .map_or(0, |target| target.records.len())
            })
            .unwrap_or(0)
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StoreAdapter for MemoryStore {
    fn is_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }

    fn has_connection(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    async fn get_all(&self, collection: &str) -> Result<Vec<Statistic>> {
        let collections = self
            .collections
            .read()
            .map_err(|_| StoreError::LockPoisoned)?;
        Ok(collections
            .get(collection)
            .map(|target| target.records.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn insert(&self, collection: &str, statistic: &Statistic) -> Result<StatisticKey> {
        let mut collections = self
            .collections
            .write()
            .map_err(|_| StoreError::LockPoisoned)?;
        Ok(collections
            .entry(collection.to_string())
            .or_default()
            .insert(statistic))
    }

    async fn delete(&self, collection: &str, key: StatisticKey) -> Result<()> {
        let mut collections = self
            .collections
            .write()
            .map_err(|_| StoreError::LockPoisoned)?;
        if let Some(target) = collections.get_mut(collection) {
            target.records.remove(&key);
        }
        Ok(())
    }

    async fn clear(&self, collection: &str) -> Result<()> {
        let mut collections = self
            .collections
            .write()
            .map_err(|_| StoreError::LockPoisoned)?;
        if let Some(target) = collections.get_mut(collection) {
            target.records.clear();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeDelta, Utc};

    fn stat(flips: u32) -> Statistic {
        Statistic::with_elapsed(flips, Utc::now(), TimeDelta::seconds(10))
    }

    #[tokio::test]
    async fn test_insert_assigns_increasing_keys() {
        let store = MemoryStore::new();

        let first = store.insert("highScores", &stat(4)).await.unwrap();
        let second = store.insert("highScores", &stat(6)).await.unwrap();

        assert_eq!(first, StatisticKey(1));
        assert_eq!(second, StatisticKey(2));

        let all = store.get_all("highScores").await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].key, Some(first));
        assert_eq!(all[1].flips, 6);
    }

    #[tokio::test]
    async fn test_collections_are_independent() {
        let store = MemoryStore::new();
        store.insert("highScores", &stat(4)).await.unwrap();
        let key = store.insert("recentScores", &stat(5)).await.unwrap();

        // Key generators are per collection.
        assert_eq!(key, StatisticKey(1));

        store.clear("highScores").await.unwrap();
        assert_eq!(store.count("highScores"), 0);
        assert_eq!(store.count("recentScores"), 1);
    }

    #[tokio::test]
    async fn test_keys_not_reused_after_clear() {
        let store = MemoryStore::new();
        store.seed("recentScores", [stat(1), stat(2)]).unwrap();
        store.clear("recentScores").await.unwrap();

        let key = store.insert("recentScores", &stat(3)).await.unwrap();
        assert_eq!(key, StatisticKey(3));
    }

    #[tokio::test]
    async fn test_delete_missing_key_is_ok() {
        let store = MemoryStore::new();
        let keys = store.seed("highScores", [stat(1)]).unwrap();

        store.delete("highScores", StatisticKey(99)).await.unwrap();
        store.delete("nowhere", StatisticKey(1)).await.unwrap();
        assert_eq!(store.count("highScores"), 1);

        store.delete("highScores", keys[0]).await.unwrap();
        assert_eq!(store.count("highScores"), 0);
    }

    #[test]
    fn test_disconnected_store_reports_not_ready() {
        let store = MemoryStore::disconnected();
        assert!(!store.is_ready());
        assert!(!store.has_connection());
        assert!(crate::repository::ensure_available(&store).is_err());

        store.open();
        assert!(crate::repository::ensure_available(&store).is_ok());
    }
}
