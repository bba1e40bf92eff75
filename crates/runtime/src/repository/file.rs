//! File-based StoreAdapter implementation.
//!
//! Each collection is stored as one JSON document:
//! ```text
//! {base_dir}/{collection}.json
//! ```
//!
//! The document carries the collection's key generator next to its records so
//! keys stay unique across clears and restarts. Writes go to a temporary file
//! that is renamed over the previous document.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use game_core::{Statistic, StatisticKey};
use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::debug;

use super::{Result, StoreAdapter, StoreError};

#[derive(Debug, Default, Serialize, Deserialize)]
struct CollectionFile {
    next_key: u64,
    records: Vec<Statistic>,
}

/// Durable store keeping one JSON file per collection.
///
/// The store is not ready until [`open`](Self::open) has created the base
/// directory.
pub struct FileStore {
    base_dir: PathBuf,
    open: AtomicBool,
    // Serializes read-modify-write cycles on collection files.
    write_lock: Mutex<()>,
}

impl FileStore {
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
            open: AtomicBool::new(false),
            write_lock: Mutex::new(()),
        }
    }

    /// Create the store and open it immediately.
    pub async fn open_at(base_dir: impl AsRef<Path>) -> Result<Self> {
        let store = Self::new(base_dir);
        store.open().await?;
        Ok(store)
    }

    /// Create the base directory and start accepting operations.
    pub async fn open(&self) -> Result<()> {
        fs::create_dir_all(&self.base_dir).await?;
        self.open.store(true, Ordering::SeqCst);
        debug!("FileStore opened at {}", self.base_dir.display());
        Ok(())
    }

    /// Stop accepting operations. Files stay on disk.
    pub fn close(&self) {
        self.open.store(false, Ordering::SeqCst);
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn collection_path(&self, collection: &str) -> Result<PathBuf> {
        let valid = !collection.is_empty()
            && collection
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(StoreError::InvalidCollection(collection.to_string()));
        }
        Ok(self.base_dir.join(format!("{}.json", collection)))
    }

    async fn read_collection(&self, path: &Path) -> Result<CollectionFile> {
        match fs::read(path).await {
            Ok(bytes) => {
                let file: CollectionFile = serde_json::from_slice(&bytes)?;
                if let Some(bad) = file
                    .records
                    .iter()
                    .find(|record| record.key.is_none_or(|key| key.0 > file.next_key))
                {
                    return Err(StoreError::CorruptedData(format!(
                        "{}: record with key {:?} outside key range {}",
                        path.display(),
                        bad.key,
                        file.next_key
                    )));
                }
                Ok(file)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(CollectionFile::default()),
            Err(e) => Err(e.into()),
        }
    }

    async fn write_collection(&self, path: &Path, file: &CollectionFile) -> Result<()> {
        let json = serde_json::to_vec_pretty(file)?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json).await?;
        fs::rename(&tmp, path).await?;
        Ok(())
    }
}

#[async_trait]
impl StoreAdapter for FileStore {
    fn is_ready(&self) -> bool {
        self.open.load(Ordering::SeqCst)
    }

    fn has_connection(&self) -> bool {
        self.open.load(Ordering::SeqCst)
    }

    async fn get_all(&self, collection: &str) -> Result<Vec<Statistic>> {
        let path = self.collection_path(collection)?;
        Ok(self.read_collection(&path).await?.records)
    }

    async fn insert(&self, collection: &str, statistic: &Statistic) -> Result<StatisticKey> {
        let path = self.collection_path(collection)?;
        let _guard = self.write_lock.lock().await;

        let mut file = self.read_collection(&path).await?;
        file.next_key += 1;
        let key = StatisticKey(file.next_key);
        file.records.push(statistic.clone().with_key(key));
        self.write_collection(&path, &file).await?;

        Ok(key)
    }

    async fn delete(&self, collection: &str, key: StatisticKey) -> Result<()> {
        let path = self.collection_path(collection)?;
        let _guard = self.write_lock.lock().await;

        let mut file = self.read_collection(&path).await?;
        let before = file.records.len();
        file.records.retain(|record| record.key != Some(key));
        if file.records.len() != before {
            self.write_collection(&path, &file).await?;
        }
        Ok(())
    }

    async fn clear(&self, collection: &str) -> Result<()> {
        let path = self.collection_path(collection)?;
        let _guard = self.write_lock.lock().await;

        let mut file = self.read_collection(&path).await?;
        file.records.clear();
        self.write_collection(&path, &file).await
    }
}
