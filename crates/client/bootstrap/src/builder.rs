//! Builds the store and both score collections used by front-ends.
use std::sync::Arc;

use anyhow::{Context, Result};
use score_runtime::{CollectionConfig, FileStore, ScoreCollection, StoreAdapter};

use crate::config::ScoresConfig;
use crate::statistics::Statistics;

/// Builder that assembles the store and the two collections for clients.
pub struct StatisticsBuilder {
    config: ScoresConfig,
    store: Option<Arc<dyn StoreAdapter>>,
}

impl StatisticsBuilder {
    pub fn new(config: ScoresConfig) -> Self {
        Self {
            config,
            store: None,
        }
    }

    /// Use a custom store instead of the file store under the data directory.
    pub fn store(mut self, store: Arc<dyn StoreAdapter>) -> Self {
        self.store = Some(store);
        self
    }

    /// Open the store and spawn both collections.
    ///
    /// Must be called from within a tokio runtime. The collections start
    /// loading immediately.
    pub async fn build(self) -> Result<Statistics> {
        let store = match self.store {
            Some(store) => store,
            None => {
                let dir = &self.config.data_dir;
                let store = FileStore::open_at(dir)
                    .await
                    .with_context(|| format!("Failed to open score store at {}", dir.display()))?;
                tracing::info!("Score store opened at {}", dir.display());
                Arc::new(store) as Arc<dyn StoreAdapter>
            }
        };

        let high_scores = ScoreCollection::builder()
            .config(self.config.collection(CollectionConfig::high_scores()))
            .store(Arc::clone(&store))
            .build()?;
        let recent_scores = ScoreCollection::builder()
            .config(self.config.collection(CollectionConfig::recent_scores()))
            .store(Arc::clone(&store))
            .build()?;

        Ok(Statistics::new(store, high_scores, recent_scores))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_build_opens_file_store_in_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = ScoresConfig::default();
        config.data_dir = dir.path().join("scores");

        let stats = StatisticsBuilder::new(config).build().await.unwrap();
        stats.wait_loaded().await.unwrap();

        assert!(dir.path().join("scores").is_dir());
        assert!(stats.store().is_ready());
        assert_eq!(stats.high_scores().name(), score_runtime::HIGH_SCORES);
        assert_eq!(stats.recent_scores().name(), score_runtime::RECENT_SCORES);
        stats.shutdown().await.unwrap();
    }
}
