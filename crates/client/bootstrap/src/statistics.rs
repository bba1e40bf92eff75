//! Facade over the high-score and recent-score collections.
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use game_core::{Statistic, StatisticKey, create_time};
use score_runtime::{CollectionHandle, LoadState, ScoreCollection, StoreAdapter};

/// Both score collections of one player, sharing one store.
pub struct Statistics {
    store: Arc<dyn StoreAdapter>,
    high_scores: ScoreCollection,
    recent_scores: ScoreCollection,
}

impl Statistics {
    pub(crate) fn new(
        store: Arc<dyn StoreAdapter>,
        high_scores: ScoreCollection,
        recent_scores: ScoreCollection,
    ) -> Self {
        Self {
            store,
            high_scores,
            recent_scores,
        }
    }

    /// Ranked collection, best game first once sorted.
    pub fn high_scores(&self) -> CollectionHandle {
        self.high_scores.handle()
    }

    /// Recency collection, latest game first.
    pub fn recent_scores(&self) -> CollectionHandle {
        self.recent_scores.handle()
    }

    pub fn store(&self) -> &Arc<dyn StoreAdapter> {
        &self.store
    }

    /// Wait for both initial loads.
    ///
    /// Fails if either load failed for a reason other than the store not
    /// being ready yet.
    pub async fn wait_loaded(&self) -> Result<()> {
        for handle in [self.high_scores(), self.recent_scores()] {
            let state = handle
                .wait_loaded()
                .await
                .with_context(|| format!("Collection {} stopped while loading", handle.name()))?;
            if let LoadState::Failed { reason } = state {
                bail!("Failed to load {}: {}", handle.name(), reason);
            }
        }
        Ok(())
    }

    /// Record a finished game in both collections.
    ///
    /// The high scores are re-ranked once the store accepted the game. Returns
    /// the keys assigned by the high-score and recent-score collections.
    pub async fn record(&self, statistic: Statistic) -> Result<(StatisticKey, StatisticKey)> {
        let high = self.high_scores.handle();
        let recent = self.recent_scores.handle();

        let (ranked, latest) = tokio::join!(high.add(statistic.clone()), recent.add(statistic));
        high.sort();

        let ranked = ranked.context("Failed to store high score")?;
        let latest = latest.context("Failed to store recent score")?;
        tracing::info!(
            "Recorded game: flips={}, elapsed={}",
            ranked.flips,
            format_elapsed(&ranked)
        );

        match (ranked.key, latest.key) {
            (Some(high_key), Some(recent_key)) => Ok((high_key, recent_key)),
            _ => bail!("Store accepted the game without assigning a key"),
        }
    }

    /// Stop both collection workers.
    pub async fn shutdown(self) -> Result<()> {
        self.high_scores
            .shutdown()
            .await
            .context("Failed to stop high scores")?;
        self.recent_scores
            .shutdown()
            .await
            .context("Failed to stop recent scores")?;
        tracing::debug!("Statistics shut down");
        Ok(())
    }
}

/// Game duration as `m:ss.mmm`.
pub fn format_elapsed(statistic: &Statistic) -> String {
    let millis = create_time(statistic).max(0);
    format!(
        "{}:{:02}.{:03}",
        millis / 60_000,
        (millis / 1000) % 60,
        millis % 1000
    )
}

#[cfg(test)]
mod tests {
    use chrono::{TimeDelta, TimeZone, Utc};
    use score_runtime::MemoryStore;

    use super::*;
    use crate::{ScoresConfig, StatisticsBuilder};

    fn game(flips: u32, millis: i64) -> Statistic {
        let start = Utc.with_ymd_and_hms(2024, 3, 9, 12, 0, 0).unwrap();
        Statistic::with_elapsed(flips, start, TimeDelta::milliseconds(millis))
    }

    async fn statistics(store: Arc<MemoryStore>) -> Statistics {
        StatisticsBuilder::new(ScoresConfig::default())
            .store(store)
            .build()
            .await
            .unwrap()
    }

    #[test]
    fn test_format_elapsed() {
        assert_eq!(format_elapsed(&game(1, 0)), "0:00.000");
        assert_eq!(format_elapsed(&game(1, 61_005)), "1:01.005");
        assert_eq!(format_elapsed(&game(1, 754_321)), "12:34.321");
        assert_eq!(format_elapsed(&game(1, -5)), "0:00.000");
    }

    #[tokio::test]
    async fn test_record_adds_to_both_collections() {
        let store = Arc::new(MemoryStore::new());
        let stats = statistics(store.clone()).await;
        stats.wait_loaded().await.unwrap();

        stats.record(game(12, 40_000)).await.unwrap();
        stats.record(game(8, 55_000)).await.unwrap();

        let ranked: Vec<u32> = stats.high_scores().scores().iter().map(|s| s.flips).collect();
        let recent: Vec<u32> = stats.recent_scores().scores().iter().map(|s| s.flips).collect();
        assert_eq!(ranked, vec![8, 12]);
        assert_eq!(recent, vec![8, 12]);
        assert_eq!(store.count(score_runtime::HIGH_SCORES), 2);
        assert_eq!(store.count(score_runtime::RECENT_SCORES), 2);

        stats.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_record_fails_when_store_not_ready() {
        let store = Arc::new(MemoryStore::new());
        let stats = statistics(store.clone()).await;
        stats.wait_loaded().await.unwrap();

        store.set_ready(false);
        assert!(stats.record(game(3, 1_000)).await.is_err());
        // Optimistic adds stay visible.
        assert_eq!(stats.recent_scores().len(), 1);
    }
}
