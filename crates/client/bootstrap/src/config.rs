//! Score runtime configuration structures and loaders.
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use score_runtime::{CollectionConfig, MutationPolicy, RetryPolicy};

/// Settings shared by every collection a front-end opens.
#[derive(Clone, Debug)]
pub struct ScoresConfig {
    pub data_dir: PathBuf,
    pub retry: RetryPolicy,
    pub event_buffer_size: usize,
    pub mutation: MutationPolicy,
}

impl Default for ScoresConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            retry: RetryPolicy::default(),
            event_buffer_size: 64,
            mutation: MutationPolicy::default(),
        }
    }
}

impl ScoresConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `SCORES_DATA_DIR` - Directory holding the collection files (default: platform-specific)
    /// - `SCORES_RETRY_INTERVAL_MS` - Load retry interval while not ready (default: 100)
    /// - `SCORES_RETRY_JITTER_MS` - Random extra delay added to each retry (default: 0)
    /// - `SCORES_EVENT_BUFFER` - Change event buffer per collection (default: 64)
    /// - `SCORES_MUTATION_POLICY` - `optimistic` or `confirmed` (default: optimistic)
    pub fn from_env() -> Self {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an arbitrary variable source.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(dir) = var("SCORES_DATA_DIR").filter(|dir| !dir.trim().is_empty()) {
            config.data_dir = PathBuf::from(dir);
        }

        if let Some(ms) = parse::<u64>(&var, "SCORES_RETRY_INTERVAL_MS") {
            config.retry.interval = Duration::from_millis(ms);
        }
        if let Some(ms) = parse::<u64>(&var, "SCORES_RETRY_JITTER_MS") {
            config.retry.jitter = Duration::from_millis(ms);
        }

        if let Some(capacity) = parse::<usize>(&var, "SCORES_EVENT_BUFFER") {
            config.event_buffer_size = capacity.max(1);
        }

        if let Some(raw) = var("SCORES_MUTATION_POLICY") {
            match raw.parse() {
                Ok(policy) => config.mutation = policy,
                Err(e) => tracing::warn!("Ignoring SCORES_MUTATION_POLICY: {}", e),
            }
        }

        config
    }

    /// Apply the shared settings to a collection preset.
    pub fn collection(&self, preset: CollectionConfig) -> CollectionConfig {
        preset
            .retry(self.retry)
            .mutation(self.mutation)
            .event_buffer_size(self.event_buffer_size)
    }

    /// Directory for log files.
    pub fn log_dir(&self) -> PathBuf {
        self.data_dir.join("logs")
    }
}

/// Platform data directory for score files.
///
/// Falls back to `./.memory-scores` when no home directory is known.
pub fn default_data_dir() -> PathBuf {
    directories::ProjectDirs::from("", "", "memory-scores")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("./.memory-scores"))
}

fn parse<T>(var: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    var(key)?.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_variables() {
        let config = ScoresConfig::from_vars(vars(&[]));
        assert_eq!(config.retry, RetryPolicy::default());
        assert_eq!(config.event_buffer_size, 64);
        assert_eq!(config.mutation, MutationPolicy::Optimistic);
    }

    #[test]
    fn test_reads_all_variables() {
        let config = ScoresConfig::from_vars(vars(&[
            ("SCORES_DATA_DIR", "/tmp/scores"),
            ("SCORES_RETRY_INTERVAL_MS", "250"),
            ("SCORES_RETRY_JITTER_MS", "20"),
            ("SCORES_EVENT_BUFFER", "0"),
            ("SCORES_MUTATION_POLICY", "Confirmed"),
        ]));

        assert_eq!(config.data_dir, PathBuf::from("/tmp/scores"));
        assert_eq!(config.log_dir(), PathBuf::from("/tmp/scores/logs"));
        assert_eq!(config.retry.interval, Duration::from_millis(250));
        assert_eq!(config.retry.jitter, Duration::from_millis(20));
        assert_eq!(config.event_buffer_size, 1);
        assert_eq!(config.mutation, MutationPolicy::Confirmed);
    }

    #[test]
    fn test_invalid_values_keep_defaults() {
        let config = ScoresConfig::from_vars(vars(&[
            ("SCORES_RETRY_INTERVAL_MS", "soon"),
            ("SCORES_MUTATION_POLICY", "eventually"),
        ]));
        assert_eq!(config.retry.interval, RetryPolicy::DEFAULT_INTERVAL);
        assert_eq!(config.mutation, MutationPolicy::Optimistic);
    }

    #[test]
    fn test_collection_applies_shared_settings() {
        let mut config = ScoresConfig::from_vars(vars(&[]));
        config.mutation = MutationPolicy::Confirmed;
        config.event_buffer_size = 8;

        let high = config.collection(CollectionConfig::high_scores());
        assert_eq!(high.name, score_runtime::HIGH_SCORES);
        assert!(high.sort_on_load);
        assert_eq!(high.mutation, MutationPolicy::Confirmed);
        assert_eq!(high.event_buffer_size, 8);
    }
}
