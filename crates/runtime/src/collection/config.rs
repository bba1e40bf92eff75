//! Per-collection configuration and the two named presets.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use rand::Rng;

/// Store name of the ranked collection.
pub const HIGH_SCORES: &str = "highScores";

/// Store name of the most-recent-first collection.
pub const RECENT_SCORES: &str = "recentScores";

/// Where new records enter the in-memory list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InsertionPolicy {
    #[default]
    Append,
    Prepend,
}

/// When `add` and `clear` touch the in-memory list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MutationPolicy {
    /// Mutate memory at call time and keep the mutation if the store fails.
    ///
    /// A failed store operation publishes
    /// [`ScoreEvent::Desynced`](crate::ScoreEvent::Desynced).
    #[default]
    Optimistic,
    /// Mutate memory only after the store confirms the operation.
    Confirmed,
}

impl fmt::Display for MutationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MutationPolicy::Optimistic => "optimistic",
            MutationPolicy::Confirmed => "confirmed",
        };
        write!(f, "{}", label)
    }
}

impl FromStr for MutationPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "optimistic" => Ok(MutationPolicy::Optimistic),
            "confirmed" => Ok(MutationPolicy::Confirmed),
            other => Err(format!("unknown mutation policy: {}", other)),
        }
    }
}

/// Delay between initial-load attempts while the store is not ready.
///
/// Retries are unbounded; they stop when the load succeeds, fails for another
/// reason, or the collection shuts down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub interval: Duration,
    /// Upper bound of a random extra delay added to each retry.
    pub jitter: Duration,
}

impl RetryPolicy {
    pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(100);

    pub const fn fixed(interval: Duration) -> Self {
        Self {
            interval,
            jitter: Duration::ZERO,
        }
    }

    pub const fn with_jitter(mut self, jitter: Duration) -> Self {
        self.jitter = jitter;
        self
    }

    /// Delay before the next attempt.
    pub fn next_delay(&self) -> Duration {
        if self.jitter.is_zero() {
            return self.interval;
        }
        let max_micros = u64::try_from(self.jitter.as_micros()).unwrap_or(u64::MAX);
        let extra = rand::thread_rng().gen_range(0..=max_micros);
        self.interval.saturating_add(Duration::from_micros(extra))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::fixed(Self::DEFAULT_INTERVAL)
    }
}

/// Configuration of one score collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionConfig {
    /// Store collection name. Fixed for the collection's lifetime.
    pub name: String,
    pub insertion: InsertionPolicy,
    /// Sort the list right after the initial load.
    pub sort_on_load: bool,
    pub mutation: MutationPolicy,
    pub retry: RetryPolicy,
    pub event_buffer_size: usize,
}

impl CollectionConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            insertion: InsertionPolicy::default(),
            sort_on_load: false,
            mutation: MutationPolicy::default(),
            retry: RetryPolicy::default(),
            event_buffer_size: 64,
        }
    }

    /// Ranked list: appends, sorted after the initial load.
    pub fn high_scores() -> Self {
        Self::new(HIGH_SCORES).sort_on_load(true)
    }

    /// Most-recent-first list: prepends, kept in arrival order.
    pub fn recent_scores() -> Self {
        Self::new(RECENT_SCORES).insertion(InsertionPolicy::Prepend)
    }

    pub fn insertion(mut self, insertion: InsertionPolicy) -> Self {
        self.insertion = insertion;
        self
    }

    pub fn sort_on_load(mut self, sort_on_load: bool) -> Self {
        self.sort_on_load = sort_on_load;
        self
    }

    pub fn mutation(mut self, mutation: MutationPolicy) -> Self {
        self.mutation = mutation;
        self
    }

    pub fn retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn event_buffer_size(mut self, size: usize) -> Self {
        self.event_buffer_size = size.max(1);
        self
    }
}

impl Default for CollectionConfig {
    fn default() -> Self {
        Self::new("defaultStore")
    }
}
