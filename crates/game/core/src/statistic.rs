//! Game outcome records.

use std::fmt;

use chrono::{DateTime, TimeDelta, Utc};

/// Identity assigned by a store the first time a statistic is persisted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct StatisticKey(pub u64);

impl fmt::Display for StatisticKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for StatisticKey {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

/// Outcome of one finished game.
///
/// A statistic without a [`key`](Self::key) has never been persisted. Once a
/// store accepts it, the store-assigned key is the only identifier used to
/// delete it again.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Statistic {
    /// Number of card flips the player needed. Lower ranks better.
    pub flips: u32,
    /// Instant the stopwatch started.
    pub start: DateTime<Utc>,
    /// Instant the game finished and this record was created.
    pub created_at: DateTime<Utc>,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub key: Option<StatisticKey>,
}

impl Statistic {
    pub fn new(flips: u32, start: DateTime<Utc>, created_at: DateTime<Utc>) -> Self {
        Self {
            flips,
            start,
            created_at,
            key: None,
        }
    }

    /// Build a statistic that finished `elapsed` after `start`.
    pub fn with_elapsed(flips: u32, start: DateTime<Utc>, elapsed: TimeDelta) -> Self {
        Self::new(flips, start, start + elapsed)
    }

    /// Build a statistic for a game that just finished after `elapsed`.
    ///
    /// `None` if the start would fall outside the representable date range.
    pub fn finished_now(flips: u32, elapsed: TimeDelta) -> Option<Self> {
        let created_at = Utc::now();
        let start = created_at.checked_sub_signed(elapsed)?;
        Some(Self::new(flips, start, created_at))
    }

    pub fn with_key(mut self, key: StatisticKey) -> Self {
        self.key = Some(key);
        self
    }

    pub fn is_persisted(&self) -> bool {
        self.key.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_new_statistic_is_not_persisted() {
        let stat = Statistic::with_elapsed(12, start(), TimeDelta::seconds(40));
        assert!(!stat.is_persisted());
        assert_eq!(stat.created_at - stat.start, TimeDelta::seconds(40));
    }

    #[test]
    fn test_with_key_marks_persisted() {
        let stat = Statistic::with_elapsed(12, start(), TimeDelta::seconds(40))
            .with_key(StatisticKey(7));
        assert!(stat.is_persisted());
        assert_eq!(stat.key, Some(StatisticKey(7)));
    }

    #[test]
    fn test_finished_now_spans_elapsed() {
        let stat = Statistic::finished_now(20, TimeDelta::milliseconds(1500)).unwrap();
        assert_eq!(stat.created_at - stat.start, TimeDelta::milliseconds(1500));
    }

    #[test]
    fn test_finished_now_rejects_out_of_range_elapsed() {
        assert!(Statistic::finished_now(1, TimeDelta::days(365 * 1_000_000)).is_none());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_json_omits_missing_key() {
        let stat = Statistic::with_elapsed(9, start(), TimeDelta::seconds(3));
        let json = serde_json::to_string(&stat).unwrap();
        assert!(!json.contains("key"));

        let keyed = stat.with_key(StatisticKey(3));
        let json = serde_json::to_string(&keyed).unwrap();
        assert!(json.contains("\"key\":3"));

        let back: Statistic = serde_json::from_str(&json).unwrap();
        assert_eq!(back, keyed);
    }
}
