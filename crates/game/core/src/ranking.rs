//! Ordering rules for score lists.
//!
//! Fewer flips always wins. Between equal flip counts the faster game wins,
//! where speed is the elapsed time reported by [`create_time`]. Records equal
//! on both keys compare as [`Ordering::Equal`] so a stable sort keeps their
//! relative order.

use std::cmp::Ordering;

use crate::Statistic;

/// Elapsed game time in milliseconds.
pub fn create_time(statistic: &Statistic) -> i64 {
    (statistic.created_at - statistic.start).num_milliseconds()
}

/// Ranking comparison: `flips` ascending, then [`create_time`] ascending.
pub fn compare(a: &Statistic, b: &Statistic) -> Ordering {
    a.flips
        .cmp(&b.flips)
        .then_with(|| create_time(a).cmp(&create_time(b)))
}

/// Returns `true` when `statistics` is already in ranking order.
pub fn is_ranked(statistics: &[Statistic]) -> bool {
    statistics
        .windows(2)
        .all(|pair| compare(&pair[0], &pair[1]) != Ordering::Greater)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeDelta, TimeZone, Utc};

    fn at(minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, minute, 0).unwrap()
    }

    fn stat(flips: u32, seconds: i64) -> Statistic {
        Statistic::with_elapsed(flips, at(0), TimeDelta::seconds(seconds))
    }

    #[test]
    fn test_create_time_is_elapsed_millis() {
        assert_eq!(create_time(&stat(4, 12)), 12_000);
    }

    #[test]
    fn test_fewer_flips_wins_regardless_of_time() {
        assert_eq!(compare(&stat(2, 90), &stat(5, 10)), Ordering::Less);
        assert_eq!(compare(&stat(5, 10), &stat(2, 90)), Ordering::Greater);
    }

    #[test]
    fn test_equal_flips_faster_wins() {
        assert_eq!(compare(&stat(5, 30), &stat(5, 31)), Ordering::Less);
    }

    #[test]
    fn test_true_tie_is_equal() {
        // Different wall-clock instants, same elapsed time.
        let a = Statistic::with_elapsed(5, at(0), TimeDelta::seconds(20));
        let b = Statistic::with_elapsed(5, at(7), TimeDelta::seconds(20));
        assert_eq!(compare(&a, &b), Ordering::Equal);
    }

    #[test]
    fn test_stable_sort_keeps_ties_in_place() {
        let first = Statistic::with_elapsed(3, at(1), TimeDelta::seconds(20));
        let second = Statistic::with_elapsed(3, at(2), TimeDelta::seconds(20));
        let mut list = vec![stat(9, 1), first.clone(), second.clone()];

        list.sort_by(compare);

        assert_eq!(list[0], first);
        assert_eq!(list[1], second);
        assert!(is_ranked(&list));
    }

    #[test]
    fn test_sorting_is_idempotent() {
        let mut list = vec![stat(8, 3), stat(2, 50), stat(8, 1), stat(2, 40), stat(5, 5)];
        list.sort_by(compare);
        let once = list.clone();
        list.sort_by(compare);
        assert_eq!(list, once);
    }

    #[test]
    fn test_adjacent_pairs_after_sort() {
        let mut list: Vec<Statistic> = (0..20)
            .map(|i| stat((i * 7) % 5, (i as i64 * 13) % 11))
            .collect();
        list.sort_by(compare);

        for pair in list.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            assert!(a.flips < b.flips || (a.flips == b.flips && create_time(a) <= create_time(b)));
        }
    }

    #[test]
    fn test_is_ranked_detects_disorder() {
        assert!(is_ranked(&[]));
        assert!(is_ranked(&[stat(1, 1)]));
        assert!(!is_ranked(&[stat(3, 1), stat(2, 1)]));
    }
}
