//! In-memory score list shared by a collection's handles and its worker.

use std::ops::Range;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use game_core::{Statistic, StatisticKey};

use super::InsertionPolicy;

/// Identity of a list entry, independent of its position.
///
/// Lets the worker find the entry an `add` inserted once the store returns a
/// key, even if the list was sorted or prepended to in the meantime.
pub(crate) type EntryId = u64;

#[derive(Debug)]
struct Entry {
    id: EntryId,
    statistic: Statistic,
}

/// Ordered statistics plus the insertion policy that grows them.
#[derive(Debug)]
pub(crate) struct ScoreList {
    entries: Vec<Entry>,
    next_id: EntryId,
    insertion: InsertionPolicy,
}

pub(crate) type SharedList = Arc<RwLock<ScoreList>>;

// List mutations are single statements, so a panic elsewhere cannot leave the
// list half-updated; recover the guard instead of propagating poison.
pub(crate) fn read_list(list: &SharedList) -> RwLockReadGuard<'_, ScoreList> {
    list.read().unwrap_or_else(PoisonError::into_inner)
}

pub(crate) fn write_list(list: &SharedList) -> RwLockWriteGuard<'_, ScoreList> {
    list.write().unwrap_or_else(PoisonError::into_inner)
}

impl ScoreList {
    pub(crate) fn new(insertion: InsertionPolicy) -> Self {
        Self {
            entries: Vec::new(),
            next_id: 0,
            insertion,
        }
    }

    pub(crate) fn shared(insertion: InsertionPolicy) -> SharedList {
        Arc::new(RwLock::new(Self::new(insertion)))
    }

    /// Insert per the insertion policy.
    pub(crate) fn insert(&mut self, statistic: Statistic) -> EntryId {
        let id = self.next_id;
        self.next_id += 1;
        let entry = Entry { id, statistic };
        match self.insertion {
            InsertionPolicy::Append => self.entries.push(entry),
            InsertionPolicy::Prepend => self.entries.insert(0, entry),
        }
        id
    }

    /// Record the store key on the entry `id`, if it is still in the list.
    pub(crate) fn assign_key(&mut self, id: EntryId, key: StatisticKey) -> bool {
        match self.entries.iter_mut().find(|entry| entry.id == id) {
            Some(entry) => {
                entry.statistic.key = Some(key);
                true
            }
            None => false,
        }
    }

    pub(crate) fn contains_key(&self, key: StatisticKey) -> bool {
        self.entries
            .iter()
            .any(|entry| entry.statistic.key == Some(key))
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }

    /// Stable in-place sort by ranking.
    pub(crate) fn sort(&mut self) {
        self.entries
            .sort_by(|a, b| game_core::compare(&a.statistic, &b.statistic));
    }

    /// Remove the entries in `range`, clamped to the list bounds.
    pub(crate) fn remove_range(&mut self, range: Range<usize>) -> Vec<Statistic> {
        let end = range.end.min(self.entries.len());
        let start = range.start.min(end);
        self.entries
            .drain(start..end)
            .map(|entry| entry.statistic)
            .collect()
    }

    pub(crate) fn snapshot(&self) -> Vec<Statistic> {
        self.entries
            .iter()
            .map(|entry| entry.statistic.clone())
            .collect()
    }

    pub(crate) fn get(&self, index: usize) -> Option<Statistic> {
        self.entries.get(index).map(|entry| entry.statistic.clone())
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}
