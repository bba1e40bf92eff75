//! Event payloads for collection changes.

use std::fmt;

use game_core::StatisticKey;
use serde::{Deserialize, Serialize};

/// Store-backed operations that can leave memory and store out of step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operation {
    Add,
    Clear,
    Delete,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Operation::Add => "add",
            Operation::Clear => "clear",
            Operation::Delete => "delete",
        };
        write!(f, "{}", label)
    }
}

/// One change to a collection's in-memory list or its store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoreEvent {
    /// Initial load finished with `count` records.
    Loaded { count: usize },

    /// The list was reordered by ranking.
    Sorted,

    /// A record was persisted under `key`.
    Added { key: StatisticKey },

    /// The store collection was emptied.
    Cleared,

    /// The record stored under `key` was deleted from the store.
    Deleted { key: StatisticKey },

    /// An optimistic in-memory mutation whose store operation failed.
    ///
    /// The list keeps the mutation, so memory and store now disagree.
    Desynced { operation: Operation, reason: String },
}

impl ScoreEvent {
    /// Short tag naming the change kind.
    pub fn tag(&self) -> &'static str {
        match self {
            ScoreEvent::Loaded { .. } => "getAll",
            ScoreEvent::Sorted => "sorted",
            ScoreEvent::Added { .. } => "add",
            ScoreEvent::Cleared => "clear",
            ScoreEvent::Deleted { .. } => "delete",
            ScoreEvent::Desynced { .. } => "desync",
        }
    }
}
