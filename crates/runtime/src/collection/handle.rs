//! Cloneable façade for reading and mutating a score collection.
//!
//! [`CollectionHandle`] applies in-memory changes synchronously and hands the
//! matching store operation to the collection worker, returning a [`Pending`]
//! future for the store outcome.
use std::ops::Range;
use std::sync::Arc;

use game_core::{Statistic, StatisticKey};
use tokio::sync::{broadcast, mpsc, oneshot, watch};

use super::{CollectionConfig, LoadState, MutationPolicy, SharedList, read_list, write_list};
use crate::api::{CollectionError, Pending, Result};
use crate::events::{EventBus, ScoreEvent};
use crate::workers::Command;

/// Client-facing handle to one collection.
///
/// All handles of a collection share the same list, queue and event bus.
#[derive(Clone)]
pub struct CollectionHandle {
    config: Arc<CollectionConfig>,
    list: SharedList,
    command_tx: mpsc::UnboundedSender<Command>,
    event_bus: EventBus,
    state_rx: watch::Receiver<LoadState>,
}

impl CollectionHandle {
    pub(crate) fn new(
        config: Arc<CollectionConfig>,
        list: SharedList,
        command_tx: mpsc::UnboundedSender<Command>,
        event_bus: EventBus,
        state_rx: watch::Receiver<LoadState>,
    ) -> Self {
        Self {
            config,
            list,
            command_tx,
            event_bus,
            state_rx,
        }
    }

    /// Store collection name.
    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn config(&self) -> &CollectionConfig {
        &self.config
    }

    /// Snapshot of the list in display order.
    pub fn scores(&self) -> Vec<Statistic> {
        read_list(&self.list).snapshot()
    }

    pub fn get(&self, index: usize) -> Option<Statistic> {
        read_list(&self.list).get(index)
    }

    pub fn len(&self) -> usize {
        read_list(&self.list).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Subscribe to change events published after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<ScoreEvent> {
        self.event_bus.subscribe()
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    /// Current progress of the initial load.
    pub fn load_state(&self) -> LoadState {
        self.state_rx.borrow().clone()
    }

    /// Wait until the initial load succeeded or failed for good.
    ///
    /// Keeps waiting through any number of not-ready retries.
    pub async fn wait_loaded(&self) -> Result<LoadState> {
        let mut state_rx = self.state_rx.clone();
        let state = state_rx
            .wait_for(LoadState::is_settled)
            .await
            .map_err(|_| CollectionError::WorkerClosed)?
            .clone();
        Ok(state)
    }

    /// Sort the list by ranking and publish [`ScoreEvent::Sorted`].
    ///
    /// Purely in-memory; the store keeps its own order.
    pub fn sort(&self) {
        write_list(&self.list).sort();
        self.event_bus.publish(ScoreEvent::Sorted);
    }

    /// Add a finished game.
    ///
    /// Under [`MutationPolicy::Optimistic`] the statistic is in the list when
    /// this returns, placed per the collection's insertion policy, and stays
    /// there even if the store rejects it. The returned future resolves with
    /// the statistic carrying its store key.
    pub fn add(&self, statistic: Statistic) -> Pending<Statistic> {
        if self.command_tx.is_closed() {
            return Pending::failed(CollectionError::WorkerClosed);
        }

        let entry = match self.config.mutation {
            MutationPolicy::Optimistic => Some(write_list(&self.list).insert(statistic.clone())),
            MutationPolicy::Confirmed => None,
        };

        self.enqueue(|reply| Command::Insert {
            entry,
            statistic,
            reply,
        })
    }

    /// Empty the list and the store collection.
    ///
    /// Under [`MutationPolicy::Optimistic`] the list is empty when this
    /// returns, whatever the store outcome.
    pub fn clear(&self) -> Pending<()> {
        if self.command_tx.is_closed() {
            return Pending::failed(CollectionError::WorkerClosed);
        }

        let optimistic = self.config.mutation == MutationPolicy::Optimistic;
        if optimistic {
            write_list(&self.list).clear();
        }

        self.enqueue(|reply| Command::Clear { optimistic, reply })
    }

    /// Delete the record stored under `key` from the store.
    ///
    /// The list is not touched; pair this with [`remove_range`](Self::remove_range)
    /// to drop the entry from the display.
    pub fn delete(&self, key: StatisticKey) -> Pending<()> {
        self.enqueue(|reply| Command::Delete { key, reply })
    }

    /// Remove the entries in `range` from the list only.
    ///
    /// The range is clamped to the list bounds.
    pub fn remove_range(&self, range: Range<usize>) -> Vec<Statistic> {
        write_list(&self.list).remove_range(range)
    }

    fn enqueue<T>(
        &self,
        command: impl FnOnce(oneshot::Sender<Result<T>>) -> Command,
    ) -> Pending<T> {
        let (reply_tx, reply_rx) = oneshot::channel();
        match self.command_tx.send(command(reply_tx)) {
            Ok(()) => Pending::waiting(reply_rx),
            Err(_) => Pending::failed(CollectionError::WorkerClosed),
        }
    }
}
