//! Collection worker that owns all store traffic for one collection.
//!
//! Runs the initial load (retrying while the store is not ready) and then
//! executes queued store operations one at a time, in the order the handles
//! issued them. Publishes a [`ScoreEvent`] after every successful operation.

use std::sync::Arc;
use std::time::Duration;

use game_core::{Statistic, StatisticKey};
use tokio::sync::{mpsc, oneshot, watch};
use tokio::time::{self, Instant};
use tracing::{debug, error, info, warn};

use crate::api::Result;
use crate::collection::{
    CollectionConfig, EntryId, LoadState, MutationPolicy, SharedList, write_list,
};
use crate::events::{EventBus, Operation, ScoreEvent};
use crate::repository::{self, StoreAdapter, StoreError};

const FAR_FUTURE: Duration = Duration::from_secs(86400 * 365 * 30);

/// Store operations queued by [`CollectionHandle`](crate::CollectionHandle).
pub(crate) enum Command {
    /// Persist a statistic. `entry` names the list entry an optimistic add
    /// already inserted; `None` means the list is updated after success.
    Insert {
        entry: Option<EntryId>,
        statistic: Statistic,
        reply: oneshot::Sender<Result<Statistic>>,
    },
    /// Clear the store collection. `optimistic` is set when the handle already
    /// emptied the list.
    Clear {
        optimistic: bool,
        reply: oneshot::Sender<Result<()>>,
    },
    /// Delete one record from the store; the list is left alone.
    Delete {
        key: StatisticKey,
        reply: oneshot::Sender<Result<()>>,
    },
}

/// Background task backing one [`ScoreCollection`](crate::ScoreCollection).
pub(crate) struct CollectionWorker {
    config: Arc<CollectionConfig>,
    store: Arc<dyn StoreAdapter>,
    list: SharedList,
    event_bus: EventBus,
    state_tx: watch::Sender<LoadState>,
    command_rx: mpsc::UnboundedReceiver<Command>,
    shutdown_rx: watch::Receiver<bool>,
    retry_at: Option<Instant>,
    attempts: u32,
}

impl CollectionWorker {
    pub(crate) fn new(
        config: Arc<CollectionConfig>,
        store: Arc<dyn StoreAdapter>,
        list: SharedList,
        event_bus: EventBus,
        state_tx: watch::Sender<LoadState>,
        command_rx: mpsc::UnboundedReceiver<Command>,
        shutdown_rx: watch::Receiver<bool>,
    ) -> Self {
        Self {
            config,
            store,
            list,
            event_bus,
            state_tx,
            command_rx,
            shutdown_rx,
            retry_at: None,
            attempts: 0,
        }
    }

    /// Main worker loop.
    pub(crate) async fn run(mut self) {
        debug!(
            "CollectionWorker started: collection={}, mutation={}",
            self.config.name, self.config.mutation
        );

        let shutting_down = *self.shutdown_rx.borrow_and_update();
        if shutting_down {
            debug!("CollectionWorker for {} shut down before loading", self.config.name);
            return;
        }
        self.load().await;

        loop {
            let retrying = self.retry_at.is_some();
            let retry_at = self.retry_at.unwrap_or_else(Instant::now);

            tokio::select! {
                biased;

                // Fires on an explicit shutdown and when the owner is dropped.
                _ = self.shutdown_rx.changed() => {
                    if self.retry_at.is_some() {
                        debug!("Cancelling pending load retry for {}", self.config.name);
                    }
                    break;
                }

                _ = time::sleep_until(retry_at), if retrying => {
                    self.retry_at = None;
                    self.load().await;
                }

                cmd = self.command_rx.recv() => {
                    match cmd {
                        Some(cmd) => self.handle_command(cmd).await,
                        None => {
                            debug!("Command channel closed for {}", self.config.name);
                            break;
                        }
                    }
                }
            }
        }

        debug!("CollectionWorker stopped: collection={}", self.config.name);
    }

    /// One initial-load attempt.
    async fn load(&mut self) {
        self.attempts += 1;
        self.state_tx.send_replace(LoadState::Loading);

        match self.fetch_all().await {
            Ok(records) => {
                let loaded = records.len();
                self.merge_loaded(records);

                if self.config.sort_on_load {
                    self.event_bus.publish(ScoreEvent::Sorted);
                }

                info!(
                    "Loaded {} records into {} after {} attempt(s)",
                    loaded, self.config.name, self.attempts
                );
                self.state_tx.send_replace(LoadState::Ready { loaded });
                self.event_bus.publish(ScoreEvent::Loaded { count: loaded });
            }
            Err(StoreError::NotReady) => {
                let delay = self.config.retry.next_delay();
                if self.attempts == 1 {
                    warn!(
                        "Store not ready for {}, retrying every {:?}",
                        self.config.name, delay
                    );
                } else {
                    debug!(
                        "Store still not ready for {} (attempt {}), retrying in {:?}",
                        self.config.name, self.attempts, delay
                    );
                }
                let now = Instant::now();
                // Huge configured intervals park the retry instead of overflowing.
                self.retry_at = Some(now.checked_add(delay).unwrap_or(now + FAR_FUTURE));
                self.state_tx.send_replace(LoadState::Retrying {
                    attempts: self.attempts,
                });
            }
            Err(e) => {
                error!("Failed to load {}: {}", self.config.name, e);
                self.state_tx.send_replace(LoadState::Failed {
                    reason: e.to_string(),
                });
            }
        }
    }

    async fn fetch_all(&self) -> repository::Result<Vec<Statistic>> {
        repository::ensure_available(self.store.as_ref())?;
        self.store.get_all(&self.config.name).await
    }

    /// Insert loaded records, skipping any whose key the list already holds.
    ///
    /// A game added while the load was retrying can reach the store before the
    /// load does, and its entry already carries the key.
    fn merge_loaded(&self, records: Vec<Statistic>) {
        let mut list = write_list(&self.list);
        for record in records {
            if let Some(key) = record.key
                && list.contains_key(key)
            {
                debug!("Skipping {} already in {}", key, self.config.name);
                continue;
            }
            list.insert(record);
        }
        if self.config.sort_on_load {
            list.sort();
        }
    }

    async fn handle_command(&mut self, cmd: Command) {
        match cmd {
            Command::Insert {
                entry,
                statistic,
                reply,
            } => {
                let result = self.insert(entry, statistic).await;
                if reply.send(result).is_err() {
                    debug!("Insert reply channel closed (caller dropped)");
                }
            }
            Command::Clear { optimistic, reply } => {
                let result = self.clear(optimistic).await;
                if reply.send(result).is_err() {
                    debug!("Clear reply channel closed (caller dropped)");
                }
            }
            Command::Delete { key, reply } => {
                let result = self.delete(key).await;
                if reply.send(result).is_err() {
                    debug!("Delete reply channel closed (caller dropped)");
                }
            }
        }
    }

    async fn insert(&self, entry: Option<EntryId>, statistic: Statistic) -> Result<Statistic> {
        let outcome = match repository::ensure_available(self.store.as_ref()) {
            Ok(()) => self.store.insert(&self.config.name, &statistic).await,
            Err(e) => Err(e),
        };

        match outcome {
            Ok(key) => {
                let stored = statistic.with_key(key);
                self.record_insert(entry, &stored, key);
                self.event_bus.publish(ScoreEvent::Added { key });
                Ok(stored)
            }
            Err(e) => {
                self.report_failure(Operation::Add, &e, entry.is_some());
                Err(e.into())
            }
        }
    }

    fn record_insert(&self, entry: Option<EntryId>, stored: &Statistic, key: StatisticKey) {
        let mut list = write_list(&self.list);
        match entry {
            Some(id) => {
                if !list.assign_key(id, key) {
                    debug!(
                        "Entry for key {} left {} before the store confirmed it",
                        key, self.config.name
                    );
                }
            }
            None => {
                list.insert(stored.clone());
            }
        }
    }

    async fn clear(&self, optimistic: bool) -> Result<()> {
        let outcome = match repository::ensure_available(self.store.as_ref()) {
            Ok(()) => self.store.clear(&self.config.name).await,
            Err(e) => Err(e),
        };

        match outcome {
            Ok(()) => {
                if self.config.mutation == MutationPolicy::Confirmed {
                    write_list(&self.list).clear();
                }
                self.event_bus.publish(ScoreEvent::Cleared);
                Ok(())
            }
            Err(e) => {
                self.report_failure(Operation::Clear, &e, optimistic);
                Err(e.into())
            }
        }
    }

    async fn delete(&self, key: StatisticKey) -> Result<()> {
        let outcome = match repository::ensure_available(self.store.as_ref()) {
            Ok(()) => self.store.delete(&self.config.name, key).await,
            Err(e) => Err(e),
        };

        match outcome {
            Ok(()) => {
                self.event_bus.publish(ScoreEvent::Deleted { key });
                Ok(())
            }
            Err(e) => {
                self.report_failure(Operation::Delete, &e, false);
                Err(e.into())
            }
        }
    }

    fn report_failure(&self, operation: Operation, error: &StoreError, memory_changed: bool) {
        if memory_changed {
            warn!(
                "{} on {} failed after the list changed: {}",
                operation, self.config.name, error
            );
            self.event_bus.publish(ScoreEvent::Desynced {
                operation,
                reason: error.to_string(),
            });
        } else {
            warn!("{} on {} failed: {}", operation, self.config.name, error);
        }
    }
}
