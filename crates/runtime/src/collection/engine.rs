//! Collection owner and builder.
//!
//! A [`ScoreCollection`] owns the background worker of one collection and its
//! shutdown signal. Building one starts the initial load right away.

use std::sync::Arc;

use tokio::sync::{broadcast, mpsc, watch};
use tokio::task::JoinHandle;

use super::{CollectionConfig, CollectionHandle, LoadState, ScoreList};
use crate::api::{CollectionError, Result};
use crate::events::{EventBus, ScoreEvent};
use crate::repository::StoreAdapter;
use crate::workers::CollectionWorker;

/// One score collection and its worker.
///
/// Design: the collection owns the worker; [`CollectionHandle`] is the
/// cloneable façade for clients. Dropping the collection stops the worker
/// just like [`shutdown`](Self::shutdown), without waiting for it.
pub struct ScoreCollection {
    handle: CollectionHandle,
    shutdown_tx: watch::Sender<bool>,
    worker: JoinHandle<()>,
}

impl ScoreCollection {
    /// Create a new collection builder
    pub fn builder() -> ScoreCollectionBuilder {
        ScoreCollectionBuilder::new()
    }

    /// Build a collection with `config` over `store`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(config: CollectionConfig, store: Arc<dyn StoreAdapter>) -> Self {
        spawn_collection(config, store, None)
    }

    /// Get a cloneable handle to this collection
    pub fn handle(&self) -> CollectionHandle {
        self.handle.clone()
    }

    /// Subscribe to change events
    pub fn subscribe(&self) -> broadcast::Receiver<ScoreEvent> {
        self.handle.subscribe()
    }

    pub fn load_state(&self) -> LoadState {
        self.handle.load_state()
    }

    /// Stop the worker and wait for it to exit.
    ///
    /// Cancels a pending load retry. Operations still queued are dropped and
    /// their pending futures fail.
    pub async fn shutdown(self) -> Result<()> {
        // Err only means the worker already exited.
        let _ = self.shutdown_tx.send(true);
        self.worker.await.map_err(CollectionError::WorkerJoin)
    }
}

/// Builder for [`ScoreCollection`].
pub struct ScoreCollectionBuilder {
    config: CollectionConfig,
    store: Option<Arc<dyn StoreAdapter>>,
    event_bus: Option<EventBus>,
}

impl ScoreCollectionBuilder {
    fn new() -> Self {
        Self {
            config: CollectionConfig::default(),
            store: None,
            event_bus: None,
        }
    }

    /// Override collection configuration
    pub fn config(mut self, config: CollectionConfig) -> Self {
        self.config = config;
        self
    }

    /// Set required store adapter
    pub fn store(mut self, store: Arc<dyn StoreAdapter>) -> Self {
        self.store = Some(store);
        self
    }

    /// Publish on an existing event bus.
    ///
    /// Subscribing to the bus before building guarantees observers see the
    /// initial load events.
    pub fn event_bus(mut self, event_bus: EventBus) -> Self {
        self.event_bus = Some(event_bus);
        self
    }

    /// Spawn the worker and start the initial load.
    ///
    /// Must be called from within a tokio runtime.
    pub fn build(self) -> Result<ScoreCollection> {
        let store = self.store.ok_or(CollectionError::MissingStore)?;
        Ok(spawn_collection(self.config, store, self.event_bus))
    }
}

fn spawn_collection(
    config: CollectionConfig,
    store: Arc<dyn StoreAdapter>,
    event_bus: Option<EventBus>,
) -> ScoreCollection {
    let event_bus = event_bus.unwrap_or_else(|| EventBus::with_capacity(config.event_buffer_size));
    let list = ScoreList::shared(config.insertion);
    let config = Arc::new(config);

    let (command_tx, command_rx) = mpsc::unbounded_channel();
    let (state_tx, state_rx) = watch::channel(LoadState::Uninitialized);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let worker = CollectionWorker::new(
        Arc::clone(&config),
        store,
        Arc::clone(&list),
        event_bus.clone(),
        state_tx,
        command_rx,
        shutdown_rx,
    );

    tracing::debug!("Spawning collection worker for {}", config.name);
    let worker = tokio::spawn(worker.run());

    ScoreCollection {
        handle: CollectionHandle::new(config, list, command_tx, event_bus, state_rx),
        shutdown_tx,
        worker,
    }
}
