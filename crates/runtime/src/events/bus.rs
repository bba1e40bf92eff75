//! Broadcast event bus for one collection.

use tokio::sync::broadcast;

use super::ScoreEvent;

/// Fan-out channel for [`ScoreEvent`]s.
///
/// Cloning the bus shares the underlying channel. Publishing never blocks;
/// subscribers that fall more than the buffer capacity behind observe
/// [`broadcast::error::RecvError::Lagged`].
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<ScoreEvent>,
}

impl EventBus {
    /// Creates a new event bus with default capacity
    pub fn new() -> Self {
        Self::with_capacity(64)
    }

    /// Creates a new event bus with the given buffer capacity (minimum 1)
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            tx: broadcast::channel(capacity.max(1)).0,
        }
    }

    /// Publish an event to every current subscriber
    pub fn publish(&self, event: ScoreEvent) {
        if let Err(broadcast::error::SendError(event)) = self.tx.send(event) {
            // No subscribers - this is normal, not an error
            tracing::trace!("No subscribers for {} event", event.tag());
        }
    }

    /// Subscribe to events published after this call
    pub fn subscribe(&self) -> broadcast::Receiver<ScoreEvent> {
        self.tx.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
