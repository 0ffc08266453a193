//! Per-tenant channel container

use tokio::sync::broadcast;

use super::event::StateEvent;

/// Notification queue and subscriber count for one tenant
///
/// Lives in the registry only while `subscribers > 0`. Dropping it drops the
/// only sender, which ends the stream for every receiver once they have
/// drained what was already queued.
pub(super) struct ChannelContainer<V> {
    /// Broadcast sender for fan-out to subscribers
    tx: broadcast::Sender<StateEvent<V>>,

    /// Number of active subscribers
    subscribers: usize,
}

impl<V> ChannelContainer<V> {
    pub(super) fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx, subscribers: 0 }
    }

    pub(super) fn subscribers(&self) -> usize {
        self.subscribers
    }

    /// Register one more subscriber and hand out its receiver
    pub(super) fn attach(&mut self) -> broadcast::Receiver<StateEvent<V>> {
        self.subscribers += 1;
        self.tx.subscribe()
    }

    /// Drop one subscriber, returning how many remain
    pub(super) fn detach(&mut self) -> usize {
        self.subscribers = self.subscribers.saturating_sub(1);
        self.subscribers
    }

    /// Send an event to all receivers
    ///
    /// Returns the number of receivers that got it, or 0 if there are none.
    /// Never blocks: a full queue overwrites its oldest event.
    pub(super) fn send(&self, event: StateEvent<V>) -> usize {
        self.tx.send(event).unwrap_or(0)
    }
}
