//! Subscriber handle

use tokio::sync::broadcast::{self, error::RecvError};

use super::event::StateEvent;

/// A live feed of one tenant's state
///
/// Yields the tenant's state as of subscription first, then every change
/// in order. Ends (`None`) once the last subscriber for the tenant
/// unsubscribes or the store is closed.
///
/// Dropping a subscription does not release it; call
/// [`TenantStore::unsubscribe`](crate::TenantStore::unsubscribe) for that.
pub struct Subscription<V> {
    /// Tenant key
    key: String,

    /// Current-state event, delivered before anything from `rx`
    initial: Option<StateEvent<V>>,

    /// Receiver for subsequent changes
    rx: broadcast::Receiver<StateEvent<V>>,
}

impl<V> Subscription<V> {
    pub(super) fn new(
        key: String,
        initial: StateEvent<V>,
        rx: broadcast::Receiver<StateEvent<V>>,
    ) -> Self {
        Self {
            key,
            initial: Some(initial),
            rx,
        }
    }

    /// Tenant this subscription follows
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Wait for the next event
    ///
    /// Returns `None` at end-of-stream. A subscriber that falls more than the
    /// channel capacity behind skips the overwritten events and continues
    /// with the oldest one still queued.
    pub async fn recv(&mut self) -> Option<StateEvent<V>> {
        if let Some(event) = self.initial.take() {
            return Some(event);
        }

        loop {
            match self.rx.recv().await {
                Ok(event) => return Some(event),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(
                        tenant = %self.key,
                        skipped = skipped,
                        "Subscriber lagging, events dropped"
                    );
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }
}

impl<V> std::fmt::Debug for Subscription<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("key", &self.key)
            .field("initial_pending", &self.initial.is_some())
            .finish()
    }
}
