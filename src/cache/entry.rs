//! Cached entry and eviction hook types

use std::sync::Arc;

use tokio::time::Instant;

/// Why an entry left the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvictionCause {
    /// TTL ran out and the sweeper collected it
    Expired,
    /// Explicitly removed
    Removed,
}

/// Callback invoked once for every entry that leaves the store
///
/// Runs outside the store's lock, on whichever task caused the eviction
/// (the sweeper task for expiry, the caller for removal).
pub trait EvictionHook<V>: Send + Sync + 'static {
    fn on_evict(&self, key: &str, value: Arc<V>, cause: EvictionCause);
}

impl<V, F> EvictionHook<V> for F
where
    F: Fn(&str, Arc<V>, EvictionCause) + Send + Sync + 'static,
{
    fn on_evict(&self, key: &str, value: Arc<V>, cause: EvictionCause) {
        self(key, value, cause)
    }
}

/// A value together with its expiry deadline
#[derive(Debug)]
pub(super) struct Entry<V> {
    pub(super) value: Arc<V>,
    pub(super) expires_at: Instant,
}

impl<V> Entry<V> {
    pub(super) fn new(value: Arc<V>, expires_at: Instant) -> Self {
        Self { value, expires_at }
    }

    /// An entry is live strictly before its deadline
    pub(super) fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }

    /// Value if still live at `now`
    pub(super) fn live_value(&self, now: Instant) -> Option<&Arc<V>> {
        if self.is_expired(now) {
            None
        } else {
            Some(&self.value)
        }
    }
}
