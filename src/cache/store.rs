//! TTL entry store implementation

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, Weak};
use std::time::Duration;

use tokio::time::{Instant, MissedTickBehavior};

use super::entry::{Entry, EvictionCause, EvictionHook};

/// Upper bound for both the TTL and the sweep interval
pub const MAX_LIFETIME: Duration = Duration::from_secs(365 * 24 * 60 * 60);

/// Key-value map with a uniform time-to-live
///
/// Reads never refresh the TTL. Expired entries stop being visible right
/// away but are only dropped (and reported to the eviction hook) by the
/// next sweep, so an entry lives at least `ttl` and at most about
/// `ttl + sweep_interval`.
pub struct EntryStore<V> {
    /// Map of tenant key to entry
    entries: RwLock<HashMap<String, Entry<V>>>,

    /// Lifetime of an unrefreshed entry
    ttl: Duration,

    /// Housekeeping period
    sweep_interval: Duration,

    /// Eviction callback
    on_evict: Box<dyn EvictionHook<V>>,
}

impl<V: Send + Sync + 'static> EntryStore<V> {
    /// Create a new store
    ///
    /// `ttl` is capped at [`MAX_LIFETIME`]; `sweep_interval` is kept between
    /// one millisecond and [`MAX_LIFETIME`].
    pub fn new<H>(ttl: Duration, sweep_interval: Duration, on_evict: H) -> Self
    where
        H: EvictionHook<V>,
    {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl: ttl.min(MAX_LIFETIME),
            sweep_interval: sweep_interval.clamp(Duration::from_millis(1), MAX_LIFETIME),
            on_evict: Box::new(on_evict),
        }
    }

    /// Get the configured TTL
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Get the housekeeping period
    pub fn sweep_interval(&self) -> Duration {
        self.sweep_interval
    }

    /// Look up a live value
    pub fn get(&self, key: &str) -> Option<Arc<V>> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries
            .get(key)
            .and_then(|entry| entry.live_value(Instant::now()))
            .cloned()
    }

    /// Insert or replace a value and restart its TTL window
    ///
    /// Returns the value it replaced, if that one was still live. An expired
    /// but unswept predecessor is overwritten without notification.
    pub fn put(&self, key: impl Into<String>, value: Arc<V>) -> Option<Arc<V>> {
        let now = Instant::now();
        let entry = Entry::new(value, now + self.ttl);

        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries
            .insert(key.into(), entry)
            .and_then(|prev| prev.live_value(now).cloned())
    }

    /// Delete an entry immediately
    ///
    /// Fires the eviction hook before returning if an entry was present,
    /// expired or not. Only a live value is returned.
    pub fn remove(&self, key: &str) -> Option<Arc<V>> {
        let now = Instant::now();
        let removed = {
            let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
            entries.remove(key)
        }?;

        tracing::debug!(tenant = %key, "Entry removed");
        self.on_evict
            .on_evict(key, Arc::clone(&removed.value), EvictionCause::Removed);

        removed.live_value(now).cloned()
    }

    /// Drop every expired entry and report each to the eviction hook
    ///
    /// Returns the number of evicted entries.
    pub fn sweep(&self) -> usize {
        let now = Instant::now();

        let expired: Vec<(String, Entry<V>)> = {
            let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
            let keys: Vec<String> = entries
                .iter()
                .filter(|(_, entry)| entry.is_expired(now))
                .map(|(key, _)| key.clone())
                .collect();

            keys.into_iter()
                .filter_map(|key| entries.remove(&key).map(|entry| (key, entry)))
                .collect()
        };

        for (key, entry) in &expired {
            tracing::debug!(tenant = %key, "Entry expired");
            self.on_evict
                .on_evict(key, Arc::clone(&entry.value), EvictionCause::Expired);
        }

        expired.len()
    }

    /// Number of stored entries, including expired ones not yet swept
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Check if the store holds no entries at all
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Spawn the background sweep task
    ///
    /// The task only holds a weak reference and ends on its own once the
    /// store is dropped. Returns a handle that can be used to abort it sooner.
    pub fn spawn_sweeper(self: &Arc<Self>) -> tokio::task::JoinHandle<()> {
        let store: Weak<Self> = Arc::downgrade(self);
        let interval = self.sweep_interval;

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + interval, interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;

                let Some(store) = store.upgrade() else {
                    break;
                };
                let evicted = store.sweep();
                if evicted > 0 {
                    tracing::debug!(evicted = evicted, remaining = store.len(), "Sweep finished");
                }
            }
        })
    }
}
