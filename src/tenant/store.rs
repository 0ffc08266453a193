//! Tenant store implementation

use std::sync::{Arc, Weak};

use tokio::task::JoinHandle;

use crate::cache::{EntryStore, EvictionCause, EvictionHook};
use crate::config::StoreConfig;
use crate::registry::{ChannelRegistry, StateEvent, Subscription};
use crate::stats::{MetricsSink, NoopMetrics, Operation};

struct Inner<V> {
    entries: Arc<EntryStore<V>>,
    channels: ChannelRegistry<V>,
    metrics: Arc<dyn MetricsSink>,
}

impl<V: Send + Sync + 'static> Inner<V> {
    /// Publish an absence unless a newer value already took the slot
    fn notify_evicted(&self, key: &str, cause: EvictionCause) {
        let receivers = self.channels.publish_with(key, || {
            if self.entries.get(key).is_some() {
                tracing::debug!(tenant = %key, ?cause, "Stale absence dropped");
                None
            } else {
                Some(StateEvent::Absent)
            }
        });

        if receivers > 0 {
            tracing::debug!(tenant = %key, ?cause, receivers = receivers, "Absence published");
        }
    }
}

/// Eviction hook bridging the entry store to the channel registry
struct EvictionNotifier<V> {
    tenant: Weak<Inner<V>>,
}

impl<V: Send + Sync + 'static> EvictionHook<V> for EvictionNotifier<V> {
    fn on_evict(&self, key: &str, _value: Arc<V>, cause: EvictionCause) {
        if let Some(inner) = self.tenant.upgrade() {
            inner.notify_evicted(key, cause);
        }
    }
}

/// Multi-tenant store with live change notification
///
/// Holds the latest value per tenant key for `ttl` after its last `put` and
/// lets any number of subscribers follow a tenant's value. Subscribers get
/// the current state (value or [`StateEvent::Absent`]) first, then one event
/// per actual change, then end-of-stream when the last of them unsubscribes
/// or the store is closed.
///
/// Tenants are fully isolated. Events of one tenant arrive in the order the
/// store applied them; nothing is ordered across tenants.
///
/// Token acceptance is the caller's job; see [`crate::auth`].
pub struct TenantStore<V> {
    inner: Arc<Inner<V>>,
    sweeper: JoinHandle<()>,
}

impl<V> TenantStore<V>
where
    V: PartialEq + Send + Sync + 'static,
{
    /// Create a new store that discards metrics
    ///
    /// Must be called within a Tokio runtime: it spawns the sweep task.
    pub fn new(config: StoreConfig) -> Self {
        Self::with_metrics(config, Arc::new(NoopMetrics))
    }

    /// Create a new store reporting every operation to `metrics`
    ///
    /// Must be called within a Tokio runtime: it spawns the sweep task.
    pub fn with_metrics(config: StoreConfig, metrics: Arc<dyn MetricsSink>) -> Self {
        let inner = Arc::new_cyclic(|tenant: &Weak<Inner<V>>| {
            let notifier = EvictionNotifier {
                tenant: tenant.clone(),
            };

            Inner {
                entries: Arc::new(EntryStore::new(
                    config.ttl,
                    config.sweep_interval(),
                    notifier,
                )),
                channels: ChannelRegistry::new(config.channel_capacity),
                metrics,
            }
        });

        let sweeper = inner.entries.spawn_sweeper();

        tracing::info!(
            ttl = ?inner.entries.ttl(),
            sweep_interval = ?inner.entries.sweep_interval(),
            channel_capacity = config.channel_capacity,
            "Tenant store created"
        );

        Self { inner, sweeper }
    }

    /// Get a tenant's current value
    pub fn get(&self, key: &str) -> Option<Arc<V>> {
        self.inner.metrics.record(key, Operation::Get);
        self.inner.entries.get(key)
    }

    /// Store a tenant's value, replacing any previous one wholesale
    ///
    /// Restarts the tenant's TTL. Subscribers are notified only if the value
    /// differs from the previous live one. Returns whether it did.
    pub fn put(&self, key: &str, value: V) -> bool {
        self.inner.metrics.record(key, Operation::Put);

        let value = Arc::new(value);
        let previous = self.inner.entries.put(key, Arc::clone(&value));

        if previous.as_deref() == Some(&*value) {
            return false;
        }

        self.inner.channels.publish(key, StateEvent::Present(value));
        true
    }

    /// Remove a tenant's value now
    ///
    /// Subscribers get an absence event before this returns.
    pub fn remove(&self, key: &str) -> Option<Arc<V>> {
        self.inner.metrics.record(key, Operation::Remove);
        self.inner.entries.remove(key)
    }

    /// Follow a tenant's value
    ///
    /// Every call must be paired with one [`unsubscribe`](Self::unsubscribe)
    /// for the same key.
    ///
    /// When this races a `put` of the same tenant, the new value can arrive
    /// twice: as the initial state and again as the change.
    pub fn subscribe(&self, key: &str) -> Subscription<V> {
        self.inner.metrics.record(key, Operation::Subscribe);

        let entries = &self.inner.entries;
        self.inner.channels.subscribe(key, || entries.get(key))
    }

    /// Release one subscription of a tenant
    ///
    /// The last release ends the tenant's stream for every reader. Returns
    /// the remaining subscriber count.
    pub fn unsubscribe(&self, key: &str) -> usize {
        self.inner.metrics.record(key, Operation::Unsubscribe);
        self.inner.channels.unsubscribe(key)
    }

    /// Shut down: end every subscriber stream and stop housekeeping
    ///
    /// One-way. Stored values stay readable until dropped, but nothing is
    /// published anymore.
    pub fn close(&self) {
        self.sweeper.abort();
        let channels = self.inner.channels.close();

        tracing::info!(
            channels = channels,
            entries = self.inner.entries.len(),
            "Tenant store closed"
        );
    }

    /// Check if the store has been closed
    pub fn is_closed(&self) -> bool {
        self.inner.channels.is_closed()
    }

    /// Run housekeeping now instead of waiting for the sweep task
    ///
    /// Returns the number of evicted tenants.
    pub fn sweep(&self) -> usize {
        self.inner.entries.sweep()
    }

    /// Number of stored tenants, including expired ones not yet swept
    pub fn len(&self) -> usize {
        self.inner.entries.len()
    }

    /// Check if no tenant is stored
    pub fn is_empty(&self) -> bool {
        self.inner.entries.is_empty()
    }

    /// Get the subscriber count of a tenant
    pub fn subscriber_count(&self, key: &str) -> usize {
        self.inner.channels.subscriber_count(key)
    }

    /// Get the number of tenants with at least one subscriber
    pub fn channel_count(&self) -> usize {
        self.inner.channels.channel_count()
    }
}

impl<V> Drop for TenantStore<V> {
    fn drop(&mut self) {
        self.sweeper.abort();
    }
}
