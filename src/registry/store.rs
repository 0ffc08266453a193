//! Channel registry implementation
//!
//! One registry-wide lock serializes container creation, reference counting,
//! removal and every write into a container's queue.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::broadcast;

use super::container::ChannelContainer;
use super::event::StateEvent;
use super::subscription::Subscription;

struct Channels<V> {
    /// Map of tenant key to its container
    containers: HashMap<String, ChannelContainer<V>>,

    /// Set once by `close`; no containers are created afterwards
    closed: bool,
}

/// Registry of per-tenant notification channels
pub struct ChannelRegistry<V> {
    channels: Mutex<Channels<V>>,

    /// Requested queue capacity for new containers
    capacity: usize,
}

impl<V: Send + Sync + 'static> ChannelRegistry<V> {
    /// Create a new registry for containers of the given capacity
    ///
    /// The broadcast channel rounds `capacity` up to the next power of two,
    /// so a capacity of 10 buffers 16 events per tenant.
    pub fn new(capacity: usize) -> Self {
        Self {
            channels: Mutex::new(Channels {
                containers: HashMap::new(),
                closed: false,
            }),
            capacity: capacity.max(1),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Channels<V>> {
        self.channels.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Subscribe to a tenant
    ///
    /// `current` is evaluated under the registry lock, so no publish for this
    /// tenant can slip in between reading the current state and attaching
    /// the receiver. A value written to the store before `current` runs but
    /// published after this returns is delivered twice: once as the initial
    /// state and once as a change. After `close` the returned subscription
    /// yields the current state and then ends.
    pub fn subscribe<F>(&self, key: &str, current: F) -> Subscription<V>
    where
        F: FnOnce() -> Option<Arc<V>>,
    {
        let mut channels = self.lock();
        let initial = StateEvent::from(current());

        if channels.closed {
            let (_, rx) = broadcast::channel(1);
            return Subscription::new(key.to_string(), initial, rx);
        }

        let capacity = self.capacity;
        let container = channels
            .containers
            .entry(key.to_string())
            .or_insert_with(|| {
                tracing::info!(tenant = %key, "Channel opened");
                ChannelContainer::new(capacity)
            });
        let rx = container.attach();

        tracing::debug!(
            tenant = %key,
            subscribers = container.subscribers(),
            "Subscriber added"
        );

        Subscription::new(key.to_string(), initial, rx)
    }

    /// Release one subscription of a tenant
    ///
    /// Closes and removes the tenant's channel when the last subscriber
    /// leaves. Returns the remaining subscriber count.
    pub fn unsubscribe(&self, key: &str) -> usize {
        let mut channels = self.lock();

        let Some(container) = channels.containers.get_mut(key) else {
            return 0;
        };

        let remaining = container.detach();
        if remaining == 0 {
            channels.containers.remove(key);
            tracing::info!(tenant = %key, "Channel closed");
        } else {
            tracing::debug!(tenant = %key, subscribers = remaining, "Subscriber removed");
        }

        remaining
    }

    /// Publish an event to a tenant's subscribers
    ///
    /// No-op without a channel. Returns the number of receivers reached.
    pub fn publish(&self, key: &str, event: StateEvent<V>) -> usize {
        self.publish_with(key, || Some(event))
    }

    /// Publish an event computed under the registry lock
    ///
    /// `event` is only called if the tenant has a channel; returning `None`
    /// publishes nothing.
    pub fn publish_with<F>(&self, key: &str, event: F) -> usize
    where
        F: FnOnce() -> Option<StateEvent<V>>,
    {
        let channels = self.lock();

        match channels.containers.get(key) {
            Some(container) => event().map_or(0, |event| container.send(event)),
            None => 0,
        }
    }

    /// Close every channel regardless of subscriber count
    ///
    /// Returns the number of channels that were closed.
    pub fn close(&self) -> usize {
        let mut channels = self.lock();
        channels.closed = true;

        let closed = channels.containers.len();
        channels.containers.clear();

        tracing::info!(channels = closed, "Channel registry closed");
        closed
    }

    /// Check if `close` has been called
    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    /// Get the subscriber count of a tenant
    pub fn subscriber_count(&self, key: &str) -> usize {
        self.lock()
            .containers
            .get(key)
            .map_or(0, ChannelContainer::subscribers)
    }

    /// Get the number of open channels
    pub fn channel_count(&self) -> usize {
        self.lock().containers.len()
    }
}

#[cfg(test)]
mod tests {
    use tokio_test::{assert_pending, assert_ready, task};

    use super::*;

    fn present(value: u32) -> StateEvent<u32> {
        StateEvent::Present(Arc::new(value))
    }

    #[tokio::test]
    async fn test_subscribe_delivers_current_state() {
        let registry = ChannelRegistry::<u32>::new(10);

        let mut sub = registry.subscribe("token", || Some(Arc::new(1)));
        assert_eq!(sub.recv().await, Some(present(1)));

        let mut empty = registry.subscribe("other", || None);
        assert_eq!(empty.recv().await, Some(StateEvent::Absent));
    }

    #[tokio::test]
    async fn test_subscription_reports_key() {
        let registry = ChannelRegistry::<u32>::new(10);

        let sub = registry.subscribe("token", || None);
        assert_eq!(sub.key(), "token");
    }

    #[tokio::test]
    async fn test_late_publish_repeats_initial_state() {
        let registry = ChannelRegistry::<u32>::new(10);

        // The store already holds 1, its publish has not run yet
        let mut sub = registry.subscribe("token", || Some(Arc::new(1)));
        registry.publish("token", present(1));

        assert_eq!(sub.recv().await, Some(present(1)));
        assert_eq!(sub.recv().await, Some(present(1)));
    }

    #[tokio::test]
    async fn test_subscribe_unsubscribe() {
        let registry = ChannelRegistry::<u32>::new(10);

        let _a = registry.subscribe("token", || None);
        let _b = registry.subscribe("token", || None);
        assert_eq!(registry.subscriber_count("token"), 2);
        assert_eq!(registry.channel_count(), 1);

        assert_eq!(registry.unsubscribe("token"), 1);
        assert_eq!(registry.channel_count(), 1);

        assert_eq!(registry.unsubscribe("token"), 0);
        assert_eq!(registry.subscriber_count("token"), 0);
        assert_eq!(registry.channel_count(), 0);

        // Unknown tenant is a no-op
        assert_eq!(registry.unsubscribe("token"), 0);
    }

    #[tokio::test]
    async fn test_publish_fans_out() {
        let registry = ChannelRegistry::<u32>::new(10);

        let mut a = registry.subscribe("token", || None);
        let mut b = registry.subscribe("token", || None);
        a.recv().await;
        b.recv().await;

        assert_eq!(registry.publish("token", present(2)), 2);
        assert_eq!(a.recv().await, Some(present(2)));
        assert_eq!(b.recv().await, Some(present(2)));
    }

    #[tokio::test]
    async fn test_publish_without_channel_is_noop() {
        let registry = ChannelRegistry::<u32>::new(10);

        assert_eq!(registry.publish("token", present(1)), 0);

        let mut called = false;
        registry.publish_with("token", || {
            called = true;
            Some(StateEvent::Absent)
        });
        assert!(!called);
    }

    #[tokio::test]
    async fn test_publish_with_none_sends_nothing() {
        let registry = ChannelRegistry::<u32>::new(10);
        let mut sub = registry.subscribe("token", || None);
        sub.recv().await;

        assert_eq!(registry.publish_with("token", || None), 0);

        let mut next = task::spawn(sub.recv());
        assert_pending!(next.poll());
    }

    #[tokio::test]
    async fn test_last_unsubscribe_ends_stream() {
        let registry = ChannelRegistry::<u32>::new(10);
        let mut sub = registry.subscribe("token", || None);
        sub.recv().await;

        registry.publish("token", present(3));
        registry.unsubscribe("token");

        // Already queued events drain before end-of-stream
        assert_eq!(sub.recv().await, Some(present(3)));
        assert_eq!(sub.recv().await, None);
    }

    #[tokio::test]
    async fn test_unsubscribe_wakes_parked_reader() {
        let registry = ChannelRegistry::<u32>::new(10);
        let mut sub = registry.subscribe("token", || None);
        sub.recv().await;

        let mut next = task::spawn(sub.recv());
        assert_pending!(next.poll());

        registry.unsubscribe("token");
        assert!(next.is_woken());
        assert_eq!(assert_ready!(next.poll()), None);
    }

    #[tokio::test]
    async fn test_resubscribe_gets_fresh_channel() {
        let registry = ChannelRegistry::<u32>::new(10);
        let _old = registry.subscribe("token", || None);
        registry.publish("token", present(1));
        registry.unsubscribe("token");

        let mut fresh = registry.subscribe("token", || None);
        assert_eq!(fresh.recv().await, Some(StateEvent::Absent));

        let mut next = task::spawn(fresh.recv());
        assert_pending!(next.poll());
    }

    #[tokio::test]
    async fn test_close_ends_all_streams() {
        let registry = ChannelRegistry::<u32>::new(10);
        let mut a = registry.subscribe("a", || None);
        let mut b = registry.subscribe("b", || None);
        let _b2 = registry.subscribe("b", || None);
        a.recv().await;
        b.recv().await;

        assert_eq!(registry.close(), 2);
        assert!(registry.is_closed());
        assert_eq!(registry.channel_count(), 0);

        assert_eq!(a.recv().await, None);
        assert_eq!(b.recv().await, None);
        assert_eq!(registry.publish("a", present(1)), 0);
    }

    #[tokio::test]
    async fn test_subscribe_after_close() {
        let registry = ChannelRegistry::<u32>::new(10);
        registry.close();

        let mut sub = registry.subscribe("token", || Some(Arc::new(4)));
        assert_eq!(sub.recv().await, Some(present(4)));
        assert_eq!(sub.recv().await, None);
        assert_eq!(registry.channel_count(), 0);
    }

    #[tokio::test]
    async fn test_slow_subscriber_drops_oldest() {
        let registry = ChannelRegistry::<u32>::new(2);
        let mut sub = registry.subscribe("token", || None);
        sub.recv().await;

        for value in 1..=5 {
            registry.publish("token", present(value));
        }

        assert_eq!(sub.recv().await, Some(present(4)));
        assert_eq!(sub.recv().await, Some(present(5)));
    }

    #[tokio::test]
    async fn test_capacity_rounds_up_to_power_of_two() {
        let registry = ChannelRegistry::<u32>::new(10);
        let mut sub = registry.subscribe("token", || None);
        sub.recv().await;

        for value in 1..=16 {
            registry.publish("token", present(value));
        }
        assert_eq!(sub.recv().await, Some(present(1)));

        for value in 17..=18 {
            registry.publish("token", present(value));
        }
        // 16 slots: 1 was consumed, 2 got overwritten by 18
        assert_eq!(sub.recv().await, Some(present(3)));
    }
}
