//! Metrics sink and in-memory counters

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

/// Store operation being counted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Get,
    Put,
    Remove,
    Subscribe,
    Unsubscribe,
}

impl Operation {
    /// Stable label for exporters
    pub fn label(&self) -> &'static str {
        match self {
            Operation::Get => "get",
            Operation::Put => "put",
            Operation::Remove => "remove",
            Operation::Subscribe => "channel_get",
            Operation::Unsubscribe => "channel_release",
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Receiver of per-tenant operation counts
pub trait MetricsSink: Send + Sync {
    /// Record one operation on a tenant
    fn record(&self, tenant: &str, operation: Operation);
}

impl<T: MetricsSink + ?Sized> MetricsSink for Arc<T> {
    fn record(&self, tenant: &str, operation: Operation) {
        (**self).record(tenant, operation)
    }
}

/// Sink that discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopMetrics;

impl MetricsSink for NoopMetrics {
    fn record(&self, _tenant: &str, _operation: Operation) {}
}

/// In-memory counter per (tenant, operation)
#[derive(Debug, Default)]
pub struct OperationCounters {
    counters: RwLock<HashMap<(String, Operation), AtomicU64>>,
}

impl OperationCounters {
    /// Create an empty counter table
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the count for one tenant and operation
    pub fn count(&self, tenant: &str, operation: Operation) -> u64 {
        let counters = self.counters.read().unwrap_or_else(PoisonError::into_inner);
        counters
            .get(&(tenant.to_string(), operation))
            .map_or(0, |c| c.load(Ordering::Relaxed))
    }

    /// Get the total count of an operation across tenants
    pub fn total(&self, operation: Operation) -> u64 {
        let counters = self.counters.read().unwrap_or_else(PoisonError::into_inner);
        counters
            .iter()
            .filter(|((_, op), _)| *op == operation)
            .map(|(_, c)| c.load(Ordering::Relaxed))
            .sum()
    }

    /// Copy out all counters, sorted by tenant then label
    pub fn snapshot(&self) -> Vec<(String, Operation, u64)> {
        let counters = self.counters.read().unwrap_or_else(PoisonError::into_inner);
        let mut rows: Vec<_> = counters
            .iter()
            .map(|((tenant, op), c)| (tenant.clone(), *op, c.load(Ordering::Relaxed)))
            .collect();
        rows.sort_by(|a, b| (&a.0, a.1.label()).cmp(&(&b.0, b.1.label())));
        rows
    }
}

impl MetricsSink for OperationCounters {
    fn record(&self, tenant: &str, operation: Operation) {
        let key = (tenant.to_string(), operation);

        // Fast path: counter exists
        {
            let counters = self.counters.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(counter) = counters.get(&key) {
                counter.fetch_add(1, Ordering::Relaxed);
                return;
            }
        }

        let mut counters = self.counters.write().unwrap_or_else(PoisonError::into_inner);
        counters
            .entry(key)
            .or_insert_with(|| AtomicU64::new(0))
            .fetch_add(1, Ordering::Relaxed);
    }
}
