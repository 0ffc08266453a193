//! Operation metrics
//!
//! The store reports every operation to an injected [`MetricsSink`]. Export
//! (Prometheus or otherwise) is up to the embedding service.

pub mod metrics;

pub use metrics::{MetricsSink, NoopMetrics, Operation, OperationCounters};
