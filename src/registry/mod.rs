//! Per-tenant notification channels
//!
//! The registry fans changes of a tenant's value out to every live
//! subscriber of that tenant. Channels are reference counted: the first
//! subscriber opens one, the last one to leave closes it. It uses
//! `tokio::sync::broadcast` so each subscriber reads at its own pace from a
//! shared bounded queue.
//!
//! # Architecture
//!
//! ```text
//!                       ChannelRegistry
//!                 ┌─────────────────────────┐
//!                 │ Mutex<HashMap<Key,      │
//!                 │   ChannelContainer {    │
//!                 │     tx: broadcast::Tx,  │
//!                 │     subscribers,        │
//!                 │   }                     │
//!                 │ >>                      │
//!                 └───────────┬─────────────┘
//!                             │
//!     ┌───────────────────────┼───────────────────────┐
//!     │                       │                       │
//!     ▼                       ▼                       ▼
//! [put/remove]          [Subscription]          [Subscription]
//!  publish()              recv()                  recv()
//! ```
//!
//! # Backpressure
//!
//! Writers never block. A subscriber that falls more than the channel
//! capacity behind loses the oldest events it has not read yet and resumes
//! from the oldest one still queued.

mod container;
pub mod event;
pub mod store;
pub mod subscription;

pub use event::StateEvent;
pub use store::ChannelRegistry;
pub use subscription::Subscription;
