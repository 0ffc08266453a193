//! Multi-tenant game state relay core
//!
//! Game clients and game server plugins push state to a web-hook; viewers
//! (overlays, bots) read it back or follow it live. This crate is the part
//! in between: an ephemeral, per-tenant key-value store whose entries
//! expire when their source stops pushing, coupled with a reference-counted
//! notification channel per tenant.
//!
//! ```text
//!   put/remove ──► EntryStore ──(changed?)──► ChannelRegistry ──► Subscription
//!                     │                            ▲
//!                     └── sweep ── EvictionHook ───┘ (absence)
//! ```
//!
//! # Example
//!
//! ```no_run
//! use gsi_relay::{StateEvent, StoreConfig, TenantStore};
//!
//! # async fn demo() {
//! let store: TenantStore<String> = TenantStore::new(StoreConfig::default());
//!
//! store.put("tok1", "A".to_string());
//! let mut sub = store.subscribe("tok1");
//! assert_eq!(sub.recv().await.unwrap().value().map(String::as_str), Some("A"));
//!
//! store.remove("tok1");
//! assert!(matches!(sub.recv().await, Some(StateEvent::Absent)));
//!
//! store.unsubscribe("tok1");
//! store.close();
//! # }
//! ```
//!
//! HTTP and WebSocket transport, and the token policy, live in the embedding
//! service; [`auth`] provides the acceptance hook and header parsing it uses.

pub mod auth;
pub mod cache;
pub mod config;
pub mod error;
pub mod model;
pub mod registry;
pub mod stats;
pub mod tenant;

pub use auth::{authorize, AuthScheme, ToggleTokenFilter, TokenFilter};
pub use config::StoreConfig;
pub use error::{Error, Result};
pub use registry::{StateEvent, Subscription};
pub use stats::{MetricsSink, NoopMetrics, Operation, OperationCounters};
pub use tenant::{GameStateStore, PlayerStore, TenantStore};
