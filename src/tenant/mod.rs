//! Tenant store facade
//!
//! Combines the TTL entry store with the channel registry behind one API:
//! `get`, `put`, `remove`, `subscribe`/`unsubscribe` and `close`. Puts are
//! compared against the previous value and only real changes are
//! published; removals and expiries publish an absence event.
//!
//! Two concrete flavors exist, [`GameStateStore`] for game client pushes and
//! [`PlayerStore`] for merged game server snapshots.

pub mod game;
pub mod player;
pub mod store;

pub use game::GameStateStore;
pub use player::PlayerStore;
pub use store::TenantStore;
