//! Tenant data models
//!
//! Two flavors of tenant data pass through the relay:
//!
//! - [`GameState`]: what the game client posts to its state integration
//!   web-hook, stored per client auth token.
//! - [`FullPlayerInfo`]: one player's view merged from a game server plugin
//!   snapshot ([`ServerState`]), stored per player auth key.
//!
//! Field names follow the JSON the game client and plugin send. Every model
//! derives `PartialEq`, which the store uses to skip unchanged updates.

pub mod game_state;
pub mod server_state;
mod steam_id;

pub use game_state::{
    AuthState, GameState, MapState, MatchStats, PlayerState, ProviderState, TeamState,
};
pub use server_state::{FullPlayerInfo, KzData, PlayerInfo, ServerInfo, ServerState};
