//! Game server plugin tenants

use crate::model::{FullPlayerInfo, PlayerInfo, ServerInfo, ServerState};

use super::store::TenantStore;

/// Store of merged player views keyed by player auth key
pub type PlayerStore = TenantStore<FullPlayerInfo>;

impl TenantStore<FullPlayerInfo> {
    /// Merge and store one player's view of a server snapshot
    ///
    /// Players without an auth key are skipped. Returns whether the player
    /// was stored.
    pub fn put_snapshot(&self, server: &ServerInfo, player: &PlayerInfo) -> bool {
        if player.auth_key.is_empty() {
            return false;
        }

        self.put(&player.auth_key, FullPlayerInfo::merge(server, player));
        true
    }

    /// Store every player of a server snapshot
    ///
    /// Returns the number of players stored.
    pub fn put_server_state(&self, state: &ServerState) -> usize {
        let stored = state
            .player_info
            .iter()
            .filter(|player| self.put_snapshot(&state.server_info, player))
            .count();

        tracing::debug!(
            server = %state.server_info.server_name,
            players = state.player_info.len(),
            stored = stored,
            "Server snapshot applied"
        );

        stored
    }
}
