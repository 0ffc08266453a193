//! Game client tenants

use crate::model::GameState;

use super::store::TenantStore;

/// Store of game client states keyed by client auth token
pub type GameStateStore = TenantStore<GameState>;

impl TenantStore<GameState> {
    /// Apply one push from a game client
    ///
    /// A state without provider section means the client is no longer in
    /// game, so the tenant is removed instead of stored. Returns whether the
    /// tenant's state changed.
    pub fn apply(&self, token: &str, state: GameState) -> bool {
        if state.is_in_game() {
            self.put(token, state)
        } else {
            self.remove(token).is_some()
        }
    }
}
