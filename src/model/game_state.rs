//! Game client state integration payload

use serde::{Deserialize, Serialize};

/// State pushed by the game client
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameState {
    /// Credentials; stripped before the state is stored
    pub auth: Option<AuthState>,
    pub map: Option<MapState>,
    pub player: Option<PlayerState>,
    /// Present while the client is in game
    pub provider: Option<ProviderState>,
    /// Fields that changed since the previous push
    #[serde(rename = "previously")]
    pub previous_state: Option<Box<GameState>>,
}

impl GameState {
    /// Remove the auth section and return its token
    pub fn take_auth_token(&mut self) -> Option<String> {
        self.auth.take().map(|auth| auth.token)
    }

    /// A state without provider section means the client left the game
    pub fn is_in_game(&self) -> bool {
        self.provider.is_some()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthState {
    pub token: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderState {
    pub name: String,
    #[serde(rename = "appid")]
    pub app_id: i32,
    pub version: i32,
    #[serde(rename = "steamid", with = "super::steam_id")]
    pub steam_id: i64,
    pub timestamp: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapState {
    pub name: String,
    pub team_ct: Option<TeamState>,
    pub team_t: Option<TeamState>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerState {
    #[serde(rename = "steamid", with = "super::steam_id")]
    pub steam_id: i64,
    pub clan: String,
    pub name: String,
    pub match_stats: Option<MatchStats>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchStats {
    pub kills: i32,
    pub assists: i32,
    pub deaths: i32,
    pub mvps: i32,
    pub score: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TeamState {
    #[serde(rename = "timeouts_remaining")]
    pub timeouts: Option<i32>,
}
