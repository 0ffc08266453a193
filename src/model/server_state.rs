//! Game server plugin snapshots
//!
//! The plugin sends one server section plus every player on the server in a
//! single request. The relay splits it into one [`FullPlayerInfo`] per
//! player, keyed by that player's auth key.

use serde::{Deserialize, Serialize};

/// Snapshot posted by the game server plugin
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerState {
    #[serde(rename = "serverInfo")]
    pub server_info: ServerInfo,
    #[serde(rename = "playerInfo")]
    pub player_info: Vec<PlayerInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerInfo {
    pub timestamp: i32,
    #[serde(rename = "servername")]
    pub server_name: String,
    #[serde(rename = "mapname")]
    pub map_name: String,
    #[serde(rename = "timeoutsCTprev")]
    pub timeouts_ct_prev: i32,
    #[serde(rename = "timeoutsTprev")]
    pub timeouts_t_prev: i32,
    #[serde(rename = "timeoutsCT")]
    pub timeouts_ct: i32,
    #[serde(rename = "timeoutsT")]
    pub timeouts_t: i32,
    pub global: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerInfo {
    /// Tenant key; players without one are not relayed
    #[serde(rename = "authkey")]
    pub auth_key: String,
    #[serde(rename = "steamid", with = "super::steam_id")]
    pub steam_id: i64,
    pub clan: String,
    pub name: String,
    #[serde(rename = "timeinserver")]
    pub time_in_server: f64,
    #[serde(rename = "KZData")]
    pub kz_data: KzData,
}

/// Run state of the timer plugin
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KzData {
    pub global: bool,
    pub course: i32,
    pub time: f64,
    pub checkpoints: i32,
    pub teleports: i32,
}

/// One player's merged view, as stored and published
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FullPlayerInfo {
    pub timestamp: i32,
    #[serde(rename = "authkey")]
    pub auth_key: String,
    #[serde(rename = "timeoutsCTprev")]
    pub timeouts_ct_prev: i32,
    #[serde(rename = "timeoutsTprev")]
    pub timeouts_t_prev: i32,
    #[serde(rename = "timeoutsCT")]
    pub timeouts_ct: i32,
    #[serde(rename = "timeoutsT")]
    pub timeouts_t: i32,
    #[serde(rename = "servername")]
    pub server_name: String,
    #[serde(rename = "mapname")]
    pub map_name: String,
    #[serde(rename = "serverglobal")]
    pub server_global: i32,
    #[serde(rename = "steamid", with = "super::steam_id")]
    pub steam_id: i64,
    pub clan: String,
    pub name: String,
    #[serde(rename = "timeinserver")]
    pub time_in_server: f64,
    #[serde(rename = "KZData")]
    pub kz_data: KzData,
}

impl FullPlayerInfo {
    /// Merge the latest server and player sections
    pub fn merge(server: &ServerInfo, player: &PlayerInfo) -> Self {
        Self {
            timestamp: server.timestamp,
            auth_key: player.auth_key.clone(),
            timeouts_ct_prev: server.timeouts_ct_prev,
            timeouts_t_prev: server.timeouts_t_prev,
            timeouts_ct: server.timeouts_ct,
            timeouts_t: server.timeouts_t,
            server_name: server.server_name.clone(),
            map_name: server.map_name.clone(),
            server_global: server.global,
            steam_id: player.steam_id,
            clan: player.clan.clone(),
            name: player.name.clone(),
            time_in_server: player.time_in_server,
            kz_data: player.kz_data.clone(),
        }
    }
}
