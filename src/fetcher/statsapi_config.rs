//! Stats API endpoint configuration
//!
//! Keeps the host and endpoint paths in one place so a mirror or a local
//! fixture server can be substituted through `--base-url`.

use crate::GameId;

/// Endpoint configuration for the MLB Stats API
#[derive(Debug, Clone)]
pub struct StatsApiConfig {
    /// Base URL for the API (e.g., <https://statsapi.mlb.com>)
    pub base_url: &'static str,

    /// Schedule endpoint path
    pub schedule_endpoint: &'static str,

    /// Play-by-play endpoint template; `{game_pk}` is substituted
    pub play_by_play_endpoint: &'static str,

    /// Sport filter for schedule queries (1 = MLB)
    pub sport_id: u32,
}

/// Public MLB Stats API
pub const MLB_STATSAPI_CONFIG: StatsApiConfig = StatsApiConfig {
    base_url: "https://statsapi.mlb.com",
    schedule_endpoint: "/api/v1/schedule",
    play_by_play_endpoint: "/api/v1/game/{game_pk}/playByPlay",
    sport_id: 1,
};

impl StatsApiConfig {
    /// Play-by-play path for one game
    pub fn play_by_play_path(&self, game_id: GameId) -> String {
        self.play_by_play_endpoint
            .replace("{game_pk}", &game_id.to_string())
    }
}
