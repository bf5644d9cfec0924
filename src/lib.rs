//! # MLB Pitch Downloader Library
//!
//! Downloads pitch-by-pitch play-by-play data for every game of an MLB season
//! from the public Stats API and writes it as a single flat CSV file.
//!
//! ## Features
//!
//! - **Season Enumeration**: Discovers every scheduled game in the season window
//! - **Resilient Fetching**: Transport-level backoff plus call-level retry, skipping
//!   games that stay unreachable instead of aborting the whole season
//! - **Flattening**: Nested plays and events reduced to one row per pitch
//! - **Rate Governing**: Token-bucket pacing with an injectable clock
//! - **CSV Output**: One artifact per run, written once from memory
//!
//! ## Quick Start
//!
//! ```no_run
//! use mlb_pitch_downloader::downloader::SeasonExecutor;
//! use mlb_pitch_downloader::fetcher::statsapi::StatsApiClient;
//! use mlb_pitch_downloader::output::csv::CsvSink;
//! use mlb_pitch_downloader::season::SeasonWindow;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Arc::new(StatsApiClient::new());
//! let executor = SeasonExecutor::new(client.clone(), client);
//!
//! let window = SeasonWindow::for_season(2023)?;
//! let mut sink = CsvSink::new();
//! let summary = executor
//!     .run(&window, &mut sink, "historical_pitch_data_2023.csv".as_ref())
//!     .await?;
//! println!("{} rows written", summary.rows_written);
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`season`] - Season window and game identifier enumeration
//! - [`fetcher`] - Stats API client, wire types and retry message formatting
//! - [`flatten`] - Play-by-play to [`PitchEventRow`] reduction
//! - [`downloader`] - Retry policy, resilient fetcher, rate governor, pipeline
//! - [`output`] - Season dataset and tabular sinks (CSV)
//! - [`metrics`] - Prometheus counters for long-running collections

#![warn(missing_docs)]
#![warn(clippy::all)]

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// CLI command implementations
pub mod cli;

/// Download orchestration
pub mod downloader;

/// Stats API fetchers
pub mod fetcher;

/// Play-by-play flattening
pub mod flatten;

/// Observability counters
pub mod metrics;

/// Season dataset and writers
pub mod output;

/// Season window and schedule enumeration
pub mod season;

pub use flatten::flatten;

/// Identifier of one scheduled game (the Stats API `gamePk`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameId(pub u64);

impl GameId {
    /// Raw provider value
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for GameId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for GameId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .map(GameId)
            .map_err(|_| format!("Invalid game id: {s}"))
    }
}

impl From<u64> for GameId {
    fn from(value: u64) -> Self {
        GameId(value)
    }
}

/// One pitch event, flattened out of a game's play-by-play record
///
/// Field order is the column order of the persisted CSV.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PitchEventRow {
    /// Game the pitch belongs to
    #[serde(rename = "GameID")]
    pub game_id: GameId,
    /// Full name of the pitcher in the matchup
    #[serde(rename = "PitcherName")]
    pub pitcher_name: String,
    /// Full name of the batter in the matchup
    #[serde(rename = "BatterName")]
    pub batter_name: String,
    /// Balls-strikes count at the pitch (e.g. "2-1")
    #[serde(rename = "Count")]
    pub count: String,
    /// Half-inning label ("top" / "bottom")
    #[serde(rename = "Inning")]
    pub inning: String,
    /// Outs recorded in the play
    #[serde(rename = "Outs")]
    pub outs: u8,
    /// Comma-joined runner destinations, "Unknown" per missing end, or "None"
    #[serde(rename = "RunnersOn")]
    pub runners_on: String,
    /// Pitch type description
    #[serde(rename = "PitchType")]
    pub pitch_type: Option<String>,
    /// Release speed in mph
    #[serde(rename = "Velocity")]
    pub velocity: Option<f64>,
    /// Spin rate in rpm
    #[serde(rename = "SpinRate")]
    pub spin_rate: Option<f64>,
    /// Release extension in feet
    #[serde(rename = "ReleasePoint")]
    pub release_point: Option<f64>,
    /// Outcome description of the pitch
    #[serde(rename = "Outcome")]
    pub outcome: Option<String>,
}

impl PitchEventRow {
    /// Column names in output order
    pub const COLUMNS: [&'static str; 12] = [
        "GameID",
        "PitcherName",
        "BatterName",
        "Count",
        "Inning",
        "Outs",
        "RunnersOn",
        "PitchType",
        "Velocity",
        "SpinRate",
        "ReleasePoint",
        "Outcome",
    ];
}
