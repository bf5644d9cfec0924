//! Stats API wire types
//!
//! Only the fields the pipeline reads are modelled. Fields the flattener needs
//! unconditionally are required, so a response missing them fails to decode
//! and surfaces as [`FetcherError::Parse`](super::FetcherError::Parse).

use crate::GameId;
use chrono::NaiveDate;
use serde::Deserialize;

/// `/api/v1/schedule` response
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    /// Dated groups of games, in provider order
    #[serde(default)]
    pub dates: Vec<ScheduleDate>,
}

/// Games scheduled on one calendar date
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleDate {
    /// Calendar date
    pub date: NaiveDate,
    /// Games in provider order
    #[serde(default)]
    pub games: Vec<ScheduledGame>,
}

/// One scheduled game
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledGame {
    /// Provider game key
    pub game_pk: GameId,
}

impl Schedule {
    /// Game identifiers in date order, then listed order within a date
    pub fn game_ids(&self) -> Vec<GameId> {
        self.dates
            .iter()
            .flat_map(|date| date.games.iter().map(|game| game.game_pk))
            .collect()
    }
}

/// `/api/v1/game/{gamePk}/playByPlay` response
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RawGameRecord {
    /// Every play of the game in order
    pub all_plays: Vec<Play>,
}

/// One plate appearance
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Play {
    /// Inning context
    pub about: PlayAbout,
    /// Count at the end of the play
    pub count: PlayCount,
    /// Pitcher / batter matchup
    pub matchup: Matchup,
    /// Runner movements during the play
    #[serde(default)]
    pub runners: Vec<Runner>,
    /// Events within the play (pitches, pickoffs, mound visits, ...)
    #[serde(default)]
    pub play_events: Vec<PlayEvent>,
}

#[allow(missing_docs)]
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlayAbout {
    pub half_inning: String,
    #[serde(default)]
    pub inning: Option<u8>,
}

#[allow(missing_docs)]
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlayCount {
    pub outs: u8,
}

#[allow(missing_docs)]
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Matchup {
    pub batter: Person,
    pub pitcher: Person,
}

#[allow(missing_docs)]
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    #[serde(default)]
    pub id: Option<u64>,
    pub full_name: String,
}

/// One runner's movement in a play
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Runner {
    /// Base movement
    pub movement: RunnerMovement,
}

/// Base movement; `end` is null when the destination was not recorded
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RunnerMovement {
    /// Starting base
    #[serde(default)]
    pub start: Option<String>,
    /// Destination base ("1B", "2B", "3B", "score")
    #[serde(default)]
    pub end: Option<String>,
}

/// One event within a play
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlayEvent {
    /// Set for events that represent a pitch thrown
    #[serde(default)]
    pub is_pitch: bool,
    /// Count when the event happened
    pub count: EventCount,
    /// Event details (outcome, pitch type)
    #[serde(default)]
    pub details: Option<EventDetails>,
    /// Pitch tracking metrics
    #[serde(default)]
    pub pitch_data: Option<PitchData>,
}

#[allow(missing_docs)]
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EventCount {
    pub balls: u8,
    pub strikes: u8,
}

/// Event details
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EventDetails {
    /// Outcome description (e.g. "Called Strike")
    #[serde(default)]
    pub description: Option<String>,
    /// Pitch classification
    #[serde(default, rename = "type")]
    pub pitch_type: Option<PitchType>,
}

/// Pitch classification
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PitchType {
    /// Short code (e.g. "FF")
    #[serde(default)]
    pub code: Option<String>,
    /// Human readable name (e.g. "Four-Seam Fastball")
    #[serde(default)]
    pub description: Option<String>,
}

/// Pitch tracking metrics
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PitchData {
    /// Release speed in mph
    #[serde(default)]
    pub start_speed: Option<f64>,
    /// Release extension in feet
    #[serde(default)]
    pub extension: Option<f64>,
    /// Break measurements
    #[serde(default)]
    pub breaks: Option<PitchBreaks>,
}

/// Break measurements
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PitchBreaks {
    /// Spin rate in rpm
    #[serde(default)]
    pub spin_rate: Option<f64>,
}
