//! Shared fixtures: stub sources, play-by-play builders and log capture

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::NaiveDate;
use mlb_pitch_downloader::fetcher::{
    FetcherError, FetcherResult, PlayByPlaySource, RawGameRecord, Schedule, ScheduleSource,
};
use mlb_pitch_downloader::GameId;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::io::Write;
use std::sync::{Arc, Mutex};
use tracing_subscriber::fmt::MakeWriter;

/// Schedule stub returning fixed date groups of game ids
pub struct StubSchedule {
    dates: Vec<(&'static str, Vec<u64>)>,
    requested: Mutex<Vec<(NaiveDate, NaiveDate)>>,
}

impl StubSchedule {
    pub fn new(dates: Vec<(&'static str, Vec<u64>)>) -> Arc<Self> {
        Arc::new(Self {
            dates,
            requested: Mutex::new(Vec::new()),
        })
    }

    pub fn single_day(ids: Vec<u64>) -> Arc<Self> {
        Self::new(vec![("2023-04-01", ids)])
    }

    pub fn requested(&self) -> Vec<(NaiveDate, NaiveDate)> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl ScheduleSource for StubSchedule {
    async fn schedule(&self, start: NaiveDate, end: NaiveDate) -> FetcherResult<Schedule> {
        self.requested.lock().unwrap().push((start, end));

        let dates: Vec<Value> = self
            .dates
            .iter()
            .map(|(date, ids)| {
                let games: Vec<Value> = ids.iter().map(|id| json!({ "gamePk": id })).collect();
                json!({ "date": date, "games": games })
            })
            .collect();

        serde_json::from_value(json!({ "dates": dates }))
            .map_err(|e| FetcherError::Parse(e.to_string()))
    }
}

/// How the play-by-play stub answers for one game
#[derive(Clone)]
pub enum GameBehavior {
    Record(RawGameRecord),
    Timeout,
    Malformed,
}

/// Play-by-play stub keyed by game id, recording every call
pub struct StubPlayByPlay {
    games: HashMap<GameId, GameBehavior>,
    calls: Mutex<Vec<GameId>>,
}

impl StubPlayByPlay {
    pub fn new(games: Vec<(u64, GameBehavior)>) -> Arc<Self> {
        Arc::new(Self {
            games: games
                .into_iter()
                .map(|(id, behavior)| (GameId(id), behavior))
                .collect(),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<GameId> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_for(&self, game_id: u64) -> usize {
        self.calls()
            .iter()
            .filter(|id| **id == GameId(game_id))
            .count()
    }
}

#[async_trait]
impl PlayByPlaySource for StubPlayByPlay {
    async fn play_by_play(&self, game_id: GameId) -> FetcherResult<RawGameRecord> {
        self.calls.lock().unwrap().push(game_id);

        match self.games.get(&game_id) {
            Some(GameBehavior::Record(record)) => Ok(record.clone()),
            Some(GameBehavior::Timeout) => Err(FetcherError::Network(
                "request timed out: operation timed out".to_string(),
            )),
            Some(GameBehavior::Malformed) => {
                Err(FetcherError::Parse("missing field `allPlays`".to_string()))
            }
            None => Err(FetcherError::ClientError {
                status: 404,
                message: format!("no game {game_id}"),
            }),
        }
    }
}

/// Pitch event JSON as served by the play-by-play endpoint
pub fn pitch(balls: u8, strikes: u8, pitch_type: &str, speed: f64, outcome: &str) -> Value {
    json!({
        "isPitch": true,
        "count": { "balls": balls, "strikes": strikes, "outs": 0 },
        "details": {
            "description": outcome,
            "type": { "code": "XX", "description": pitch_type }
        },
        "pitchData": {
            "startSpeed": speed,
            "extension": 6.4,
            "breaks": { "spinRate": 2300 }
        }
    })
}

/// Non-pitch event JSON (pickoff attempt, mound visit, ...)
pub fn non_pitch(description: &str) -> Value {
    json!({
        "isPitch": false,
        "count": { "balls": 0, "strikes": 0 },
        "details": { "description": description }
    })
}

/// Play JSON with the given runner destinations and events
pub fn play(half: &str, outs: u8, runner_ends: &[Option<&str>], events: Vec<Value>) -> Value {
    let runners: Vec<Value> = runner_ends
        .iter()
        .map(|end| json!({ "movement": { "start": null, "end": end } }))
        .collect();

    json!({
        "about": { "halfInning": half, "inning": 1 },
        "count": { "balls": 0, "strikes": 0, "outs": outs },
        "matchup": {
            "batter": { "id": 1, "fullName": "Mookie Betts" },
            "pitcher": { "id": 2, "fullName": "Zac Gallen" }
        },
        "runners": runners,
        "playEvents": events
    })
}

/// Game record from play JSON values
pub fn game(plays: Vec<Value>) -> RawGameRecord {
    serde_json::from_value(json!({ "allPlays": plays })).unwrap()
}

/// Game record holding `pitches` pitch events in one play
pub fn game_with_pitches(pitches: u8) -> RawGameRecord {
    let events = (0..pitches)
        .map(|i| pitch(0, i.min(2), "Slider", 85.0 + i as f64, "Foul"))
        .collect();
    game(vec![play("top", 0, &[], events)])
}

/// Shared in-memory log sink
#[derive(Clone, Default)]
pub struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }

    /// Lines whose level column matches `level` ("WARN", "ERROR", ...)
    pub fn lines_at(&self, level: &str) -> Vec<String> {
        let marker = format!(" {level} ");
        self.contents()
            .lines()
            .filter(|line| line.contains(&marker))
            .map(str::to_string)
            .collect()
    }
}

impl Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogBuffer {
    type Writer = LogBuffer;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Capture logs emitted on the current thread until the guard drops
pub fn capture_logs() -> (LogBuffer, tracing::subscriber::DefaultGuard) {
    let buffer = LogBuffer::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(buffer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .finish();
    let guard = tracing::subscriber::set_default(subscriber);
    (buffer, guard)
}
