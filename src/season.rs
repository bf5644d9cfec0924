//! Season window and game enumeration
//!
//! The regular season is covered by a fixed window, April 1st through
//! October 1st of the season year. Enumeration keeps the provider's order:
//! date groups as listed, then games within each date as listed.

use chrono::NaiveDate;
use tracing::info;

use crate::fetcher::{FetcherError, FetcherResult, ScheduleSource};
use crate::GameId;

const SEASON_START: (u32, u32) = (4, 1);
const SEASON_END: (u32, u32) = (10, 1);

/// Inclusive date range queried from the schedule endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeasonWindow {
    start: NaiveDate,
    end: NaiveDate,
}

impl SeasonWindow {
    /// Fixed in-season window for a four-digit season year
    pub fn for_season(year: i32) -> FetcherResult<Self> {
        if !(1000..=9999).contains(&year) {
            return Err(FetcherError::InvalidRequest(format!(
                "season year must have four digits, got {year}"
            )));
        }

        let start = NaiveDate::from_ymd_opt(year, SEASON_START.0, SEASON_START.1);
        let end = NaiveDate::from_ymd_opt(year, SEASON_END.0, SEASON_END.1);
        match (start, end) {
            (Some(start), Some(end)) => Ok(Self { start, end }),
            _ => Err(FetcherError::InvalidRequest(format!(
                "no season window for year {year}"
            ))),
        }
    }

    /// Explicit window; `start` must not be after `end`
    pub fn new(start: NaiveDate, end: NaiveDate) -> FetcherResult<Self> {
        if start > end {
            return Err(FetcherError::InvalidRequest(format!(
                "start date {start} is after end date {end}"
            )));
        }
        Ok(Self { start, end })
    }

    /// First date
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// Last date
    pub fn end(&self) -> NaiveDate {
        self.end
    }
}

/// Every game identifier of a season, in schedule order
///
/// Schedule failures propagate: there is no partial-schedule mode.
pub async fn enumerate_games(
    source: &dyn ScheduleSource,
    season_year: i32,
) -> FetcherResult<Vec<GameId>> {
    let window = SeasonWindow::for_season(season_year)?;
    enumerate_window(source, &window).await
}

/// Every game identifier within an explicit window, in schedule order
pub async fn enumerate_window(
    source: &dyn ScheduleSource,
    window: &SeasonWindow,
) -> FetcherResult<Vec<GameId>> {
    let schedule = source.schedule(window.start(), window.end()).await?;
    let game_ids = schedule.game_ids();

    info!(
        start = %window.start(),
        end = %window.end(),
        dates = schedule.dates.len(),
        games = game_ids.len(),
        "Enumerated season games"
    );

    Ok(game_ids)
}
