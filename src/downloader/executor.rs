//! Season executor
//!
//! Drives one run end to end: enumerate the window's games, fetch and flatten
//! each game in schedule order, pace through the rate governor, then persist
//! the accumulated dataset once.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn, Instrument};

use super::clock::{SharedClock, SystemClock};
use super::config::{GOVERNOR_BATCH_SIZE, GOVERNOR_INTERVAL_MS};
use super::fetch::ResilientFetcher;
use super::rate_limit::RateGovernor;
use super::retry::RetryPolicy;
use super::DownloadError;
use crate::fetcher::{PlayByPlaySource, ScheduleSource};
use crate::flatten::flatten;
use crate::metrics::{self, SeasonMetrics};
use crate::output::{SeasonDataset, TabularSink};
use crate::season::{enumerate_window, SeasonWindow};
use crate::GameId;

/// Outcome of the fetch phase, before persistence
#[derive(Debug, Clone)]
pub struct SeasonRun {
    /// Rows from every fetched game, in schedule order
    pub dataset: SeasonDataset,
    /// Games listed by the schedule
    pub games_enumerated: usize,
    /// Games skipped after retry exhaustion, in schedule order
    pub skipped: Vec<GameId>,
}

/// Completion summary of a persisted run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Games listed by the schedule
    pub games_enumerated: usize,
    /// Games skipped after retry exhaustion, in schedule order
    pub skipped: Vec<GameId>,
    /// Data rows written (header excluded)
    pub rows_written: usize,
    /// Where the dataset was written
    pub destination: PathBuf,
}

impl RunSummary {
    /// Games that contributed rows
    pub fn games_fetched(&self) -> usize {
        self.games_enumerated - self.skipped.len()
    }

    fn skipped_display(&self) -> String {
        if self.skipped.is_empty() {
            return "none".to_string();
        }
        self.skipped
            .iter()
            .map(GameId::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Sequential season pipeline
pub struct SeasonExecutor {
    schedule: Arc<dyn ScheduleSource>,
    play_by_play: Arc<dyn PlayByPlaySource>,
    call_policy: RetryPolicy,
    batch_size: u32,
    governor_interval: Duration,
    clock: SharedClock,
}

impl SeasonExecutor {
    /// Create an executor over the given sources with default policies
    pub fn new(schedule: Arc<dyn ScheduleSource>, play_by_play: Arc<dyn PlayByPlaySource>) -> Self {
        Self {
            schedule,
            play_by_play,
            call_policy: RetryPolicy::call_level(),
            batch_size: GOVERNOR_BATCH_SIZE,
            governor_interval: Duration::from_millis(GOVERNOR_INTERVAL_MS),
            clock: SystemClock::shared(),
        }
    }

    /// Set the clock for retry delays and governor pacing
    pub fn with_clock(mut self, clock: SharedClock) -> Self {
        self.clock = clock;
        self
    }

    /// Set the call-level retry policy
    pub fn with_call_policy(mut self, policy: RetryPolicy) -> Self {
        self.call_policy = policy;
        self
    }

    /// Set governor tokens per interval (also the progress cadence)
    pub fn with_batch_size(mut self, batch_size: u32) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Set the governor refill interval
    pub fn with_governor_interval(mut self, interval: Duration) -> Self {
        self.governor_interval = interval;
        self
    }

    /// Call-level retry policy in use
    pub fn call_policy(&self) -> &RetryPolicy {
        &self.call_policy
    }

    /// Governor tokens per interval
    pub fn batch_size(&self) -> u32 {
        self.batch_size
    }

    /// Enumerate and fetch every game in `window` without persisting.
    ///
    /// # Errors
    /// [`DownloadError::Schedule`] when enumeration fails and
    /// [`DownloadError::Fetch`] when a game fails with a non-network error.
    /// Games that exhaust their retries are skipped, not errors.
    pub async fn collect(&self, window: &SeasonWindow) -> Result<SeasonRun, DownloadError> {
        let game_ids = enumerate_window(self.schedule.as_ref(), window)
            .await
            .map_err(DownloadError::Schedule)?;
        let total = game_ids.len();

        let fetcher = ResilientFetcher::new(Arc::clone(&self.play_by_play))
            .with_policy(self.call_policy.clone())
            .with_clock(Arc::clone(&self.clock));
        let governor =
            RateGovernor::new(self.batch_size, self.governor_interval, Arc::clone(&self.clock));

        let mut dataset = SeasonDataset::new();
        let mut skipped = Vec::new();

        for (index, game_id) in game_ids.into_iter().enumerate() {
            match fetcher.fetch_game(game_id).await {
                Ok(Some(record)) => {
                    let rows = dataset.collect(flatten(&record, game_id));
                    debug!(game_id = %game_id, rows, "Game flattened");
                    metrics::record_game_processed(rows);
                }
                Ok(None) => {
                    warn!(game_id = %game_id, "Game skipped after exhausting retries");
                    metrics::record_game_skipped();
                    skipped.push(game_id);
                }
                Err(source) => return Err(DownloadError::Fetch { game_id, source }),
            }

            let waited = governor.throttle(index + 1, total).await?;
            metrics::record_governor_wait(waited);
        }

        Ok(SeasonRun {
            dataset,
            games_enumerated: total,
            skipped,
        })
    }

    /// Run the whole pipeline and write the dataset to `destination` once.
    ///
    /// Nothing is written when the run fails before persistence.
    pub async fn run(
        &self,
        window: &SeasonWindow,
        sink: &mut dyn TabularSink,
        destination: &Path,
    ) -> Result<RunSummary, DownloadError> {
        let span = tracing::info_span!(
            "season_run",
            start = %window.start(),
            end = %window.end(),
            destination = %destination.display()
        );
        let season_metrics =
            SeasonMetrics::start(format!("{}..{}", window.start(), window.end()));

        let result = async {
            info!("Starting season download");

            let season = self.collect(window).await?;
            let rows_written = season.dataset.persist(sink, destination)?;

            Ok::<_, DownloadError>(RunSummary {
                games_enumerated: season.games_enumerated,
                skipped: season.skipped,
                rows_written,
                destination: destination.to_path_buf(),
            })
        }
        .instrument(span)
        .await;

        match &result {
            Ok(summary) => {
                season_metrics.record_success(
                    summary.games_enumerated,
                    summary.skipped.len(),
                    summary.rows_written,
                );
                info!(
                    games = summary.games_enumerated,
                    fetched = summary.games_fetched(),
                    skipped = %summary.skipped_display(),
                    rows = summary.rows_written,
                    destination = %summary.destination.display(),
                    "Data saved to {}",
                    summary.destination.display()
                );
            }
            Err(e) => season_metrics.record_failure(&e.to_string()),
        }

        result
    }
}
