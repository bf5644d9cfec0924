//! MLB Stats API data source

use async_trait::async_trait;
use chrono::NaiveDate;
use tracing::{debug, info};

use super::shared_resources::global_http_client;
use super::statsapi_config::{StatsApiConfig, MLB_STATSAPI_CONFIG};
use super::statsapi_http::StatsApiHttpClient;
use super::statsapi_types::{RawGameRecord, Schedule};
use super::{FetcherResult, PlayByPlaySource, ScheduleSource};
use crate::downloader::clock::SharedClock;
use crate::downloader::retry::RetryPolicy;
use crate::GameId;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Stats API client serving both the schedule and play-by-play endpoints
pub struct StatsApiClient {
    http_client: StatsApiHttpClient,
    config: StatsApiConfig,
}

impl StatsApiClient {
    /// Create a client for the public Stats API
    pub fn new() -> Self {
        Self::new_with_base_url(MLB_STATSAPI_CONFIG.base_url)
    }

    /// Create with custom base URL (mirrors, fixture servers)
    pub fn new_with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            http_client: StatsApiHttpClient::new(global_http_client(), base_url),
            config: MLB_STATSAPI_CONFIG,
        }
    }

    /// Replace the transport retry policy
    pub fn with_transport_policy(mut self, policy: RetryPolicy) -> Self {
        self.http_client = self.http_client.with_retry_policy(policy);
        self
    }

    /// Replace the clock used for transport backoff
    pub fn with_clock(mut self, clock: SharedClock) -> Self {
        self.http_client = self.http_client.with_clock(clock);
        self
    }

    /// Underlying HTTP client
    pub fn http_client(&self) -> &StatsApiHttpClient {
        &self.http_client
    }
}

impl Default for StatsApiClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ScheduleSource for StatsApiClient {
    async fn schedule(&self, start: NaiveDate, end: NaiveDate) -> FetcherResult<Schedule> {
        info!(%start, %end, "Requesting season schedule");

        let params = [
            ("sportId", self.config.sport_id.to_string()),
            ("startDate", start.format(DATE_FORMAT).to_string()),
            ("endDate", end.format(DATE_FORMAT).to_string()),
        ];
        let schedule: Schedule = self
            .http_client
            .get(self.config.schedule_endpoint, &params)
            .await?;

        debug!(dates = schedule.dates.len(), "Schedule received");
        Ok(schedule)
    }
}

#[async_trait]
impl PlayByPlaySource for StatsApiClient {
    async fn play_by_play(&self, game_id: GameId) -> FetcherResult<RawGameRecord> {
        let endpoint = self.config.play_by_play_path(game_id);
        let record: RawGameRecord = self.http_client.get(&endpoint, &[]).await?;

        debug!(
            game_id = %game_id,
            plays = record.all_plays.len(),
            "Play-by-play received"
        );
        Ok(record)
    }
}
