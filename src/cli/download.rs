//! Season download command

use crate::downloader::config::DEFAULT_SEASON;
use crate::downloader::{Backoff, RetryPolicy, RunSummary, SeasonExecutor};
use crate::fetcher::statsapi::StatsApiClient;
use crate::fetcher::statsapi_config::MLB_STATSAPI_CONFIG;
use crate::output::CsvSink;
use crate::season::SeasonWindow;
use chrono::NaiveDate;
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use super::CliError;

/// Parse a four-digit season year
fn parse_season(s: &str) -> Result<i32, String> {
    let year: i32 = s
        .trim()
        .parse()
        .map_err(|_| format!("'{s}' is not a valid year"))?;

    if !(1000..=9999).contains(&year) {
        return Err(format!("season {year} must be a four-digit year"));
    }
    Ok(year)
}

/// Parse a YYYY-MM-DD date
fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|e| format!("invalid date '{s}' (expected YYYY-MM-DD): {e}"))
}

/// Default CSV destination for a season
pub fn default_output_path(season: i32) -> PathBuf {
    PathBuf::from(format!("historical_pitch_data_{season}.csv"))
}

/// MLB pitch downloader CLI
#[derive(Parser, Debug)]
#[command(name = "mlb-pitch-downloader")]
#[command(about = "Download pitch-by-pitch MLB data for a season into a CSV file", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Season year to download
    #[arg(long, default_value_t = DEFAULT_SEASON, value_parser = parse_season)]
    pub season: i32,

    /// Output CSV path (default: historical_pitch_data_{season}.csv)
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// First schedule date, overriding the season's April 1st
    #[arg(long, value_parser = parse_date)]
    pub start_date: Option<NaiveDate>,

    /// Last schedule date, overriding the season's October 1st
    #[arg(long, value_parser = parse_date)]
    pub end_date: Option<NaiveDate>,

    /// Stats API base URL
    #[arg(long, default_value = MLB_STATSAPI_CONFIG.base_url)]
    pub base_url: String,

    /// Attempts per game before it is skipped (range: 1-10)
    #[arg(long, default_value = "3", value_parser = clap::value_parser!(u32).range(1..=10))]
    pub max_retries: u32,

    /// Seconds to wait between attempts for the same game
    #[arg(long, default_value_t = 2)]
    pub retry_delay_secs: u64,

    /// Games per second admitted by the rate governor, also the progress cadence
    #[arg(long, default_value = "50", value_parser = clap::value_parser!(u32).range(1..))]
    pub batch_size: u32,

    /// Serve Prometheus metrics on this address (e.g. 127.0.0.1:9090)
    #[arg(long)]
    pub metrics_addr: Option<SocketAddr>,
}

impl Cli {
    /// Schedule window: the season's fixed window, narrowed by any date overrides
    pub fn window(&self) -> Result<SeasonWindow, CliError> {
        let season = SeasonWindow::for_season(self.season)?;
        let start = self.start_date.unwrap_or(season.start());
        let end = self.end_date.unwrap_or(season.end());

        SeasonWindow::new(start, end).map_err(|e| CliError::InvalidArgument(e.to_string()))
    }

    /// Destination CSV path
    pub fn output_path(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| default_output_path(self.season))
    }

    /// Call-level retry policy from `--max-retries` and `--retry-delay-secs`
    pub fn call_policy(&self) -> RetryPolicy {
        RetryPolicy::call_level()
            .with_max_attempts(self.max_retries)
            .with_backoff(Backoff::Fixed(Duration::from_secs(self.retry_delay_secs)))
    }

    /// Execute the season download
    pub async fn execute(&self) -> Result<RunSummary, CliError> {
        if let Some(addr) = self.metrics_addr {
            crate::metrics::init_metrics(addr)
                .await
                .map_err(|e| CliError::ConfigurationError(e.to_string()))?;
        }

        let window = self.window()?;
        let output = self.output_path();

        info!(
            season = self.season,
            start = %window.start(),
            end = %window.end(),
            output = %output.display(),
            "Downloading pitch data"
        );

        let client = Arc::new(StatsApiClient::new_with_base_url(self.base_url.as_str()));
        let executor = SeasonExecutor::new(client.clone(), client)
            .with_call_policy(self.call_policy())
            .with_batch_size(self.batch_size);

        let summary = executor.run(&window, &mut CsvSink::new(), &output).await?;
        Ok(summary)
    }
}
