//! Season download orchestration and rate limiting
//!
//! This module provides the execution engine that turns a season window into a
//! persisted pitch dataset, with call-level retry and rate limiting.
//!
//! # Overview
//!
//! 1. **Enumeration**: List the window's games via [`crate::season`]
//! 2. **Fetching**: Retrieve each game through [`fetch::ResilientFetcher`]
//! 3. **Rate Limiting**: Pace the run via [`rate_limit::RateGovernor`]
//! 4. **Persistence**: Write the dataset once via [`crate::output::TabularSink`]
//!
//! # Quick Start
//!
//! ```no_run
//! use std::path::Path;
//! use std::sync::Arc;
//! use mlb_pitch_downloader::downloader::SeasonExecutor;
//! use mlb_pitch_downloader::fetcher::statsapi::StatsApiClient;
//! use mlb_pitch_downloader::output::CsvSink;
//! use mlb_pitch_downloader::season::SeasonWindow;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Arc::new(StatsApiClient::new());
//! let executor = SeasonExecutor::new(client.clone(), client);
//!
//! let window = SeasonWindow::for_season(2023)?;
//! let summary = executor
//!     .run(&window, &mut CsvSink::new(), Path::new("./pitches_2023.csv"))
//!     .await?;
//! println!("{} rows, {} games skipped", summary.rows_written, summary.skipped.len());
//! # Ok(())
//! # }
//! ```
//!
//! # Components
//!
//! - [`executor`] - Season pipeline driver and run summary
//! - [`fetch`] - Call-level retry with skip-on-exhaustion
//! - [`retry`] - Retry policies shared by the transport and call layers
//! - [`rate_limit`] - Token bucket and rate governor
//! - [`progress`] - Progress notice formatting
//! - [`clock`] - Injectable time source
//! - [`config`] - Configuration constants and backoff calculation
//!
//! # Error Handling
//!
//! All operations return `Result<T, DownloadError>`:
//! - Schedule failures abort the run before any game is fetched
//! - Network-class game failures are retried, then the game is skipped
//! - Other game failures abort the run
//! - Output failures surface after all games were fetched

pub mod clock;
pub mod config;
pub mod executor;
pub mod fetch;
pub mod progress;
pub mod rate_limit;
pub mod retry;

pub use clock::{Clock, ManualClock, SharedClock, SystemClock};
pub use executor::{RunSummary, SeasonExecutor, SeasonRun};
pub use fetch::ResilientFetcher;
pub use rate_limit::{RateGovernor, RateLimitError, RateLimiter};
pub use retry::{Backoff, RetryPolicy};

use crate::fetcher::FetcherError;
use crate::output::OutputError;
use crate::GameId;

/// Download errors
#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    /// Game enumeration failed
    #[error("schedule error: {0}")]
    Schedule(#[source] FetcherError),

    /// A game failed with an error that is not retried
    #[error("failed to fetch game {game_id}: {source}")]
    Fetch {
        /// Game being fetched
        game_id: GameId,
        /// Underlying fetcher error
        source: FetcherError,
    },

    /// Output error
    #[error("output error: {0}")]
    Output(#[from] OutputError),

    /// Rate limit error
    #[error("rate limit error: {0}")]
    RateLimit(#[from] RateLimitError),
}
