//! Stats API fetchers
//!
//! The schedule and play-by-play endpoints are modelled as two capability
//! traits, [`ScheduleSource`] and [`PlayByPlaySource`], so the pipeline can run
//! against [`statsapi::StatsApiClient`] in production and stubs in tests.

use crate::GameId;
use async_trait::async_trait;
use chrono::NaiveDate;

pub mod retry_formatter;
pub mod shared_resources;
pub mod statsapi;
pub mod statsapi_config;
pub mod statsapi_http;
pub mod statsapi_types;

pub use statsapi_types::{RawGameRecord, Schedule};

/// Fetcher errors
#[derive(Debug, thiserror::Error)]
pub enum FetcherError {
    /// Connection-level failure (refused, reset, DNS, timeout)
    #[error("network error: {0}")]
    Network(String),

    /// HTTP 5xx response
    #[error("server error: HTTP {status}")]
    ServerError {
        /// HTTP status code
        status: u16,
    },

    /// HTTP 4xx response
    #[error("client error: HTTP {status}: {message}")]
    ClientError {
        /// HTTP status code
        status: u16,
        /// Response body or reason
        message: String,
    },

    /// Response body could not be decoded into the expected structure
    #[error("parse error: {0}")]
    Parse(String),

    /// Request could not be built from the given arguments
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl FetcherError {
    /// Whether the error belongs to the network class (connection or HTTP status).
    ///
    /// Call-level retry only recovers these; everything else is a defect in the
    /// response or the request and propagates.
    pub fn is_network(&self) -> bool {
        matches!(
            self,
            FetcherError::Network(_)
                | FetcherError::ServerError { .. }
                | FetcherError::ClientError { .. }
        )
    }

    /// Whether the transport layer retries the error on its own:
    /// connection failures and HTTP 500, 502 and 504.
    pub fn is_transport_retryable(&self) -> bool {
        match self {
            FetcherError::Network(_) => true,
            FetcherError::ServerError { status } => matches!(status, 500 | 502 | 504),
            _ => false,
        }
    }

    /// HTTP status carried by the error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            FetcherError::ServerError { status } | FetcherError::ClientError { status, .. } => {
                Some(*status)
            }
            _ => None,
        }
    }
}

/// Result type for fetcher operations
pub type FetcherResult<T> = Result<T, FetcherError>;

/// Source of the season schedule
#[async_trait]
pub trait ScheduleSource: Send + Sync {
    /// Fetch every scheduled game between `start` and `end` (inclusive)
    ///
    /// Dates and the games within each date come back in provider order.
    async fn schedule(&self, start: NaiveDate, end: NaiveDate) -> FetcherResult<Schedule>;
}

/// Source of per-game play-by-play data
#[async_trait]
pub trait PlayByPlaySource: Send + Sync {
    /// Fetch the raw nested play-by-play record of one game
    async fn play_by_play(&self, game_id: GameId) -> FetcherResult<RawGameRecord>;
}
