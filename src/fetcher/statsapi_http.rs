//! Stats API HTTP client
//!
//! Wraps a shared `reqwest::Client` with the transport retry layer:
//! - Connection errors and HTTP 500/502/504 are retried with exponential backoff
//! - Other 4xx/5xx statuses are returned immediately as typed errors
//! - Successful bodies are read in full, then decoded with serde

use reqwest::Client;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::debug;

use crate::downloader::clock::{SharedClock, SystemClock};
use crate::downloader::retry::RetryPolicy;
use crate::fetcher::retry_formatter::{classify_transport_error, RetryErrorType};
use crate::fetcher::{FetcherError, FetcherResult};

/// HTTP client for Stats API endpoints
pub struct StatsApiHttpClient {
    client: Arc<Client>,
    base_url: String,
    retry_policy: RetryPolicy,
    clock: SharedClock,
}

impl StatsApiHttpClient {
    /// Create new HTTP client with the default transport retry policy
    ///
    /// # Arguments
    /// * `client` - Shared HTTP client (Arc for cheap cloning)
    /// * `base_url` - Base URL for API endpoints (e.g., "<https://statsapi.mlb.com>")
    pub fn new(client: Arc<Client>, base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            retry_policy: RetryPolicy::transport(),
            clock: SystemClock::shared(),
        }
    }

    /// Replace the transport retry policy
    pub fn with_retry_policy(mut self, retry_policy: RetryPolicy) -> Self {
        self.retry_policy = retry_policy;
        self
    }

    /// Replace the clock used for backoff sleeps
    pub fn with_clock(mut self, clock: SharedClock) -> Self {
        self.clock = clock;
        self
    }

    /// Base URL without trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Transport retry policy in use
    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry_policy
    }

    /// Execute GET request with generic deserialization
    ///
    /// # Arguments
    /// * `endpoint` - API endpoint path (e.g., "/api/v1/schedule")
    /// * `params` - Query parameters as key-value pairs
    ///
    /// # Errors
    /// Returns the last [`FetcherError`] once the transport retry budget is
    /// spent, or the first non-retryable one.
    pub async fn get<T>(&self, endpoint: &str, params: &[(&str, String)]) -> FetcherResult<T>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, endpoint);
        debug!("Making GET request to: {} with {} params", url, params.len());

        self.retry_policy
            .run(self.clock.as_ref(), endpoint, |attempt| {
                self.send_once(&url, params, attempt)
            })
            .await
    }

    async fn send_once<T>(
        &self,
        url: &str,
        params: &[(&str, String)],
        attempt: u32,
    ) -> FetcherResult<T>
    where
        T: DeserializeOwned,
    {
        let response = self
            .client
            .get(url)
            .query(params)
            .send()
            .await
            .map_err(|e| map_send_error(&e))?;

        let status = response.status();

        if status.is_server_error() {
            return Err(FetcherError::ServerError {
                status: status.as_u16(),
            });
        }

        if status.is_client_error() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(FetcherError::ClientError {
                status: status.as_u16(),
                message: error_text,
            });
        }

        // Body read failures (reset, request timeout) are network failures.
        // Only a complete body that fails to deserialize is a parse error.
        let body = response.bytes().await.map_err(|e| map_send_error(&e))?;
        let data = serde_json::from_slice::<T>(&body)
            .map_err(|e| FetcherError::Parse(format!("Failed to deserialize response: {e}")))?;

        debug!("Request succeeded on attempt {}", attempt);
        Ok(data)
    }
}

fn map_send_error(err: &reqwest::Error) -> FetcherError {
    let detail = match classify_transport_error(err) {
        RetryErrorType::NetworkTimeout => "request timed out",
        RetryErrorType::NetworkOffline => "failed to connect",
        _ => "request failed",
    };
    FetcherError::Network(format!("{detail}: {err}"))
}
