//! Retry policy shared by the transport and call layers.
//!
//! A [`RetryPolicy`] bundles the attempt budget, the backoff shape and the
//! predicate that decides which [`FetcherError`]s are worth another attempt.
//! The HTTP client and the resilient fetcher each hold one instance; the loop
//! that drives attempts lives here so both layers behave identically.

use std::future::Future;
use std::time::Duration;
use tracing::{info, warn};

use crate::downloader::clock::Clock;
use crate::downloader::config::{
    calculate_backoff, CALL_MAX_ATTEMPTS, CALL_RETRY_DELAY_MS, TRANSPORT_MAX_ATTEMPTS,
};
use crate::fetcher::retry_formatter::{RetryContext, RetryErrorType};
use crate::fetcher::{FetcherError, FetcherResult};

/// Delay shape between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backoff {
    /// Same delay before every retry
    Fixed(Duration),
    /// Transport backoff schedule: 0.3s doubling, capped
    Exponential,
}

impl Backoff {
    /// Delay taken after the `failed_attempt`-th (1-based) attempt failed.
    pub fn delay(&self, failed_attempt: u32) -> Duration {
        match self {
            Backoff::Fixed(delay) => *delay,
            Backoff::Exponential => calculate_backoff(failed_attempt.saturating_sub(1)),
        }
    }
}

/// Predicate selecting retryable errors.
pub type RetryPredicate = fn(&FetcherError) -> bool;

/// Attempt budget, backoff shape and retryable-condition predicate.
#[derive(Clone)]
pub struct RetryPolicy {
    name: &'static str,
    max_attempts: u32,
    backoff: Backoff,
    retry_on: RetryPredicate,
}

impl std::fmt::Debug for RetryPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RetryPolicy")
            .field("name", &self.name)
            .field("max_attempts", &self.max_attempts)
            .field("backoff", &self.backoff)
            .finish_non_exhaustive()
    }
}

impl RetryPolicy {
    /// Create a policy. `max_attempts` is clamped to at least one attempt.
    pub fn new(
        name: &'static str,
        max_attempts: u32,
        backoff: Backoff,
        retry_on: RetryPredicate,
    ) -> Self {
        Self {
            name,
            max_attempts: max_attempts.max(1),
            backoff,
            retry_on,
        }
    }

    /// HTTP-level policy: connection errors and 500/502/504, exponential backoff.
    pub fn transport() -> Self {
        Self::new(
            "transport",
            TRANSPORT_MAX_ATTEMPTS,
            Backoff::Exponential,
            FetcherError::is_transport_retryable,
        )
    }

    /// Call-level policy: any network-class error, fixed 2 second delay.
    pub fn call_level() -> Self {
        Self::new(
            "call",
            CALL_MAX_ATTEMPTS,
            Backoff::Fixed(Duration::from_millis(CALL_RETRY_DELAY_MS)),
            FetcherError::is_network,
        )
    }

    /// Override the attempt budget
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    /// Override the backoff shape
    pub fn with_backoff(mut self, backoff: Backoff) -> Self {
        self.backoff = backoff;
        self
    }

    /// Layer name used in log fields
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Total attempts allowed (first try included)
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Backoff shape
    pub fn backoff(&self) -> Backoff {
        self.backoff
    }

    /// Whether the predicate accepts `err`, regardless of the remaining budget
    pub fn is_retryable(&self, err: &FetcherError) -> bool {
        (self.retry_on)(err)
    }

    /// Run `op` until it succeeds, fails with a non-retryable error, or the
    /// budget is spent. `op` receives the 1-based attempt number.
    ///
    /// Every retryable failure is logged once at WARN. Non-retryable errors are
    /// returned untouched without logging. When the budget is spent the last
    /// error is returned; callers tell exhaustion apart with [`is_retryable`].
    ///
    /// [`is_retryable`]: RetryPolicy::is_retryable
    pub async fn run<T, F, Fut>(
        &self,
        clock: &dyn Clock,
        subject: &str,
        mut op: F,
    ) -> FetcherResult<T>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = FetcherResult<T>>,
    {
        let mut attempt = 1;

        loop {
            match op(attempt).await {
                Ok(value) => {
                    if attempt > 1 {
                        let ctx = RetryContext::new(
                            attempt,
                            self.max_attempts,
                            RetryErrorType::NetworkGeneric,
                            Duration::ZERO,
                            subject,
                            "",
                        );
                        info!(layer = self.name, "{}", ctx.format_success());
                    }
                    return Ok(value);
                }
                Err(err) if self.is_retryable(&err) => {
                    let error_type = RetryErrorType::from_fetcher_error(&err);

                    if attempt >= self.max_attempts {
                        let ctx = RetryContext::new(
                            attempt,
                            self.max_attempts,
                            error_type,
                            Duration::ZERO,
                            subject,
                            err.to_string(),
                        );
                        warn!(layer = self.name, "{}", ctx.format_last_attempt());
                        return Err(err);
                    }

                    let delay = self.backoff.delay(attempt);
                    let ctx = RetryContext::new(
                        attempt,
                        self.max_attempts,
                        error_type,
                        delay,
                        subject,
                        err.to_string(),
                    );
                    warn!(
                        layer = self.name,
                        backoff_ms = delay.as_millis() as u64,
                        "{}",
                        ctx.format_retry()
                    );
                    crate::metrics::record_retry(self.name);
                    clock.sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}
