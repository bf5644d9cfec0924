//! Call-level resilience around the play-by-play source
//!
//! Network-class failures are retried with a fixed delay. Once the budget is
//! spent the game is reported as skipped (`Ok(None)`) so the season run
//! continues. Decode failures and other non-network errors are not retried
//! and propagate to the caller.

use std::sync::Arc;
use std::time::Duration;
use tracing::error;

use super::clock::{SharedClock, SystemClock};
use super::retry::RetryPolicy;
use crate::fetcher::retry_formatter::{RetryContext, RetryErrorType};
use crate::fetcher::{FetcherResult, PlayByPlaySource, RawGameRecord};
use crate::GameId;

/// Play-by-play fetcher with call-level retry and skip-on-exhaustion
pub struct ResilientFetcher {
    source: Arc<dyn PlayByPlaySource>,
    policy: RetryPolicy,
    clock: SharedClock,
}

impl ResilientFetcher {
    /// Wrap `source` with the default call-level policy (3 attempts, 2s apart)
    pub fn new(source: Arc<dyn PlayByPlaySource>) -> Self {
        Self {
            source,
            policy: RetryPolicy::call_level(),
            clock: SystemClock::shared(),
        }
    }

    /// Replace the call-level policy
    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Replace the clock used for retry delays
    pub fn with_clock(mut self, clock: SharedClock) -> Self {
        self.clock = clock;
        self
    }

    /// Call-level policy in use
    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Fetch one game's play-by-play.
    ///
    /// Returns `Ok(None)` when every attempt failed with a network-class
    /// error; the failure summary is logged at ERROR.
    pub async fn fetch_game(&self, game_id: GameId) -> FetcherResult<Option<RawGameRecord>> {
        let subject = format!("game {game_id}");
        let source = self.source.as_ref();

        let result = self
            .policy
            .run(self.clock.as_ref(), &subject, |_attempt| {
                source.play_by_play(game_id)
            })
            .await;

        match result {
            Ok(record) => Ok(Some(record)),
            Err(err) if self.policy.is_retryable(&err) => {
                let ctx = RetryContext::new(
                    self.policy.max_attempts(),
                    self.policy.max_attempts(),
                    RetryErrorType::from_fetcher_error(&err),
                    Duration::ZERO,
                    &subject,
                    err.to_string(),
                );
                error!(game_id = %game_id, "{}", ctx.format_failure());
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }
}
