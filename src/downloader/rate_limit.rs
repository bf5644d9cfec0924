//! Rate limiting
//!
//! [`RateLimiter`] is a token bucket refilled continuously at
//! `max_requests` per `window`. [`RateGovernor`] drives it once per processed
//! game and emits the periodic progress notice.
//!
//! All waiting goes through the injected [`Clock`](super::clock::Clock), so
//! pacing is observable in tests without real delays.

use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::{debug, info};

use super::clock::SharedClock;
use super::config::{GOVERNOR_BATCH_SIZE, GOVERNOR_INTERVAL_MS};
use super::progress::GameProgress;

/// Token bucket limiter.
///
/// Token balances are kept in integer units of `token * nanosecond`
/// (one token = `window` ns worth of units) so refills never drift.
pub struct RateLimiter {
    max_requests: u32,
    window: Duration,
    clock: SharedClock,
    state: Mutex<BucketState>,
}

struct BucketState {
    units: u128,
    last_refill: Instant,
}

impl RateLimiter {
    /// Create a request-based limiter that starts full
    ///
    /// # Arguments
    /// * `max_requests` - Maximum requests per window (bucket capacity)
    /// * `window` - Time window in which the bucket refills completely
    /// * `clock` - Time source for refills and waits
    pub fn request_based(max_requests: u32, window: Duration, clock: SharedClock) -> Self {
        let max_requests = max_requests.max(1);
        let window = window.max(Duration::from_nanos(1));
        let now = clock.now();
        Self {
            max_requests,
            window,
            clock,
            state: Mutex::new(BucketState {
                units: max_requests as u128 * window.as_nanos(),
                last_refill: now,
            }),
        }
    }

    /// Bucket capacity
    pub fn max_requests(&self) -> u32 {
        self.max_requests
    }

    /// Refill window
    pub fn window(&self) -> Duration {
        self.window
    }

    /// Whole tokens currently available
    pub fn available(&self) -> u32 {
        let mut state = self.lock_state();
        self.refill(&mut state);
        (state.units / self.window.as_nanos()) as u32
    }

    /// Take `permits` tokens, sleeping until they are available
    ///
    /// Returns the total time spent waiting.
    pub async fn acquire(&self, permits: u32) -> Result<Duration, RateLimitError> {
        if permits > self.max_requests {
            return Err(RateLimitError::ExceedsCapacity {
                requested: permits,
                capacity: self.max_requests,
            });
        }

        let needed = permits as u128 * self.window.as_nanos();
        let mut waited = Duration::ZERO;

        loop {
            let wait = {
                let mut state = self.lock_state();
                self.refill(&mut state);
                if state.units >= needed {
                    state.units -= needed;
                    return Ok(waited);
                }
                let deficit = needed - state.units;
                let rate = self.max_requests as u128;
                let wait_ns = deficit.div_ceil(rate);
                Duration::from_nanos(wait_ns.min(u64::MAX as u128) as u64)
            };

            debug!(wait_ms = wait.as_millis() as u64, "Rate limiter waiting for tokens");
            self.clock.sleep(wait).await;
            waited += wait;
        }
    }

    fn refill(&self, state: &mut BucketState) {
        let now = self.clock.now();
        let elapsed = now.saturating_duration_since(state.last_refill).as_nanos();
        let capacity = self.max_requests as u128 * self.window.as_nanos();
        state.units = (state.units + elapsed * self.max_requests as u128).min(capacity);
        state.last_refill = now;
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, BucketState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Pipeline-level throttle invoked after every processed game.
pub struct RateGovernor {
    limiter: RateLimiter,
    progress_every: u32,
    progress: Mutex<Option<GameProgress>>,
}

impl RateGovernor {
    /// Create a governor admitting `batch_size` games per `interval`.
    ///
    /// A progress notice is logged every `batch_size` games.
    pub fn new(batch_size: u32, interval: Duration, clock: SharedClock) -> Self {
        let limiter = RateLimiter::request_based(batch_size, interval, clock);
        Self {
            progress_every: limiter.max_requests(),
            limiter,
            progress: Mutex::new(None),
        }
    }

    /// 50 games per second, progress every 50 games.
    pub fn with_defaults(clock: SharedClock) -> Self {
        Self::new(
            GOVERNOR_BATCH_SIZE,
            Duration::from_millis(GOVERNOR_INTERVAL_MS),
            clock,
        )
    }

    /// Games between progress notices
    pub fn progress_every(&self) -> u32 {
        self.progress_every
    }

    /// Underlying limiter
    pub fn limiter(&self) -> &RateLimiter {
        &self.limiter
    }

    /// Record that `processed` of `total` games are done and pace the run.
    ///
    /// Returns the time spent waiting for the limiter.
    pub async fn throttle(&self, processed: usize, total: usize) -> Result<Duration, RateLimitError> {
        let now = self.limiter.clock.now();
        let notice = {
            let mut progress = self.progress.lock().unwrap_or_else(|e| e.into_inner());
            let progress = progress.get_or_insert_with(|| GameProgress::new(total, now));
            progress.update(processed, now);
            (processed > 0 && processed % self.progress_every as usize == 0)
                .then(|| progress.format_progress())
        };
        if let Some(message) = notice {
            info!(processed, total, "{}", message);
        }

        self.limiter.acquire(1).await
    }
}

/// Rate limiter errors
#[derive(Debug, thiserror::Error)]
pub enum RateLimitError {
    /// More permits requested than the bucket can ever hold
    #[error("requested {requested} permits but bucket capacity is {capacity}")]
    ExceedsCapacity {
        /// Permits requested
        requested: u32,
        /// Bucket capacity
        capacity: u32,
    },
}
