//! Download configuration constants

use std::time::Duration;

/// Attempts per game at the call level.
pub const CALL_MAX_ATTEMPTS: u32 = 3;

/// Fixed delay between call-level attempts in milliseconds.
pub const CALL_RETRY_DELAY_MS: u64 = 2000; // 2 seconds

/// Attempts per HTTP request at the transport level.
pub const TRANSPORT_MAX_ATTEMPTS: u32 = 3;

/// Initial transport backoff delay in milliseconds, doubled per retry.
pub const TRANSPORT_BACKOFF_BASE_MS: u64 = 300;

/// Maximum transport backoff delay in milliseconds.
pub const TRANSPORT_MAX_BACKOFF_MS: u64 = 10_000; // 10 seconds

/// Games admitted per governor interval (also the progress notice cadence).
pub const GOVERNOR_BATCH_SIZE: u32 = 50;

/// Governor refill interval in milliseconds.
pub const GOVERNOR_INTERVAL_MS: u64 = 1000; // 1 second

/// Default season when none is given on the command line.
pub const DEFAULT_SEASON: i32 = 2023;

/// Calculate transport backoff delay for a 0-based retry count
pub fn calculate_backoff(retry_count: u32) -> Duration {
    let delay_ms = TRANSPORT_BACKOFF_BASE_MS.saturating_mul(2u64.saturating_pow(retry_count));
    let delay_ms = delay_ms.min(TRANSPORT_MAX_BACKOFF_MS);
    Duration::from_millis(delay_ms)
}
