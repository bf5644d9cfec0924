//! Run metrics for the pitch downloader
//!
//! Counters cover retry behavior at both retry layers, game outcomes,
//! emitted rows and time spent in the rate governor.
//!
//! ## Architecture
//!
//! - Uses `metrics` crate for low-overhead metric collection
//! - Optional Prometheus exporter for a scrape endpoint (`--metrics-addr`)
//! - Recording without an installed exporter is a no-op

use metrics::{counter, describe_counter, describe_histogram, histogram, Unit};
use metrics_exporter_prometheus::PrometheusBuilder;
use once_cell::sync::Lazy;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::{debug, error, info};

/// Global metrics registry initialization flag
static METRICS_INITIALIZED: Lazy<Arc<RwLock<bool>>> = Lazy::new(|| Arc::new(RwLock::new(false)));

/// Initialize metrics system with Prometheus exporter
///
/// Idempotent: later calls return `Ok(())` without reinstalling.
///
/// # Arguments
/// * `addr` - Socket address to bind Prometheus scrape endpoint (e.g., "0.0.0.0:9090")
pub async fn init_metrics(addr: SocketAddr) -> Result<(), Box<dyn std::error::Error>> {
    let mut initialized = METRICS_INITIALIZED.write().await;
    if *initialized {
        debug!("Metrics already initialized, skipping");
        return Ok(());
    }

    info!("Initializing metrics system on {}", addr);

    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| format!("Failed to install Prometheus exporter: {e}"))?;

    describe_counter!(
        "fetch_retries_total",
        Unit::Count,
        "Retries scheduled, labelled by retry layer"
    );

    describe_counter!(
        "games_processed_total",
        Unit::Count,
        "Games whose play-by-play was fetched and flattened"
    );

    describe_counter!(
        "games_skipped_total",
        Unit::Count,
        "Games skipped after exhausting the call-level retry budget"
    );

    describe_counter!(
        "pitch_rows_total",
        Unit::Count,
        "Pitch rows collected into the season dataset"
    );

    describe_histogram!(
        "governor_wait_seconds",
        Unit::Seconds,
        "Time spent waiting in the rate governor"
    );

    describe_counter!(
        "season_runs_completed_total",
        Unit::Count,
        "Season runs that persisted their dataset"
    );

    describe_counter!(
        "season_runs_failed_total",
        Unit::Count,
        "Season runs aborted by a fatal error"
    );

    *initialized = true;
    info!("Metrics system initialized successfully on {}", addr);
    Ok(())
}

/// Record a scheduled retry for a retry layer ("transport" or "call")
pub fn record_retry(layer: &'static str) {
    counter!("fetch_retries_total", "layer" => layer).increment(1);
}

/// Record a game fetched and flattened into `rows` pitch rows
pub fn record_game_processed(rows: usize) {
    counter!("games_processed_total").increment(1);
    counter!("pitch_rows_total").increment(rows as u64);
}

/// Record a game skipped after retry exhaustion
pub fn record_game_skipped() {
    counter!("games_skipped_total").increment(1);
}

/// Record time spent waiting for the rate governor
pub fn record_governor_wait(waited: Duration) {
    histogram!("governor_wait_seconds").record(waited.as_secs_f64());

    if waited.as_millis() > 100 {
        debug!(wait_ms = waited.as_millis() as u64, "Rate governor paused the run");
    }
}

/// Season run metrics
pub struct SeasonMetrics {
    window: String,
    start_time: Instant,
}

impl SeasonMetrics {
    /// Start tracking a season run over `window` (e.g. "2023-04-01..2023-10-01")
    pub fn start(window: impl Into<String>) -> Self {
        let window = window.into();

        info!(window = %window, "Season run started");

        Self {
            window,
            start_time: Instant::now(),
        }
    }

    /// Record successful completion
    pub fn record_success(&self, games: usize, skipped: usize, rows: usize) {
        let duration = self.start_time.elapsed();

        counter!("season_runs_completed_total").increment(1);

        info!(
            window = %self.window,
            games,
            skipped,
            rows,
            duration_secs = duration.as_secs(),
            "Season run completed successfully"
        );
    }

    /// Record a run aborted by a fatal error
    pub fn record_failure(&self, error: &str) {
        let duration = self.start_time.elapsed();

        counter!("season_runs_failed_total").increment(1);

        error!(
            window = %self.window,
            error = %error,
            duration_secs = duration.as_secs(),
            "Season run failed"
        );
    }
}

/// Check if metrics system is initialized
pub async fn is_initialized() -> bool {
    *METRICS_INITIALIZED.read().await
}
