//! Progress tracking for season runs.
//!
//! Computes completion percentage, processing rate and a remaining-time
//! estimate for the periodic notice emitted by the rate governor. Instants
//! are passed in by the caller so virtual clocks work unchanged.

use std::time::{Duration, Instant};

/// Progress of a run over a known number of games.
#[derive(Debug, Clone)]
pub struct GameProgress {
    /// Games processed so far (fetched or skipped).
    pub processed: usize,
    /// Games enumerated for the run.
    pub total: usize,
    /// When processing started.
    pub start_time: Instant,
    /// Games per second since `start_time`.
    pub current_rate: f64,
}

impl GameProgress {
    /// Start tracking `total` games at `start_time`.
    pub fn new(total: usize, start_time: Instant) -> Self {
        Self {
            processed: 0,
            total,
            start_time,
            current_rate: 0.0,
        }
    }

    /// Record the processed count as of `now`.
    pub fn update(&mut self, processed: usize, now: Instant) {
        self.processed = processed;
        let elapsed = now.saturating_duration_since(self.start_time).as_secs_f64();
        if elapsed > 0.0 {
            self.current_rate = processed as f64 / elapsed;
        }
    }

    /// Completion percentage (0-100).
    pub fn percentage(&self) -> f64 {
        if self.total == 0 {
            return 100.0;
        }
        (self.processed as f64 / self.total as f64) * 100.0
    }

    /// Remaining time at the current rate, if a rate is known.
    pub fn estimate_remaining(&self) -> Option<Duration> {
        if self.current_rate <= 0.0 {
            return None;
        }
        let remaining = self.total.saturating_sub(self.processed);
        if remaining == 0 {
            return None;
        }
        Some(Duration::from_secs_f64(remaining as f64 / self.current_rate))
    }

    /// Human-readable progress string for logging.
    pub fn format_progress(&self) -> String {
        let mut parts = vec![
            format!("[PROGRESS] Processed {}/{} games", self.processed, self.total),
            format!("- {:.1}% complete", self.percentage()),
        ];

        if self.current_rate > 0.0 {
            parts.push(format!("at {:.1} games/sec", self.current_rate));
        }

        if let Some(remaining) = self.estimate_remaining() {
            parts.push(format!("- ~{} remaining", format_duration(remaining)));
        }

        parts.join(" ")
    }
}

fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    if secs < 60 {
        format!("{secs}s")
    } else if secs < 3600 {
        format!("{}m", secs / 60)
    } else {
        format!("{:.1}h", secs as f64 / 3600.0)
    }
}
