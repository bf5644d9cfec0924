//! Retry message formatting.
//!
//! Both retry layers log through [`RetryContext`] so attempt counters, wait
//! times and final failure summaries read the same whichever layer emits them.

use reqwest::Error as ReqwestError;
use std::time::Duration;

use super::FetcherError;

/// Classification of retry errors for user messaging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryErrorType {
    /// Network timeout
    NetworkTimeout,
    /// Connection refused, DNS failure, or other offline scenarios
    NetworkOffline,
    /// HTTP 429
    RateLimit,
    /// HTTP 5xx server error
    ServerError(u16),
    /// HTTP 404, usually an unknown or cancelled game
    NotFound,
    /// Other client errors (4xx)
    ClientError(u16),
    /// Response could not be decoded
    Malformed,
    /// Generic fallback when no better classification fits
    NetworkGeneric,
}

impl RetryErrorType {
    /// User-friendly description string used inside retry log messages.
    pub fn description(&self) -> &'static str {
        match self {
            Self::NetworkTimeout => "network timeout",
            Self::NetworkOffline => "connection failed",
            Self::RateLimit => "rate limit exceeded",
            Self::ServerError(code) => match code {
                500 => "internal server error",
                502 => "bad gateway",
                503 => "service unavailable",
                504 => "gateway timeout",
                _ => "server error",
            },
            Self::NotFound => "game not found",
            Self::ClientError(_) => "client error",
            Self::Malformed => "malformed response",
            Self::NetworkGeneric => "network error",
        }
    }

    /// Suggested remediation presented after final failures.
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::NetworkTimeout => "Check your network connection and firewall settings",
            Self::NetworkOffline => "Verify internet connectivity and DNS resolution",
            Self::RateLimit => "Lower --batch-size to slow the request rate",
            Self::ServerError(_) => "The Stats API may be degraded, re-run the season later",
            Self::NotFound => "The game may have been cancelled or never played",
            Self::ClientError(_) => "Review --base-url and the season date range",
            Self::Malformed => "The response format may have changed upstream",
            Self::NetworkGeneric => "Check network connectivity and try again",
        }
    }

    /// Classify an error that already crossed the fetcher boundary.
    pub fn from_fetcher_error(err: &FetcherError) -> Self {
        match err {
            FetcherError::Network(message) => {
                if message.contains("timed out") || message.contains("timeout") {
                    Self::NetworkTimeout
                } else if message.contains("connect") {
                    Self::NetworkOffline
                } else {
                    Self::NetworkGeneric
                }
            }
            FetcherError::ServerError { status } => Self::ServerError(*status),
            FetcherError::ClientError { status: 404, .. } => Self::NotFound,
            FetcherError::ClientError { status: 429, .. } => Self::RateLimit,
            FetcherError::ClientError { status, .. } => Self::ClientError(*status),
            FetcherError::Parse(_) => Self::Malformed,
            FetcherError::InvalidRequest(_) => Self::ClientError(400),
        }
    }
}

/// Context for formatting retry messages.
#[derive(Debug, Clone)]
pub struct RetryContext {
    /// Current attempt number (1-based)
    pub attempt: u32,
    /// Maximum number of attempts configured
    pub max_attempts: u32,
    /// Type of error that triggered retry
    pub error_type: RetryErrorType,
    /// Delay before the next attempt
    pub backoff_duration: Duration,
    /// What is being fetched (e.g., "game 717465" or an endpoint)
    pub subject: String,
    /// Original error message for details
    pub error_message: String,
}

impl RetryContext {
    /// Build a context from a failed attempt.
    pub fn new(
        attempt: u32,
        max_attempts: u32,
        error_type: RetryErrorType,
        backoff_duration: Duration,
        subject: impl Into<String>,
        error_message: impl Into<String>,
    ) -> Self {
        Self {
            attempt,
            max_attempts,
            error_type,
            backoff_duration,
            subject: subject.into(),
            error_message: error_message.into(),
        }
    }

    /// Failed attempt that will be retried after the backoff.
    pub fn format_retry(&self) -> String {
        format!(
            "Attempt {}/{} failed ({}) for {} - retrying in {:.1} seconds: {}",
            self.attempt,
            self.max_attempts,
            self.error_type.description(),
            self.subject_display(),
            self.backoff_duration.as_secs_f64(),
            self.error_message
        )
    }

    /// Failed attempt with no attempts left.
    pub fn format_last_attempt(&self) -> String {
        format!(
            "Attempt {}/{} failed ({}) for {} - no attempts left: {}",
            self.attempt,
            self.max_attempts,
            self.error_type.description(),
            self.subject_display(),
            self.error_message
        )
    }

    /// A retried attempt eventually succeeded.
    pub fn format_success(&self) -> String {
        format!(
            "Retry attempt {}/{} succeeded for {}",
            self.attempt,
            self.max_attempts,
            self.subject_display()
        )
    }

    /// Final failure summary with actionable suggestions.
    pub fn format_failure(&self) -> String {
        let mut lines = Vec::new();
        lines.push(format!(
            "[FAILED] Skipping {} after {} attempts",
            self.subject_display(),
            self.max_attempts
        ));
        lines.push(format!("  Last error: {}", self.error_message));
        lines.push("  Suggestions:".to_string());

        for suggestion in self.format_suggestions() {
            lines.push(format!("    - {suggestion}"));
        }

        lines.join("\n")
    }

    /// Derive suggestions tailored to the current retry context.
    pub fn format_suggestions(&self) -> Vec<String> {
        vec![
            self.error_type.suggestion().to_string(),
            format!(
                "Try increasing --max-retries (current: {})",
                self.max_attempts
            ),
        ]
    }

    fn subject_display(&self) -> &str {
        if self.subject.is_empty() {
            "unknown"
        } else {
            &self.subject
        }
    }
}

/// Classify a reqwest failure that happened before a status was available
/// or while the body was being read.
pub fn classify_transport_error(err: &ReqwestError) -> RetryErrorType {
    if err.is_timeout() {
        RetryErrorType::NetworkTimeout
    } else if err.is_connect() {
        RetryErrorType::NetworkOffline
    } else {
        RetryErrorType::NetworkGeneric
    }
}
