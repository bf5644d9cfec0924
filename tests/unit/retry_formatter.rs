use std::time::Duration;

use mlb_pitch_downloader::fetcher::retry_formatter::{
    classify_transport_error, RetryContext, RetryErrorType,
};
use mlb_pitch_downloader::fetcher::FetcherError;

fn sample_context(error_type: RetryErrorType) -> RetryContext {
    RetryContext::new(
        2,
        3,
        error_type,
        Duration::from_secs(2),
        "game 717465",
        "request timed out",
    )
}

#[test]
fn format_retry_captures_attempt_and_wait() {
    let ctx = sample_context(RetryErrorType::NetworkTimeout);
    let message = ctx.format_retry();
    assert!(message.contains("Attempt 2/3 failed"));
    assert!(message.contains("network timeout"));
    assert!(message.contains("2.0 seconds"));
    assert!(message.contains("game 717465"));
}

#[test]
fn format_success_includes_subject() {
    let ctx = sample_context(RetryErrorType::NetworkTimeout);
    let message = ctx.format_success();
    assert!(message.contains("Retry attempt 2/3 succeeded"));
    assert!(message.contains("game 717465"));
}

#[test]
fn format_failure_lists_suggestions() {
    let ctx = sample_context(RetryErrorType::ServerError(502));
    let output = ctx.format_failure();
    assert!(output.contains("[FAILED] Skipping game 717465 after 3 attempts"));
    assert!(output.contains("Last error: request timed out"));
    assert!(output.contains("re-run the season later"));
    assert!(output.contains("--max-retries (current: 3)"));
}

#[test]
fn empty_subject_is_reported_as_unknown() {
    let ctx = RetryContext::new(
        1,
        3,
        RetryErrorType::NetworkGeneric,
        Duration::from_millis(300),
        "",
        "boom",
    );
    assert!(ctx.format_retry().contains("for unknown"));
}

#[tokio::test]
async fn refused_connection_classified_offline() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = reqwest::Client::new()
        .get(format!("http://{addr}/api/v1/schedule"))
        .send()
        .await
        .unwrap_err();

    assert_eq!(classify_transport_error(&err), RetryErrorType::NetworkOffline);
}

#[test]
fn server_error_descriptions() {
    assert_eq!(RetryErrorType::ServerError(502).description(), "bad gateway");
    assert_eq!(RetryErrorType::NotFound.description(), "game not found");
}

#[test]
fn fetcher_errors_map_to_error_types() {
    let cases = [
        (
            FetcherError::Network("request timed out: deadline".to_string()),
            RetryErrorType::NetworkTimeout,
        ),
        (
            FetcherError::Network("failed to connect: refused".to_string()),
            RetryErrorType::NetworkOffline,
        ),
        (
            FetcherError::ServerError { status: 504 },
            RetryErrorType::ServerError(504),
        ),
        (
            FetcherError::ClientError {
                status: 404,
                message: String::new(),
            },
            RetryErrorType::NotFound,
        ),
        (
            FetcherError::Parse("eof".to_string()),
            RetryErrorType::Malformed,
        ),
    ];

    for (err, expected) in cases {
        assert_eq!(RetryErrorType::from_fetcher_error(&err), expected, "{err}");
    }
}
