//! Integration tests for rate limiting functionality

use mlb_pitch_downloader::downloader::{ManualClock, RateGovernor, RateLimiter, SeasonExecutor};
use mlb_pitch_downloader::output::CsvSink;
use mlb_pitch_downloader::season::SeasonWindow;
use std::time::Duration;
use tempfile::TempDir;

use crate::common::{game_with_pitches, GameBehavior, StubPlayByPlay, StubSchedule};

#[test]
fn test_rate_limiter_request_based_initialization() {
    let limiter = RateLimiter::request_based(50, Duration::from_secs(1), ManualClock::shared());
    assert_eq!(limiter.max_requests(), 50);
    assert_eq!(limiter.window(), Duration::from_secs(1));
    assert_eq!(limiter.available(), 50);
}

#[tokio::test]
async fn test_rate_limiter_request_based_acquire() {
    let clock = ManualClock::shared();
    let limiter = RateLimiter::request_based(10, Duration::from_secs(1), clock.clone());

    limiter.acquire(1).await.unwrap();
    limiter.acquire(1).await.unwrap();
    limiter.acquire(1).await.unwrap();

    assert_eq!(limiter.available(), 7);
    assert!(clock.sleeps().is_empty());
}

#[tokio::test]
async fn test_rate_limiter_multiple_permits_wait_for_deficit() {
    let clock = ManualClock::shared();
    let limiter = RateLimiter::request_based(10, Duration::from_secs(1), clock.clone());

    limiter.acquire(8).await.unwrap();
    let waited = limiter.acquire(5).await.unwrap();

    // 2 tokens left, 3 missing at 10 per second
    assert_eq!(waited, Duration::from_millis(300));
    assert_eq!(limiter.available(), 0);
}

#[tokio::test]
async fn test_governor_first_batch_is_free() {
    let clock = ManualClock::shared();
    let governor = RateGovernor::with_defaults(clock.clone());

    for processed in 1..=50 {
        assert_eq!(governor.throttle(processed, 200).await.unwrap(), Duration::ZERO);
    }
    assert!(clock.sleeps().is_empty());

    assert_eq!(
        governor.throttle(51, 200).await.unwrap(),
        Duration::from_millis(20)
    );
}

#[tokio::test]
async fn test_governor_refills_during_slow_games() {
    let clock = ManualClock::shared();
    let governor = RateGovernor::with_defaults(clock.clone());

    for processed in 1..=50 {
        governor.throttle(processed, 100).await.unwrap();
    }
    // Fetching took a full second of wall time: the bucket is full again.
    clock.advance(Duration::from_secs(1));

    for processed in 51..=100 {
        governor.throttle(processed, 100).await.unwrap();
    }
    assert!(clock.sleeps().is_empty());
}

#[tokio::test]
async fn test_season_run_never_exceeds_batch_per_interval() {
    let temp_dir = TempDir::new().unwrap();
    let clock = ManualClock::shared();

    let ids: Vec<u64> = (1..=120).collect();
    let games = ids
        .iter()
        .map(|id| (*id, GameBehavior::Record(game_with_pitches(1))))
        .collect();

    let summary = SeasonExecutor::new(StubSchedule::single_day(ids), StubPlayByPlay::new(games))
        .with_clock(clock.clone())
        .run(
            &SeasonWindow::for_season(2023).unwrap(),
            &mut CsvSink::new(),
            &temp_dir.path().join("season.csv"),
        )
        .await
        .unwrap();

    assert_eq!(summary.rows_written, 120);

    // 50 free tokens, then one token every 20ms for the remaining 70 games.
    let sleeps = clock.sleeps();
    assert_eq!(sleeps.len(), 70);
    assert!(sleeps.iter().all(|d| *d == Duration::from_millis(20)));
    assert_eq!(clock.total_slept(), Duration::from_millis(1400));
}

#[tokio::test]
async fn test_custom_batch_size() {
    let temp_dir = TempDir::new().unwrap();
    let clock = ManualClock::shared();

    let ids: Vec<u64> = (1..=12).collect();
    let games = ids
        .iter()
        .map(|id| (*id, GameBehavior::Record(game_with_pitches(1))))
        .collect();

    SeasonExecutor::new(StubSchedule::single_day(ids), StubPlayByPlay::new(games))
        .with_batch_size(10)
        .with_clock(clock.clone())
        .run(
            &SeasonWindow::for_season(2023).unwrap(),
            &mut CsvSink::new(),
            &temp_dir.path().join("season.csv"),
        )
        .await
        .unwrap();

    assert_eq!(clock.sleeps(), vec![Duration::from_millis(100); 2]);
}
