//! Tests for courtesy pauses.

use std::time::Duration;
use strum::IntoEnumIterator;
use tabula_rate_limit::{Pace, PacingConfig};
use tokio::time::Instant;

#[tokio::test(start_paused = true)]
async fn test_pause_sleeps_for_configured_delay() {
    let pacing = PacingConfig::default();
    let start = Instant::now();

    pacing.pause(Pace::ErrorBackoff).await;

    assert_eq!(start.elapsed(), Duration::from_millis(1250));
}

#[tokio::test(start_paused = true)]
async fn test_zero_pacing_never_sleeps() {
    let pacing = PacingConfig::none();
    let start = Instant::now();

    for pace in Pace::iter() {
        pacing.pause(pace).await;
    }

    assert_eq!(start.elapsed(), Duration::ZERO);
}

#[test]
fn test_pace_names() {
    assert_eq!(Pace::ThreadDiscovery.to_string(), "thread_discovery");
    assert_eq!(Pace::ErrorBackoff.to_string(), "error_backoff");
}
