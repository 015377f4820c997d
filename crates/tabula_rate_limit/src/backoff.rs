//! Wait computation for HTTP 429 responses.
//!
//! The remote service reports how long to back off in up to three places:
//! - `Retry-After` header (seconds, may be fractional)
//! - `X-RateLimit-Reset-After` header (seconds until the bucket resets)
//! - `retry_after` field of the JSON body
//!
//! The longest hint wins. A safety addend and floors are applied on top so a
//! tiny hint never turns into a tight retry loop. Non-finite hints are
//! dropped and the result is capped at `max_wait_secs`.

use crate::{RetryPolicy, RouteFloor};
use reqwest::header::HeaderMap;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument};

/// Body of a 429 response.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct RateLimitBody {
    retry_after: f64,
    global: bool,
}

/// Back-off hints extracted from one 429 response.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RetryHints {
    /// `Retry-After` header
    pub retry_after: Option<f64>,
    /// `X-RateLimit-Reset-After` header
    pub reset_after: Option<f64>,
    /// Positive `retry_after` body field
    pub body_retry_after: Option<f64>,
    /// Body flagged the limit as global rather than per-route
    pub global: bool,
}

impl RetryHints {
    /// Extract hints from response headers and body text.
    ///
    /// Unparseable values are ignored rather than reported.
    pub fn from_response(headers: &HeaderMap, body: &str) -> Self {
        let parsed: RateLimitBody = serde_json::from_str(body).unwrap_or_default();
        Self {
            retry_after: parse_header_f64(headers, "retry-after"),
            reset_after: parse_header_f64(headers, "x-ratelimit-reset-after"),
            body_retry_after: (parsed.retry_after.is_finite() && parsed.retry_after > 0.0)
                .then_some(parsed.retry_after),
            global: parsed.global,
        }
    }
}

impl RetryPolicy {
    /// Seconds to wait before retrying a rate-limited request.
    #[instrument(skip(self, hints), fields(global = hints.global))]
    pub fn wait_secs(&self, method: &str, path: &str, hints: &RetryHints) -> f64 {
        let mut wait = hints.retry_after.unwrap_or(self.default_wait_secs);

        if let Some(reset_after) = hints.reset_after
            && reset_after > wait
        {
            wait = reset_after;
        }
        if let Some(body_wait) = hints.body_retry_after
            && body_wait > wait
        {
            wait = body_wait;
        }

        wait += self.safety_addend_secs;
        wait = wait.max(self.min_wait_secs);

        if let Some(floor) = self
            .route_floors
            .iter()
            .filter(|floor| floor.matches(method, path))
            .map(|floor: &RouteFloor| floor.min_wait_secs)
            .reduce(f64::max)
        {
            wait = wait.max(floor);
        }
        wait = wait.min(self.max_wait_secs);

        debug!(wait, "Computed rate limit wait");
        wait
    }

    /// [`wait_secs`](Self::wait_secs) as a [`Duration`].
    ///
    /// Saturates at [`Duration::MAX`] when the wait does not fit.
    pub fn wait_for(&self, method: &str, path: &str, hints: &RetryHints) -> Duration {
        Duration::try_from_secs_f64(self.wait_secs(method, path, hints).max(0.0))
            .unwrap_or(Duration::MAX)
    }
}

/// Helper to parse a finite float from a header value.
fn parse_header_f64(headers: &HeaderMap, key: &str) -> Option<f64> {
    headers
        .get(key)?
        .to_str()
        .ok()?
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}
