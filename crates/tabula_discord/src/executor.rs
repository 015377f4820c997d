//! Request execution with transparent HTTP 429 retry.

use crate::Transport;
use reqwest::Method;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tabula_error::{JsonError, RateLimitError, TabulaResult};
use tabula_rate_limit::{RetryHints, RetryPolicy};
use tracing::{debug, instrument, warn};

/// Status and body of a call that was not rate limited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body as text
    pub body: String,
}

impl ApiResponse {
    /// True for any 2xx status.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Decode the body as JSON.
    pub fn json<T: DeserializeOwned>(&self, context: &str) -> TabulaResult<T> {
        serde_json::from_str(&self.body).map_err(|e| JsonError::new(context, e).into())
    }
}

/// Issues calls through a [`Transport`] and absorbs rate limiting.
///
/// This is the only place that sleeps because of a 429. Any other status is
/// handed back untouched; classifying it is the caller's business.
#[derive(Clone)]
pub struct RequestExecutor {
    transport: Arc<dyn Transport>,
    policy: RetryPolicy,
}

impl std::fmt::Debug for RequestExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestExecutor")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl RequestExecutor {
    /// Create an executor over `transport`.
    pub fn new(transport: Arc<dyn Transport>, policy: RetryPolicy) -> Self {
        Self { transport, policy }
    }

    /// Retry policy in effect.
    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Execute one logical request.
    ///
    /// # Errors
    ///
    /// Returns a transport error unchanged, or a [`RateLimitError`] once the
    /// initial attempt and every retry have been answered with 429.
    #[instrument(skip(self, body), fields(method = %method))]
    pub async fn execute(
        &self,
        method: Method,
        path: &str,
        body: Option<&serde_json::Value>,
    ) -> TabulaResult<ApiResponse> {
        let max_attempts = self.policy.max_attempts();

        for attempt in 1..=max_attempts {
            let response = self.transport.send(method.clone(), path, body).await?;

            if response.status != 429 {
                debug!(status = response.status, attempt, "Request complete");
                return Ok(ApiResponse {
                    status: response.status,
                    body: response.body,
                });
            }

            if attempt == max_attempts {
                break;
            }

            let hints = RetryHints::from_response(&response.headers, &response.body);
            let wait = self.policy.wait_for(method.as_str(), path, &hints);
            warn!(
                attempt,
                max_attempts,
                global = hints.global,
                wait_secs = wait.as_secs_f64(),
                "Rate limited, backing off"
            );
            tokio::time::sleep(wait).await;
        }

        Err(RateLimitError::new(method.as_str(), path, max_attempts).into())
    }
}
