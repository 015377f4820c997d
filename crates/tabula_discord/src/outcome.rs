//! Tagged outcome of a purge primitive.

use serde::Deserialize;

/// Classified result of one network-calling primitive.
///
/// Walkers switch on this type instead of on raw status codes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    /// The call did what was asked
    Success(T),
    /// Business-normal refusal; move on
    Skip(SkipReason),
    /// The remote side is not ready yet; ask again later
    RetryLater,
    /// Unexpected answer
    HardFail(Failure),
}

impl<T> Outcome<T> {
    /// Transform the success payload.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Self::Success(value) => Outcome::Success(f(value)),
            Self::Skip(reason) => Outcome::Skip(reason),
            Self::RetryLater => Outcome::RetryLater,
            Self::HardFail(failure) => Outcome::HardFail(failure),
        }
    }

    /// True for [`Outcome::Success`].
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

/// Why an item was skipped.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum SkipReason {
    /// HTTP 403
    #[display("no permission")]
    Forbidden,
    /// HTTP 404
    #[display("not found")]
    NotFound,
    /// HTTP 400 with the rendered API error, possibly empty
    #[display("rejected ({})", _0)]
    Rejected(String),
}

/// Unexpected status with the rendered API error.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
#[display("HTTP {} ({})", status, detail)]
pub struct Failure {
    /// HTTP status code
    pub status: u16,
    /// Rendered API error or trimmed body
    pub detail: String,
}

impl Failure {
    /// Failure for `status` with `body` rendered through [`format_api_error`].
    pub fn from_body(status: u16, body: &str) -> Self {
        Self {
            status,
            detail: format_api_error(body),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ApiErrorBody {
    code: i64,
    message: String,
}

/// Render an API error body for humans.
///
/// Yields `code N: message`, `message`, `code N`, or the trimmed raw body
/// when it carries neither field.
pub fn format_api_error(body: &str) -> String {
    let parsed: ApiErrorBody = serde_json::from_str(body).unwrap_or_default();
    match (parsed.code, parsed.message.is_empty()) {
        (0, true) => body.trim().to_string(),
        (0, false) => parsed.message,
        (code, true) => format!("code {}", code),
        (code, false) => format!("code {}: {}", code, parsed.message),
    }
}

/// Classify a delete-style call: 200/204 succeed, 404 means already gone.
pub(crate) fn classify_removal(status: u16, body: &str) -> Outcome<()> {
    match status {
        200 | 204 => Outcome::Success(()),
        404 => Outcome::Skip(SkipReason::NotFound),
        _ => Outcome::HardFail(Failure::from_body(status, body)),
    }
}
