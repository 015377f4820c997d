//! Rate limit error types.

/// A request stayed rate limited (HTTP 429) through the whole retry budget.
///
/// # Examples
///
/// ```
/// use tabula_error::RateLimitError;
///
/// let err = RateLimitError::new("GET", "/users/@me/guilds", 6);
/// assert!(err.to_string().contains("6 attempts"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display(
    "Rate Limit Error: {} {} still rate limited after {} attempts at line {} in {}",
    method,
    path,
    attempts,
    line,
    file
)]
pub struct RateLimitError {
    /// HTTP method of the abandoned request
    pub method: String,
    /// API path of the abandoned request
    pub path: String,
    /// Number of calls made before giving up
    pub attempts: u32,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl RateLimitError {
    /// Create a new rate limit error with automatic location tracking.
    #[track_caller]
    pub fn new(method: impl Into<String>, path: impl Into<String>, attempts: u32) -> Self {
        let location = std::panic::Location::caller();
        Self {
            method: method.into(),
            path: path.into(),
            attempts,
            line: location.line(),
            file: location.file(),
        }
    }
}
