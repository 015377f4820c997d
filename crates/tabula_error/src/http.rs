//! Transport error types.

/// Transport failure (connection refused, timeout, TLS) for one request.
///
/// Transport failures are never retried by the purge walkers; they surface
/// as a container-level error and the run moves on.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("HTTP Error: {} {}: {} at line {} in {}", method, path, message, line, file)]
pub struct HttpError {
    /// HTTP method of the failed request (empty when not request-bound)
    pub method: String,
    /// API path of the failed request (empty when not request-bound)
    pub path: String,
    /// The underlying error message
    pub message: String,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl HttpError {
    /// Create a new HttpError with the given message at the current location.
    ///
    /// # Examples
    ///
    /// ```
    /// use tabula_error::HttpError;
    ///
    /// let err = HttpError::new("Connection refused");
    /// assert!(err.message.contains("Connection refused"));
    /// ```
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        Self::for_request("", "", message)
    }

    /// Create a new HttpError bound to the request that failed.
    ///
    /// # Examples
    ///
    /// ```
    /// use tabula_error::HttpError;
    ///
    /// let err = HttpError::for_request("GET", "/users/@me", "operation timed out");
    /// assert_eq!(err.path, "/users/@me");
    /// ```
    #[track_caller]
    pub fn for_request(
        method: impl Into<String>,
        path: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        let location = std::panic::Location::caller();
        Self {
            method: method.into(),
            path: path.into(),
            message: message.into(),
            line: location.line(),
            file: location.file(),
        }
    }
}
