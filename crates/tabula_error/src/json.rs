//! JSON error types.

/// Response body that could not be decoded.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("JSON Error: {} ({}) at line {} in {}", context, message, line, file)]
pub struct JsonError {
    /// What was being decoded (e.g. "search results")
    pub context: String,
    /// The underlying serde message
    pub message: String,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl JsonError {
    /// Create a new JsonError for the given decode context.
    ///
    /// # Examples
    ///
    /// ```
    /// use tabula_error::JsonError;
    ///
    /// let err = JsonError::new("guild list", "expected value at line 1");
    /// assert!(err.to_string().contains("guild list"));
    /// ```
    #[track_caller]
    pub fn new(context: impl Into<String>, message: impl ToString) -> Self {
        let location = std::panic::Location::caller();
        Self {
            context: context.into(),
            message: message.to_string(),
            line: location.line(),
            file: location.file(),
        }
    }
}
