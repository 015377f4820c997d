//! Purge engine error types.

/// Container-level purge failures.
///
/// Each of these abandons one container; the orchestrator logs it and
/// proceeds with the next unit of work.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum PurgeErrorKind {
    /// Search index kept answering "not ready" past the wait budget.
    #[display("Search index not ready after {} attempts", _0)]
    SearchIndexNotReady(u32),

    /// Search endpoint failed in a way that cannot be skipped.
    #[display("Search returned HTTP {}: {}", status, detail)]
    SearchFailed {
        /// HTTP status code
        status: u16,
        /// Rendered API error detail
        detail: String,
    },

    /// Full history page could not be fetched.
    #[display("Fetching messages returned HTTP {}: {}", status, detail)]
    HistoryFailed {
        /// HTTP status code
        status: u16,
        /// Rendered API error detail
        detail: String,
    },
}

/// Purge error with source location tracking.
///
/// # Examples
///
/// ```
/// use tabula_error::{PurgeError, PurgeErrorKind};
///
/// let err = PurgeError::new(PurgeErrorKind::SearchIndexNotReady(40));
/// assert!(err.to_string().contains("40 attempts"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Purge Error: {} at line {} in {}", kind, line, file)]
pub struct PurgeError {
    /// The kind of error that occurred
    pub kind: PurgeErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl PurgeError {
    /// Create a new purge error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: PurgeErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
