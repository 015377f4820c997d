//! REST API error types.

/// REST API error conditions raised by the identity, listing and
/// relationship calls.
///
/// Walkers never produce these for per-item statuses; they classify
/// responses into outcomes instead.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, derive_more::Display)]
pub enum DiscordErrorKind {
    /// Credential rejected (HTTP 401).
    #[display("Invalid token, authentication failed (HTTP 401)")]
    InvalidToken,

    /// A call returned a status its caller cannot interpret.
    #[display("{} returned HTTP {}: {}", context, status, detail)]
    UnexpectedStatus {
        /// Operation being performed (e.g. "fetching guilds")
        context: String,
        /// HTTP status code
        status: u16,
        /// Rendered API error detail
        detail: String,
    },
}

/// REST API error with source location tracking.
///
/// # Examples
///
/// ```
/// use tabula_error::{DiscordError, DiscordErrorKind};
///
/// let err = DiscordError::new(DiscordErrorKind::InvalidToken);
/// assert!(err.to_string().contains("401"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Discord Error: {} at line {} in {}", kind, line, file)]
pub struct DiscordError {
    /// The kind of error that occurred
    pub kind: DiscordErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl DiscordError {
    /// Create a new DiscordError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: DiscordErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Shorthand for [`DiscordErrorKind::UnexpectedStatus`].
    #[track_caller]
    pub fn unexpected_status(
        context: impl Into<String>,
        status: u16,
        detail: impl Into<String>,
    ) -> Self {
        Self::new(DiscordErrorKind::UnexpectedStatus {
            context: context.into(),
            status,
            detail: detail.into(),
        })
    }
}
