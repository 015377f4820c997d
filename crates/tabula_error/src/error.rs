//! Top-level error wrapper types.

use crate::{
    ConfigError, DiscordError, ExportError, HttpError, JsonError, PurgeError, RateLimitError,
};

/// Every error condition a Tabula crate can surface.
///
/// # Examples
///
/// ```
/// use tabula_error::{HttpError, TabulaError};
///
/// let http_err = HttpError::new("Connection failed");
/// let err: TabulaError = http_err.into();
/// assert!(format!("{}", err).contains("HTTP Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum TabulaErrorKind {
    /// Transport failure (connection, timeout, TLS)
    #[from(HttpError)]
    Http(HttpError),
    /// JSON serialization/deserialization error
    #[from(JsonError)]
    Json(JsonError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Rate limit retry budget exhausted
    #[from(RateLimitError)]
    RateLimit(RateLimitError),
    /// REST API error outside the purge walkers
    #[from(DiscordError)]
    Discord(DiscordError),
    /// Container-level purge failure
    #[from(PurgeError)]
    Purge(PurgeError),
    /// Export index could not be read
    #[from(ExportError)]
    Export(ExportError),
}

/// Tabula error with kind discrimination.
///
/// # Examples
///
/// ```
/// use tabula_error::{ConfigError, TabulaResult};
///
/// fn might_fail() -> TabulaResult<()> {
///     Err(ConfigError::invalid("missing field `api`"))?
/// }
///
/// assert!(might_fail().is_err());
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Tabula Error: {}", _0)]
pub struct TabulaError(Box<TabulaErrorKind>);

impl TabulaError {
    /// Create a new error from a kind.
    pub fn new(kind: TabulaErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &TabulaErrorKind {
        &self.0
    }

    /// True when the remote service rejected the credential.
    ///
    /// The CLI uses this to distinguish a bad token from a network outage.
    pub fn is_invalid_credential(&self) -> bool {
        matches!(
            self.kind(),
            TabulaErrorKind::Discord(err) if matches!(err.kind, crate::DiscordErrorKind::InvalidToken)
        )
    }
}

// Generic From implementation for any type that converts to TabulaErrorKind
impl<T> From<T> for TabulaError
where
    T: Into<TabulaErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Tabula operations.
///
/// # Examples
///
/// ```
/// use tabula_error::{HttpError, TabulaResult};
///
/// fn fetch_data() -> TabulaResult<String> {
///     Err(HttpError::new("connection reset"))?
/// }
/// ```
pub type TabulaResult<T> = std::result::Result<T, TabulaError>;
