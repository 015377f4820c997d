//! Configuration error types.

/// Stage at which loading the layered configuration failed.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum ConfigErrorKind {
    /// A layer could not be read or merged.
    #[display("cannot read {}: {}", origin, detail)]
    Unreadable {
        /// File path, or a description of the layer stack
        origin: String,
        /// Underlying loader message
        detail: String,
    },

    /// The merged layers do not deserialize into the settings structure.
    #[display("invalid settings: {}", _0)]
    Invalid(String),
}

/// Configuration error with source location tracking.
///
/// # Examples
///
/// ```
/// use tabula_error::{ConfigError, ConfigErrorKind};
///
/// let err = ConfigError::new(ConfigErrorKind::Invalid("pacing.delete_ms: expected u64".into()));
/// assert!(err.to_string().starts_with("Configuration Error: invalid settings"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Configuration Error: {} at line {} in {}", kind, line, file)]
pub struct ConfigError {
    /// What went wrong
    pub kind: ConfigErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl ConfigError {
    /// Create a configuration error at the caller's location.
    #[track_caller]
    pub fn new(kind: ConfigErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// A layer at `origin` could not be read.
    #[track_caller]
    pub fn unreadable(origin: impl Into<String>, detail: impl ToString) -> Self {
        Self::new(ConfigErrorKind::Unreadable {
            origin: origin.into(),
            detail: detail.to_string(),
        })
    }

    /// The merged settings are malformed.
    #[track_caller]
    pub fn invalid(detail: impl ToString) -> Self {
        Self::new(ConfigErrorKind::Invalid(detail.to_string()))
    }
}
