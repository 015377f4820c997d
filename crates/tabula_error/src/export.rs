//! Export index error types.

/// Kinds of export index errors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum ExportErrorKind {
    /// The supplied path does not exist or cannot be stat'ed
    #[display("Cannot access path {}", _0)]
    Inaccessible(String),
    /// A directory was supplied but it holds no messages/index.json
    #[display("Could not find messages/index.json in {}", _0)]
    IndexMissing(String),
    /// The index file could not be read
    #[display("Failed to read index file: {}", _0)]
    FileRead(String),
    /// The index file is not a JSON object
    #[display("Failed to parse index.json: {}", _0)]
    Parse(String),
}

/// Export index error with location tracking.
///
/// # Examples
///
/// ```
/// use tabula_error::{ExportError, ExportErrorKind};
///
/// let err = ExportError::new(ExportErrorKind::IndexMissing("/tmp/package".to_string()));
/// assert!(format!("{}", err).contains("messages/index.json"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Export Error: {} at line {} in {}", kind, line, file)]
pub struct ExportError {
    /// The kind of error that occurred
    pub kind: ExportErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl ExportError {
    /// Create a new export error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ExportErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
