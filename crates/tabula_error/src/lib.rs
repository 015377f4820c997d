//! Error types for the Tabula workspace.
//!
//! This crate provides the foundation error types used by every Tabula crate.
//!
//! # Error Hierarchy
//!
//! Leaf errors carry the call site that raised them (`#[track_caller]`).
//! Where a failure has several shapes, a `*ErrorKind` enum names them and
//! the `*Error` struct wraps it. [`TabulaErrorKind`] gathers every leaf and
//! [`TabulaError`] boxes it, so `?` lifts any leaf into [`TabulaResult`].
//!
//! # Examples
//!
//! ```
//! use tabula_error::{DiscordError, DiscordErrorKind, TabulaResult};
//!
//! fn authenticate(token: &str) -> TabulaResult<String> {
//!     if token.is_empty() {
//!         Err(DiscordError::new(DiscordErrorKind::InvalidToken))?
//!     }
//!     Ok("me".to_string())
//! }
//!
//! let err = authenticate("").unwrap_err();
//! assert!(err.is_invalid_credential());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod discord;
mod error;
mod export;
mod http;
mod json;
mod purge;
mod rate_limit;

pub use config::{ConfigError, ConfigErrorKind};
pub use discord::{DiscordError, DiscordErrorKind};
pub use error::{TabulaError, TabulaErrorKind, TabulaResult};
pub use export::{ExportError, ExportErrorKind};
pub use http::HttpError;
pub use json::JsonError;
pub use purge::{PurgeError, PurgeErrorKind};
pub use rate_limit::RateLimitError;
