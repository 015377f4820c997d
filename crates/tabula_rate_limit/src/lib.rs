//! Pacing and rate-limit policy.
//!
//! This crate holds the knobs that keep a purge run polite towards the
//! remote service:
//!
//! - [`PacingConfig`] - fixed courtesy pauses between logical operations
//! - [`RetryPolicy`] - how long to wait after an HTTP 429 and how often to retry
//! - [`SearchConfig`] - how long to wait for a search index that is still building
//! - [`TabulaConfig`] - the layered TOML configuration tying them together
//!
//! All durations are injectable, so tests run with [`PacingConfig::none`].

mod backoff;
mod config;
mod pacing;

pub use backoff::RetryHints;
pub use config::{
    ApiConfig, PacingConfig, PagingConfig, RetryPolicy, RouteFloor, SearchConfig, TabulaConfig,
};
pub use pacing::Pace;
