//! Configuration structures for pacing and retry policy.
//!
//! This module provides TOML-based configuration. The configuration system
//! supports:
//! - Bundled defaults (include_str! from tabula.toml)
//! - User overrides (./tabula.toml or ~/.config/tabula/tabula.toml)
//! - Automatic merging with user values taking precedence

use crate::Pace;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tabula_error::{ConfigError, TabulaError, TabulaResult};
use tracing::{debug, instrument};

/// REST endpoint settings.
///
/// ```toml
/// [api]
/// base_url = "https://discord.com/api/v9"
/// timeout_secs = 30
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Versioned base URL every API path is appended to
    pub base_url: String,
    /// Per-request connection timeout in seconds
    pub timeout_secs: u64,
    /// User-Agent header sent with every request
    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://discord.com/api/v9".to_string(),
            timeout_secs: 30,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
                .to_string(),
        }
    }
}

/// Courtesy delays between successive logical operations.
///
/// These are independent of HTTP 429 handling: they apply whether or not the
/// remote service has complained. Every value is in milliseconds and zero
/// disables the pause entirely.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct PacingConfig {
    /// After every search page
    pub search_ms: u64,
    /// After every message delete attempt
    pub delete_ms: u64,
    /// After every reaction removal attempt
    pub reaction_ms: u64,
    /// Between history pages, archive pages and deep-scan containers
    pub batch_ms: u64,
    /// After the last archive listing of a parent channel
    pub thread_discovery_ms: u64,
    /// Between the public and private archive listings
    pub thread_archive_ms: u64,
    /// Extra pause after a rejected or unexpected delete
    pub error_backoff_ms: u64,
    /// Between relationship-derived conversations and friend removals
    pub relationship_ms: u64,
    /// Between server departures
    pub membership_ms: u64,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            search_ms: 350,
            delete_ms: 350,
            reaction_ms: 350,
            batch_ms: 350,
            thread_discovery_ms: 350,
            thread_archive_ms: 350,
            error_backoff_ms: 1250,
            relationship_ms: 500,
            membership_ms: 500,
        }
    }
}

impl PacingConfig {
    /// Pacing with every delay set to zero.
    pub fn none() -> Self {
        Self {
            search_ms: 0,
            delete_ms: 0,
            reaction_ms: 0,
            batch_ms: 0,
            thread_discovery_ms: 0,
            thread_archive_ms: 0,
            error_backoff_ms: 0,
            relationship_ms: 0,
            membership_ms: 0,
        }
    }

    /// Delay configured for one kind of operation.
    pub fn duration(&self, pace: Pace) -> Duration {
        let millis = match pace {
            Pace::Search => self.search_ms,
            Pace::Delete => self.delete_ms,
            Pace::Reaction => self.reaction_ms,
            Pace::Batch => self.batch_ms,
            Pace::ThreadDiscovery => self.thread_discovery_ms,
            Pace::ThreadArchive => self.thread_archive_ms,
            Pace::ErrorBackoff => self.error_backoff_ms,
            Pace::Relationship => self.relationship_ms,
            Pace::Membership => self.membership_ms,
        };
        Duration::from_millis(millis)
    }
}

/// Stricter wait floor for one route.
///
/// ```toml
/// [[retry.route_floors]]
/// method = "GET"
/// path_fragment = "/users/@me/threads/archived/private"
/// min_wait_secs = 6.0
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RouteFloor {
    /// HTTP method the floor applies to (case-insensitive)
    pub method: String,
    /// Substring the request path must contain
    pub path_fragment: String,
    /// Minimum wait in seconds for matching requests
    pub min_wait_secs: f64,
}

impl RouteFloor {
    /// Whether this floor applies to a request.
    pub fn matches(&self, method: &str, path: &str) -> bool {
        self.method.eq_ignore_ascii_case(method) && path.contains(&self.path_fragment)
    }
}

/// HTTP 429 retry policy for a single logical request.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Retries allowed after the initial attempt
    pub max_retries: u32,
    /// Wait used when the response carries no usable hint
    pub default_wait_secs: f64,
    /// Added to every computed wait
    pub safety_addend_secs: f64,
    /// Lower bound applied after the addend
    pub min_wait_secs: f64,
    /// Upper bound applied last
    pub max_wait_secs: f64,
    /// Route-specific lower bounds
    pub route_floors: Vec<RouteFloor>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 5,
            default_wait_secs: 5.0,
            safety_addend_secs: 1.0,
            min_wait_secs: 2.0,
            max_wait_secs: 3600.0,
            route_floors: vec![RouteFloor {
                method: "GET".to_string(),
                path_fragment: "/users/@me/threads/archived/private".to_string(),
                min_wait_secs: 6.0,
            }],
        }
    }
}

impl RetryPolicy {
    /// Total number of calls a request may make.
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }
}

/// Search walker policy.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Consecutive "index not ready" answers tolerated per container
    pub max_index_waits: u32,
    /// Wait between "index not ready" retries, in milliseconds
    pub index_wait_ms: u64,
    /// Run the exhaustive history scan when a server search deletes nothing
    pub deep_scan_on_empty: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_index_waits: 40,
            index_wait_ms: 3000,
            deep_scan_on_empty: true,
        }
    }
}

impl SearchConfig {
    /// Wait between "index not ready" retries.
    pub fn index_wait(&self) -> Duration {
        Duration::from_millis(self.index_wait_ms)
    }
}

/// Page sizes for the paginated listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct PagingConfig {
    /// Messages per history page
    pub history_page_size: usize,
    /// Threads per archive listing page
    pub thread_page_size: usize,
    /// Servers per membership listing page
    pub guild_page_size: usize,
}

impl Default for PagingConfig {
    fn default() -> Self {
        Self {
            history_page_size: 100,
            thread_page_size: 100,
            guild_page_size: 200,
        }
    }
}

/// Top-level Tabula configuration.
///
/// Loads configuration from TOML files with a precedence system:
/// 1. Bundled defaults (include_str! from tabula.toml)
/// 2. User override (~/.config/tabula/tabula.toml, then ./tabula.toml)
///
/// # Example
///
/// ```no_run
/// use tabula_rate_limit::TabulaConfig;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = TabulaConfig::load()?;
/// println!("Retries per request: {}", config.retry.max_retries);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct TabulaConfig {
    /// REST endpoint settings
    pub api: ApiConfig,
    /// Courtesy delays
    pub pacing: PacingConfig,
    /// HTTP 429 policy
    pub retry: RetryPolicy,
    /// Search walker policy
    pub search: SearchConfig,
    /// Page sizes
    pub paging: PagingConfig,
}

/// Bundled default configuration
const DEFAULT_CONFIG: &str = include_str!("../../../tabula.toml");

impl TabulaConfig {
    /// Load configuration from bundled defaults overlaid with one file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<std::path::Path>) -> TabulaResult<Self> {
        debug!("Loading configuration from file");

        config::Config::builder()
            .add_source(config::File::from_str(
                DEFAULT_CONFIG,
                config::FileFormat::Toml,
            ))
            .add_source(config::File::from(path.as_ref()))
            .build()
            .map_err(|e| {
                TabulaError::from(ConfigError::unreadable(
                    path.as_ref().display().to_string(),
                    e,
                ))
            })?
            .try_deserialize()
            .map_err(|e| TabulaError::from(ConfigError::invalid(e)))
    }

    /// Load configuration with precedence: current dir > home dir > bundled defaults.
    ///
    /// User config files are optional and silently skipped if not found.
    #[instrument]
    pub fn load() -> TabulaResult<Self> {
        debug!("Loading configuration with precedence: current dir > home dir > bundled defaults");

        let mut builder = config::Config::builder().add_source(config::File::from_str(
            DEFAULT_CONFIG,
            config::FileFormat::Toml,
        ));

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/tabula/tabula.toml");
            builder = builder.add_source(config::File::from(home_config).required(false));
        }

        builder = builder.add_source(config::File::with_name("tabula").required(false));

        builder
            .build()
            .map_err(|e| TabulaError::from(ConfigError::unreadable("layered configuration", e)))?
            .try_deserialize()
            .map_err(|e| TabulaError::from(ConfigError::invalid(e)))
    }

    /// Copy of this configuration with every courtesy delay removed.
    pub fn without_pacing(mut self) -> Self {
        self.pacing = PacingConfig::none();
        self.search.index_wait_ms = 0;
        self
    }
}
