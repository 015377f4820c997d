//! Shared inputs of every walker.

use tabula_discord::DiscordClient;
use tabula_rate_limit::{Pace, TabulaConfig};

/// Client, caller identity and configuration for one purge run.
#[derive(Debug, Clone, derive_getters::Getters)]
pub struct PurgeContext {
    /// REST client bound to the caller's credential
    client: DiscordClient,
    /// ID of the account whose content is purged
    caller_id: String,
    /// Pacing, retry and search policy
    config: TabulaConfig,
}

impl PurgeContext {
    /// Create a context for `caller_id`.
    pub fn new(client: DiscordClient, caller_id: impl Into<String>, config: TabulaConfig) -> Self {
        Self {
            client,
            caller_id: caller_id.into(),
            config,
        }
    }

    /// Sleep for the courtesy delay configured for `pace`.
    pub async fn pause(&self, pace: Pace) {
        self.config.pacing.pause(pace).await;
    }
}
