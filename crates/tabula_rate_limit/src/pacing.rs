//! Fixed courtesy pauses between logical operations.

use crate::PacingConfig;
use tracing::trace;

/// Kinds of operation that are followed by a courtesy pause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum Pace {
    /// Search page
    Search,
    /// Message delete attempt
    Delete,
    /// Reaction removal attempt
    Reaction,
    /// History page, archive page, deep-scan container
    Batch,
    /// End of one parent channel's archive listings
    ThreadDiscovery,
    /// Between archive listing flavours
    ThreadArchive,
    /// Rejected or unexpected delete
    ErrorBackoff,
    /// Relationship-derived conversation or friend removal
    Relationship,
    /// Server departure
    Membership,
}

impl PacingConfig {
    /// Sleep for the delay configured for `pace`.
    ///
    /// Zero-length delays return immediately without yielding to the timer.
    pub async fn pause(&self, pace: Pace) {
        let delay = self.duration(pace);
        if delay.is_zero() {
            return;
        }
        trace!(%pace, delay_ms = delay.as_millis() as u64, "Pacing");
        tokio::time::sleep(delay).await;
    }
}
