//! Removal of the caller's own reactions.

use crate::{HistoryPages, PurgeContext};
use tabula_discord::{Outcome, SkipReason};
use tabula_rate_limit::Pace;
use tracing::{debug, instrument, warn};

/// Scans every message of a container and removes the caller's reactions.
///
/// Reactions cannot be queried by author, so the sweep reads the full history
/// regardless of who wrote each message.
#[derive(Debug, Clone, Copy)]
pub struct ReactionSweeper<'a> {
    ctx: &'a PurgeContext,
}

impl<'a> ReactionSweeper<'a> {
    /// Create a sweeper.
    pub fn new(ctx: &'a PurgeContext) -> Self {
        Self { ctx }
    }

    /// Remove own reactions in `channel_id`; returns how many are gone.
    ///
    /// Reactions that were already removed count as removed. An unreadable
    /// container yields zero; a transport failure abandons the container and
    /// returns the count so far.
    #[instrument(skip(self))]
    pub async fn sweep(&self, channel_id: &str) -> u64 {
        let client = self.ctx.client();
        let mut pages = HistoryPages::new(self.ctx, channel_id);
        let mut removed = 0;

        loop {
            let page = match pages.next_page().await {
                Ok(Some(page)) => page,
                Ok(None) => break,
                Err(e) => {
                    warn!(error = %e, "Abandoning reaction sweep");
                    break;
                }
            };

            for message in &page {
                for reaction in message.reactions().iter().filter(|r| *r.me()) {
                    let outcome = client
                        .remove_own_reaction(channel_id, message.id(), reaction.emoji())
                        .await;
                    match outcome {
                        Ok(Outcome::Success(())) | Ok(Outcome::Skip(SkipReason::NotFound)) => {
                            removed += 1
                        }
                        Ok(other) => {
                            debug!(message_id = %message.id(), ?other, "Reaction not removed")
                        }
                        Err(e) => {
                            warn!(error = %e, "Abandoning reaction sweep");
                            return removed;
                        }
                    }
                    self.ctx.pause(Pace::Reaction).await;
                }
            }
        }

        removed
    }
}
