//! Optional account cleanup after a purge.

use crate::PurgeContext;
use tabula_discord::RelationshipKind;
use tabula_error::TabulaResult;
use tabula_rate_limit::Pace;
use tracing::{info, instrument, warn};

/// Removes friendships and server memberships.
#[derive(Debug, Clone, Copy)]
pub struct AccountCleanup<'a> {
    ctx: &'a PurgeContext,
}

impl<'a> AccountCleanup<'a> {
    /// Create a cleanup step.
    pub fn new(ctx: &'a PurgeContext) -> Self {
        Self { ctx }
    }

    /// Remove every friend; returns how many were removed.
    ///
    /// Blocks and pending requests are left alone. A failure on one friend is
    /// logged and does not stop the rest.
    ///
    /// # Errors
    ///
    /// Returns an error only if the relationship list cannot be fetched.
    #[instrument(skip(self))]
    pub async fn remove_all_friends(&self) -> TabulaResult<u64> {
        let relationships = self.ctx.client().relationships().await?;
        let mut removed = 0;

        for relationship in relationships
            .iter()
            .filter(|r| r.kind() == RelationshipKind::Friend)
        {
            let user = relationship.user();
            match self.ctx.client().remove_relationship(user.id()).await {
                Ok(()) => {
                    removed += 1;
                    info!(friend = %user.username(), "Removed friend");
                }
                Err(e) => warn!(friend = %user.username(), error = %e, "Failed to remove friend"),
            }
            self.ctx.pause(Pace::Relationship).await;
        }

        Ok(removed)
    }

    /// Leave every server; returns how many were left.
    ///
    /// # Errors
    ///
    /// Returns an error only if the server list cannot be fetched.
    #[instrument(skip(self))]
    pub async fn leave_all_guilds(&self) -> TabulaResult<u64> {
        let guilds = self.ctx.client().guilds().await?;
        let mut left = 0;

        for guild in &guilds {
            match self.ctx.client().leave_guild(guild.id()).await {
                Ok(()) => {
                    left += 1;
                    info!(server = guild.display_name(), "Left server");
                }
                Err(e) => warn!(server = guild.display_name(), error = %e, "Failed to leave server"),
            }
            self.ctx.pause(Pace::Membership).await;
        }

        Ok(left)
    }
}
