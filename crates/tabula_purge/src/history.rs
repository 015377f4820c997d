//! Full-history paging and the history-scan deleter.

use crate::{PurgeContext, WalkReport};
use tabula_discord::{Message, Outcome, SkipReason};
use tabula_error::{PurgeError, PurgeErrorKind, TabulaResult};
use tabula_rate_limit::Pace;
use tracing::{debug, instrument};

/// Backward pager over a container's entire history.
///
/// Yields pages newest first and ends on an empty page, a short page, or a
/// container the caller cannot read. Between pages it pauses for
/// [`Pace::Batch`].
#[derive(Debug)]
pub struct HistoryPages<'a> {
    ctx: &'a PurgeContext,
    channel_id: &'a str,
    before: Option<String>,
    done: bool,
}

impl<'a> HistoryPages<'a> {
    /// Pager starting at the newest message of `channel_id`.
    pub fn new(ctx: &'a PurgeContext, channel_id: &'a str) -> Self {
        Self {
            ctx,
            channel_id,
            before: None,
            done: false,
        }
    }

    /// Next page, or `None` once history is exhausted.
    ///
    /// # Errors
    ///
    /// Transport failures, and any status other than success, 403 or 404.
    pub async fn next_page(&mut self) -> TabulaResult<Option<Vec<Message>>> {
        if self.done {
            return Ok(None);
        }
        if self.before.is_some() {
            self.ctx.pause(Pace::Batch).await;
        }

        let outcome = self
            .ctx
            .client()
            .history_page(self.channel_id, self.before.as_deref())
            .await?;

        let page = match outcome {
            Outcome::Success(page) => page,
            Outcome::Skip(reason) => {
                debug!(channel_id = self.channel_id, %reason, "History unavailable");
                self.done = true;
                return Ok(None);
            }
            Outcome::RetryLater => {
                self.done = true;
                return Ok(None);
            }
            Outcome::HardFail(failure) => {
                self.done = true;
                return Err(PurgeError::new(PurgeErrorKind::HistoryFailed {
                    status: failure.status,
                    detail: failure.detail,
                })
                .into());
            }
        };

        let Some(last) = page.last() else {
            self.done = true;
            return Ok(None);
        };
        self.before = Some(last.id().clone());
        if page.len() < self.ctx.config().paging.history_page_size {
            self.done = true;
        }

        Ok(Some(page))
    }
}

/// Deletes the caller's messages by reading a container's full history.
///
/// Used when search is unavailable for a conversation, and as the deep scan
/// behind a server search that found nothing.
#[derive(Debug, Clone, Copy)]
pub struct HistoryScanDeleter<'a> {
    ctx: &'a PurgeContext,
}

impl<'a> HistoryScanDeleter<'a> {
    /// Create a deleter.
    pub fn new(ctx: &'a PurgeContext) -> Self {
        Self { ctx }
    }

    /// Delete every message the caller wrote in `channel_id`.
    ///
    /// Successful deletes and messages that were already gone both count
    /// towards `report.deleted`; other outcomes are not counted.
    ///
    /// # Errors
    ///
    /// Transport failures and unexpected history statuses. Deletions made
    /// before the error remain in `report`.
    #[instrument(skip(self, report))]
    pub async fn scan(&self, channel_id: &str, report: &mut WalkReport) -> TabulaResult<()> {
        let caller_id = self.ctx.caller_id();
        let mut pages = HistoryPages::new(self.ctx, channel_id);

        while let Some(page) = pages.next_page().await? {
            for message in page.iter().filter(|m| m.is_authored_by(caller_id)) {
                let outcome = self
                    .ctx
                    .client()
                    .delete_message(channel_id, message.id())
                    .await?;
                match outcome {
                    Outcome::Success(()) | Outcome::Skip(SkipReason::NotFound) => {
                        report.deleted += 1
                    }
                    other => debug!(message_id = %message.id(), ?other, "Message not deleted"),
                }
                self.ctx.pause(Pace::Delete).await;
            }
        }

        debug!(deleted = report.deleted, "History scan complete");
        Ok(())
    }
}
