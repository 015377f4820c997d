//! Search-driven deletion of the caller's messages.

use crate::{
    ContainerDiscovery, HistoryScanDeleter, PurgeContext, WalkReport, older_of, predecessor,
};
use std::collections::HashSet;
use tabula_discord::{Outcome, SearchResults, SearchScope, SkipReason};
use tabula_error::{PurgeError, PurgeErrorKind, TabulaResult};
use tabula_rate_limit::Pace;
use tracing::{debug, info, instrument, warn};

/// Cursor state for one container walk.
#[derive(Debug, Default)]
struct WalkState {
    /// Upper bound of the next search, unbounded when `None`
    max_id: Option<String>,
    /// Messages confirmed undeletable or gone in this walk
    skippable: HashSet<String>,
    /// Consecutive "index not ready" answers
    index_waits: u32,
}

/// How a walk ended.
enum WalkEnd {
    /// Search ran dry
    Exhausted,
    /// The container cannot be searched; nothing more to do
    Unreachable,
}

/// Finds the caller's messages through the search endpoint and deletes them.
///
/// The walker moves a `max_id` cursor backwards one page at a time. Server
/// searches that delete nothing fall back to a deep history scan of every
/// discovered container; conversation searches that fail fall back to a
/// history scan of that conversation.
#[derive(Debug, Clone, Copy)]
pub struct SearchDeletionWalker<'a> {
    ctx: &'a PurgeContext,
}

impl<'a> SearchDeletionWalker<'a> {
    /// Create a walker.
    pub fn new(ctx: &'a PurgeContext) -> Self {
        Self { ctx }
    }

    /// Walk one server or conversation until search is exhausted.
    ///
    /// A server that refuses search is skipped without error.
    ///
    /// # Errors
    ///
    /// - the search index never became ready
    /// - a server search failed with an unexpected status
    /// - transport failure or exhausted rate-limit budget
    ///
    /// Progress made before the error remains in `report`.
    #[instrument(skip(self, report), fields(scope_id = scope.id()))]
    pub async fn walk(&self, scope: SearchScope<'_>, report: &mut WalkReport) -> TabulaResult<()> {
        let deleted_before = report.deleted;
        let mut state = WalkState::default();

        let end = loop {
            let outcome = self
                .ctx
                .client()
                .search(scope, self.ctx.caller_id(), state.max_id.as_deref())
                .await?;

            let results = match outcome {
                Outcome::Success(results) => {
                    state.index_waits = 0;
                    results
                }
                Outcome::RetryLater => {
                    self.wait_for_index(&mut state).await?;
                    continue;
                }
                Outcome::Skip(reason) => match scope {
                    SearchScope::Guild(_) => {
                        info!(%reason, "Cannot search this server, skipping");
                        break WalkEnd::Unreachable;
                    }
                    SearchScope::Conversation(channel_id) => {
                        debug!(%reason, "Search unavailable, scanning history");
                        return HistoryScanDeleter::new(self.ctx).scan(channel_id, report).await;
                    }
                },
                Outcome::HardFail(failure) => match scope {
                    SearchScope::Guild(_) => {
                        return Err(PurgeError::new(PurgeErrorKind::SearchFailed {
                            status: failure.status,
                            detail: failure.detail,
                        })
                        .into());
                    }
                    SearchScope::Conversation(channel_id) => {
                        debug!(%failure, "Search failed, scanning history");
                        return HistoryScanDeleter::new(self.ctx).scan(channel_id, report).await;
                    }
                },
            };

            if results.is_exhausted() {
                break WalkEnd::Exhausted;
            }
            info!(remaining = *results.total_results(), "Messages remaining");

            let progress_before = report.deleted + report.already_gone;
            let oldest = self
                .delete_page(scope, &results, &mut state, report)
                .await?;

            let Some(oldest) = oldest else {
                break WalkEnd::Exhausted;
            };
            let next_max_id = predecessor(&oldest);
            if state.max_id.as_deref() == Some(next_max_id.as_str()) {
                break WalkEnd::Exhausted;
            }
            state.max_id = Some(next_max_id);

            if report.deleted + report.already_gone == progress_before {
                debug!("No deletions on this page, continuing into older history");
            }
            self.ctx.pause(Pace::Search).await;
        };

        if let (WalkEnd::Exhausted, SearchScope::Guild(guild_id)) = (end, scope)
            && report.deleted == deleted_before
            && self.ctx.config().search.deep_scan_on_empty
        {
            self.deep_scan(guild_id, report).await;
        }

        Ok(())
    }

    async fn wait_for_index(&self, state: &mut WalkState) -> TabulaResult<()> {
        let max_waits = self.ctx.config().search.max_index_waits;
        state.index_waits += 1;
        if state.index_waits >= max_waits {
            return Err(PurgeError::new(PurgeErrorKind::SearchIndexNotReady(max_waits)).into());
        }

        info!(
            attempt = state.index_waits,
            max_waits, "Search index building, waiting"
        );
        let wait = self.ctx.config().search.index_wait();
        if !wait.is_zero() {
            tokio::time::sleep(wait).await;
        }
        Ok(())
    }

    /// Delete every hit on one page; returns the oldest hit ID seen.
    async fn delete_page(
        &self,
        scope: SearchScope<'_>,
        results: &SearchResults,
        state: &mut WalkState,
        report: &mut WalkReport,
    ) -> TabulaResult<Option<String>> {
        let mut oldest = "";
        let mut seen_on_page: HashSet<&str> = HashSet::new();

        for message in results.hits_by(self.ctx.caller_id()) {
            let message_id = message.id().as_str();
            oldest = older_of(oldest, message_id);

            if message_id.is_empty()
                || state.skippable.contains(message_id)
                || !seen_on_page.insert(message_id)
            {
                continue;
            }

            let channel_id = match scope {
                SearchScope::Guild(_) => message.channel_id().as_str(),
                SearchScope::Conversation(channel_id) => channel_id,
            };
            if channel_id.is_empty() {
                state.skippable.insert(message_id.to_string());
                report.skipped += 1;
                continue;
            }

            let outcome = self
                .ctx
                .client()
                .delete_message(channel_id, message_id)
                .await?;

            match outcome {
                Outcome::Success(()) => report.deleted += 1,
                Outcome::Skip(SkipReason::NotFound) => {
                    report.already_gone += 1;
                    state.skippable.insert(message_id.to_string());
                }
                Outcome::Skip(SkipReason::Forbidden) => {
                    warn!(message_id, "Cannot delete message (no permission)");
                    report.skipped += 1;
                    state.skippable.insert(message_id.to_string());
                }
                Outcome::Skip(SkipReason::Rejected(detail)) => {
                    warn!(message_id, %detail, "Cannot delete message (HTTP 400)");
                    report.skipped += 1;
                    state.skippable.insert(message_id.to_string());
                    self.ctx.pause(Pace::ErrorBackoff).await;
                }
                Outcome::RetryLater => {
                    warn!(message_id, "Delete deferred by the server");
                    report.failed += 1;
                    self.ctx.pause(Pace::ErrorBackoff).await;
                }
                Outcome::HardFail(failure) => {
                    warn!(message_id, %failure, "Unexpected status deleting message");
                    report.failed += 1;
                    self.ctx.pause(Pace::ErrorBackoff).await;
                }
            }

            self.ctx.pause(Pace::Delete).await;
        }

        Ok((!oldest.is_empty()).then(|| oldest.to_string()))
    }

    /// History-scan every container of a server; failures skip the container.
    async fn deep_scan(&self, guild_id: &str, report: &mut WalkReport) {
        let containers = ContainerDiscovery::new(self.ctx).discover(guild_id).await;
        if containers.is_empty() {
            return;
        }

        info!(containers = containers.len(), "Running exhaustive channel scan");
        let scanner = HistoryScanDeleter::new(self.ctx);
        let before = report.deleted;

        for channel_id in containers.iter() {
            if let Err(e) = scanner.scan(channel_id, report).await {
                debug!(channel_id, error = %e, "Deep scan skipped container");
                continue;
            }
            self.ctx.pause(Pace::Batch).await;
        }

        let recovered = report.deleted - before;
        if recovered > 0 {
            info!(recovered, "Deep scan recovered additional messages");
        }
    }
}
