//! Enumeration of every message-bearing container of a server.

use crate::{OrderedIdSet, PurgeContext};
use strum::IntoEnumIterator;
use tabula_discord::{ArchiveScope, Channel, Outcome};
use tabula_rate_limit::Pace;
use tracing::{debug, info, instrument};

/// Discovers channels and threads of a server.
///
/// No endpoint lists "containers with my reactions", so the engine gathers
/// top-level channels, active threads and, for every channel that can parent
/// threads, the public, private and joined-private archive listings.
/// A failing sub-listing contributes nothing; discovery never fails.
#[derive(Debug, Clone, Copy)]
pub struct ContainerDiscovery<'a> {
    ctx: &'a PurgeContext,
}

impl<'a> ContainerDiscovery<'a> {
    /// Create a discovery engine.
    pub fn new(ctx: &'a PurgeContext) -> Self {
        Self { ctx }
    }

    /// IDs of every container in `guild_id`, deduplicated, in discovery order.
    #[instrument(skip(self))]
    pub async fn discover(&self, guild_id: &str) -> Vec<String> {
        let client = self.ctx.client();
        let mut containers = OrderedIdSet::new();
        let mut parents: Vec<String> = Vec::new();

        match client.guild_channels(guild_id).await {
            Ok(Outcome::Success(channels)) => {
                for channel in &channels {
                    let kind = channel.kind();
                    if kind.holds_messages() {
                        containers.insert(channel.id().as_str());
                    }
                    if kind.hosts_threads() {
                        parents.push(channel.id().clone());
                    }
                }
            }
            Ok(other) => debug!(?other, "Channel listing unavailable"),
            Err(e) => debug!(error = %e, "Channel listing failed"),
        }

        match client.active_threads(guild_id).await {
            Ok(Outcome::Success(threads)) => {
                for thread in &threads {
                    containers.insert(thread.id().as_str());
                }
            }
            Ok(other) => debug!(?other, "Active thread listing unavailable"),
            Err(e) => debug!(error = %e, "Active thread listing failed"),
        }

        for parent_id in &parents {
            let mut scopes = ArchiveScope::iter().peekable();
            while let Some(scope) = scopes.next() {
                for thread in self.archived(parent_id, scope).await {
                    containers.insert(thread.id().as_str());
                }
                if scopes.peek().is_some() {
                    self.ctx.pause(Pace::ThreadArchive).await;
                }
            }
            self.ctx.pause(Pace::ThreadDiscovery).await;
        }

        info!(
            containers = containers.len(),
            parents = parents.len(),
            "Discovered channels and threads"
        );
        containers.into_vec()
    }

    /// Every page of one archive listing, following archive timestamps.
    async fn archived(&self, parent_id: &str, scope: ArchiveScope) -> Vec<Channel> {
        let mut threads: Vec<Channel> = Vec::new();
        let mut before: Option<String> = None;

        loop {
            let outcome = match self
                .ctx
                .client()
                .archived_threads(parent_id, scope, before.as_deref())
                .await
            {
                Ok(outcome) => outcome,
                Err(e) => {
                    debug!(parent_id, %scope, error = %e, "Archive listing failed");
                    break;
                }
            };

            let page = match outcome {
                Outcome::Success(page) => page,
                other => {
                    debug!(parent_id, %scope, ?other, "Archive listing ended");
                    break;
                }
            };

            let has_more = *page.has_more();
            let page_threads = page.into_threads();
            let next = page_threads
                .last()
                .and_then(Channel::archive_timestamp)
                .map(str::to_string);
            let empty = page_threads.is_empty();
            threads.extend(page_threads);

            match next {
                Some(next) if has_more && !empty => {
                    if before.as_deref() == Some(next.as_str()) {
                        debug!(parent_id, %scope, before = %next, "Archive cursor did not advance");
                        break;
                    }
                    before = Some(next);
                }
                _ => break,
            }
            self.ctx.pause(Pace::Batch).await;
        }

        threads
    }
}
