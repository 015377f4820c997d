//! Phase sequencing for a full purge run.

use crate::{
    ContainerDiscovery, GuildStats, HistoryScanDeleter, OrderedIdSet, PurgeContext, PurgeStats,
    ReactionSweeper, SearchDeletionWalker, WalkReport, load_conversation_ids,
};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tabula_discord::{Guild, SearchScope};
use tabula_rate_limit::Pace;
use tokio::time::Instant;
use tracing::{debug, error, info, instrument, warn};

/// Conversation IDs already scheduled during this run.
///
/// Only grows; the final reaction sweep over conversations walks it in
/// insertion order.
pub type ProcessedSet = OrderedIdSet;

/// Servers and conversations the user chose to leave untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionSet {
    guilds: HashSet<String>,
    conversations: HashSet<String>,
}

impl ExclusionSet {
    /// Nothing excluded.
    pub fn new() -> Self {
        Self::default()
    }

    /// Exclude a server from message deletion and reaction sweeping.
    pub fn exclude_guild(&mut self, guild_id: impl Into<String>) {
        self.guilds.insert(guild_id.into());
    }

    /// Exclude a conversation from message deletion.
    pub fn exclude_conversation(&mut self, channel_id: impl Into<String>) {
        self.conversations.insert(channel_id.into());
    }

    /// Whether `guild_id` is excluded.
    pub fn is_guild_excluded(&self, guild_id: &str) -> bool {
        self.guilds.contains(guild_id)
    }

    /// Whether `channel_id` is excluded.
    pub fn is_conversation_excluded(&self, channel_id: &str) -> bool {
        self.conversations.contains(channel_id)
    }

    /// Number of excluded servers.
    pub fn guild_count(&self) -> usize {
        self.guilds.len()
    }

    /// Number of excluded conversations.
    pub fn conversation_count(&self) -> usize {
        self.conversations.len()
    }

    /// True when nothing is excluded.
    pub fn is_empty(&self) -> bool {
        self.guilds.is_empty() && self.conversations.is_empty()
    }
}

/// Inputs the user chose before the run.
#[derive(Debug, Clone, Default, derive_builder::Builder, derive_getters::Getters)]
#[builder(default)]
pub struct PurgeOptions {
    /// Skipped servers and conversations
    exclusions: ExclusionSet,
    /// Personal data export listing historical conversations
    #[builder(setter(into, strip_option))]
    export_path: Option<PathBuf>,
}

/// Runs every purge phase in order.
///
/// 1. Server messages through search
/// 2. Open conversations
/// 3. Hidden conversations re-opened through relationships
/// 4. Conversations listed in the data export, if one was given
/// 5. Own reactions in every processed server
/// 6. Own reactions in every processed conversation
///
/// A failing server or conversation is logged and the run moves on.
#[derive(Debug)]
pub struct PurgeOrchestrator<'a> {
    ctx: &'a PurgeContext,
    options: PurgeOptions,
}

impl<'a> PurgeOrchestrator<'a> {
    /// Create an orchestrator.
    pub fn new(ctx: &'a PurgeContext, options: PurgeOptions) -> Self {
        Self { ctx, options }
    }

    /// Run all phases and return the statistics.
    #[instrument(skip(self))]
    pub async fn run(&self) -> PurgeStats {
        let started = Instant::now();
        let mut stats = PurgeStats::default();
        let mut processed = ProcessedSet::new();

        let guilds = self.delete_guild_messages(&mut stats).await;
        self.delete_open_conversations(&mut processed, &mut stats)
            .await;
        self.delete_hidden_conversations(&mut processed, &mut stats)
            .await;
        match self.options.export_path() {
            Some(path) => {
                self.delete_exported_conversations(path, &mut processed, &mut stats)
                    .await
            }
            None => info!("No data export provided, skipping exported conversations"),
        }
        self.sweep_guild_reactions(&guilds, &mut stats).await;
        self.sweep_conversation_reactions(&processed, &mut stats)
            .await;

        stats.finish(processed.len(), started.elapsed());
        info!(
            messages = stats.messages_deleted(),
            reactions = stats.reactions_removed(),
            "Purge complete"
        );
        stats
    }

    /// Phase 1; returns the servers that were processed.
    async fn delete_guild_messages(&self, stats: &mut PurgeStats) -> Vec<Guild> {
        info!("Deleting messages from servers");

        let guilds = match self.ctx.client().guilds().await {
            Ok(guilds) => guilds,
            Err(e) => {
                error!(error = %e, "Could not list servers");
                return Vec::new();
            }
        };

        let found = guilds.len();
        let exclusions = self.options.exclusions();
        let guilds: Vec<Guild> = guilds
            .into_iter()
            .filter(|guild| !exclusions.is_guild_excluded(guild.id()))
            .collect();
        info!(
            found,
            excluded = found - guilds.len(),
            "Servers to process"
        );

        let walker = SearchDeletionWalker::new(self.ctx);
        let total = guilds.len();
        for (index, guild) in guilds.iter().enumerate() {
            info!(
                server = guild.display_name(),
                position = index + 1,
                total,
                "Searching server"
            );

            let mut report = WalkReport::default();
            if let Err(e) = walker
                .walk(SearchScope::Guild(guild.id()), &mut report)
                .await
            {
                error!(server = guild.display_name(), error = %e, "Server purge failed");
            }
            info!(deleted = report.deleted, "Server done");

            stats.record_guild_messages(GuildStats::new(
                guild.id().as_str(),
                guild.display_name(),
                report.deleted,
            ));
        }

        guilds
    }

    /// Phase 2.
    async fn delete_open_conversations(&self, processed: &mut ProcessedSet, stats: &mut PurgeStats) {
        info!("Deleting messages from open conversations");

        let channels = match self.ctx.client().dm_channels().await {
            Ok(channels) => channels,
            Err(e) => {
                error!(error = %e, "Could not list conversations");
                return;
            }
        };

        let exclusions = self.options.exclusions();
        let (excluded, included): (Vec<_>, Vec<_>) = channels
            .iter()
            .partition(|channel| exclusions.is_conversation_excluded(channel.id()));
        info!(
            found = channels.len(),
            excluded = excluded.len(),
            "Open conversations to process"
        );

        let total = included.len();
        for (index, channel) in included.into_iter().enumerate() {
            processed.insert(channel.id().as_str());
            info!(
                conversation = %channel.label(),
                position = index + 1,
                total,
                "Processing conversation"
            );

            let report = self.purge_conversation(channel.id()).await;
            stats.record_dm_messages(report.deleted);
        }
    }

    /// Phase 3.
    async fn delete_hidden_conversations(
        &self,
        processed: &mut ProcessedSet,
        stats: &mut PurgeStats,
    ) {
        info!("Discovering hidden conversations through relationships");

        let relationships = match self.ctx.client().relationships().await {
            Ok(relationships) => relationships,
            Err(e) => {
                error!(error = %e, "Could not list relationships");
                return;
            }
        };
        info!(found = relationships.len(), "Relationships");

        let exclusions = self.options.exclusions();
        let mut discovered = 0;
        let mut excluded = 0;

        for relationship in &relationships {
            let user = relationship.user();
            let channel = match self.ctx.client().open_dm(user.id()).await {
                Ok(channel) => channel,
                Err(e) => {
                    debug!(user = %user.username(), error = %e, "Could not open conversation");
                    continue;
                }
            };

            let channel_id = channel.id();
            if processed.contains(channel_id) {
                continue;
            }
            if exclusions.is_conversation_excluded(channel_id) {
                excluded += 1;
                continue;
            }

            discovered += 1;
            processed.insert(channel_id.as_str());
            info!(
                user = %user.username(),
                relationship = %relationship.kind(),
                "Found hidden conversation"
            );

            let report = self.purge_conversation(channel_id).await;
            stats.record_dm_messages(report.deleted);

            self.ctx.pause(Pace::Relationship).await;
        }

        info!(discovered, excluded, "Hidden conversations processed");
    }

    /// Phase 4; search first, history scan if the search walk errors.
    async fn delete_exported_conversations(
        &self,
        path: &Path,
        processed: &mut ProcessedSet,
        stats: &mut PurgeStats,
    ) {
        info!(path = %path.display(), "Processing conversations from data export");

        let channel_ids = match load_conversation_ids(path).await {
            Ok(ids) => ids,
            Err(e) => {
                error!(error = %e, "Could not load data export");
                return;
            }
        };
        info!(found = channel_ids.len(), "Conversations in data export");

        let exclusions = self.options.exclusions();
        let walker = SearchDeletionWalker::new(self.ctx);
        let mut new_conversations = 0;
        let mut excluded = 0;

        for channel_id in &channel_ids {
            if exclusions.is_conversation_excluded(channel_id) {
                excluded += 1;
                continue;
            }
            if !processed.insert(channel_id.as_str()) {
                continue;
            }
            new_conversations += 1;
            info!(channel_id, "Processing exported conversation");

            let mut report = WalkReport::default();
            if let Err(e) = walker
                .walk(SearchScope::Conversation(channel_id), &mut report)
                .await
            {
                debug!(channel_id, error = %e, "Search failed, scanning history");
                if let Err(e) = HistoryScanDeleter::new(self.ctx)
                    .scan(channel_id, &mut report)
                    .await
                {
                    warn!(channel_id, error = %e, "History scan failed");
                }
            }
            stats.record_dm_messages(report.deleted);
        }

        info!(new_conversations, excluded, "Exported conversations processed");
    }

    /// Phase 5.
    async fn sweep_guild_reactions(&self, guilds: &[Guild], stats: &mut PurgeStats) {
        info!("Removing reactions from servers");

        let discovery = ContainerDiscovery::new(self.ctx);
        let sweeper = ReactionSweeper::new(self.ctx);
        let total = guilds.len();

        for (index, guild) in guilds.iter().enumerate() {
            info!(
                server = guild.display_name(),
                position = index + 1,
                total,
                "Scanning server for reactions"
            );

            let containers = discovery.discover(guild.id()).await;
            let mut removed = 0;
            for channel_id in &containers {
                removed += sweeper.sweep(channel_id).await;
            }

            info!(removed, "Server reactions done");
            stats.record_guild_reactions(guild.id(), removed);
        }
    }

    /// Phase 6; every processed conversation, exclusions not consulted.
    async fn sweep_conversation_reactions(&self, processed: &ProcessedSet, stats: &mut PurgeStats) {
        info!(conversations = processed.len(), "Removing reactions from conversations");

        let sweeper = ReactionSweeper::new(self.ctx);
        let mut removed = 0;
        for channel_id in processed.iter() {
            let count = sweeper.sweep(channel_id).await;
            if count > 0 {
                info!(channel_id, removed = count, "Removed conversation reactions");
            }
            removed += count;
        }

        stats.record_dm_reactions(removed);
    }

    /// Search-walk one conversation, logging a failure instead of returning it.
    async fn purge_conversation(&self, channel_id: &str) -> WalkReport {
        let mut report = WalkReport::default();
        if let Err(e) = SearchDeletionWalker::new(self.ctx)
            .walk(SearchScope::Conversation(channel_id), &mut report)
            .await
        {
            error!(channel_id, error = %e, "Conversation purge failed");
        }
        if report.deleted > 0 {
            info!(deleted = report.deleted, "Conversation done");
        }
        report
    }
}
