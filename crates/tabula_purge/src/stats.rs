//! Run-level statistics.

use std::time::Duration;

/// Per-server counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, derive_getters::Getters)]
pub struct GuildStats {
    /// Server ID
    id: String,
    /// Display name (the ID when the server has no name)
    name: String,
    /// Messages deleted in this server
    messages: u64,
    /// Reactions removed in this server
    reactions: u64,
}

impl GuildStats {
    /// Counters for a server with no reactions removed yet.
    pub fn new(id: impl Into<String>, name: impl Into<String>, messages: u64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            messages,
            reactions: 0,
        }
    }
}

/// Aggregate result of one purge run.
///
/// Accumulated while the run progresses and read once at the end.
#[derive(Debug, Clone, Default, PartialEq, Eq, derive_getters::Getters)]
pub struct PurgeStats {
    /// Messages deleted everywhere, conversations included
    messages_deleted: u64,
    /// Reactions removed everywhere
    reactions_removed: u64,
    /// Messages deleted in conversations
    dm_messages_deleted: u64,
    /// Per-server breakdown, in processing order
    guilds: Vec<GuildStats>,
    /// Conversations that were processed
    conversations_processed: usize,
    /// Wall-clock duration of the run
    elapsed: Duration,
}

impl PurgeStats {
    pub(crate) fn record_guild_messages(&mut self, stats: GuildStats) {
        self.messages_deleted += stats.messages;
        self.guilds.push(stats);
    }

    pub(crate) fn record_guild_reactions(&mut self, guild_id: &str, reactions: u64) {
        self.reactions_removed += reactions;
        if let Some(stats) = self.guilds.iter_mut().find(|stats| stats.id == guild_id) {
            stats.reactions = reactions;
        }
    }

    pub(crate) fn record_dm_messages(&mut self, deleted: u64) {
        self.messages_deleted += deleted;
        self.dm_messages_deleted += deleted;
    }

    pub(crate) fn record_dm_reactions(&mut self, removed: u64) {
        self.reactions_removed += removed;
    }

    pub(crate) fn finish(&mut self, conversations_processed: usize, elapsed: Duration) {
        self.conversations_processed = conversations_processed;
        self.elapsed = elapsed;
    }

    /// Servers that were processed.
    pub fn guilds_processed(&self) -> usize {
        self.guilds.len()
    }
}
