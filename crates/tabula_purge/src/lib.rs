//! Bulk purge engine.
//!
//! Deletes the caller's own messages and reactions container by container.
//! There is no bulk-delete endpoint and no way to query reactions by author,
//! so the engine combines several walkers:
//!
//! - [`SearchDeletionWalker`] - search for own messages, delete each hit,
//!   move the cursor backwards
//! - [`HistoryScanDeleter`] - page through the full history when search is
//!   unavailable or incomplete
//! - [`ContainerDiscovery`] - enumerate every channel and thread of a server
//! - [`ReactionSweeper`] - scan every message of a container for own reactions
//! - [`PurgeOrchestrator`] - run the phases, merge discovery sources, apply
//!   exclusions and collect [`PurgeStats`]
//!
//! Every walker borrows a [`PurgeContext`] holding the client, the caller's
//! identity and the configuration. Per-run sets are passed explicitly.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod cleanup;
mod context;
mod cursor;
mod discovery;
mod export;
mod history;
mod ids;
mod orchestrator;
mod reactions;
mod report;
mod search;
mod stats;

pub use cleanup::AccountCleanup;
pub use context::PurgeContext;
pub use cursor::{older_of, predecessor};
pub use discovery::ContainerDiscovery;
pub use export::load_conversation_ids;
pub use history::{HistoryPages, HistoryScanDeleter};
pub use ids::OrderedIdSet;
pub use orchestrator::{
    ExclusionSet, ProcessedSet, PurgeOptions, PurgeOptionsBuilder, PurgeOrchestrator,
};
pub use reactions::ReactionSweeper;
pub use report::WalkReport;
pub use search::SearchDeletionWalker;
pub use stats::{GuildStats, PurgeStats};
