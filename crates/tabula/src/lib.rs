//! Tabula - bulk removal of your own Discord content
//!
//! Tabula deletes every message and reaction the authenticated account has
//! left behind: in servers (channels, threads, forum posts), in open
//! conversations, in conversations that are hidden but still reachable
//! through friends or blocks, and in conversations listed in a personal
//! data export.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use tabula::{DiscordClient, PurgeContext, PurgeOptions, PurgeOrchestrator, TabulaConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = TabulaConfig::load()?;
//!     let client = DiscordClient::connect(&std::env::var("DISCORD_TOKEN")?, &config)?;
//!     let me = client.current_user().await?;
//!
//!     let ctx = PurgeContext::new(client, me.id().as_str(), config);
//!     let stats = PurgeOrchestrator::new(&ctx, PurgeOptions::default()).run().await;
//!     println!("Deleted {} messages", stats.messages_deleted());
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! Tabula is organized as a workspace with focused crates:
//!
//! - `tabula_error` - Error types
//! - `tabula_rate_limit` - Configuration, pacing and 429 wait computation
//! - `tabula_discord` - Transport, request executor, wire models and REST client
//! - `tabula_purge` - Search walker, history scan, discovery, reaction sweep
//!   and orchestration
//!
//! This crate (`tabula`) re-exports everything for convenience and ships
//! the `tabula` binary.

pub use tabula_discord::*;
pub use tabula_error::*;
pub use tabula_purge::*;
pub use tabula_rate_limit::*;
