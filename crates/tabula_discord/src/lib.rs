//! Rate-limit aware REST client for the purge engine.
//!
//! The crate is layered bottom-up:
//!
//! - [`Transport`] - the network seam; [`ReqwestTransport`] in production
//! - [`RequestExecutor`] - issues calls and transparently retries HTTP 429
//! - [`DiscordClient`] - typed endpoints; collaborator calls return
//!   [`TabulaResult`](tabula_error::TabulaResult), purge primitives return an
//!   [`Outcome`] so walkers can switch on a single tagged type
//!
//! # Testing
//!
//! The `testing` feature exposes `MockTransport`, a scripted in-memory
//! transport that records every call.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod client;
mod executor;
mod models;
mod outcome;
mod transport;

#[cfg(feature = "testing")]
mod testing;

pub use client::{ArchiveScope, DiscordClient, SearchScope};
pub use executor::{ApiResponse, RequestExecutor};
pub use models::{
    Channel, ChannelBuilder, ChannelKind, Emoji, EmojiBuilder, Guild, Message, MessageBuilder,
    Reaction, ReactionBuilder, Relationship, RelationshipKind, SearchResults, ThreadList,
    ThreadMetadata, User, UserBuilder,
};
pub use outcome::{Failure, Outcome, SkipReason, format_api_error};
pub use transport::{RawResponse, ReqwestTransport, Transport};

#[cfg(feature = "testing")]
pub use testing::{MockTransport, RecordedCall};
