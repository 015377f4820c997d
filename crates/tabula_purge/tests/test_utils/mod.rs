//! Test utilities for purge engine tests.
//!
//! Payload builders and a context wired to a scripted transport.

#![allow(dead_code)]

use serde_json::{Value, json};
use std::sync::Arc;
use tabula_discord::{DiscordClient, MockTransport};
use tabula_purge::PurgeContext;
use tabula_rate_limit::TabulaConfig;

/// ID of the account being purged.
pub const ME: &str = "1000";

/// Someone else.
pub const OTHER: &str = "2000";

/// Context with pacing disabled.
pub fn context(mock: &Arc<MockTransport>) -> PurgeContext {
    context_with(mock, TabulaConfig::default())
}

/// Context with pacing disabled on top of `config`.
pub fn context_with(mock: &Arc<MockTransport>, config: TabulaConfig) -> PurgeContext {
    let config = config.without_pacing();
    let client = DiscordClient::with_transport(mock.clone(), &config);
    PurgeContext::new(client, ME, config)
}

/// A search hit written by the caller, wrapped in its context group.
pub fn hit(id: &str, channel_id: &str) -> Value {
    json!([{ "id": id, "channel_id": channel_id, "author": { "id": ME }, "hit": true }])
}

/// A search hit group with a context message from someone else around it.
pub fn hit_with_context(id: &str, context_id: &str, channel_id: &str) -> Value {
    json!([
        { "id": context_id, "channel_id": channel_id, "author": { "id": OTHER }, "hit": false },
        { "id": id, "channel_id": channel_id, "author": { "id": ME }, "hit": true },
    ])
}

/// A search response body.
pub fn search_page(total: u64, groups: Vec<Value>) -> String {
    json!({ "total_results": total, "messages": groups }).to_string()
}

/// A search response with nothing left.
pub fn search_empty() -> String {
    search_page(0, Vec::new())
}

/// A history message.
pub fn message(id: &str, author_id: &str) -> Value {
    json!({ "id": id, "author": { "id": author_id } })
}

/// A history message carrying reactions.
pub fn message_with_reactions(id: &str, author_id: &str, reactions: Value) -> Value {
    json!({ "id": id, "author": { "id": author_id }, "reactions": reactions })
}

/// A history page body.
pub fn page(messages: Vec<Value>) -> String {
    Value::Array(messages).to_string()
}

/// A guild channel of the given type.
pub fn channel(id: &str, kind: u8) -> Value {
    json!({ "id": id, "type": kind })
}

/// A thread archived at `timestamp`.
pub fn archived_thread(id: &str, timestamp: &str) -> Value {
    json!({
        "id": id,
        "type": 11,
        "thread_metadata": { "archived": true, "archive_timestamp": timestamp },
    })
}

/// A thread listing body.
pub fn thread_list(threads: Vec<Value>, has_more: bool) -> String {
    json!({ "threads": threads, "has_more": has_more }).to_string()
}

/// A one-to-one conversation with `recipient_id`.
pub fn dm(id: &str, recipient_id: &str, recipient_name: &str) -> Value {
    json!({
        "id": id,
        "type": 1,
        "recipients": [{ "id": recipient_id, "username": recipient_name }],
    })
}

/// A relationship of the given type code.
pub fn relationship(user_id: &str, username: &str, kind: u8) -> Value {
    json!({ "id": user_id, "type": kind, "user": { "id": user_id, "username": username } })
}
