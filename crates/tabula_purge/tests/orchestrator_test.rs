//! End-to-end tests for purge phase sequencing.

mod test_utils;

use serde_json::{Value, json};
use std::sync::Arc;
use tabula_discord::MockTransport;
use tabula_purge::{ExclusionSet, PurgeOptions, PurgeOptionsBuilder, PurgeOrchestrator};
use tabula_rate_limit::TabulaConfig;
use test_utils::{
    ME, channel, context, context_with, dm, hit, message, message_with_reactions, page,
    relationship, search_empty, search_page,
};

fn array(values: Vec<Value>) -> String {
    Value::Array(values).to_string()
}

/// Two servers, one open conversation, and two relationships of which one
/// leads back to the open conversation and one to a hidden conversation.
fn scripted_account() -> Arc<MockTransport> {
    let mock = Arc::new(MockTransport::new());

    mock.on(
        "GET",
        "/users/@me/guilds",
        200,
        json!([{ "id": "g1", "name": "Alpha" }, { "id": "g2", "name": "Beta" }]).to_string(),
    );
    mock.on("GET", "/guilds/g1/messages/search", 200, search_page(1, vec![hit("10", "c1")]))
        .on("GET", "/guilds/g1/messages/search", 200, search_empty());
    mock.on("DELETE", "/channels/c1/messages/10", 204, "");
    mock.on("GET", "/guilds/g2/messages/search", 200, search_page(1, vec![hit("11", "c9")]))
        .on("GET", "/guilds/g2/messages/search", 200, search_empty());
    mock.on("DELETE", "/channels/c9/messages/11", 204, "");

    mock.on("GET", "/users/@me/channels", 200, array(vec![dm("d1", "u2", "bob")]));
    mock.on("GET", "/channels/d1/messages/search", 200, search_page(1, vec![hit("20", "d1")]))
        .on("GET", "/channels/d1/messages/search", 200, search_empty());
    mock.on("DELETE", "/channels/d1/messages/20", 204, "");

    mock.on(
        "GET",
        "/users/@me/relationships",
        200,
        array(vec![relationship("u2", "bob", 1), relationship("u3", "eve", 2)]),
    );
    mock.on("POST", "/users/@me/channels", 200, dm("d1", "u2", "bob").to_string())
        .on("POST", "/users/@me/channels", 200, dm("d2", "u3", "eve").to_string());
    mock.on("GET", "/channels/d2/messages/search", 200, search_page(1, vec![hit("30", "d2")]))
        .on("GET", "/channels/d2/messages/search", 200, search_empty());
    mock.on("DELETE", "/channels/d2/messages/30", 204, "");

    mock.on("GET", "/guilds/g1/channels", 200, array(vec![channel("c1", 0)]));
    mock.on(
        "GET",
        "/channels/c1/messages",
        200,
        page(vec![message_with_reactions(
            "5",
            "someone",
            json!([{ "count": 3, "me": true, "emoji": { "name": "ok" } }]),
        )]),
    );
    mock.on("DELETE", "/channels/c1/messages/5/reactions/ok/@me", 204, "");
    mock.on(
        "GET",
        "/channels/d2/messages",
        200,
        page(vec![message_with_reactions(
            "31",
            "u3",
            json!([{ "count": 1, "me": true, "emoji": { "name": "hi" } }]),
        )]),
    );
    mock.on("DELETE", "/channels/d2/messages/31/reactions/hi/@me", 204, "");

    mock
}

fn excluding_guild(guild_id: &str) -> PurgeOptions {
    let mut exclusions = ExclusionSet::new();
    exclusions.exclude_guild(guild_id);
    PurgeOptionsBuilder::default()
        .exclusions(exclusions)
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_full_run_counts_every_phase() {
    let mock = scripted_account();
    let ctx = context(&mock);

    let stats = PurgeOrchestrator::new(&ctx, excluding_guild("g2")).run().await;

    assert_eq!(*stats.messages_deleted(), 3);
    assert_eq!(*stats.dm_messages_deleted(), 2);
    assert_eq!(*stats.reactions_removed(), 2);
    assert_eq!(*stats.conversations_processed(), 2);
    assert_eq!(stats.guilds_processed(), 1);

    let alpha = &stats.guilds()[0];
    assert_eq!(alpha.name(), "Alpha");
    assert_eq!(*alpha.messages(), 1);
    assert_eq!(*alpha.reactions(), 1);
}

#[tokio::test]
async fn test_excluded_guild_is_never_touched() {
    let mock = scripted_account();
    let ctx = context(&mock);

    PurgeOrchestrator::new(&ctx, excluding_guild("g2")).run().await;

    assert!(mock.calls_to("GET", "/guilds/g2/messages/search").is_empty());
    assert!(mock.calls_to("GET", "/guilds/g2/channels").is_empty());
    assert!(mock.calls_to("DELETE", "/channels/c9/messages/11").is_empty());
}

#[tokio::test]
async fn test_conversation_reached_twice_is_walked_once() {
    let mock = scripted_account();
    let ctx = context(&mock);

    PurgeOrchestrator::new(&ctx, PurgeOptions::default()).run().await;

    assert_eq!(mock.calls_to("GET", "/channels/d1/messages/search").len(), 2);
    assert_eq!(mock.calls_to("DELETE", "/channels/d1/messages/20").len(), 1);
    assert_eq!(mock.calls_to("POST", "/users/@me/channels").len(), 2);
}

#[tokio::test]
async fn test_excluded_conversation_is_neither_walked_nor_swept() {
    let mock = scripted_account();
    let ctx = context(&mock);
    let mut exclusions = ExclusionSet::new();
    exclusions.exclude_conversation("d1");
    exclusions.exclude_conversation("d2");
    let options = PurgeOptionsBuilder::default()
        .exclusions(exclusions)
        .build()
        .unwrap();

    let stats = PurgeOrchestrator::new(&ctx, options).run().await;

    assert_eq!(*stats.dm_messages_deleted(), 0);
    assert_eq!(*stats.conversations_processed(), 0);
    assert!(mock.calls_to("GET", "/channels/d1/messages/search").is_empty());
    assert!(mock.calls_to("GET", "/channels/d2/messages").is_empty());
}

#[tokio::test]
async fn test_export_conversations_fall_back_to_history() {
    let mock = scripted_account();
    mock.on("GET", "/channels/d7/messages/search", 202, "{}");
    mock.on("GET", "/channels/d7/messages", 200, page(vec![message("70", ME)]));
    mock.on("DELETE", "/channels/d7/messages/70", 204, "");
    let mut config = TabulaConfig::default();
    config.search.max_index_waits = 2;
    let ctx = context_with(&mock, config);

    let dir = tempfile::tempdir().unwrap();
    let index = dir.path().join("index.json");
    std::fs::write(&index, r#"{"d1":"Direct Message with bob","d7":"Unknown channel"}"#).unwrap();
    let options = PurgeOptionsBuilder::default()
        .export_path(index)
        .build()
        .unwrap();

    let stats = PurgeOrchestrator::new(&ctx, options).run().await;

    assert_eq!(*stats.conversations_processed(), 3);
    assert_eq!(*stats.dm_messages_deleted(), 3);
    assert_eq!(mock.calls_to("GET", "/channels/d1/messages/search").len(), 2);
    assert_eq!(mock.calls_to("DELETE", "/channels/d7/messages/70").len(), 1);
}

#[tokio::test]
async fn test_missing_export_does_not_stop_the_run() {
    let mock = scripted_account();
    let ctx = context(&mock);
    let options = PurgeOptionsBuilder::default()
        .export_path("/nonexistent/tabula/export")
        .build()
        .unwrap();

    let stats = PurgeOrchestrator::new(&ctx, options).run().await;

    assert_eq!(*stats.reactions_removed(), 2);
}

#[tokio::test]
async fn test_listing_failures_yield_empty_stats() {
    let mock = Arc::new(MockTransport::new());
    mock.on("GET", "/users/@me/guilds", 500, "{}")
        .on("GET", "/users/@me/channels", 500, "{}")
        .on("GET", "/users/@me/relationships", 500, "{}");
    let ctx = context(&mock);

    let stats = PurgeOrchestrator::new(&ctx, PurgeOptions::default()).run().await;

    assert_eq!(*stats.messages_deleted(), 0);
    assert_eq!(stats.guilds_processed(), 0);
    assert_eq!(*stats.conversations_processed(), 0);
}
