//! Tests for post-purge account cleanup.

mod test_utils;

use serde_json::{Value, json};
use std::sync::Arc;
use tabula_discord::MockTransport;
use tabula_purge::AccountCleanup;
use test_utils::{context, relationship};

#[tokio::test]
async fn test_removes_friends_only() {
    let mock = Arc::new(MockTransport::new());
    mock.on(
        "GET",
        "/users/@me/relationships",
        200,
        Value::Array(vec![
            relationship("u2", "bob", 1),
            relationship("u3", "eve", 2),
            relationship("u4", "mal", 3),
            relationship("u5", "amy", 1),
        ])
        .to_string(),
    );
    mock.on("DELETE", "/users/@me/relationships/u2", 204, "")
        .on("DELETE", "/users/@me/relationships/u5", 500, "{}");
    let ctx = context(&mock);

    let removed = AccountCleanup::new(&ctx).remove_all_friends().await.unwrap();

    assert_eq!(removed, 1);
    assert_eq!(mock.count_prefixed("DELETE", "/users/@me/relationships/"), 2);
    assert!(mock.calls_to("DELETE", "/users/@me/relationships/u3").is_empty());
}

#[tokio::test]
async fn test_leaves_every_guild() {
    let mock = Arc::new(MockTransport::new());
    mock.on(
        "GET",
        "/users/@me/guilds",
        200,
        json!([{ "id": "g1", "name": "Alpha" }, { "id": "g2", "name": "Beta" }]).to_string(),
    );
    mock.on("DELETE", "/users/@me/guilds/g1", 204, "")
        .on("DELETE", "/users/@me/guilds/g2", 204, "");
    let ctx = context(&mock);

    let left = AccountCleanup::new(&ctx).leave_all_guilds().await.unwrap();

    assert_eq!(left, 2);
}

#[tokio::test]
async fn test_listing_failure_is_an_error() {
    let mock = Arc::new(MockTransport::new());
    mock.on("GET", "/users/@me/relationships", 500, "{}");
    let ctx = context(&mock);

    assert!(AccountCleanup::new(&ctx).remove_all_friends().await.is_err());
}
