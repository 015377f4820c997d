//! Tests for server container discovery.

mod test_utils;

use serde_json::Value;
use std::sync::Arc;
use tabula_discord::MockTransport;
use tabula_purge::ContainerDiscovery;
use test_utils::{archived_thread, channel, context, thread_list};

fn listing(channels: Vec<Value>) -> String {
    Value::Array(channels).to_string()
}

#[tokio::test]
async fn test_discovers_channels_and_threads_without_duplicates() {
    let mock = Arc::new(MockTransport::new());
    mock.on(
        "GET",
        "/guilds/g1/channels",
        200,
        listing(vec![
            channel("c1", 0),
            channel("cat", 4),
            channel("f1", 15),
            channel("v1", 2),
        ]),
    );
    mock.on(
        "GET",
        "/guilds/g1/threads/active",
        200,
        thread_list(vec![channel("t1", 11)], false),
    );
    mock.on(
        "GET",
        "/channels/f1/threads/archived/public",
        200,
        thread_list(
            vec![
                archived_thread("t2", "2024-02-01T00:00:00+00:00"),
                archived_thread("t1", "2024-01-01T00:00:00+00:00"),
            ],
            true,
        ),
    )
    .on(
        "GET",
        "/channels/f1/threads/archived/public",
        200,
        thread_list(vec![archived_thread("t3", "2023-12-01T00:00:00+00:00")], false),
    );
    let ctx = context(&mock);

    let containers = ContainerDiscovery::new(&ctx).discover("g1").await;

    assert_eq!(containers, vec!["c1", "v1", "t1", "t2", "t3"]);

    let archive_calls = mock.calls_to("GET", "/channels/f1/threads/archived/public");
    assert_eq!(archive_calls.len(), 2);
    assert!(
        archive_calls[1]
            .path
            .ends_with("&before=2024-01-01T00%3A00%3A00%2B00%3A00")
    );
}

#[tokio::test]
async fn test_lists_every_archive_scope_per_parent() {
    let mock = Arc::new(MockTransport::new());
    mock.on("GET", "/guilds/g1/channels", 200, listing(vec![channel("c1", 0)]));
    let ctx = context(&mock);

    ContainerDiscovery::new(&ctx).discover("g1").await;

    for route in [
        "/channels/c1/threads/archived/public",
        "/channels/c1/threads/archived/private",
        "/channels/c1/users/@me/threads/archived/private",
    ] {
        assert_eq!(mock.calls_to("GET", route).len(), 1, "{}", route);
    }
}

#[tokio::test]
async fn test_forbidden_archives_are_skipped() {
    let mock = Arc::new(MockTransport::new());
    mock.on("GET", "/guilds/g1/channels", 200, listing(vec![channel("c1", 0)]));
    mock.on(
        "GET",
        "/channels/c1/threads/archived/private",
        403,
        r#"{"message":"Missing Access","code":50001}"#,
    );
    mock.on(
        "GET",
        "/channels/c1/users/@me/threads/archived/private",
        200,
        thread_list(vec![archived_thread("t9", "2024-01-01T00:00:00+00:00")], false),
    );
    let ctx = context(&mock);

    let containers = ContainerDiscovery::new(&ctx).discover("g1").await;

    assert_eq!(containers, vec!["c1", "t9"]);
}

#[tokio::test]
async fn test_channel_listing_failure_keeps_active_threads() {
    let mock = Arc::new(MockTransport::new());
    mock.on("GET", "/guilds/g1/channels", 403, "{}");
    mock.on(
        "GET",
        "/guilds/g1/threads/active",
        200,
        thread_list(vec![channel("t1", 11)], false),
    );
    let ctx = context(&mock);

    let containers = ContainerDiscovery::new(&ctx).discover("g1").await;

    assert_eq!(containers, vec!["t1"]);
}

#[tokio::test]
async fn test_transport_failures_yield_empty_discovery() {
    let mock = Arc::new(MockTransport::new());
    mock.fail("GET", "/guilds/g1/channels", "connection refused")
        .fail("GET", "/guilds/g1/threads/active", "connection refused");
    let ctx = context(&mock);

    let containers = ContainerDiscovery::new(&ctx).discover("g1").await;

    assert!(containers.is_empty());
}

#[tokio::test]
async fn test_archive_listing_stops_when_cursor_repeats() {
    let mock = Arc::new(MockTransport::new());
    mock.on("GET", "/guilds/g1/channels", 200, listing(vec![channel("c1", 0)]));
    // Sticky page that always claims more results behind the same timestamp
    mock.on(
        "GET",
        "/channels/c1/threads/archived/public",
        200,
        thread_list(vec![archived_thread("t1", "2024-01-01T00:00:00+00:00")], true),
    );
    let ctx = context(&mock);

    let containers = ContainerDiscovery::new(&ctx).discover("g1").await;

    assert_eq!(containers, vec!["c1", "t1"]);
    assert_eq!(
        mock.calls_to("GET", "/channels/c1/threads/archived/public").len(),
        2
    );
}
