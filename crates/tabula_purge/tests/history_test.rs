//! Tests for history paging and the history-scan deleter.

mod test_utils;

use std::sync::Arc;
use tabula_discord::MockTransport;
use tabula_purge::{HistoryPages, HistoryScanDeleter, WalkReport};
use tabula_rate_limit::TabulaConfig;
use test_utils::{ME, OTHER, context, context_with, message, page};

const HISTORY: &str = "/channels/c1/messages";

fn small_pages() -> TabulaConfig {
    let mut config = TabulaConfig::default();
    config.paging.history_page_size = 2;
    config
}

#[tokio::test]
async fn test_pages_until_short_page() {
    let mock = Arc::new(MockTransport::new());
    mock.on("GET", HISTORY, 200, page(vec![message("m4", ME), message("m3", OTHER)]))
        .on("GET", HISTORY, 200, page(vec![message("m2", ME)]));
    let ctx = context_with(&mock, small_pages());

    let mut pages = HistoryPages::new(&ctx, "c1");
    let first = pages.next_page().await.unwrap().unwrap();
    let second = pages.next_page().await.unwrap().unwrap();
    let third = pages.next_page().await.unwrap();

    assert_eq!(first.len(), 2);
    assert_eq!(second.len(), 1);
    assert!(third.is_none());

    let calls = mock.calls_to("GET", HISTORY);
    assert_eq!(calls.len(), 2);
    assert!(calls[0].path.ends_with("?limit=2"));
    assert!(calls[1].path.ends_with("&before=m3"));
}

#[tokio::test]
async fn test_empty_history_yields_nothing() {
    let mock = Arc::new(MockTransport::new());
    mock.on("GET", HISTORY, 200, "[]");
    let ctx = context(&mock);

    let mut pages = HistoryPages::new(&ctx, "c1");

    assert!(pages.next_page().await.unwrap().is_none());
    assert!(pages.next_page().await.unwrap().is_none());
    assert_eq!(mock.calls().len(), 1);
}

#[tokio::test]
async fn test_scan_deletes_only_own_messages() {
    let mock = Arc::new(MockTransport::new());
    mock.on("GET", HISTORY, 200, page(vec![message("m4", ME), message("m3", OTHER)]))
        .on("GET", HISTORY, 200, page(vec![message("m2", ME)]));
    mock.on("DELETE", "/channels/c1/messages/m4", 204, "")
        .on("DELETE", "/channels/c1/messages/m2", 404, r#"{"message":"Unknown Message","code":10008}"#);
    let ctx = context_with(&mock, small_pages());

    let mut report = WalkReport::default();
    HistoryScanDeleter::new(&ctx).scan("c1", &mut report).await.unwrap();

    assert_eq!(report.deleted, 2);
    assert!(mock.calls_to("DELETE", "/channels/c1/messages/m3").is_empty());
}

#[tokio::test]
async fn test_unreadable_history_is_not_an_error() {
    let mock = Arc::new(MockTransport::new());
    mock.on("GET", HISTORY, 403, r#"{"message":"Missing Access","code":50001}"#);
    let ctx = context(&mock);

    let mut report = WalkReport::default();
    HistoryScanDeleter::new(&ctx).scan("c1", &mut report).await.unwrap();

    assert_eq!(report, WalkReport::default());
}

#[tokio::test]
async fn test_unknown_channel_ends_quietly() {
    let mock = Arc::new(MockTransport::new());
    let ctx = context(&mock);

    let mut report = WalkReport::default();
    HistoryScanDeleter::new(&ctx).scan("c1", &mut report).await.unwrap();

    assert_eq!(report.deleted, 0);
}

#[tokio::test]
async fn test_unexpected_history_status_is_an_error() {
    let mock = Arc::new(MockTransport::new());
    mock.on("GET", HISTORY, 500, "oops");
    let ctx = context(&mock);

    let mut report = WalkReport::default();
    let err = HistoryScanDeleter::new(&ctx)
        .scan("c1", &mut report)
        .await
        .unwrap_err();

    assert!(err.to_string().contains("HTTP 500"));
}

#[tokio::test]
async fn test_failed_delete_is_not_counted() {
    let mock = Arc::new(MockTransport::new());
    mock.on("GET", HISTORY, 200, page(vec![message("m4", ME), message("m3", ME)]));
    mock.on("DELETE", "/channels/c1/messages/m4", 403, "{}")
        .on("DELETE", "/channels/c1/messages/m3", 204, "");
    let ctx = context(&mock);

    let mut report = WalkReport::default();
    HistoryScanDeleter::new(&ctx).scan("c1", &mut report).await.unwrap();

    assert_eq!(report.deleted, 1);
}
