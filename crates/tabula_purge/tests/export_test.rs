//! Tests for reading conversation IDs from a data export.

use std::fs;
use tabula_purge::load_conversation_ids;

const INDEX: &str = r#"{
    "300": "Direct Message with bob",
    "100": null,
    "200": "general in Alpha"
}"#;

#[tokio::test]
async fn test_reads_index_file_directly() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("index.json");
    fs::write(&path, INDEX).unwrap();

    let ids = load_conversation_ids(&path).await.unwrap();

    assert_eq!(ids, vec!["100", "200", "300"]);
}

#[tokio::test]
async fn test_reads_index_from_export_root() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir_all(dir.path().join("messages")).unwrap();
    fs::write(dir.path().join("messages/index.json"), INDEX).unwrap();

    let ids = load_conversation_ids(dir.path()).await.unwrap();

    assert_eq!(ids.len(), 3);
}

#[tokio::test]
async fn test_export_root_without_index_is_an_error() {
    let dir = tempfile::tempdir().unwrap();

    let err = load_conversation_ids(dir.path()).await.unwrap_err();

    assert!(err.to_string().contains("messages/index.json"));
}

#[tokio::test]
async fn test_missing_path_is_an_error() {
    let dir = tempfile::tempdir().unwrap();

    let err = load_conversation_ids(dir.path().join("absent"))
        .await
        .unwrap_err();

    assert!(err.to_string().contains("Cannot access path"));
}

#[tokio::test]
async fn test_malformed_index_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("index.json");
    fs::write(&path, r#"["not", "an", "object"]"#).unwrap();

    let err = load_conversation_ids(&path).await.unwrap_err();

    assert!(err.to_string().contains("Failed to parse index.json"));
}

#[tokio::test]
async fn test_empty_index_yields_no_ids() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("index.json");
    fs::write(&path, "{}").unwrap();

    assert!(load_conversation_ids(&path).await.unwrap().is_empty());
}
