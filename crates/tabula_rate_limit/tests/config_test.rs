//! Tests for the layered configuration.

use std::io::Write;
use std::time::Duration;
use tabula_rate_limit::{Pace, PacingConfig, TabulaConfig};

#[test]
fn test_bundled_defaults_match_code_defaults() {
    let loaded = TabulaConfig::from_file(empty_toml().path()).unwrap();
    assert_eq!(loaded, TabulaConfig::default());
}

#[test]
fn test_default_values() {
    let config = TabulaConfig::default();

    assert_eq!(config.api.base_url, "https://discord.com/api/v9");
    assert_eq!(config.retry.max_retries, 5);
    assert_eq!(config.retry.max_attempts(), 6);
    assert_eq!(config.search.max_index_waits, 40);
    assert_eq!(config.search.index_wait(), Duration::from_secs(3));
    assert!(config.search.deep_scan_on_empty);
    assert_eq!(config.paging.history_page_size, 100);
    assert_eq!(config.paging.guild_page_size, 200);
    assert_eq!(config.pacing.duration(Pace::Delete), Duration::from_millis(350));
    assert_eq!(
        config.pacing.duration(Pace::ErrorBackoff),
        Duration::from_millis(1250)
    );
    assert_eq!(
        config.pacing.duration(Pace::Membership),
        Duration::from_millis(500)
    );
}

#[test]
fn test_file_overrides_selected_values() {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(
        file,
        r#"
[pacing]
delete_ms = 900

[search]
deep_scan_on_empty = false
"#
    )
    .unwrap();

    let config = TabulaConfig::from_file(file.path()).unwrap();

    assert_eq!(config.pacing.delete_ms, 900);
    assert!(!config.search.deep_scan_on_empty);
    // Untouched values keep their bundled defaults
    assert_eq!(config.pacing.search_ms, 350);
    assert_eq!(config.retry.route_floors.len(), 1);
}

#[test]
fn test_missing_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = TabulaConfig::from_file(dir.path().join("absent.toml"));
    assert!(result.is_err());
}

#[test]
fn test_malformed_value_is_an_error() {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(file, "[retry]\nmax_retries = \"many\"").unwrap();

    let err = TabulaConfig::from_file(file.path()).unwrap_err();
    assert!(err.to_string().contains("Configuration Error"));
}

#[test]
fn test_without_pacing_zeroes_every_delay() {
    let config = TabulaConfig::default().without_pacing();

    assert_eq!(config.pacing, PacingConfig::none());
    assert_eq!(config.search.index_wait(), Duration::ZERO);
    assert_eq!(config.retry.max_retries, 5);
}

fn empty_toml() -> tempfile::NamedTempFile {
    tempfile::Builder::new().suffix(".toml").tempfile().unwrap()
}
