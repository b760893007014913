//! Integration tests for configuration loader
//!
//! Tests the end-to-end behavior of loading configuration from files.

use std::path::PathBuf;
use std::time::Duration;

use courier_domain::{BackoffKind, ConfigError};
use courier_infra::config;
use tempfile::TempDir;

fn write_config(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, contents).expect("Failed to write config file");
    path
}

#[test]
fn test_load_config_from_json_file() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = write_config(
        &dir,
        "courier.json",
        r#"{
            "base_url": "https://api.example.com",
            "headers": { "X-Client": "courier", "Accept": "application/json" },
            "timeout_ms": 5000,
            "retry": {
                "attempts": 5,
                "backoff": "exponential",
                "initial_delay_ms": 250,
                "max_delay_ms": 4000,
                "retry_on": [502, 503]
            }
        }"#,
    );

    let config = config::load_from_file(Some(path)).expect("Failed to load config from JSON file");

    assert_eq!(config.base_url.as_deref(), Some("https://api.example.com"));
    assert_eq!(config.headers.get("x-client"), Some("courier"));
    assert_eq!(config.timeout(), Some(Duration::from_secs(5)));

    let retry = config.retry.expect("retry policy");
    assert_eq!(retry.attempts, 5);
    assert_eq!(retry.backoff, BackoffKind::Exponential);
    assert_eq!(retry.initial_delay(), Duration::from_millis(250));
    assert!(retry.is_retryable_status(502));
    assert!(!retry.is_retryable_status(500));
}

#[test]
fn test_load_config_from_toml_file() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = write_config(
        &dir,
        "courier.toml",
        r#"
base_url = "https://toml.example.com"
timeout_ms = 1500

[headers]
X-Client = "courier"

[retry]
attempts = 2
backoff = "linear"
"#,
    );

    let config = config::load_from_file(Some(path)).expect("Failed to load config from TOML file");

    assert_eq!(config.base_url.as_deref(), Some("https://toml.example.com"));
    assert_eq!(config.timeout_ms, Some(1500));
    assert_eq!(config.headers.get("X-CLIENT"), Some("courier"));

    let retry = config.retry.expect("retry policy");
    assert_eq!(retry.attempts, 2);
    assert_eq!(retry.backoff, BackoffKind::Linear);
    // unset fields keep their defaults
    assert_eq!(retry.max_delay(), Duration::from_secs(30));
    assert!(retry.is_retryable_status(429));
}

#[test]
fn test_partial_file_uses_defaults() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = write_config(&dir, "config.json", "{}");

    let config = config::load_from_file(Some(path)).expect("Failed to load empty config");

    assert!(config.base_url.is_none());
    assert!(config.headers.is_empty());
    assert!(config.retry.is_none());
    assert!(config.timeout_ms.is_none());
}

#[test]
fn test_missing_file_is_not_found() {
    let result = config::load_from_file(Some(PathBuf::from("/nonexistent/courier.json")));
    assert!(matches!(result, Err(ConfigError::NotFound(_))), "got {result:?}");
}

#[test]
fn test_invalid_json_is_parse_error() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = write_config(&dir, "courier.json", r#"{ "base_url": "#);

    let result = config::load_from_file(Some(path));
    assert!(matches!(result, Err(ConfigError::Parse(_))), "got {result:?}");
}

#[test]
fn test_unknown_backoff_is_parse_error() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = write_config(&dir, "courier.toml", "[retry]\nbackoff = \"fibonacci\"\n");

    let result = config::load_from_file(Some(path));
    assert!(matches!(result, Err(ConfigError::Parse(_))), "got {result:?}");
}

#[test]
fn test_invalid_policy_is_rejected() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = write_config(&dir, "courier.json", r#"{ "retry": { "attempts": 0 } }"#);

    let result = config::load_from_file(Some(path));
    assert!(matches!(result, Err(ConfigError::Invalid(_))), "got {result:?}");
}

#[test]
fn test_zero_timeout_is_rejected() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = write_config(&dir, "courier.toml", "timeout_ms = 0\n");

    let result = config::load_from_file(Some(path));
    assert!(matches!(result, Err(ConfigError::Invalid(_))), "got {result:?}");
}

#[test]
fn test_invalid_header_is_parse_error() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path =
        write_config(&dir, "courier.json", r#"{ "headers": { "X-Client": "line\nbreak" } }"#);

    let result = config::load_from_file(Some(path));
    assert!(matches!(result, Err(ConfigError::Parse(_))), "got {result:?}");
}
