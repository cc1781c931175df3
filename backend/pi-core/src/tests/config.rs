// Unit tests for config validation

use crate::DEFAULT_API_BASE_URL;
use crate::config::AppConfig;
use crate::error::config::ConfigError;

/// **VALUE**: Verifies the defaults point at the local backend and pass validation.
///
/// **WHY THIS MATTERS**: A first run has no config file; defaults must be usable as-is.
///
/// **BUG THIS CATCHES**: Would catch a default that fails its own validation.
#[test]
fn given_default_config_when_validated_then_passes() {
    // GIVEN: Default config
    let config = AppConfig::default();

    // WHEN / THEN
    assert!(config.validate().is_ok());
    assert_eq!(config.server.api_base_url, DEFAULT_API_BASE_URL);
    assert_eq!(DEFAULT_API_BASE_URL, "http://localhost:8000/api/");
}

#[test]
fn given_non_http_url_when_validated_then_returns_validation_error() {
    let mut config = AppConfig::default();
    config.server.api_base_url = String::from("localhost:8000");

    let result = config.validate();

    assert!(matches!(result, Err(ConfigError::ValidationError { .. })));
}

#[test]
fn given_future_version_when_validated_then_returns_validation_error() {
    let mut config = AppConfig::default();
    config.version = 2;

    assert!(config.validate().is_err());
}

#[test]
fn given_zero_timeout_when_validated_then_returns_validation_error() {
    let mut config = AppConfig::default();
    config.server.request_timeout_secs = 0;

    assert!(config.validate().is_err());
}

/// **VALUE**: Verifies that a too-fast poll interval is rejected.
///
/// **WHY THIS MATTERS**: The high score watcher reads a file every tick; a 0 ms interval
/// would spin on the filesystem.
#[test]
fn given_tiny_poll_interval_when_validated_then_returns_validation_error() {
    let mut config = AppConfig::default();
    config.game.high_score_poll_ms = 10;

    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("high_score_poll_ms"));
}

#[test]
fn given_partial_json_when_parsed_then_missing_sections_use_defaults() {
    let config: AppConfig =
        serde_json::from_str(r#"{"server": {"api_base_url": "https://pi.example/api"}}"#)
            .unwrap();

    assert_eq!(config.version, 1);
    assert_eq!(config.server.api_base_url, "https://pi.example/api");
    assert_eq!(config.server.request_timeout_secs, 30);
    assert_eq!(config.game.max_quiz_position, 100);
}
