use pi_core::config::{API_URL_ENV_VAR, AppConfig};
use pi_core::error::ConfigError;

use serial_test::serial;

#[test]
fn given_missing_file_when_loading_then_returns_defaults() {
    let dir = tempfile::tempdir().unwrap();

    let config = AppConfig::load(dir.path()).unwrap();

    assert_eq!(config, AppConfig::default());
}

/// **VALUE**: Verifies a saved config loads back with the same values.
///
/// **BUG THIS CATCHES**: Would catch if the temp-file rename leaves the config under the
/// temp name, or a field is skipped during serialization.
#[test]
fn given_saved_config_when_loading_then_values_preserved() {
    // GIVEN: A non-default config saved to disk
    let dir = tempfile::tempdir().unwrap();
    let mut config = AppConfig::default();
    config.server.api_base_url = String::from("https://pi.example/api/");
    config.game.max_quiz_position = 500;
    config.save(dir.path()).unwrap();

    // WHEN: Loading
    let loaded = AppConfig::load(dir.path()).unwrap();

    // THEN: Same values, no temp file left behind
    assert_eq!(loaded, config);
    assert!(!dir.path().join("config.json.tmp").exists());
}

#[test]
fn given_corrupt_file_when_loading_then_returns_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("config.json"), "{ nope").unwrap();

    let result = AppConfig::load(dir.path());

    assert!(matches!(result, Err(ConfigError::ParseError { .. })));
}

#[test]
fn given_invalid_config_when_saving_then_nothing_written() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = AppConfig::default();
    config.server.api_base_url = String::from("ftp://pi");

    let result = config.save(dir.path());

    assert!(matches!(result, Err(ConfigError::ValidationError { .. })));
    assert!(!dir.path().join("config.json").exists());
}

/// **VALUE**: Verifies the environment variable overrides the configured API URL.
///
/// **WHY THIS MATTERS**: Deployments point the client at a hosted backend without
/// editing the config file.
#[test]
#[serial]
fn given_env_override_when_applied_then_api_url_replaced() {
    // GIVEN: The override variable set
    // SAFETY: serialized with other env-mutating tests
    unsafe { std::env::set_var(API_URL_ENV_VAR, "https://pi.example/api") };
    let mut config = AppConfig::default();

    // WHEN
    let result = config.apply_env_overrides();
    unsafe { std::env::remove_var(API_URL_ENV_VAR) };

    // THEN
    assert!(result.is_ok());
    assert_eq!(config.server.api_base_url, "https://pi.example/api");
}

#[test]
#[serial]
fn given_invalid_env_override_when_applied_then_validation_fails() {
    // SAFETY: serialized with other env-mutating tests
    unsafe { std::env::set_var(API_URL_ENV_VAR, "pi.example") };
    let mut config = AppConfig::default();

    let result = config.apply_env_overrides();
    unsafe { std::env::remove_var(API_URL_ENV_VAR) };

    assert!(matches!(result, Err(ConfigError::ValidationError { .. })));
}
