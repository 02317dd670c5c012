use converter_core::DEFAULT_API_BASE;
use converter_core::config::{API_BASE_ENV, CONFIG_DIR_ENV, ConverterConfig, resolve_config_dir};
use converter_core::error::config::ConfigError;

use std::time::Duration;

use serial_test::serial;
use tempfile::TempDir;

/// **VALUE**: Verifies a missing config file yields defaults pointing at the public feed.
///
/// **WHY THIS MATTERS**: First launch has no config file.
#[test]
fn given_empty_dir_when_config_loaded_then_returns_defaults() {
    let dir = TempDir::new().unwrap();

    let config = ConverterConfig::load(dir.path()).unwrap();

    assert_eq!(config, ConverterConfig::default());
    assert_eq!(config.api_base, DEFAULT_API_BASE);
    assert_eq!(config.request_timeout(), Duration::from_secs(30));
}

/// **VALUE**: Verifies saved config is read back and the temp file is gone.
///
/// **BUG THIS CATCHES**: Would catch the atomic rename leaving `config.json.tmp` behind.
#[test]
fn given_saved_config_when_loaded_then_values_match() {
    let dir = TempDir::new().unwrap();
    let config = ConverterConfig {
        api_base: "http://127.0.0.1:9000/v1/currencies".to_string(),
        request_timeout_secs: 5,
        ..ConverterConfig::default()
    };

    config.save(dir.path()).unwrap();
    let loaded = ConverterConfig::load(dir.path()).unwrap();

    assert_eq!(loaded, config);
    assert!(!dir.path().join("config.json.tmp").exists());
}

/// **VALUE**: Verifies first launch writes a default `config.json`, and later
/// launches read the file instead of overwriting it.
///
/// **WHY THIS MATTERS**: The binary starts through `load_or_create`. Users find
/// the feed URL and timeout in the written file and edit them there.
///
/// **BUG THIS CATCHES**: Would catch defaults never reaching disk, or a
/// user-edited file being replaced by defaults on the next start.
#[test]
fn given_missing_config_when_loaded_or_created_then_defaults_written_and_kept() {
    // GIVEN: A config directory that does not exist yet
    let dir = TempDir::new().unwrap();
    let config_dir = dir.path().join("fxconv");

    // WHEN: Starting for the first time
    let created = ConverterConfig::load_or_create(&config_dir).unwrap();

    // THEN: Defaults are returned and written
    assert_eq!(created, ConverterConfig::default());
    let config_path = config_dir.join("config.json");
    assert!(config_path.exists());
    assert_eq!(ConverterConfig::load(&config_dir).unwrap(), created);

    // WHEN: The user edits the file and starts again
    std::fs::write(&config_path, r#"{ "version": 1, "request_timeout_secs": 7 }"#).unwrap();
    let reloaded = ConverterConfig::load_or_create(&config_dir).unwrap();

    // THEN: The edit survives
    assert_eq!(reloaded.request_timeout_secs, 7);
    assert_eq!(reloaded.api_base, DEFAULT_API_BASE);
    assert!(std::fs::read_to_string(&config_path).unwrap().contains("7"));
}

/// **VALUE**: Verifies omitted fields fall back to their defaults.
#[test]
fn given_partial_config_file_when_loaded_then_missing_fields_defaulted() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("config.json"), r#"{"request_timeout_secs": 3}"#).unwrap();

    let config = ConverterConfig::load(dir.path()).unwrap();

    assert_eq!(config.request_timeout_secs, 3);
    assert_eq!(config.api_base, DEFAULT_API_BASE);
}

#[test]
fn given_corrupt_config_file_when_loaded_then_parse_error() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("config.json"), "{ not json").unwrap();

    let result = ConverterConfig::load(dir.path());

    assert!(matches!(result, Err(ConfigError::ParseError { .. })));
}

/// **VALUE**: Verifies invalid values are rejected on load and on save.
///
/// **BUG THIS CATCHES**: Would catch a zero timeout (every request fails
/// instantly) or a non-HTTP base slipping through.
#[test]
fn given_invalid_values_when_validated_then_validation_error() {
    let bad_url = ConverterConfig {
        api_base: "ftp://example.com".to_string(),
        ..ConverterConfig::default()
    };
    let zero_timeout = ConverterConfig {
        request_timeout_secs: 0,
        ..ConverterConfig::default()
    };
    let future_version = ConverterConfig {
        version: 99,
        ..ConverterConfig::default()
    };

    for config in [bad_url, zero_timeout, future_version] {
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError { .. })
        ));
    }

    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("config.json"),
        r#"{"api_base": "not-a-url"}"#,
    )
    .unwrap();
    assert!(matches!(
        ConverterConfig::load(dir.path()),
        Err(ConfigError::ValidationError { .. })
    ));
}

/// **VALUE**: Verifies the environment can point the converter at another feed.
///
/// **WHY THIS MATTERS**: Used to run against a mirror or a local mock feed.
#[test]
#[serial]
fn given_api_base_env_when_overrides_applied_then_api_base_replaced() {
    // SAFETY: serialized with other env-mutating tests
    unsafe { std::env::set_var(API_BASE_ENV, "http://localhost:8080/currencies") };

    let config = ConverterConfig::default().apply_env_overrides();

    unsafe { std::env::remove_var(API_BASE_ENV) };
    assert_eq!(
        config.unwrap().api_base,
        "http://localhost:8080/currencies"
    );
}

#[test]
#[serial]
fn given_invalid_api_base_env_when_overrides_applied_then_validation_error() {
    // SAFETY: serialized with other env-mutating tests
    unsafe { std::env::set_var(API_BASE_ENV, "localhost") };

    let result = ConverterConfig::default().apply_env_overrides();

    unsafe { std::env::remove_var(API_BASE_ENV) };
    assert!(matches!(result, Err(ConfigError::ValidationError { .. })));
}

#[test]
#[serial]
fn given_config_dir_env_when_resolved_then_uses_override() {
    let dir = TempDir::new().unwrap();
    // SAFETY: serialized with other env-mutating tests
    unsafe { std::env::set_var(CONFIG_DIR_ENV, dir.path()) };

    let resolved = resolve_config_dir();

    unsafe { std::env::remove_var(CONFIG_DIR_ENV) };
    assert_eq!(resolved.unwrap(), dir.path());
}
