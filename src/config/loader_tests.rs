//! Tests for configuration file loading.

use super::*;
use serial_test::serial;
use std::env;
use std::fs;

#[test]
fn default_config_path_contains_pagefeed_config_toml() {
    let path = default_config_path().expect("Should have default path");
    let path_str = path.to_string_lossy();
    assert!(
        path_str.contains("pagefeed") && path_str.ends_with("config.toml"),
        "Path should contain 'pagefeed' and end with 'config.toml', got: {}",
        path_str
    );
}

#[test]
fn default_log_path_ends_with_pagefeed_log() {
    let path = default_log_path();
    assert!(
        path.to_string_lossy().ends_with("pagefeed.log"),
        "Default log path should end with 'pagefeed.log', got: {:?}",
        path
    );
}

#[test]
fn load_config_file_returns_ok_none_for_missing_file() {
    let result = load_config_file("/nonexistent/path/to/config.toml");
    assert_eq!(
        result,
        Ok(None),
        "Missing config file should return Ok(None), not an error"
    );
}

#[test]
fn load_config_file_parses_valid_toml() {
    let temp_dir = env::temp_dir();
    let config_path = temp_dir.join("pagefeed_test_config.toml");

    let toml_content = r#"
page_size = 25
debounce_ms = 500
rearm_delay_ms = 50

[sentinel]
root_margin = 200
intersection_threshold = 0.75
"#;

    fs::write(&config_path, toml_content).expect("Failed to write test config");

    let config = load_config_file(&config_path)
        .expect("Should successfully parse valid TOML")
        .expect("Should return Some(ConfigFile) for existing file");
    assert_eq!(config.page_size, Some(25));
    assert_eq!(config.debounce_ms, Some(500));
    assert_eq!(config.rearm_delay_ms, Some(50));
    let sentinel = config.sentinel.expect("sentinel section present");
    assert_eq!(sentinel.root_margin, Some(200));
    assert_eq!(sentinel.intersection_threshold, Some(0.75));

    fs::remove_file(config_path).ok();
}

#[test]
fn load_config_file_returns_error_for_invalid_toml() {
    let temp_dir = env::temp_dir();
    let config_path = temp_dir.join("pagefeed_test_invalid.toml");

    let invalid_toml = "this is not valid TOML ][}{";
    fs::write(&config_path, invalid_toml).expect("Failed to write invalid test config");

    let result = load_config_file(&config_path);
    match result {
        Err(ConfigError::ParseError { path, reason: _ }) => {
            assert_eq!(path, config_path);
        }
        _ => panic!("Expected ParseError, got {:?}", result),
    }

    fs::remove_file(config_path).ok();
}

#[test]
fn unknown_keys_are_rejected() {
    let temp_dir = env::temp_dir();
    let config_path = temp_dir.join("pagefeed_test_unknown.toml");

    fs::write(&config_path, "page_sise = 10\n").expect("Failed to write test config");

    let result = load_config_file(&config_path);
    assert!(
        matches!(result, Err(ConfigError::ParseError { .. })),
        "A misspelled key should fail loudly rather than be ignored"
    );

    fs::remove_file(config_path).ok();
}

#[test]
fn merge_config_uses_defaults_for_missing_fields() {
    let config_file = ConfigFile {
        page_size: Some(25),
        debounce_ms: None,
        rearm_delay_ms: None,
        log_file_path: None,
        sentinel: None,
    };

    let resolved = merge_config(Some(config_file));
    assert_eq!(resolved.page_size, 25);
    assert_eq!(resolved.debounce_quiet, Duration::from_millis(300));
    assert_eq!(resolved.rearm_delay, Duration::from_millis(100));
    assert_eq!(resolved.sentinel, SentinelTuning::default());
    assert_eq!(resolved.log_file_path, default_log_path());
}

#[test]
fn merge_config_without_file_is_all_defaults() {
    assert_eq!(merge_config(None), ResolvedConfig::default());
}

#[test]
fn partial_sentinel_section_keeps_other_defaults() {
    let config_file = ConfigFile {
        page_size: None,
        debounce_ms: None,
        rearm_delay_ms: None,
        log_file_path: None,
        sentinel: Some(SentinelSection {
            root_margin: Some(200),
            intersection_threshold: None,
        }),
    };

    let resolved = merge_config(Some(config_file));
    assert_eq!(resolved.sentinel.root_margin, 200);
    assert_eq!(resolved.sentinel.intersection_threshold, 0.5);
}

#[test]
fn resolved_config_converts_to_feed_tuning() {
    let config_file = ConfigFile {
        page_size: Some(25),
        debounce_ms: Some(500),
        rearm_delay_ms: Some(50),
        log_file_path: None,
        sentinel: None,
    };

    let tuning = merge_config(Some(config_file)).feed_tuning();
    assert_eq!(tuning.page_size, 25);
    assert_eq!(tuning.debounce_quiet, Duration::from_millis(500));
    assert_eq!(tuning.rearm_delay, Duration::from_millis(50));
}

#[test]
#[serial]
fn env_var_points_at_the_config_file() {
    let temp_dir = env::temp_dir();
    let config_path = temp_dir.join("pagefeed_test_env.toml");
    fs::write(&config_path, "page_size = 7\n").expect("Failed to write test config");

    env::set_var("PAGEFEED_CONFIG", &config_path);
    let config = load_config_with_precedence(None)
        .expect("Should load from env path")
        .expect("File exists");
    env::remove_var("PAGEFEED_CONFIG");

    assert_eq!(config.page_size, Some(7));

    fs::remove_file(config_path).ok();
}

#[test]
#[serial]
fn explicit_path_beats_the_env_var() {
    let temp_dir = env::temp_dir();
    let env_path = temp_dir.join("pagefeed_test_env_lo.toml");
    let cli_path = temp_dir.join("pagefeed_test_cli_hi.toml");
    fs::write(&env_path, "page_size = 7\n").expect("Failed to write test config");
    fs::write(&cli_path, "page_size = 9\n").expect("Failed to write test config");

    env::set_var("PAGEFEED_CONFIG", &env_path);
    let config = load_config_with_precedence(Some(cli_path.clone()))
        .expect("Should load from explicit path")
        .expect("File exists");
    env::remove_var("PAGEFEED_CONFIG");

    assert_eq!(config.page_size, Some(9), "Explicit path has precedence");

    fs::remove_file(env_path).ok();
    fs::remove_file(cli_path).ok();
}
