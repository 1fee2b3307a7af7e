use super::loader::parse_config;
use super::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

#[test]
fn test_default_config() {
    let config = Config::default();
    assert_eq!(config.hotkey.modifiers, vec!["ctrl"]);
    assert_eq!(config.hotkey.key, "KeyF");
    assert_eq!(config.cancel_key, DEFAULT_CANCEL_KEY);
    assert_eq!(config.target_window_keyword, DEFAULT_TARGET_WINDOW_KEYWORD);
    assert_eq!(config.database_path, None);
    assert_eq!(config.similarity_cutoff, DEFAULT_SIMILARITY_CUTOFF);
    assert_eq!(config.min_query_length, DEFAULT_MIN_QUERY_LENGTH);
    assert_eq!(config.focus_click_delay_ms, DEFAULT_FOCUS_CLICK_DELAY_MS);
}

#[test]
fn test_empty_object_uses_all_defaults() {
    let config = parse_config("{}").unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn test_partial_config_keeps_other_defaults() {
    let config = parse_config(
        r#"{
            "hotkey": {"modifiers": ["alt", "shift"], "key": "KeyP"},
            "targetWindowKeyword": "My Game",
            "databasePath": "/tmp/prices.json"
        }"#,
    )
    .unwrap();

    assert_eq!(config.hotkey.modifiers, vec!["alt", "shift"]);
    assert_eq!(config.hotkey.key, "KeyP");
    assert_eq!(config.target_window_keyword, "My Game");
    assert_eq!(config.database_path, Some(PathBuf::from("/tmp/prices.json")));
    assert_eq!(config.cancel_key, "Escape");
    assert_eq!(config.restore_click_delay_ms, 50);
    assert_eq!(config.forward_rearm_delay().as_millis(), 100);
}

#[test]
fn test_config_serialization_uses_camel_case() {
    let config = Config {
        min_query_length: 4,
        ..Config::default()
    };
    let json = serde_json::to_string(&config).unwrap();
    assert!(json.contains("\"minQueryLength\":4"));
    assert!(json.contains("\"targetWindowKeyword\""));
    assert!(!json.contains("databasePath"));

    let deserialized: Config = serde_json::from_str(&json).unwrap();
    assert_eq!(deserialized, config);
}

#[test]
fn test_hotkey_missing_key_is_an_error() {
    assert!(parse_config(r#"{"hotkey": {"modifiers": ["ctrl"]}}"#).is_err());
}

#[test]
fn test_match_settings_clamps_cutoff() {
    let mut config = Config {
        similarity_cutoff: 1.7,
        ..Config::default()
    };
    assert_eq!(config.match_settings().cutoff, 1.0);

    config.similarity_cutoff = -0.3;
    assert_eq!(config.match_settings().cutoff, 0.0);

    config.similarity_cutoff = f64::NAN;
    assert_eq!(config.match_settings().cutoff, DEFAULT_SIMILARITY_CUTOFF);
}

#[test]
fn test_hotkey_display_and_label() {
    let hotkey = HotkeyConfig::default();
    assert_eq!(hotkey.display(), "ctrl+KeyF");
    assert_eq!(hotkey.label(), "Ctrl+F");

    let hotkey = HotkeyConfig {
        modifiers: vec!["alt".to_string(), "shift".to_string()],
        key: "Digit5".to_string(),
    };
    assert_eq!(hotkey.label(), "Alt+Shift+5");

    let escape = Config::default().cancel_hotkey();
    assert!(escape.modifiers.is_empty());
    assert_eq!(escape.display(), "Escape");
}

#[test]
fn test_load_config_missing_file_returns_defaults() {
    let dir = TempDir::new().unwrap();
    let config = load_config(&dir.path().join("config.json"));
    assert_eq!(config, Config::default());
}

#[test]
fn test_load_config_malformed_file_returns_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");
    fs::write(&path, "{ \"hotkey\": ").unwrap();
    assert_eq!(load_config(&path), Config::default());
}

#[test]
fn test_load_config_reads_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");
    fs::write(&path, r#"{"similarityCutoff": 0.7, "focusClickDelayMs": 120}"#).unwrap();

    let config = load_config(&path);
    assert_eq!(config.similarity_cutoff, 0.7);
    assert_eq!(config.focus_click_delay().as_millis(), 120);
}
