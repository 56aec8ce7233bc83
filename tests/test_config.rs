use std::fs;
use std::path::{Path, PathBuf};

use survivor::config::{GameConfig, CONFIG_ENV_VAR};
use survivor::error::ConfigError;

#[test]
fn empty_object_gives_defaults() {
    let config = GameConfig::from_json("{}").unwrap();
    assert_eq!(config, GameConfig::default());
    assert_eq!(config.frame_ms, 33);
    assert_eq!(config.spawn_interval_ms, 1000);
    assert_eq!(config.asset_dir, PathBuf::from("assets"));
    assert!(!config.bell);
}

#[test]
fn partial_override_keeps_other_defaults() {
    let config = GameConfig::from_json(r#"{ "spawn_interval_ms": 250, "bell": true }"#).unwrap();
    assert_eq!(config.spawn_interval_ms, 250);
    assert!(config.bell);
    assert_eq!(config.map_path, PathBuf::from("data/maps/world.tmx"));
}

#[test]
fn wrong_type_reports_field_path() {
    match GameConfig::from_json(r#"{ "frame_ms": "fast" }"#) {
        Err(ConfigError::Field { path, .. }) => assert_eq!(path, "frame_ms"),
        other => panic!("expected Field error, got {other:?}"),
    }
}

#[test]
fn unknown_field_is_rejected() {
    assert!(GameConfig::from_json(r#"{ "fps": 60 }"#).is_err());
}

#[test]
fn malformed_json_is_a_parse_error() {
    for raw in ["{", "", "nope", "null"] {
        match GameConfig::from_json(raw) {
            Err(ConfigError::Parse(_)) => {}
            other => panic!("{raw:?}: expected Parse error, got {other:?}"),
        }
    }
}

#[test]
fn no_file_means_defaults() {
    assert_eq!(GameConfig::load_from(None).unwrap(), GameConfig::default());
}

#[test]
fn missing_file_is_a_read_error() {
    let err = GameConfig::from_file(Path::new("no/such/survivor.json")).unwrap_err();
    assert!(matches!(err, ConfigError::Read { .. }));
}

#[test]
fn env_var_selects_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("custom.json");
    fs::write(&path, r#"{ "frame_ms": 20 }"#).unwrap();

    std::env::set_var(CONFIG_ENV_VAR, &path);
    let located = GameConfig::locate();
    let loaded = GameConfig::load();
    std::env::remove_var(CONFIG_ENV_VAR);

    assert_eq!(located, Some(path));
    assert_eq!(loaded.unwrap().frame_ms, 20);
}

#[test]
fn bundled_config_matches_defaults() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("survivor.json");
    assert_eq!(GameConfig::from_file(&path).unwrap(), GameConfig::default());
}
