//! Saving and loading configuration files

use std::path::PathBuf;

use gcodeprops_settings::{Config, MeasurementSystem, SettingsError};

fn sample() -> Config {
    let mut config = Config::new();
    config.display.measurement_system = MeasurementSystem::Imperial;
    config.interpreter.parameter_file = Some(PathBuf::from("/opt/machine/sim.var"));
    config.interpreter.startup_code = "G17 G40 G49".to_string();
    config.interpreter.machine_units = MeasurementSystem::Imperial;
    config.estimation.max_rapid_rate = 250.0;
    config.estimation.arc_division = 32;
    config
}

#[test]
fn test_toml_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    sample().save_to_file(&path).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("[estimation]"));
    assert_eq!(Config::load_from_file(&path).unwrap(), sample());
}

#[test]
fn test_json_round_trip_in_new_directory() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("config.json");
    sample().save_to_file(&path).unwrap();
    assert_eq!(Config::load_from_file(&path).unwrap(), sample());
}

#[test]
fn test_missing_file_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::load_or_default(&dir.path().join("absent.toml")).unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn test_invalid_values_rejected_on_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[estimation]\narc_division = 0\n").unwrap();
    assert!(matches!(
        Config::load_from_file(&path),
        Err(SettingsError::InvalidSetting { .. })
    ));
}

#[test]
fn test_malformed_json_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, "{ \"display\": ").unwrap();
    assert!(matches!(
        Config::load_from_file(&path),
        Err(SettingsError::JsonError(_))
    ));
}
