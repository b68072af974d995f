//! Runs the `gcodeprops` binary against a recorded trace

use std::fs;
use std::process::Command;

const TRACE: &str = r#"{"call":"next_line","sequence_number":1}
{"call":"straight_traverse","target":[0,0,0,0,0,0,0,0,0]}
{"call":"set_feed_rate","rate":1200}
{"call":"straight_feed","target":[25.4,0,0,0,0,0,0,0,0]}
{"call":"comment","text":"AXIS,notify,tool 1 installed"}
"#;

fn setup() -> (tempfile::TempDir, std::path::PathBuf, std::path::PathBuf, std::path::PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let program = dir.path().join("line.ngc");
    let trace = dir.path().join("line.jsonl");
    let config = dir.path().join("config.toml");
    fs::write(&program, "G1 X25.4 F1200\n").unwrap();
    fs::write(&trace, TRACE).unwrap();
    fs::write(&config, "[display]\nmeasurement_system = \"metric\"\n").unwrap();
    (dir, program, trace, config)
}

#[test]
fn test_single_property_in_inches() {
    let (_dir, program, trace, config) = setup();
    let output = Command::new(env!("CARGO_BIN_EXE_gcodeprops"))
        .arg("--trace")
        .arg(&trace)
        .arg("--config")
        .arg(&config)
        .args(["--units", "imperial", "--property", "feed"])
        .arg(&program)
        .output()
        .unwrap();

    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "1.0000 in");
    assert!(String::from_utf8_lossy(&output.stderr).contains("note: tool 1 installed"));
}

#[test]
fn test_json_report() {
    let (_dir, program, trace, config) = setup();
    let output = Command::new(env!("CARGO_BIN_EXE_gcodeprops"))
        .arg("--trace")
        .arg(&trace)
        .arg("--config")
        .arg(&config)
        .arg("--json")
        .arg(&program)
        .output()
        .unwrap();

    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["file_name"], "line.ngc");
    assert_eq!(report["feed_distance"], 25.4);
    assert_eq!(report["units"], "metric");
}

#[test]
fn test_missing_program_fails() {
    let (dir, _program, trace, config) = setup();
    let output = Command::new(env!("CARGO_BIN_EXE_gcodeprops"))
        .arg("--trace")
        .arg(&trace)
        .arg("--config")
        .arg(&config)
        .arg(dir.path().join("absent.ngc"))
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Program file not found"));
}
