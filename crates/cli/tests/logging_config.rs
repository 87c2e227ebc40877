use assert_cmd::prelude::*;
use std::fs;
use std::process::Command;
use tempfile::tempdir;

#[test]
fn test_logging_to_file() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    let log_file = root.join("logs").join("pv.log");

    let config_path = root.join("config.toml");
    let config_content = format!(
        r#"
version = 1
[storage]
path = "{}"

[logging]
level = "warn"
file_level = "debug"
file = "{}"
"#,
        root.join("prefs.json").display(),
        log_file.display()
    );
    fs::write(&config_path, &config_content).unwrap();

    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("pv"));
    cmd.arg("--config")
        .arg(&config_path)
        .args(["vars", "set", "tone", "dry"])
        .assert()
        .success();

    assert!(log_file.exists(), "Log file should be created");
}

#[test]
fn test_invalid_logging_level_falls_back() {
    let dir = tempdir().unwrap();
    let root = dir.path();

    let config_path = root.join("config.toml");
    fs::write(&config_path, "version = 1\n[logging]\nlevel = \"chatty\"\n").unwrap();

    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("pv"));
    cmd.arg("--config").arg(&config_path).arg("doctor").assert().success();
}
