use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use std::process::Command;
use tempfile::tempdir;

fn write_file(path: &PathBuf, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

#[test]
fn doctor_reads_provided_config_path() {
    let tmp = tempdir().unwrap();
    let cfg = tmp.path().join("config.toml");
    let toml = r#"
version = 1

[storage]
path = "/tmp/pv/prefs.json"

[export]
dir = "/tmp/pv/out"

[limits]
max_value_length = 2000
max_interactive_value_length = 1000
"#;
    write_file(&cfg, toml);

    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("pv"));
    cmd.args(["doctor", "--config", cfg.to_str().unwrap()]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("OK   pv doctor"))
        .stdout(predicate::str::contains("storage: /tmp/pv/prefs.json"))
        .stdout(predicate::str::contains("export_dir: /tmp/pv/out"))
        .stdout(predicate::str::contains("limits.max_value_length: 2000"));
}

#[test]
fn doctor_uses_xdg_default_when_present() {
    let tmp = tempdir().unwrap();
    let cfg_path = tmp.path().join("promptvars").join("config.toml");
    write_file(&cfg_path, "version = 1\n[storage]\npath = \"/tmp/xdg/prefs.json\"\n");

    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("pv"));
    cmd.env("XDG_CONFIG_HOME", tmp.path());
    cmd.arg("doctor");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("OK   pv doctor"))
        .stdout(predicate::str::contains("storage: /tmp/xdg/prefs.json"));
}

#[test]
fn doctor_falls_back_to_defaults_without_config() {
    let tmp = tempdir().unwrap();

    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("pv"));
    cmd.env("XDG_CONFIG_HOME", tmp.path());
    cmd.env("XDG_DATA_HOME", tmp.path().join("data"));
    cmd.arg("doctor");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("not found, using defaults"))
        .stdout(predicate::str::contains("limits.max_value_length: 10000"))
        .stdout(predicate::str::contains("promptvars/preferences.json"));
}
