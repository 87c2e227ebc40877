use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::tempdir;

fn config_in(root: &Path) -> PathBuf {
    let cfg = root.join("config.toml");
    let toml = format!(
        "version = 1\n[storage]\npath = \"{}\"\n[limits]\nmax_value_length = 20\nmax_interactive_value_length = 10\n",
        root.join("prefs.json").display()
    );
    fs::write(&cfg, toml).unwrap();
    cfg
}

fn pv(cfg: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("pv"));
    cmd.arg("--config").arg(cfg);
    cmd
}

#[test]
fn set_get_delete_cycle() {
    let tmp = tempdir().unwrap();
    let cfg = config_in(tmp.path());

    pv(&cfg).args(["vars", "set", "tone", "dry"]).assert().success();
    pv(&cfg)
        .args(["vars", "get", "tone"])
        .assert()
        .success()
        .stdout(predicate::eq("dry\n"));

    let prefs = fs::read_to_string(tmp.path().join("prefs.json")).unwrap();
    assert!(prefs.contains("\"variableManager.storage\""));

    pv(&cfg)
        .args(["vars", "delete", "tone"])
        .assert()
        .success()
        .stdout(predicate::str::contains("OK   deleted tone"));
    pv(&cfg).args(["vars", "get", "tone"]).assert().failure();
}

#[test]
fn set_rejects_predefined_and_invalid_names() {
    let tmp = tempdir().unwrap();
    let cfg = config_in(tmp.path());

    pv(&cfg)
        .args(["vars", "set", "originalPrompt", "x"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("predefined variable and cannot be overridden"));
    pv(&cfg)
        .args(["vars", "set", "2fast", "x"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid variable name '2fast'"));
}

#[test]
fn set_respects_configured_value_limit() {
    let tmp = tempdir().unwrap();
    let cfg = config_in(tmp.path());

    pv(&cfg)
        .args(["vars", "set", "long", &"x".repeat(21)])
        .assert()
        .failure()
        .stderr(predicate::str::contains("too long (21 > 20 characters)"));
}

#[test]
fn list_json_includes_predefined_and_custom() {
    let tmp = tempdir().unwrap();
    let cfg = config_in(tmp.path());
    pv(&cfg).args(["vars", "set", "audience", "devs"]).assert().success();

    let out = pv(&cfg).args(["vars", "list", "--json"]).output().unwrap();
    assert!(out.status.success());
    let rows: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    let rows = rows.as_array().unwrap();
    assert_eq!(rows.len(), 7);
    assert!(rows.iter().any(|r| r["name"] == "audience" && r["source"] == "custom"));
    assert!(rows.iter().any(|r| r["name"] == "currentPrompt" && r["source"] == "predefined"));
}

#[test]
fn export_then_import_into_another_store() {
    let a = tempdir().unwrap();
    let b = tempdir().unwrap();
    let cfg_a = config_in(a.path());
    let cfg_b = config_in(b.path());
    let export = a.path().join("vars.json");

    pv(&cfg_a).args(["vars", "set", "tone", "dry"]).assert().success();
    pv(&cfg_a).args(["vars", "set", "lang", "es"]).assert().success();
    pv(&cfg_a)
        .args(["vars", "export", "--out"])
        .arg(&export)
        .assert()
        .success();

    let mut raw: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&export).unwrap()).unwrap();
    raw["customVariables"]["currentPrompt"] = "sneaky".into();
    fs::write(&export, raw.to_string()).unwrap();

    pv(&cfg_b)
        .args(["vars", "import"])
        .arg(&export)
        .assert()
        .success()
        .stdout(predicate::str::contains("imported 2 variables, skipped 1"));
    pv(&cfg_b)
        .args(["vars", "get", "lang"])
        .assert()
        .success()
        .stdout(predicate::eq("es\n"));
}
