use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::tempdir;

fn config_in(root: &Path) -> PathBuf {
    let cfg = root.join("config.toml");
    let toml = format!("version = 1\n[storage]\npath = \"{}\"\n", root.join("prefs.json").display());
    fs::write(&cfg, toml).unwrap();
    cfg
}

fn pv(cfg: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("pv"));
    cmd.arg("--config").arg(cfg);
    cmd
}

#[test]
fn scan_classifies_variables() {
    let tmp = tempdir().unwrap();
    let cfg = config_in(tmp.path());
    let file = tmp.path().join("prompt.txt");
    fs::write(&file, "Rewrite {{originalPrompt}} as {{ tone }} for {{audience}} and {{tone}}.").unwrap();
    pv(&cfg).args(["vars", "set", "tone", "dry"]).assert().success();

    pv(&cfg)
        .arg("scan")
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"\{\{originalPrompt\}\}\s+predefined\s+x1").unwrap())
        .stdout(predicate::str::is_match(r"\{\{ tone \}\}\s+custom\s+x2").unwrap())
        .stdout(predicate::str::is_match(r"\{\{audience\}\}\s+missing\s+x1").unwrap())
        .stdout(predicate::str::contains("-- 3 variables, 1 missing --"));
}

#[test]
fn suggest_lists_candidates() {
    let tmp = tempdir().unwrap();
    let cfg = config_in(tmp.path());

    let out = pv(&cfg)
        .args(["suggest", "--json", "Example input: the user asks about refunds"])
        .output()
        .unwrap();
    assert!(out.status.success());
    let suggestions: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    let suggestions = suggestions.as_array().unwrap();
    assert!(!suggestions.is_empty());
    assert!(suggestions.len() <= 8);
    assert!(suggestions.iter().all(|s| s["confidence"].as_f64().unwrap() <= 1.0));
}

#[test]
fn extract_rewrites_file_and_stores_value() {
    let tmp = tempdir().unwrap();
    let cfg = config_in(tmp.path());
    let file = tmp.path().join("prompt.txt");
    fs::write(&file, "Answer in French please.").unwrap();

    pv(&cfg)
        .arg("extract")
        .arg(&file)
        .args(["--name", "language", "--start", "10", "--end", "16", "--write", "--store"])
        .assert()
        .success();

    assert_eq!(fs::read_to_string(&file).unwrap(), "Answer in {{language}} please.");
    pv(&cfg)
        .args(["vars", "get", "language"])
        .assert()
        .success()
        .stdout(predicate::eq("French\n"));
}

#[test]
fn extract_rejects_moved_selection() {
    let tmp = tempdir().unwrap();
    let cfg = config_in(tmp.path());
    let file = tmp.path().join("prompt.txt");
    fs::write(&file, "Answer in French please.").unwrap();

    pv(&cfg)
        .arg("extract")
        .arg(&file)
        .args(["--name", "language", "--start", "10", "--end", "16", "--expect", "German"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no longer matches"));
    assert_eq!(fs::read_to_string(&file).unwrap(), "Answer in French please.");
}
