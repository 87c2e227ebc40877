//! Subcommand implementations and the plumbing they share.

pub mod convert;
pub mod detect;
pub mod doctor;
pub mod extract;
pub mod scan;
pub mod suggest;
pub mod template;
pub mod vars;

use std::fmt::Display;
use std::path::Path;
use std::sync::Arc;

use promptvars_core::config::{ConfigLoader, ResolvedConfig, default_config_path};
use promptvars_core::convert::{ConversionResult, StandardPromptData};
use promptvars_core::store::JsonFileStore;
use promptvars_core::transfer::{ImportExportManager, LocalFiles, MemoryClipboard};
use promptvars_core::vars::{VariableManager, VariableMap};

use crate::logging;

/// Print a failure banner and exit with status 1.
pub fn fail(cmd: &str, err: impl Display) -> ! {
    eprintln!("FAIL pv {cmd}");
    eprintln!("{err}");
    std::process::exit(1);
}

/// Load the config and start logging, or exit.
pub fn load_config(config: Option<&Path>, cmd: &str) -> ResolvedConfig {
    match ConfigLoader::load(config) {
        Ok(rc) => {
            logging::init(&rc.logging);
            rc
        }
        Err(e) => {
            eprintln!("FAIL pv {cmd}");
            eprintln!("{e}");
            if config.is_none() {
                eprintln!("looked for: {}", default_config_path().display());
            }
            std::process::exit(1);
        }
    }
}

pub async fn open_variables(rc: &ResolvedConfig, cmd: &str) -> VariableManager {
    let store = Arc::new(JsonFileStore::new(&rc.storage_path));
    match VariableManager::load_with_limits(store, rc.limits).await {
        Ok(m) => m,
        Err(e) => fail(cmd, e),
    }
}

pub fn transfer(rc: &ResolvedConfig) -> ImportExportManager {
    ImportExportManager::new(
        Arc::new(LocalFiles::new(&rc.export_dir)),
        Arc::new(MemoryClipboard::new()),
    )
}

/// Import a prompt data file in any supported format.
pub async fn import_file(rc: &ResolvedConfig, file: &Path, cmd: &str) -> StandardPromptData {
    let result = transfer(rc).import_from_file(file).await;
    unwrap_result(result, cmd)
}

/// Print warnings and return the data, or exit on failure.
pub fn unwrap_result<T>(result: ConversionResult<T>, cmd: &str) -> T {
    match result.into_result() {
        Ok((data, warnings)) => {
            print_warnings(&warnings);
            data
        }
        Err(e) => fail(cmd, e),
    }
}

pub fn print_warnings(warnings: &[String]) {
    for w in warnings {
        eprintln!("warning: {w}");
    }
}

pub fn print_json<T: serde::Serialize>(value: &T, cmd: &str) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{json}"),
        Err(e) => fail(cmd, format!("failed to serialize output: {e}")),
    }
}

/// Clap parser for `--var NAME=VALUE`.
pub fn parse_var(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected NAME=VALUE, got '{s}'")),
    }
}

pub fn var_map(pairs: &[(String, String)]) -> VariableMap {
    pairs.iter().cloned().collect()
}
