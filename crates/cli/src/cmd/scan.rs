use std::path::Path;

use promptvars_core::vars::{VariableExtractor, VariableSource};
use serde_json::Value;

use super::{fail, load_config, open_variables, transfer, unwrap_result};

/// Text to scan: message contents for prompt data, the raw file otherwise.
fn scannable_text(rc: &promptvars_core::config::ResolvedConfig, text: &str) -> String {
    if serde_json::from_str::<Value>(text).is_err() {
        return text.to_string();
    }
    let data = unwrap_result(transfer(rc).import_from_text(text), "scan");
    data.contents().collect::<Vec<_>>().join("\n")
}

pub async fn run(config: Option<&Path>, file: &Path) {
    let rc = load_config(config, "scan");
    let text = match std::fs::read_to_string(file) {
        Ok(s) => s,
        Err(e) => fail("scan", format!("failed to read {}: {e}", file.display())),
    };
    let manager = open_variables(&rc, "scan").await;

    let content = scannable_text(&rc, &text);
    let scanned = VariableExtractor::new().scan_variables(&content);
    if scanned.is_empty() {
        println!("(no variables found)");
        return;
    }

    let mut missing = 0;
    for var in &scanned {
        let status = match manager.variable_source(&var.name) {
            Some(VariableSource::Predefined) => "predefined",
            Some(VariableSource::Custom) => "custom",
            None => {
                missing += 1;
                "missing"
            }
        };
        println!("{:<30} {:<10} x{}", var.placeholder, status, var.positions.len());
    }
    println!("-- {} variables, {} missing --", scanned.len(), missing);
}
