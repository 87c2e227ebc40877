use std::path::Path;

use promptvars_core::convert::DataConverter;
use serde_json::Value;

use super::{fail, load_config};

pub fn run(config: Option<&Path>, file: &Path) {
    let _rc = load_config(config, "detect");
    let text = match std::fs::read_to_string(file) {
        Ok(s) => s,
        Err(e) => fail("detect", format!("failed to read {}: {e}", file.display())),
    };
    let value: Value = match serde_json::from_str(&text) {
        Ok(v) => v,
        Err(e) => fail("detect", format!("Invalid JSON: {e}")),
    };

    let converter = DataConverter::new();
    let format = converter.detect_format(&value);
    println!("format: {format}");

    let validation = converter.validate(&value, format);
    match validation.error() {
        None => println!("valid: yes"),
        Some(e) => {
            println!("valid: no");
            println!("error: {e}");
            std::process::exit(1);
        }
    }
}
