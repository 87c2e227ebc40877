//! `pv vars`: CRUD over the persisted custom variables.

use std::path::Path;

use promptvars_core::vars::{VariableManager, VariableSource};
use serde::Serialize;
use tabled::{Table, Tabled, settings::Style};

use super::{fail, load_config, open_variables};
use crate::VarsCommand;

#[derive(Tabled, Serialize)]
struct VariableRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Source")]
    source: &'static str,
    #[tabled(rename = "Value")]
    value: String,
}

/// Values longer than this are shortened in the table.
const PREVIEW_CHARS: usize = 60;

fn preview(value: &str) -> String {
    let single_line = value.replace('\n', "\\n");
    if single_line.chars().count() <= PREVIEW_CHARS {
        return single_line;
    }
    let cut: String = single_line.chars().take(PREVIEW_CHARS - 3).collect();
    format!("{cut}...")
}

fn rows(manager: &VariableManager) -> Vec<VariableRow> {
    manager
        .list_variables()
        .into_iter()
        .map(|(name, value)| {
            let source = match manager.variable_source(&name) {
                Some(VariableSource::Predefined) => "predefined",
                _ => "custom",
            };
            VariableRow { name, source, value }
        })
        .collect()
}

pub async fn run(config: Option<&Path>, sub: VarsCommand) {
    let rc = load_config(config, "vars");
    let mut manager = open_variables(&rc, "vars").await;

    match sub {
        VarsCommand::List { json } => {
            let rows = rows(&manager);
            if json {
                super::print_json(&rows, "vars list");
                return;
            }
            let display: Vec<VariableRow> = rows
                .into_iter()
                .map(|r| VariableRow { value: preview(&r.value), ..r })
                .collect();
            println!("{}", Table::new(&display).with(Style::rounded()));
            println!("-- {} custom variables --", manager.custom_variables().len());
        }
        VarsCommand::Get { name } => match manager.get_variable(&name) {
            Some(value) => println!("{value}"),
            None if manager.is_predefined_variable(&name) => fail(
                "vars get",
                format!("'{name}' is predefined; its value only exists while a prompt is resolved"),
            ),
            None => fail("vars get", format!("no custom variable named '{name}'")),
        },
        VarsCommand::Set { name, value } => {
            if let Err(e) = manager.set_variable(&name, &value).await {
                fail("vars set", e);
            }
            println!("OK   set {name}");
        }
        VarsCommand::Delete { name } => match manager.delete_variable(&name).await {
            Ok(true) => println!("OK   deleted {name}"),
            Ok(false) => fail("vars delete", format!("no custom variable named '{name}'")),
            Err(e) => fail("vars delete", e),
        },
        VarsCommand::Clear => {
            let count = manager.custom_variables().len();
            if let Err(e) = manager.clear_custom_variables().await {
                fail("vars clear", e);
            }
            println!("OK   cleared {count} variables");
        }
        VarsCommand::Export { out } => {
            let json = manager.export_variables();
            match out {
                Some(path) => {
                    if let Err(e) = std::fs::write(&path, json) {
                        fail("vars export", format!("failed to write {}: {e}", path.display()));
                    }
                    println!("OK   exported to {}", path.display());
                }
                None => println!("{json}"),
            }
        }
        VarsCommand::Import { file } => {
            let json = match std::fs::read_to_string(&file) {
                Ok(s) => s,
                Err(e) => fail("vars import", format!("failed to read {}: {e}", file.display())),
            };
            match manager.import_variables(&json).await {
                Ok(summary) => println!(
                    "OK   imported {} variables, skipped {}",
                    summary.imported, summary.skipped
                ),
                Err(e) => fail("vars import", e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_shortens_long_values() {
        assert_eq!(preview("short"), "short");
        assert_eq!(preview("a\nb"), "a\\nb");
        let long = "x".repeat(100);
        let p = preview(&long);
        assert_eq!(p.chars().count(), PREVIEW_CHARS);
        assert!(p.ends_with("..."));
    }
}
