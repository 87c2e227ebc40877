use std::path::Path;

use promptvars_core::templates::{OptimizationSuggestion, SuggestionKind, TemplateProcessor};

use super::{fail, import_file, load_config, print_json, print_warnings, unwrap_result, var_map};
use crate::TemplateArgs;

fn print_suggestions(suggestions: &[OptimizationSuggestion]) {
    if suggestions.is_empty() {
        eprintln!("(no optimization suggestions)");
    }
    for s in suggestions {
        let kind = match s.kind {
            SuggestionKind::Merge => "merge",
            SuggestionKind::Split => "split",
        };
        eprintln!("{kind:<6} {:<40} {:.2}  {}", s.variables.join(", "), s.confidence, s.reason);
    }
}

pub async fn run(config: Option<&Path>, args: &TemplateArgs) {
    let rc = load_config(config, "template");
    let data = import_file(&rc, &args.file, "template").await;

    let processor = TemplateProcessor::new();
    let template = unwrap_result(processor.to_template(&data), "template");

    if args.optimize {
        print_suggestions(&processor.suggest_optimizations(&template));
    }

    if args.vars.is_empty() {
        print_json(&template, "template");
        return;
    }

    let vars = var_map(&args.vars);
    let validation = processor.validate_variables(&template, &vars);
    if !validation.unused_variables.is_empty() {
        print_warnings(&[format!("Unused variables: {}", validation.unused_variables.join(", "))]);
    }
    if !validation.is_valid {
        fail(
            "template",
            format!("missing variables: {}", validation.missing_variables.join(", ")),
        );
    }

    let filled = unwrap_result(processor.from_template(&template, &vars), "template");
    print_json(&filled, "template");
}
