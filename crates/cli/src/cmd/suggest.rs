use std::path::Path;

use promptvars_core::vars::VariableExtractor;
use tabled::{Table, Tabled, settings::Style};

use super::{load_config, print_json};
use crate::SuggestArgs;

#[derive(Tabled)]
struct SuggestionRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Confidence")]
    confidence: String,
    #[tabled(rename = "Reason")]
    reason: String,
}

pub fn run(config: Option<&Path>, args: &SuggestArgs) {
    let rc = load_config(config, "suggest");
    let extractor = VariableExtractor::with_max_value_length(rc.limits.max_interactive_value_length);
    let suggestions = extractor.suggest_variable_names(&args.text);

    if args.json {
        print_json(&suggestions, "suggest");
        return;
    }

    let rows: Vec<SuggestionRow> = suggestions
        .iter()
        .map(|s| SuggestionRow {
            name: s.name.clone(),
            confidence: format!("{:.2}", s.confidence),
            reason: s.reason.clone(),
        })
        .collect();
    println!("{}", Table::new(&rows).with(Style::rounded()));
}
