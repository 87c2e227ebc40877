use std::path::Path;

use promptvars_core::vars::{ExtractionError, VariableExtractor};

use super::{fail, load_config, open_variables};
use crate::ExtractArgs;

pub async fn run(config: Option<&Path>, args: &ExtractArgs) {
    let rc = load_config(config, "extract");
    let content = match std::fs::read_to_string(&args.file) {
        Ok(s) => s,
        Err(e) => fail("extract", format!("failed to read {}: {e}", args.file.display())),
    };

    let selected = match (&args.expect, content.get(args.start..args.end)) {
        (Some(expected), _) => expected.as_str(),
        (None, Some(current)) => current,
        (None, None) => fail(
            "extract",
            ExtractionError::InvalidRange { start: args.start, end: args.end, len: content.len() },
        ),
    };

    let extractor = VariableExtractor::with_max_value_length(rc.limits.max_interactive_value_length);
    let extraction =
        match extractor.extract_variable(&content, selected, &args.name, args.start, args.end) {
            Ok(x) => x,
            Err(e) => fail("extract", e),
        };

    if args.store {
        let mut manager = open_variables(&rc, "extract").await;
        if let Err(e) = manager.set_variable(&extraction.variable.name, &extraction.variable.value).await {
            fail("extract", e);
        }
    }

    if args.write {
        if let Err(e) = std::fs::write(&args.file, &extraction.content) {
            fail("extract", format!("failed to write {}: {e}", args.file.display()));
        }
        println!("OK   {{{{{}}}}} replaces {} bytes", extraction.variable.name, args.end - args.start);
    } else {
        print!("{}", extraction.content);
    }
}
