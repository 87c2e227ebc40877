//! Turning selected text into variables.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use regex::Regex;

use super::errors::ExtractionError;
use super::names::{MAX_INTERACTIVE_VALUE_LENGTH, is_valid_name, value_length};
use super::scanner::placeholders;
use super::types::{ExtractedVariable, Extraction, ScannedVariable, VariableSuggestion};

const MAX_SUGGESTIONS: usize = 8;
const CANDIDATES_PER_CATEGORY: usize = 3;
const LONG_TEXT_CHARS: usize = 200;
const MULTI_LINE_LINES: usize = 3;

struct Category {
    label: &'static str,
    pattern: Regex,
    names: [&'static str; CANDIDATES_PER_CATEGORY],
}

fn cat(
    label: &'static str,
    pattern: &str,
    names: [&'static str; CANDIDATES_PER_CATEGORY],
) -> Category {
    Category { label, pattern: Regex::new(pattern).unwrap(), names }
}

static CATEGORIES: LazyLock<Vec<Category>> = LazyLock::new(|| {
    vec![
        cat(
            "database",
            r"(?i)\b(database|db|tables?|schema|sql|query|columns?|fields?|records?)\b",
            ["database_schema", "table_info", "query_context"],
        ),
        cat(
            "examples",
            r"(?i)\b(examples?|samples?|for instance|such as|demo)\b|\be\.g\.",
            ["examples", "sample_data", "example_cases"],
        ),
        cat(
            "rules",
            r"(?i)\b(rules?|must|should|never|always|constraints?|requirements?|guidelines?)\b",
            ["rules", "constraints", "requirements"],
        ),
        cat(
            "context",
            r"(?i)\b(context|background|situation|scenario|environment|domain)\b",
            ["context", "background_info", "scenario"],
        ),
        cat(
            "input",
            r"(?i)\b(input|question|request|ask|user|provided)\b",
            ["user_input", "question", "request_details"],
        ),
        cat(
            "output",
            r"(?i)\b(output|format|result|response|returns?|answer)\b",
            ["output_format", "expected_result", "response_style"],
        ),
    ]
});

/// Stateless helpers for "select text, make it a variable" workflows.
#[derive(Debug, Clone, Copy, Default)]
pub struct VariableExtractor {
    max_value_length: usize,
}

impl VariableExtractor {
    #[must_use]
    pub fn new() -> Self {
        Self { max_value_length: MAX_INTERACTIVE_VALUE_LENGTH }
    }

    #[must_use]
    pub fn with_max_value_length(max_value_length: usize) -> Self {
        Self { max_value_length }
    }

    /// Replace `content[start..end]` with `{{name}}`.
    ///
    /// The range is re-checked against `selected_text` first: if the content
    /// moved since the selection was made the call fails and nothing changes.
    /// Offsets are byte offsets and must fall on character boundaries.
    pub fn extract_variable(
        &self,
        content: &str,
        selected_text: &str,
        name: &str,
        start: usize,
        end: usize,
    ) -> Result<Extraction, ExtractionError> {
        if !is_valid_name(name) {
            return Err(ExtractionError::InvalidName(name.to_string()));
        }
        if start >= end || end > content.len() {
            return Err(ExtractionError::InvalidRange { start, end, len: content.len() });
        }
        let current = content
            .get(start..end)
            .ok_or(ExtractionError::InvalidRange { start, end, len: content.len() })?;
        if current != selected_text {
            return Err(ExtractionError::RangeMismatch { start, end });
        }
        let max = self.effective_max();
        let length = value_length(selected_text);
        if length > max {
            return Err(ExtractionError::ValueTooLong { length, max });
        }

        let mut updated = String::with_capacity(content.len() + name.len() + 4);
        updated.push_str(&content[..start]);
        updated.push_str("{{");
        updated.push_str(name);
        updated.push_str("}}");
        updated.push_str(&content[end..]);

        Ok(Extraction {
            content: updated,
            variable: ExtractedVariable {
                name: name.to_string(),
                value: selected_text.to_string(),
                start,
                end,
            },
        })
    }

    fn effective_max(&self) -> usize {
        if self.max_value_length == 0 { MAX_INTERACTIVE_VALUE_LENGTH } else { self.max_value_length }
    }

    /// Rank candidate names for a selection, best first, at most eight.
    #[must_use]
    pub fn suggest_variable_names(&self, selected_text: &str) -> Vec<VariableSuggestion> {
        let text = selected_text.trim();
        if text.is_empty() {
            return Vec::new();
        }
        let chars = value_length(text).max(1);
        let mut out = Vec::new();

        for category in CATEGORIES.iter() {
            let matches = category.pattern.find_iter(text).count();
            if matches == 0 {
                continue;
            }
            #[allow(clippy::cast_precision_loss)]
            let density = matches as f64 * 100.0 / chars as f64;
            let base = 0.5 + (density * 0.3).min(0.5);
            for (rank, name) in category.names.iter().enumerate() {
                #[allow(clippy::cast_precision_loss)]
                let confidence = base - 0.1 * rank as f64;
                out.push(VariableSuggestion {
                    name: (*name).to_string(),
                    confidence: round2(confidence),
                    reason: format!("matches {} keywords", category.label),
                });
            }
        }

        if chars > LONG_TEXT_CHARS {
            out.push(suggestion("content_block", 0.6, "long text block"));
        }
        if text.lines().count() > MULTI_LINE_LINES {
            out.push(suggestion("multiline_content", 0.55, "spans several lines"));
        }
        if looks_like_json(text) {
            out.push(suggestion("json_data", 0.7, "parses as JSON"));
        }
        if out.is_empty() {
            out.push(suggestion("custom_variable", 0.3, "no specific pattern detected"));
        }

        let mut seen = HashSet::new();
        out.retain(|s| seen.insert(s.name.clone()));
        out.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
        out.truncate(MAX_SUGGESTIONS);
        out
    }

    /// Every placeholder in `content`, grouped by variable in first-seen order.
    #[must_use]
    pub fn scan_variables(&self, content: &str) -> Vec<ScannedVariable> {
        let mut index: HashMap<&str, usize> = HashMap::new();
        let mut found: Vec<ScannedVariable> = Vec::new();
        for p in placeholders(content) {
            match index.get(p.name) {
                Some(&i) => found[i].positions.push(p.span),
                None => {
                    index.insert(p.name, found.len());
                    found.push(ScannedVariable {
                        name: p.name.to_string(),
                        placeholder: p.text.to_string(),
                        positions: vec![p.span],
                    });
                }
            }
        }
        found
    }
}

fn suggestion(name: &str, confidence: f64, reason: &str) -> VariableSuggestion {
    VariableSuggestion { name: name.to_string(), confidence, reason: reason.to_string() }
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

fn looks_like_json(text: &str) -> bool {
    (text.starts_with('{') || text.starts_with('['))
        && serde_json::from_str::<serde_json::Value>(text).is_ok()
}
