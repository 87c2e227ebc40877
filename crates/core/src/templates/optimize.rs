//! Heuristics that point at variables worth merging or splitting.

use std::collections::HashSet;

use super::types::{OptimizationSuggestion, PromptTemplate, SuggestionKind};
use crate::vars::names::value_length;
use crate::vars::scanner::placeholders;

/// Names more similar than this are merge candidates.
pub const MERGE_SIMILARITY_THRESHOLD: f64 = 0.7;
/// Average bound value length (characters) above which a split is considered.
pub const SPLIT_LENGTH_THRESHOLD: f64 = 1000.0;
/// Complexity above which a split is suggested.
pub const SPLIT_COMPLEXITY_THRESHOLD: f64 = 0.8;
/// Length at which the length half of the complexity score saturates.
const LENGTH_SATURATION: f64 = 2000.0;

/// `1 - edit_distance / max_len`, case-insensitive.
#[must_use]
pub fn name_similarity(a: &str, b: &str) -> f64 {
    strsim::normalized_levenshtein(&a.to_lowercase(), &b.to_lowercase())
}

/// Distinct usage contexts over total usages, in `[0, 1]`.
///
/// A usage context is the message role plus the line around the
/// placeholder with the placeholder itself removed. A variable used only
/// once scores 0.5, so a single long value alone does not reach the split
/// threshold.
#[must_use]
pub fn usage_diversity(template: &PromptTemplate, name: &str) -> f64 {
    let mut total = 0usize;
    let mut contexts = HashSet::new();
    for message in &template.data.messages {
        let content = &message.content;
        for p in placeholders(content).filter(|p| p.name == name) {
            total += 1;
            let line_start = content[..p.span.start].rfind('\n').map_or(0, |i| i + 1);
            let line_end = content[p.span.end..].find('\n').map_or(content.len(), |i| p.span.end + i);
            let context = format!(
                "{}|{}{}",
                message.role,
                content[line_start..p.span.start].trim().to_lowercase(),
                content[p.span.end..line_end].trim().to_lowercase()
            );
            contexts.insert(context);
        }
    }
    match total {
        0 => return 0.0,
        // One use says nothing about variety either way.
        1 => return 0.5,
        _ => {}
    }
    #[allow(clippy::cast_precision_loss)]
    let diversity = contexts.len() as f64 / total as f64;
    diversity
}

/// Average character length of the distinct values bound to `name`.
#[must_use]
pub fn average_value_length(template: &PromptTemplate, name: &str) -> f64 {
    let mut values: Vec<&str> = Vec::new();
    let bound = [
        template.variables.get(name),
        template.data.metadata_variables().and_then(|m| m.get(name)),
    ];
    for v in bound.into_iter().flatten() {
        if !values.contains(&v.as_str()) {
            values.push(v);
        }
    }
    if values.is_empty() {
        return 0.0;
    }
    #[allow(clippy::cast_precision_loss)]
    let avg = values.iter().map(|v| value_length(v)).sum::<usize>() as f64 / values.len() as f64;
    avg
}

/// Equal-weight blend of usage diversity and saturated value length.
/// Increases with either input.
#[must_use]
pub fn complexity(diversity: f64, avg_length: f64) -> f64 {
    0.5 * diversity.clamp(0.0, 1.0) + 0.5 * (avg_length / LENGTH_SATURATION).min(1.0)
}

pub fn suggest(template: &PromptTemplate) -> Vec<OptimizationSuggestion> {
    let names: Vec<&str> = template.definitions.iter().map(|d| d.name.as_str()).collect();
    let mut out = Vec::new();

    for (i, a) in names.iter().enumerate() {
        for b in &names[i + 1..] {
            let similarity = name_similarity(a, b);
            if similarity > MERGE_SIMILARITY_THRESHOLD {
                out.push(OptimizationSuggestion {
                    kind: SuggestionKind::Merge,
                    variables: vec![(*a).to_string(), (*b).to_string()],
                    confidence: similarity,
                    reason: format!("'{a}' and '{b}' have very similar names"),
                });
            }
        }
    }

    for name in &names {
        let avg = average_value_length(template, name);
        if avg <= SPLIT_LENGTH_THRESHOLD {
            continue;
        }
        let score = complexity(usage_diversity(template, name), avg);
        if score > SPLIT_COMPLEXITY_THRESHOLD {
            out.push(OptimizationSuggestion {
                kind: SuggestionKind::Split,
                variables: vec![(*name).to_string()],
                confidence: score,
                reason: format!("'{name}' holds a long value ({avg:.0} characters on average) used in varied contexts"),
            });
        }
    }

    out.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::types::{Role, StandardMessage, StandardPromptData};
    use crate::templates::types::{VariableDefinition, VariableType};
    use crate::vars::VariableMap;

    #[test]
    fn test_similarity_bounds() {
        assert!((name_similarity("topic", "topic") - 1.0).abs() < f64::EPSILON);
        assert!((name_similarity("TOPIC", "topic") - 1.0).abs() < f64::EPSILON);
        assert!(name_similarity("abc", "xyz") < 0.1);
        assert!(name_similarity("user_name", "user_names") > 0.7);
    }

    #[test]
    fn test_single_use_is_neutral_diversity() {
        let t = PromptTemplate {
            data: StandardPromptData::new(vec![
                StandardMessage::new(Role::User, "Summarize:\n{{doc}}\n{{note}} and {{note}}"),
                StandardMessage::new(Role::System, "Keep {{note}} short."),
            ]),
            variables: VariableMap::new(),
            definitions: Vec::new(),
        };
        assert!((usage_diversity(&t, "doc") - 0.5).abs() < f64::EPSILON);
        assert!(usage_diversity(&t, "note") > 0.5);
        assert!(usage_diversity(&t, "absent").abs() < f64::EPSILON);
    }

    #[test]
    fn test_single_long_value_is_not_split() {
        let mut t = PromptTemplate {
            data: StandardPromptData::new(vec![StandardMessage::new(Role::User, "{{doc}}")]),
            variables: VariableMap::new(),
            definitions: vec![VariableDefinition {
                name: "doc".into(),
                var_type: VariableType::String,
                required: false,
                default_value: None,
                description: None,
            }],
        };
        t.variables.insert("doc".into(), "x".repeat(1300));
        assert!(suggest(&t).is_empty());
    }

    #[test]
    fn test_complexity_is_monotonic() {
        assert!(complexity(0.5, 1500.0) < complexity(0.9, 1500.0));
        assert!(complexity(0.9, 1100.0) < complexity(0.9, 1500.0));
        assert!(complexity(1.0, 10_000.0) <= 1.0);
    }
}
