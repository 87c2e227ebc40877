//! Deriving templates from concrete prompt data and filling them back in.

use super::optimize;
use super::types::{
    OptimizationSuggestion, PromptTemplate, Replacement, ReplacementPreview, VariableDefinition,
    VariableType, VariableValidation,
};
use crate::convert::result::ConversionResult;
use crate::convert::types::{PromptMetadata, StandardPromptData};
use crate::vars::VariableMap;
use crate::vars::scanner::{placeholders, replace_variables, scan_names, scan_names_in, substitute};

/// Value synthesized for a variable that has no concrete value yet.
#[must_use]
pub fn placeholder_value(name: &str) -> String {
    format!("[{name}_placeholder]")
}

/// Best-effort type guess from a variable name.
#[must_use]
pub fn infer_type(name: &str) -> VariableType {
    let lower = name.to_lowercase();
    let has = |needles: &[&str]| needles.iter().any(|n| lower.contains(n));
    // Short needles only count as whole segments: `language` is not an age.
    let has_word = |words: &[&str]| lower.split(['_', '-']).any(|w| words.contains(&w));

    if lower.starts_with("is_") || lower.starts_with("has_") || has(&["enabled", "flag"]) {
        VariableType::Boolean
    } else if has(&["count", "number", "amount", "size", "limit", "total"]) || has_word(&["num", "age"]) {
        VariableType::Number
    } else if has(&["list", "items", "array", "tags"]) {
        VariableType::Array
    } else if has(&["config", "options", "settings", "object", "json"]) {
        VariableType::Object
    } else {
        VariableType::String
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateProcessor;

impl TemplateProcessor {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Derive a template from prompt data.
    ///
    /// Values recorded in `metadata.variables` are kept; any other variable
    /// gets a `[name_placeholder]` value. A variable referenced from more
    /// than one message is marked required.
    pub fn to_template(&self, data: &StandardPromptData) -> ConversionResult<PromptTemplate> {
        if data.messages.is_empty() {
            return ConversionResult::fail("Prompt data has no messages");
        }

        let names = scan_names_in(data.contents());
        let known = data.metadata_variables();
        let mut variables = VariableMap::new();
        let mut definitions = Vec::with_capacity(names.len());

        for name in &names {
            let concrete = known.and_then(|k| k.get(name)).cloned();
            let used_in = data
                .messages
                .iter()
                .filter(|m| placeholders(&m.content).any(|p| p.name == name.as_str()))
                .count();
            variables.insert(name.clone(), concrete.clone().unwrap_or_else(|| placeholder_value(name)));
            definitions.push(VariableDefinition {
                name: name.clone(),
                var_type: infer_type(name),
                required: used_in > 1,
                default_value: concrete,
                description: None,
            });
        }

        let mut warnings = Vec::new();
        if names.is_empty() {
            warnings.push("No variables found in prompt data".to_string());
        }
        tracing::debug!(variables = names.len(), "template derived");
        ConversionResult::with_warnings(
            PromptTemplate { data: data.clone(), variables, definitions },
            warnings,
        )
    }

    /// Fill a template with `variables`, recording the map in metadata.
    ///
    /// The output depends only on the inputs, so repeated calls produce
    /// identical data.
    pub fn from_template(
        &self,
        template: &PromptTemplate,
        variables: &VariableMap,
    ) -> ConversionResult<StandardPromptData> {
        let mut data = template.data.clone();
        for m in &mut data.messages {
            m.content = replace_variables(&m.content, variables);
        }

        let mut metadata = data.metadata.take().unwrap_or_default();
        metadata.source = Some("manual".to_string());
        metadata.variables = Some(variables.clone());
        data.metadata = Some(metadata);

        let unresolved = scan_names_in(data.contents());
        let mut warnings = Vec::new();
        if !unresolved.is_empty() {
            warnings.push(format!("Unresolved variables: {}", unresolved.join(", ")));
        }
        ConversionResult::with_warnings(data, warnings)
    }

    /// Missing variables fail validation; unused ones do not.
    #[must_use]
    pub fn validate_variables(
        &self,
        template: &PromptTemplate,
        variables: &VariableMap,
    ) -> VariableValidation {
        let referenced = scan_names_in(template.data.contents());
        let missing_variables: Vec<String> =
            referenced.iter().filter(|n| !variables.contains_key(*n)).cloned().collect();
        let unused_variables: Vec<String> =
            variables.keys().filter(|k| !referenced.contains(k)).cloned().collect();
        VariableValidation {
            is_valid: missing_variables.is_empty(),
            missing_variables,
            unused_variables,
        }
    }

    /// Substitute into `content` and report every substitution made.
    ///
    /// With `highlight`, replaced values are wrapped in `**` in the processed
    /// text; the audit trail always carries the bare value.
    #[must_use]
    pub fn preview_replacement(
        &self,
        content: &str,
        variables: &VariableMap,
        highlight: bool,
    ) -> ReplacementPreview {
        let mut replacements = Vec::new();
        let processed = substitute(content, |p| {
            let value = variables.get(p.name)?;
            replacements.push(Replacement {
                variable: p.name.to_string(),
                placeholder: p.text.to_string(),
                replacement: value.clone(),
                start: p.span.start,
                end: p.span.end,
            });
            Some(if highlight { format!("**{value}**") } else { value.clone() })
        });
        ReplacementPreview { original: content.to_string(), processed, replacements }
    }

    #[must_use]
    pub fn suggest_optimizations(&self, template: &PromptTemplate) -> Vec<OptimizationSuggestion> {
        optimize::suggest(template)
    }

    /// Variables referenced by a single text, first-seen order.
    #[must_use]
    pub fn referenced_variables(&self, content: &str) -> Vec<String> {
        scan_names(content)
    }
}
