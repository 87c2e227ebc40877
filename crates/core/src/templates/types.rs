//! Template data model.

use serde::{Deserialize, Serialize};

use crate::convert::types::StandardPromptData;
use crate::vars::VariableMap;

/// Inferred value type of a template variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariableType {
    String,
    Number,
    Boolean,
    Object,
    Array,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableDefinition {
    pub name: String,
    #[serde(rename = "type")]
    pub var_type: VariableType,
    /// Referenced from more than one message.
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Prompt data with placeholders, plus what is known about its variables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptTemplate {
    /// Template body; message contents still carry their placeholders.
    pub data: StandardPromptData,
    /// Concrete or synthesized value for every discovered variable.
    pub variables: VariableMap,
    pub definitions: Vec<VariableDefinition>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableValidation {
    pub is_valid: bool,
    pub missing_variables: Vec<String>,
    pub unused_variables: Vec<String>,
}

/// One substitution performed by a preview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Replacement {
    pub variable: String,
    pub placeholder: String,
    pub replacement: String,
    /// Byte span of the placeholder in the original text.
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReplacementPreview {
    pub original: String,
    pub processed: String,
    pub replacements: Vec<Replacement>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionKind {
    Merge,
    Split,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptimizationSuggestion {
    pub kind: SuggestionKind,
    pub variables: Vec<String>,
    pub confidence: f64,
    pub reason: String,
}
