//! Variable namespace types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::scanner::Span;
use crate::convert::types::ConversationMessage;

/// Variable name to value. Ordered so exports and reports are stable.
pub type VariableMap = BTreeMap<String, String>;

/// Everything the variable manager persists, written as one blob.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableStorage {
    #[serde(default)]
    pub custom_variables: VariableMap,
    #[serde(default)]
    pub advanced_mode_enabled: bool,
    #[serde(default)]
    pub last_conversation_messages: Vec<ConversationMessage>,
}

/// Portable dump produced by `export_variables`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableExport {
    pub custom_variables: VariableMap,
    pub advanced_mode_enabled: bool,
    pub export_time: String,
}

/// Counts reported by `import_variables`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub imported: usize,
    pub skipped: usize,
}

/// Where a variable name comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableSource {
    Predefined,
    Custom,
}

/// A value lifted out of a document into a placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedVariable {
    pub name: String,
    pub value: String,
    pub start: usize,
    pub end: usize,
}

/// Result of a successful extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub content: String,
    pub variable: ExtractedVariable,
}

/// Candidate variable name for a text selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariableSuggestion {
    pub name: String,
    pub confidence: f64,
    pub reason: String,
}

/// Every occurrence of one variable in a text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScannedVariable {
    pub name: String,
    /// Placeholder text as first written, e.g. `{{ topic }}`.
    pub placeholder: String,
    pub positions: Vec<Span>,
}
