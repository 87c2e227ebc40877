//! Prompt templates: derivation from concrete data, validation,
//! substitution previews and optimization hints.

pub mod optimize;
pub mod processor;
pub mod types;

pub use processor::{TemplateProcessor, infer_type, placeholder_value};
pub use types::{
    OptimizationSuggestion, PromptTemplate, Replacement, ReplacementPreview, SuggestionKind,
    VariableDefinition, VariableType, VariableValidation,
};
