//! Errors raised by variable CRUD and extraction.

use thiserror::Error;

use crate::store::StoreError;

/// Guard failures from the variable manager.
#[derive(Debug, Error)]
pub enum VariableError {
    #[error("invalid variable name '{name}': must start with a letter, contain only letters, digits or '_', and be at most 50 characters")]
    InvalidVariableName { name: String },

    #[error("'{name}' is a predefined variable and cannot be overridden")]
    PredefinedVariableOverride { name: String },

    #[error("value for '{name}' is too long ({length} > {max} characters)")]
    ValueTooLong { name: String, length: usize, max: usize },

    #[error("'{name}' is a predefined variable and cannot be deleted")]
    DeletePredefinedVariable { name: String },

    #[error("failed to import variables: {0}")]
    ImportError(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl VariableError {
    /// The variable the error refers to, when there is one.
    #[must_use]
    pub fn variable_name(&self) -> Option<&str> {
        match self {
            Self::InvalidVariableName { name }
            | Self::PredefinedVariableOverride { name }
            | Self::ValueTooLong { name, .. }
            | Self::DeletePredefinedVariable { name } => Some(name),
            Self::ImportError(_) | Self::Store(_) => None,
        }
    }
}

/// Failures from turning a selection into a placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractionError {
    #[error("invalid variable name '{0}'")]
    InvalidName(String),

    #[error("invalid selection range {start}..{end} for content of length {len}")]
    InvalidRange { start: usize, end: usize, len: usize },

    #[error("selection {start}..{end} no longer matches the selected text")]
    RangeMismatch { start: usize, end: usize },

    #[error("selected text is too long ({length} > {max} characters)")]
    ValueTooLong { length: usize, max: usize },
}
