//! Variables: naming rules, placeholder scanning, extraction and the
//! persisted custom-variable namespace.
//!
//! Placeholders are written `{{name}}` (whitespace inside the braces is
//! tolerated). Names must match `^[A-Za-z][A-Za-z0-9_]*$` and be at most
//! 50 characters. A fixed set of predefined names is reserved for values
//! supplied by the engine and can never be created, overridden or deleted.

pub mod errors;
pub mod extractor;
pub mod manager;
pub mod names;
pub mod scanner;
pub mod types;

pub use errors::{ExtractionError, VariableError};
pub use extractor::VariableExtractor;
pub use manager::VariableManager;
pub use names::{PREDEFINED_VARIABLES, VariableLimits, is_predefined, is_valid_name};
pub use scanner::{Placeholder, Span, replace_variables, scan_names, scan_names_in};
pub use types::{
    ExtractedVariable, Extraction, ImportSummary, ScannedVariable, VariableExport,
    VariableMap, VariableSource, VariableStorage, VariableSuggestion,
};
