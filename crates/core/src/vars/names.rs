//! Variable naming rules and the closed set of predefined variables.

use std::sync::LazyLock;

use regex::Regex;

/// Maximum length of a variable name.
pub const MAX_NAME_LENGTH: usize = 50;

/// Default maximum length of a stored variable value.
pub const MAX_VALUE_LENGTH: usize = 10_000;

/// Maximum length of a value captured from an interactive selection.
pub const MAX_INTERACTIVE_VALUE_LENGTH: usize = 5_000;

/// Names supplied by the engine itself. Custom variables can never use these.
pub const PREDEFINED_VARIABLES: &[&str] = &[
    "originalPrompt",
    "lastOptimizedPrompt",
    "iterateInput",
    "currentPrompt",
    "userQuestion",
    "conversationContext",
];

static NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_]*$").unwrap());

/// Check a name against the pattern and length rules.
///
/// This does not look at the predefined set; a predefined name is still a
/// syntactically valid name.
#[must_use]
pub fn is_valid_name(name: &str) -> bool {
    name.len() <= MAX_NAME_LENGTH && NAME_RE.is_match(name)
}

#[must_use]
pub fn is_predefined(name: &str) -> bool {
    PREDEFINED_VARIABLES.contains(&name)
}

/// Length limits applied to variable values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariableLimits {
    pub max_value_length: usize,
    pub max_interactive_value_length: usize,
}

impl Default for VariableLimits {
    fn default() -> Self {
        Self {
            max_value_length: MAX_VALUE_LENGTH,
            max_interactive_value_length: MAX_INTERACTIVE_VALUE_LENGTH,
        }
    }
}

/// Length of a value as the user perceives it (characters, not bytes).
#[must_use]
pub fn value_length(value: &str) -> usize {
    value.chars().count()
}
