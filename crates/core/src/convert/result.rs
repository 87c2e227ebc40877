//! Success/failure envelope returned by conversion and import operations.

use serde::Serialize;
use serde::ser::{SerializeStruct, Serializer};

/// Outcome of a conversion. Expected failures (bad shape, missing fields,
/// malformed JSON) are reported here instead of as Rust errors so batches
/// can be composed without early returns.
#[derive(Debug, Clone, PartialEq)]
pub enum ConversionResult<T> {
    Success { data: T, warnings: Vec<String> },
    Failure { error: String },
}

impl<T> ConversionResult<T> {
    pub fn ok(data: T) -> Self {
        Self::Success { data, warnings: Vec::new() }
    }

    pub fn with_warnings(data: T, warnings: Vec<String>) -> Self {
        Self::Success { data, warnings }
    }

    pub fn fail(error: impl Into<String>) -> Self {
        Self::Failure { error: error.into() }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    #[must_use]
    pub fn data(&self) -> Option<&T> {
        match self {
            Self::Success { data, .. } => Some(data),
            Self::Failure { .. } => None,
        }
    }

    #[must_use]
    pub fn warnings(&self) -> &[String] {
        match self {
            Self::Success { warnings, .. } => warnings,
            Self::Failure { .. } => &[],
        }
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { error } => Some(error),
        }
    }

    /// Convert into a plain `Result`, keeping the warnings on success.
    pub fn into_result(self) -> Result<(T, Vec<String>), String> {
        match self {
            Self::Success { data, warnings } => Ok((data, warnings)),
            Self::Failure { error } => Err(error),
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> ConversionResult<U> {
        match self {
            Self::Success { data, warnings } => ConversionResult::Success { data: f(data), warnings },
            Self::Failure { error } => ConversionResult::Failure { error },
        }
    }

    /// Chain another conversion, accumulating warnings from both steps.
    pub fn and_then<U, F: FnOnce(T) -> ConversionResult<U>>(self, f: F) -> ConversionResult<U> {
        match self {
            Self::Success { data, mut warnings } => match f(data) {
                ConversionResult::Success { data, warnings: more } => {
                    warnings.extend(more);
                    ConversionResult::Success { data, warnings }
                }
                failure @ ConversionResult::Failure { .. } => failure,
            },
            Self::Failure { error } => ConversionResult::Failure { error },
        }
    }
}

impl<T: Serialize> Serialize for ConversionResult<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Success { data, warnings } => {
                let len = if warnings.is_empty() { 2 } else { 3 };
                let mut s = serializer.serialize_struct("ConversionResult", len)?;
                s.serialize_field("success", &true)?;
                s.serialize_field("data", data)?;
                if !warnings.is_empty() {
                    s.serialize_field("warnings", warnings)?;
                }
                s.end()
            }
            Self::Failure { error } => {
                let mut s = serializer.serialize_struct("ConversionResult", 2)?;
                s.serialize_field("success", &false)?;
                s.serialize_field("error", error)?;
                s.end()
            }
        }
    }
}
