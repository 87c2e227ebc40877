//! Structural format detection for untyped prompt payloads.

use std::fmt;
use std::str::FromStr;

use serde_json::Value;

/// Prompt payload schemas understood by the converter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataFormat {
    /// Plain `[{role, content}]` array.
    Conversation,
    /// LangFuse trace export: a list of trace records, one trace, or the
    /// bare message array of a trace.
    Langfuse,
    /// OpenAI chat-completions request.
    OpenAi,
    /// The internal [`StandardPromptData`](super::types::StandardPromptData) shape.
    Standard,
    Unknown,
}

impl DataFormat {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            DataFormat::Conversation => "conversation",
            DataFormat::Langfuse => "langfuse",
            DataFormat::OpenAi => "openai",
            DataFormat::Standard => "standard",
            DataFormat::Unknown => "unknown",
        }
    }
}

impl fmt::Display for DataFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "conversation" => Ok(DataFormat::Conversation),
            "langfuse" => Ok(DataFormat::Langfuse),
            "openai" => Ok(DataFormat::OpenAi),
            "standard" => Ok(DataFormat::Standard),
            "unknown" => Ok(DataFormat::Unknown),
            other => Err(format!("unknown data format: {other}")),
        }
    }
}

/// Classify a payload by shape alone; no field is trusted beyond presence.
#[must_use]
pub fn detect_format(data: &Value) -> DataFormat {
    match data {
        Value::Array(items) => match items.first() {
            Some(first) if first.get("role").is_some() => DataFormat::Conversation,
            Some(first) if first.get("input").is_some() => DataFormat::Langfuse,
            _ => DataFormat::Unknown,
        },
        Value::Object(obj) => {
            if obj.get("input").and_then(|i| i.get("messages")).is_some() {
                DataFormat::Langfuse
            } else if obj.get("messages").is_some_and(Value::is_array)
                && obj.get("model").is_some_and(|m| !m.is_null())
            {
                DataFormat::OpenAi
            } else {
                DataFormat::Unknown
            }
        }
        _ => DataFormat::Unknown,
    }
}
