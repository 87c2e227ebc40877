//! Schema detection and conversion between prompt payload formats.
//!
//! Every operation returns a [`ConversionResult`]; malformed input is an
//! expected outcome, never a panic or a Rust error.

pub mod conversation;
pub mod detect;
pub mod langfuse;
pub mod openai;
pub mod result;
pub mod types;
pub mod validate;

use serde_json::Value;

pub use detect::{DataFormat, detect_format};
pub use openai::{OpenAiRequest, OpenAiRequestBuilder};
pub use result::ConversionResult;
pub use types::{
    ConversationMessage, FunctionCall, FunctionDefinition, PromptMetadata, Role,
    StandardMessage, StandardPromptData, StopSequence, ToolCall, ToolDefinition,
};

use crate::vars::VariableMap;
use crate::vars::scanner::{replace_variables, scan_names_in};

/// Substitute `vars` into every message; placeholders left over are
/// reported in one warning.
pub(crate) fn substitute_messages(
    messages: &[StandardMessage],
    vars: &VariableMap,
) -> (Vec<StandardMessage>, Vec<String>) {
    let messages: Vec<StandardMessage> = messages
        .iter()
        .map(|m| StandardMessage { content: replace_variables(&m.content, vars), ..m.clone() })
        .collect();
    let unresolved = scan_names_in(messages.iter().map(|m| m.content.as_str()));
    let warnings = if unresolved.is_empty() {
        Vec::new()
    } else {
        vec![format!("Unresolved variables: {}", unresolved.join(", "))]
    };
    (messages, warnings)
}

/// Stateless façade over the format converters.
#[derive(Debug, Clone, Copy, Default)]
pub struct DataConverter;

impl DataConverter {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    #[must_use]
    pub fn detect_format(&self, data: &Value) -> DataFormat {
        detect::detect_format(data)
    }

    pub fn from_langfuse(&self, trace: &Value) -> ConversionResult<StandardPromptData> {
        langfuse::from_langfuse(trace)
    }

    pub fn from_openai(&self, request: &Value) -> ConversionResult<StandardPromptData> {
        openai::from_openai(request)
    }

    pub fn from_conversation_messages(&self, messages: &Value) -> ConversionResult<StandardPromptData> {
        conversation::from_conversation_messages(messages)
    }

    pub fn from_standard(&self, data: &Value) -> ConversionResult<StandardPromptData> {
        conversation::from_standard(data)
    }

    /// Dispatch on a detected (or caller-chosen) format.
    pub fn from_format(&self, data: &Value, format: DataFormat) -> ConversionResult<StandardPromptData> {
        match format {
            DataFormat::Conversation => self.from_conversation_messages(data),
            DataFormat::Langfuse => self.from_langfuse(data),
            DataFormat::OpenAi => self.from_openai(data),
            DataFormat::Standard => self.from_standard(data),
            DataFormat::Unknown => ConversionResult::fail("Unsupported data format"),
        }
    }

    pub fn to_openai(
        &self,
        data: &StandardPromptData,
        variables: Option<&VariableMap>,
    ) -> ConversionResult<OpenAiRequest> {
        openai::to_openai(data, variables)
    }

    /// Fill placeholders in every message, keeping every other field.
    pub fn apply_variables(
        &self,
        data: &StandardPromptData,
        variables: &VariableMap,
    ) -> ConversionResult<StandardPromptData> {
        let (messages, warnings) = substitute_messages(&data.messages, variables);
        ConversionResult::with_warnings(StandardPromptData { messages, ..data.clone() }, warnings)
    }

    pub fn to_conversation_messages(
        &self,
        data: &StandardPromptData,
    ) -> ConversionResult<Vec<ConversationMessage>> {
        conversation::to_conversation_messages(data)
    }

    pub fn validate(&self, data: &Value, format: DataFormat) -> ConversionResult<()> {
        validate::validate(data, format)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_variables_keeps_other_fields() {
        let mut data = StandardPromptData::new(vec![
            StandardMessage::new(Role::System, "Speak {{lang}}."),
            StandardMessage::new(Role::User, "About {{topic}}"),
        ]);
        data.model = Some("gpt-4".into());
        data.metadata = Some(PromptMetadata::from_source("langfuse"));
        let vars: VariableMap = [("lang".to_string(), "Dutch".to_string())].into();

        let r = DataConverter::new().apply_variables(&data, &vars);
        let out = r.data().unwrap();
        assert_eq!(out.messages[0].content, "Speak Dutch.");
        assert_eq!(out.messages[1].content, "About {{topic}}");
        assert_eq!(out.model, data.model);
        assert_eq!(out.metadata, data.metadata);
        assert_eq!(r.warnings(), ["Unresolved variables: topic"]);
    }
}
