//! Plain `[{role, content}]` conversations.

use serde_json::Value;

use super::result::ConversionResult;
use super::types::{ConversationMessage, PromptMetadata, StandardPromptData};
use super::validate::{validate_conversation, validate_standard};

pub fn from_conversation_messages(value: &Value) -> ConversionResult<StandardPromptData> {
    if let Err(e) = validate_conversation(value) {
        return ConversionResult::fail(e);
    }
    let messages: Vec<ConversationMessage> = match serde_json::from_value(value.clone()) {
        Ok(m) => m,
        Err(e) => return ConversionResult::fail(format!("Invalid conversation: {e}")),
    };
    let mut data = StandardPromptData::new(messages.into_iter().map(Into::into).collect());
    data.metadata = Some(PromptMetadata::from_source("conversation"));
    ConversionResult::ok(data)
}

/// Keep system, user and assistant turns. Anything else is dropped and the
/// drop is reported as a warning.
pub fn to_conversation_messages(data: &StandardPromptData) -> ConversionResult<Vec<ConversationMessage>> {
    let kept: Vec<ConversationMessage> = data
        .messages
        .iter()
        .filter(|m| m.role.is_conversational())
        .map(|m| ConversationMessage::new(m.role, m.content.clone()))
        .collect();

    let dropped = data.messages.len() - kept.len();
    let mut warnings = Vec::new();
    if dropped > 0 {
        tracing::warn!(dropped, "non-conversational messages filtered out");
        warnings.push(format!("Filtered out {dropped} message(s) with unsupported roles"));
    }
    ConversionResult::with_warnings(kept, warnings)
}

/// Read a serialized [`StandardPromptData`].
pub fn from_standard(value: &Value) -> ConversionResult<StandardPromptData> {
    if let Err(e) = validate_standard(value) {
        return ConversionResult::fail(e);
    }
    match serde_json::from_value(value.clone()) {
        Ok(data) => ConversionResult::ok(data),
        Err(e) => ConversionResult::fail(format!("Invalid prompt data: {e}")),
    }
}
