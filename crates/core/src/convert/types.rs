//! Internal prompt schema shared by every converter.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::vars::VariableMap;

/// Message author. The set is closed; anything else fails validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
    Tool,
}

impl Role {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::Tool => "tool",
        }
    }

    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "system" => Some(Role::System),
            "user" => Some(Role::User),
            "assistant" => Some(Role::Assistant),
            "tool" => Some(Role::Tool),
            _ => None,
        }
    }

    /// Roles that make up a plain conversation (everything but `tool`).
    #[must_use]
    pub fn is_conversational(self) -> bool {
        !matches!(self, Role::Tool)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    pub arguments: String,
}

/// A function call issued by the assistant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    pub id: String,
    #[serde(rename = "type", default = "function_kind")]
    pub kind: String,
    pub function: FunctionCall,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDefinition {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Value>,
}

/// A callable tool offered to the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    #[serde(rename = "type", default = "function_kind")]
    pub kind: String,
    pub function: FunctionDefinition,
}

impl ToolDefinition {
    #[must_use]
    pub fn function(function: FunctionDefinition) -> Self {
        Self { kind: function_kind(), function }
    }
}

fn function_kind() -> String {
    "function".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardMessage {
    pub role: Role,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCall>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

impl StandardMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self { role, content: content.into(), name: None, tool_calls: None, tool_call_id: None }
    }
}

/// The bare `{role, content}` shape used by conversation editors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationMessage {
    pub role: Role,
    pub content: String,
}

impl ConversationMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self { role, content: content.into() }
    }
}

impl From<ConversationMessage> for StandardMessage {
    fn from(m: ConversationMessage) -> Self {
        StandardMessage::new(m.role, m.content)
    }
}

/// `stop` accepts a single sequence or a list of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StopSequence {
    Single(String),
    Many(Vec<String>),
}

/// Provenance and bookkeeping attached to converted data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PromptMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variables: Option<VariableMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PromptMetadata {
    pub fn from_source(source: impl Into<String>) -> Self {
        Self { source: Some(source.into()), ..Default::default() }
    }
}

/// Format-neutral prompt payload. Built per conversion and then discarded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StandardPromptData {
    pub messages: Vec<StandardMessage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<ToolDefinition>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency_penalty: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub presence_penalty: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop: Option<StopSequence>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stream: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<PromptMetadata>,
}

impl StandardPromptData {
    #[must_use]
    pub fn new(messages: Vec<StandardMessage>) -> Self {
        Self { messages, ..Default::default() }
    }

    /// Message contents in order; the usual input for placeholder scans.
    pub fn contents(&self) -> impl Iterator<Item = &str> {
        self.messages.iter().map(|m| m.content.as_str())
    }

    /// Variable values recorded in metadata, if any.
    #[must_use]
    pub fn metadata_variables(&self) -> Option<&VariableMap> {
        self.metadata.as_ref().and_then(|m| m.variables.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_role_parse_is_closed() {
        assert_eq!(Role::parse("assistant"), Some(Role::Assistant));
        assert_eq!(Role::parse("Assistant"), None);
        assert_eq!(Role::parse("function"), None);
    }

    #[test]
    fn test_message_omits_absent_fields() {
        let v = serde_json::to_value(StandardMessage::new(Role::User, "hi")).unwrap();
        assert_eq!(v, json!({"role": "user", "content": "hi"}));
    }

    #[test]
    fn test_prompt_data_omits_absent_options() {
        let mut data = StandardPromptData::new(vec![StandardMessage::new(Role::System, "s")]);
        data.temperature = Some(0.2);
        let v = serde_json::to_value(&data).unwrap();
        assert_eq!(
            v,
            json!({"messages": [{"role": "system", "content": "s"}], "temperature": 0.2})
        );
    }

    #[test]
    fn test_stop_accepts_both_shapes() {
        let one: StopSequence = serde_json::from_value(json!("END")).unwrap();
        let many: StopSequence = serde_json::from_value(json!(["a", "b"])).unwrap();
        assert_eq!(one, StopSequence::Single("END".into()));
        assert_eq!(many, StopSequence::Many(vec!["a".into(), "b".into()]));
    }

    #[test]
    fn test_metadata_keeps_unknown_keys() {
        let m: PromptMetadata =
            serde_json::from_value(json!({"source": "x", "team": "core"})).unwrap();
        assert_eq!(m.source.as_deref(), Some("x"));
        assert_eq!(m.extra.get("team"), Some(&json!("core")));
    }
}
