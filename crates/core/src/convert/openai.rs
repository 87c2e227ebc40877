//! OpenAI chat-completions request schema.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::result::ConversionResult;
use super::substitute_messages;
use super::types::{PromptMetadata, StandardMessage, StandardPromptData, StopSequence, ToolDefinition};
use super::validate::validate_openai;
use crate::vars::VariableMap;

/// An OpenAI-compatible request body. Optional fields are omitted from the
/// JSON entirely when unset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenAiRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    pub messages: Vec<StandardMessage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<ToolDefinition>>,
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
}

impl OpenAiRequest {
    #[must_use]
    pub fn builder(messages: Vec<StandardMessage>) -> OpenAiRequestBuilder {
        OpenAiRequestBuilder {
            request: OpenAiRequest {
                model: None,
                messages,
                tools: None,
                temperature: None,
                max_tokens: None,
                top_p: None,
                frequency_penalty: None,
                presence_penalty: None,
                stop: None,
                stream: None,
            },
        }
    }
}

/// Sets a field only when the source value is present.
#[derive(Debug)]
pub struct OpenAiRequestBuilder {
    request: OpenAiRequest,
}

macro_rules! optional_setter {
    ($name:ident, $ty:ty) => {
        #[must_use]
        pub fn $name(mut self, value: Option<$ty>) -> Self {
            if let Some(v) = value {
                self.request.$name = Some(v);
            }
            self
        }
    };
}

impl OpenAiRequestBuilder {
    optional_setter!(model, String);
    optional_setter!(tools, Vec<ToolDefinition>);
    optional_setter!(temperature, f64);
    optional_setter!(max_tokens, u32);
    optional_setter!(top_p, f64);
    optional_setter!(frequency_penalty, f64);
    optional_setter!(presence_penalty, f64);
    optional_setter!(stop, StopSequence);
    optional_setter!(stream, bool);

    #[must_use]
    pub fn build(self) -> OpenAiRequest {
        self.request
    }
}

/// Read an OpenAI request into the internal schema.
pub fn from_openai(value: &Value) -> ConversionResult<StandardPromptData> {
    if let Err(e) = validate_openai(value) {
        return ConversionResult::fail(e);
    }
    let request: OpenAiRequest = match serde_json::from_value(value.clone()) {
        Ok(r) => r,
        Err(e) => return ConversionResult::fail(format!("Invalid OpenAI request: {e}")),
    };

    tracing::debug!(messages = request.messages.len(), "converted OpenAI request");
    ConversionResult::ok(StandardPromptData {
        messages: request.messages,
        tools: request.tools,
        model: request.model,
        temperature: request.temperature,
        max_tokens: request.max_tokens,
        top_p: request.top_p,
        frequency_penalty: request.frequency_penalty,
        presence_penalty: request.presence_penalty,
        stop: request.stop,
        stream: request.stream,
        metadata: Some(PromptMetadata::from_source("openai")),
    })
}

/// Build an OpenAI request, substituting `variables` into every message first.
///
/// Placeholders left unresolved after substitution are reported as a warning.
pub fn to_openai(
    data: &StandardPromptData,
    variables: Option<&VariableMap>,
) -> ConversionResult<OpenAiRequest> {
    if data.messages.is_empty() {
        return ConversionResult::fail("No messages to convert");
    }

    let (messages, warnings) = match variables {
        Some(vars) => substitute_messages(&data.messages, vars),
        None => (data.messages.clone(), Vec::new()),
    };

    let request = OpenAiRequest::builder(messages)
        .model(data.model.clone())
        .tools(data.tools.clone())
        .temperature(data.temperature)
        .max_tokens(data.max_tokens)
        .top_p(data.top_p)
        .frequency_penalty(data.frequency_penalty)
        .presence_penalty(data.presence_penalty)
        .stop(data.stop.clone())
        .stream(data.stream)
        .build();

    ConversionResult::with_warnings(request, warnings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::types::{FunctionCall, Role, ToolCall};
    use serde_json::json;

    fn request() -> Value {
        json!({
            "model": "gpt-4",
            "messages": [
                {"role": "system", "content": "You are {{persona}}."},
                {"role": "user", "content": "Hi", "name": "ana"},
                {"role": "assistant", "content": "", "tool_calls": [
                    {"id": "c1", "type": "function", "function": {"name": "lookup", "arguments": "{}"}}
                ]},
                {"role": "tool", "content": "42", "tool_call_id": "c1"}
            ],
            "temperature": 0.7,
            "max_tokens": 256
        })
    }

    #[test]
    fn test_roundtrip_preserves_messages() {
        let original = request();
        let data = from_openai(&original).data().cloned().unwrap();
        let back = to_openai(&data, None);
        let back = serde_json::to_value(back.data().unwrap()).unwrap();
        assert_eq!(back["messages"], original["messages"]);
        assert_eq!(back["temperature"], json!(0.7));
        assert_eq!(back["max_tokens"], json!(256));
    }

    #[test]
    fn test_from_openai_maps_tool_calls() {
        let data = from_openai(&request()).data().cloned().unwrap();
        assert_eq!(
            data.messages[2].tool_calls,
            Some(vec![ToolCall {
                id: "c1".into(),
                kind: "function".into(),
                function: FunctionCall { name: "lookup".into(), arguments: "{}".into() },
            }])
        );
        assert_eq!(data.metadata.unwrap().source.as_deref(), Some("openai"));
    }

    #[test]
    fn test_from_openai_rejects_bad_role() {
        let bad = json!({"model": "m", "messages": [{"role": "bot", "content": "x"}]});
        let r = from_openai(&bad);
        assert_eq!(r.error(), Some("Invalid role in message 0"));
    }

    #[test]
    fn test_to_openai_omits_undefined_options() {
        let data = StandardPromptData::new(vec![StandardMessage::new(Role::User, "q")]);
        let v = serde_json::to_value(to_openai(&data, None).data().unwrap()).unwrap();
        assert_eq!(v, json!({"messages": [{"role": "user", "content": "q"}]}));
    }

    #[test]
    fn test_to_openai_substitutes_variables() {
        let data = from_openai(&request()).data().cloned().unwrap();
        let vars: VariableMap = [("persona".to_string(), "a pirate".to_string())].into();
        let r = to_openai(&data, Some(&vars));
        assert_eq!(r.data().unwrap().messages[0].content, "You are a pirate.");
        assert!(r.warnings().is_empty());

        let r = to_openai(&data, Some(&VariableMap::new()));
        assert_eq!(r.warnings(), ["Unresolved variables: persona".to_string()]);
    }

    #[test]
    fn test_to_openai_requires_messages() {
        assert!(!to_openai(&StandardPromptData::default(), None).is_success());
    }
}
