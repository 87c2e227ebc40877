//! LangFuse trace ingestion.
//!
//! Three shapes are accepted: an export list of trace records (the first
//! record is used), a single trace object, or the bare message array of a
//! trace. Tool messages whose content is a function descriptor are tool
//! definitions, not conversation turns, and are moved into `tools`.

use serde_json::{Map, Value};

use super::result::ConversionResult;
use super::types::{
    PromptMetadata, Role, StandardMessage, StandardPromptData, StopSequence, ToolCall,
    ToolDefinition,
};
use super::validate::validate_langfuse;

struct TraceParts<'a> {
    trace: Option<&'a Map<String, Value>>,
    messages: &'a [Value],
}

fn input_messages(trace: &Value) -> Option<&Vec<Value>> {
    trace.get("input").and_then(|i| i.get("messages")).and_then(Value::as_array)
}

fn locate<'a>(value: &'a Value, warnings: &mut Vec<String>) -> Option<TraceParts<'a>> {
    match value {
        Value::Array(items) => {
            let first = items.first()?;
            if first.get("input").is_some() {
                if items.len() > 1 {
                    warnings.push(format!(
                        "LangFuse export contains {} traces; only the first was imported",
                        items.len()
                    ));
                }
                Some(TraceParts { trace: first.as_object(), messages: input_messages(first)? })
            } else {
                Some(TraceParts { trace: None, messages: items })
            }
        }
        Value::Object(obj) => {
            Some(TraceParts { trace: Some(obj), messages: input_messages(value)? })
        }
        _ => None,
    }
}

fn is_tool_definition(role: Role, content: &Value) -> bool {
    role == Role::Tool && content.get("type").and_then(Value::as_str) == Some("function")
}

/// Flatten LangFuse content into a string.
fn content_text(i: usize, content: &Value, warnings: &mut Vec<String>) -> Option<String> {
    match content {
        Value::String(s) => Some(s.clone()),
        Value::Null => None,
        Value::Array(parts) => {
            let text: Vec<&str> = parts
                .iter()
                .filter_map(|p| p.get("text").and_then(Value::as_str).or_else(|| p.as_str()))
                .collect();
            warnings.push(format!("Message {i}: content parts were joined into text"));
            Some(text.join("\n"))
        }
        other => {
            warnings.push(format!("Message {i}: structured content was serialized to JSON"));
            Some(other.to_string())
        }
    }
}

fn convert_message(
    i: usize,
    raw: &Value,
    role: Role,
    warnings: &mut Vec<String>,
) -> Result<StandardMessage, String> {
    let tool_calls = match raw.get("tool_calls") {
        None | Some(Value::Null) => None,
        Some(calls) => match serde_json::from_value::<Vec<ToolCall>>(calls.clone()) {
            Ok(calls) => Some(calls),
            Err(e) => {
                warnings.push(format!("Message {i}: ignoring malformed tool_calls ({e})"));
                None
            }
        },
    };

    let content = match content_text(i, raw.get("content").unwrap_or(&Value::Null), warnings) {
        Some(text) => text,
        None if tool_calls.is_some() => String::new(),
        None => return Err(format!("Missing content in message {i}")),
    };

    Ok(StandardMessage {
        role,
        content,
        name: raw.get("name").and_then(Value::as_str).map(str::to_string),
        tool_calls,
        tool_call_id: raw.get("tool_call_id").and_then(Value::as_str).map(str::to_string),
    })
}

/// Look a generation parameter up in `input`, then in `modelParameters`.
fn param<'a>(trace: Option<&'a Map<String, Value>>, keys: &[&str]) -> Option<&'a Value> {
    let trace = trace?;
    let sources = [
        trace.get("input"),
        trace.get("modelParameters"),
        trace.get("model_parameters"),
    ];
    sources.into_iter().flatten().find_map(|src| {
        keys.iter().find_map(|k| src.get(*k)).filter(|v| !v.is_null())
    })
}

/// LangFuse sometimes records numeric parameters as strings.
fn as_f64(v: &Value) -> Option<f64> {
    v.as_f64().or_else(|| v.as_str().and_then(|s| s.parse().ok()))
}

fn as_u32(v: &Value) -> Option<u32> {
    v.as_u64()
        .or_else(|| v.as_str().and_then(|s| s.parse().ok()))
        .and_then(|n| u32::try_from(n).ok())
}

/// Convert a LangFuse export into the internal schema.
pub fn from_langfuse(value: &Value) -> ConversionResult<StandardPromptData> {
    if let Err(e) = validate_langfuse(value) {
        return ConversionResult::fail(e);
    }
    let mut warnings = Vec::new();
    let Some(parts) = locate(value, &mut warnings) else {
        return ConversionResult::fail("Unrecognized LangFuse trace shape");
    };

    let mut messages = Vec::new();
    let mut tools = Vec::new();
    for (i, raw) in parts.messages.iter().enumerate() {
        let Some(role) = raw.get("role").and_then(Value::as_str).and_then(Role::parse) else {
            return ConversionResult::fail(format!("Invalid role in message {i}"));
        };
        let content = raw.get("content").unwrap_or(&Value::Null);
        if is_tool_definition(role, content) {
            match serde_json::from_value::<ToolDefinition>(content.clone()) {
                Ok(tool) => tools.push(tool),
                Err(e) => warnings.push(format!("Message {i}: ignoring malformed tool definition ({e})")),
            }
            continue;
        }
        match convert_message(i, raw, role, &mut warnings) {
            Ok(m) => messages.push(m),
            Err(e) => return ConversionResult::fail(e),
        }
    }

    let declared = parts
        .trace
        .and_then(|t| t.get("input"))
        .and_then(|i| i.get("tools"))
        .and_then(Value::as_array);
    for (i, raw) in declared.into_iter().flatten().enumerate() {
        match serde_json::from_value::<ToolDefinition>(raw.clone()) {
            Ok(tool) if !tools.contains(&tool) => tools.push(tool),
            Ok(_) => {}
            Err(e) => warnings.push(format!("Tool {i}: ignoring malformed definition ({e})")),
        }
    }

    if messages.is_empty() {
        return ConversionResult::fail("No conversation messages found in trace");
    }

    let trace = parts.trace;
    let text = |key: &str| trace.and_then(|t| t.get(key)).and_then(Value::as_str).map(str::to_string);
    let metadata = PromptMetadata {
        trace_id: text("id"),
        timestamp: text("timestamp"),
        usage: trace.and_then(|t| t.get("usage")).filter(|u| !u.is_null()).cloned(),
        ..PromptMetadata::from_source("langfuse")
    };

    let model = param(trace, &["model"])
        .or_else(|| trace.and_then(|t| t.get("model")))
        .and_then(Value::as_str)
        .map(str::to_string);

    let data = StandardPromptData {
        messages,
        tools: if tools.is_empty() { None } else { Some(tools) },
        model,
        temperature: param(trace, &["temperature"]).and_then(as_f64),
        max_tokens: param(trace, &["max_tokens", "maxTokens"]).and_then(as_u32),
        top_p: param(trace, &["top_p", "topP"]).and_then(as_f64),
        frequency_penalty: param(trace, &["frequency_penalty", "frequencyPenalty"]).and_then(as_f64),
        presence_penalty: param(trace, &["presence_penalty", "presencePenalty"]).and_then(as_f64),
        stop: param(trace, &["stop"]).and_then(|v| serde_json::from_value::<StopSequence>(v.clone()).ok()),
        stream: param(trace, &["stream"]).and_then(Value::as_bool),
        metadata: Some(metadata),
    };

    tracing::debug!(
        messages = data.messages.len(),
        tools = data.tools.as_ref().map_or(0, Vec::len),
        "converted LangFuse trace"
    );
    ConversionResult::with_warnings(data, warnings)
}
