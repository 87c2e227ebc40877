//! Per-format structural validation. Each check reports the first problem.

use serde_json::Value;

use super::detect::DataFormat;
use super::result::ConversionResult;
use super::types::Role;

/// Validate `data` against `format`.
pub fn validate(data: &Value, format: DataFormat) -> ConversionResult<()> {
    let outcome = match format {
        DataFormat::Conversation => validate_conversation(data),
        DataFormat::Langfuse => validate_langfuse(data),
        DataFormat::OpenAi => validate_openai(data),
        DataFormat::Standard => validate_standard(data),
        DataFormat::Unknown => Err("Unknown data format".to_string()),
    };
    match outcome {
        Ok(()) => ConversionResult::ok(()),
        Err(e) => ConversionResult::fail(e),
    }
}

/// Which roles a schema admits.
#[derive(Clone, Copy)]
enum Roles {
    All,
    Conversational,
}

fn check_messages(messages: &[Value], roles: Roles) -> Result<(), String> {
    for (i, message) in messages.iter().enumerate() {
        if !message.is_object() {
            return Err(format!("Message {i} is not an object"));
        }
        let role = message.get("role").and_then(Value::as_str).and_then(Role::parse);
        let allowed = match (role, roles) {
            (Some(_), Roles::All) => true,
            (Some(r), Roles::Conversational) => r.is_conversational(),
            (None, _) => false,
        };
        if !allowed {
            return Err(format!("Invalid role in message {i}"));
        }
        if !message.get("content").is_some_and(Value::is_string) {
            return Err(format!("Invalid content in message {i}"));
        }
    }
    Ok(())
}

fn messages_of<'a>(obj: &'a Value, what: &str) -> Result<&'a Vec<Value>, String> {
    obj.get("messages")
        .and_then(Value::as_array)
        .ok_or_else(|| format!("{what} must contain a messages array"))
}

pub(crate) fn validate_conversation(data: &Value) -> Result<(), String> {
    let messages = data.as_array().ok_or("Conversation data must be an array")?;
    if messages.is_empty() {
        return Err("Conversation contains no messages".into());
    }
    check_messages(messages, Roles::Conversational)
}

pub(crate) fn validate_openai(data: &Value) -> Result<(), String> {
    if !data.is_object() {
        return Err("OpenAI request must be an object".into());
    }
    if !data.get("model").is_some_and(Value::is_string) {
        return Err("OpenAI request must specify a model".into());
    }
    let messages = messages_of(data, "OpenAI request")?;
    if messages.is_empty() {
        return Err("OpenAI request contains no messages".into());
    }
    check_messages(messages, Roles::All)
}

pub(crate) fn validate_standard(data: &Value) -> Result<(), String> {
    if !data.is_object() {
        return Err("Standard prompt data must be an object".into());
    }
    let messages = messages_of(data, "Standard prompt data")?;
    check_messages(messages, Roles::All)
}

/// LangFuse content may be a string, a list of parts, or (for tool
/// definitions) an object, so only presence is checked here.
pub(crate) fn validate_langfuse(data: &Value) -> Result<(), String> {
    let messages = match data {
        Value::Array(items) => match items.first() {
            None => return Err("LangFuse export is empty".into()),
            Some(first) if first.get("input").is_some() => langfuse_input_messages(first)?,
            Some(_) => items,
        },
        Value::Object(_) => langfuse_input_messages(data)?,
        _ => return Err("LangFuse data must be an object or an array".into()),
    };
    for (i, message) in messages.iter().enumerate() {
        if message.get("role").and_then(Value::as_str).and_then(Role::parse).is_none() {
            return Err(format!("Invalid role in message {i}"));
        }
        if message.get("content").is_none_or(Value::is_null)
            && message.get("tool_calls").is_none()
        {
            return Err(format!("Missing content in message {i}"));
        }
    }
    Ok(())
}

fn langfuse_input_messages(trace: &Value) -> Result<&Vec<Value>, String> {
    trace
        .get("input")
        .and_then(|i| i.get("messages"))
        .and_then(Value::as_array)
        .ok_or_else(|| "LangFuse trace must contain input.messages".to_string())
}
