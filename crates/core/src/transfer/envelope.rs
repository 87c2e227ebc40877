//! Export formats, the template export envelope and export file names.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::convert::types::StandardPromptData;
use crate::vars::scanner::placeholders;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    Standard,
    OpenAi,
    Conversation,
    Template,
}

impl ExportFormat {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ExportFormat::Standard => "standard",
            ExportFormat::OpenAi => "openai",
            ExportFormat::Conversation => "conversation",
            ExportFormat::Template => "template",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "standard" => Ok(ExportFormat::Standard),
            "openai" => Ok(ExportFormat::OpenAi),
            "conversation" => Ok(ExportFormat::Conversation),
            "template" => Ok(ExportFormat::Template),
            other => Err(format!("unknown export format: {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportInfo {
    pub format: String,
    pub exported_at: String,
    pub variable_count: usize,
}

/// `{template, variables, export_info}` as written for `template` exports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateEnvelope {
    pub template: StandardPromptData,
    pub variables: Vec<String>,
    pub export_info: ExportInfo,
}

/// Build the template envelope, scanning every message for placeholders.
#[must_use]
pub fn template_envelope(data: &StandardPromptData, now: DateTime<Utc>) -> TemplateEnvelope {
    let mut seen = HashSet::new();
    let mut variables = Vec::new();
    for message in &data.messages {
        for p in placeholders(&message.content) {
            if seen.insert(p.name.to_string()) {
                variables.push(p.name.to_string());
            }
        }
    }
    TemplateEnvelope {
        template: data.clone(),
        export_info: ExportInfo {
            format: ExportFormat::Template.as_str().to_string(),
            exported_at: now.to_rfc3339(),
            variable_count: variables.len(),
        },
        variables,
    }
}

/// `prompt-<format>-<timestamp>.json`; the timestamp sorts lexically and
/// contains no characters that filesystems reject.
#[must_use]
pub fn export_filename(format: ExportFormat, now: DateTime<Utc>) -> String {
    format!("prompt-{}-{}.json", format.as_str(), now.format("%Y-%m-%dT%H-%M-%S-%3fZ"))
}
