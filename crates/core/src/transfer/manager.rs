//! Import/export façade over conversion and transport.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use serde_json::Value;

use super::envelope::{ExportFormat, export_filename, template_envelope};
use super::io::{Clipboard, TextFiles};
use crate::convert::{ConversionResult, DataConverter, DataFormat, StandardPromptData};

/// File extensions accepted by [`ImportExportManager::import_from_file`].
const IMPORTABLE_EXTENSIONS: &[&str] = &["json", "txt"];

pub struct ImportExportManager {
    files: Arc<dyn TextFiles>,
    clipboard: Arc<dyn Clipboard>,
    converter: DataConverter,
}

fn to_pretty<T: Serialize>(value: &T) -> ConversionResult<String> {
    match serde_json::to_string_pretty(value) {
        Ok(s) => ConversionResult::ok(s),
        Err(e) => ConversionResult::fail(format!("Failed to serialize export: {e}")),
    }
}

impl ImportExportManager {
    pub fn new(files: Arc<dyn TextFiles>, clipboard: Arc<dyn Clipboard>) -> Self {
        Self { files, clipboard, converter: DataConverter::new() }
    }

    /// Import a `.json`/`.txt` file holding any supported format.
    pub async fn import_from_file(&self, path: &Path) -> ConversionResult<StandardPromptData> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        if !IMPORTABLE_EXTENSIONS.contains(&ext.as_str()) {
            return ConversionResult::fail(format!(
                "Unsupported file type: {} (expected .json or .txt)",
                path.display()
            ));
        }
        match self.files.read_text(path).await {
            Ok(text) => self.import_from_text(&text),
            Err(e) => ConversionResult::fail(format!("Failed to read {}: {e}", path.display())),
        }
    }

    pub async fn import_from_clipboard(&self) -> ConversionResult<StandardPromptData> {
        match self.clipboard.read_text().await {
            Ok(text) => self.import_from_text(&text),
            Err(e) => ConversionResult::fail(format!("Failed to read clipboard: {e}")),
        }
    }

    /// Parse JSON text, detect its format and convert it.
    pub fn import_from_text(&self, text: &str) -> ConversionResult<StandardPromptData> {
        if text.trim().is_empty() {
            return ConversionResult::fail("No data to import");
        }
        let value: Value = match serde_json::from_str(text) {
            Ok(v) => v,
            Err(e) => return ConversionResult::fail(format!("Invalid JSON: {e}")),
        };

        // A standard export with a model looks like an OpenAI request, but
        // only the standard schema carries `metadata`.
        let format = match self.converter.detect_format(&value) {
            DataFormat::OpenAi if value.get("metadata").is_some_and(Value::is_object) => {
                DataFormat::Standard
            }
            DataFormat::Unknown if value.get("messages").is_some_and(Value::is_array) => {
                DataFormat::Standard
            }
            format => format,
        };
        tracing::debug!(%format, "importing prompt data");
        self.converter.from_format(&value, format)
    }

    /// Serialize `data` in `format` as pretty JSON.
    pub fn render_export(&self, data: &StandardPromptData, format: ExportFormat) -> ConversionResult<String> {
        match format {
            ExportFormat::Standard => to_pretty(data),
            ExportFormat::OpenAi => self.converter.to_openai(data, None).and_then(|r| to_pretty(&r)),
            ExportFormat::Conversation => {
                self.converter.to_conversation_messages(data).and_then(|m| to_pretty(&m))
            }
            ExportFormat::Template => to_pretty(&template_envelope(data, Utc::now())),
        }
    }

    /// Write an export file; without `filename` one is generated from the
    /// format and the current time.
    pub async fn export_to_file(
        &self,
        data: &StandardPromptData,
        format: ExportFormat,
        filename: Option<&str>,
    ) -> ConversionResult<PathBuf> {
        let name = filename.map_or_else(|| export_filename(format, Utc::now()), str::to_string);
        let (text, warnings) = match self.render_export(data, format).into_result() {
            Ok(ok) => ok,
            Err(e) => return ConversionResult::fail(e),
        };
        match self.files.write_text(&name, &text).await {
            Ok(path) => {
                tracing::debug!(path = %path.display(), %format, "export written");
                ConversionResult::with_warnings(path, warnings)
            }
            Err(e) => ConversionResult::fail(format!("Failed to write {name}: {e}")),
        }
    }

    pub async fn export_to_clipboard(
        &self,
        data: &StandardPromptData,
        format: ExportFormat,
    ) -> ConversionResult<()> {
        let (text, warnings) = match self.render_export(data, format).into_result() {
            Ok(ok) => ok,
            Err(e) => return ConversionResult::fail(e),
        };
        match self.clipboard.write_text(&text).await {
            Ok(()) => ConversionResult::with_warnings((), warnings),
            Err(e) => ConversionResult::fail(format!("Failed to write clipboard: {e}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::types::Role;
    use crate::transfer::io::{LocalFiles, MemoryClipboard};
    use serde_json::json;
    use tempfile::tempdir;

    fn manager(dir: &Path, clip: Arc<MemoryClipboard>) -> ImportExportManager {
        ImportExportManager::new(Arc::new(LocalFiles::new(dir)), clip)
    }

    #[test]
    fn test_import_text_dispatches_on_format() {
        let m = manager(Path::new("."), Arc::new(MemoryClipboard::new()));
        let openai = json!({"model": "gpt-4", "messages": [{"role": "user", "content": "x"}]});
        let data = m.import_from_text(&openai.to_string()).data().cloned().unwrap();
        assert_eq!(data.model.as_deref(), Some("gpt-4"));

        let standard = json!({"messages": [{"role": "user", "content": "x"}]});
        assert!(m.import_from_text(&standard.to_string()).is_success());
    }

    #[test]
    fn test_import_text_maps_parse_errors() {
        let m = manager(Path::new("."), Arc::new(MemoryClipboard::new()));
        let r = m.import_from_text("{not json");
        assert!(r.error().unwrap().starts_with("Invalid JSON"));
        assert_eq!(m.import_from_text("  ").error(), Some("No data to import"));
        assert_eq!(m.import_from_text("42").error(), Some("Unsupported data format"));
    }

    #[tokio::test]
    async fn test_import_file_rejects_other_extensions() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("prompt.yaml");
        std::fs::write(&path, "{}").unwrap();
        let m = manager(dir.path(), Arc::new(MemoryClipboard::new()));
        assert!(m.import_from_file(&path).await.error().unwrap().starts_with("Unsupported file type"));
    }

    #[tokio::test]
    async fn test_clipboard_roundtrip_conversation() {
        let dir = tempdir().unwrap();
        let clip = Arc::new(MemoryClipboard::new());
        let m = manager(dir.path(), clip.clone());
        let data = StandardPromptData::new(vec![
            crate::convert::StandardMessage::new(Role::User, "hi"),
            crate::convert::StandardMessage::new(Role::Tool, "{}"),
        ]);

        let r = m.export_to_clipboard(&data, ExportFormat::Conversation).await;
        assert_eq!(r.warnings().len(), 1);

        let back = m.import_from_clipboard().await.data().cloned().unwrap();
        assert_eq!(back.messages.len(), 1);
        assert_eq!(back.messages[0].content, "hi");
    }
}
