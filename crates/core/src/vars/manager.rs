//! Custom variable namespace with persistence.

use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;

use super::errors::VariableError;
use super::names::{
    PREDEFINED_VARIABLES, VariableLimits, is_predefined, is_valid_name, value_length,
};
use super::scanner;
use super::types::{ImportSummary, VariableExport, VariableMap, VariableSource, VariableStorage};
use crate::convert::types::ConversationMessage;
use crate::store::{self, PreferenceStore, StoreError};

type Result<T> = std::result::Result<T, VariableError>;

/// Owns the custom variables, the advanced-mode flag and the last edited
/// conversation.
///
/// The whole [`VariableStorage`] is written back after every successful
/// mutation. In-memory state only changes once that write succeeded.
pub struct VariableManager {
    store: Arc<dyn PreferenceStore>,
    storage: VariableStorage,
    limits: VariableLimits,
}

impl VariableManager {
    /// Preference key holding the serialized storage.
    pub const STORAGE_KEY: &'static str = "variableManager.storage";

    pub async fn load(store: Arc<dyn PreferenceStore>) -> Result<Self> {
        Self::load_with_limits(store, VariableLimits::default()).await
    }

    /// Load persisted state. A stored blob with the wrong shape is replaced by
    /// an empty namespace rather than failing startup.
    pub async fn load_with_limits(
        store: Arc<dyn PreferenceStore>,
        limits: VariableLimits,
    ) -> Result<Self> {
        let storage =
            match store::get_or(store.as_ref(), Self::STORAGE_KEY, VariableStorage::default())
                .await
            {
                Ok(storage) => storage,
                Err(e @ StoreError::Decode { .. }) => {
                    tracing::warn!("ignoring unreadable variable storage: {e}");
                    VariableStorage::default()
                }
                Err(e) => return Err(e.into()),
            };

        tracing::debug!(
            custom = storage.custom_variables.len(),
            advanced = storage.advanced_mode_enabled,
            "variable storage loaded"
        );
        Ok(Self { store, storage, limits })
    }

    async fn commit(&mut self, next: VariableStorage) -> Result<()> {
        store::set_typed(self.store.as_ref(), Self::STORAGE_KEY, &next).await?;
        self.storage = next;
        Ok(())
    }

    fn check_value(&self, name: &str, value: &str) -> Result<()> {
        let length = value_length(value);
        if length > self.limits.max_value_length {
            return Err(VariableError::ValueTooLong {
                name: name.to_string(),
                length,
                max: self.limits.max_value_length,
            });
        }
        Ok(())
    }

    fn check_settable(&self, name: &str, value: &str) -> Result<()> {
        if !is_valid_name(name) {
            return Err(VariableError::InvalidVariableName { name: name.to_string() });
        }
        if is_predefined(name) {
            return Err(VariableError::PredefinedVariableOverride { name: name.to_string() });
        }
        self.check_value(name, value)
    }

    pub async fn set_variable(&mut self, name: &str, value: &str) -> Result<()> {
        self.check_settable(name, value)?;
        let mut next = self.storage.clone();
        next.custom_variables.insert(name.to_string(), value.to_string());
        self.commit(next).await?;
        tracing::debug!(name, "custom variable set");
        Ok(())
    }

    /// Remove a custom variable. Returns whether it existed.
    pub async fn delete_variable(&mut self, name: &str) -> Result<bool> {
        if is_predefined(name) {
            return Err(VariableError::DeletePredefinedVariable { name: name.to_string() });
        }
        if !self.storage.custom_variables.contains_key(name) {
            return Ok(false);
        }
        let mut next = self.storage.clone();
        next.custom_variables.remove(name);
        self.commit(next).await?;
        tracing::debug!(name, "custom variable deleted");
        Ok(true)
    }

    pub async fn clear_custom_variables(&mut self) -> Result<()> {
        let mut next = self.storage.clone();
        next.custom_variables.clear();
        self.commit(next).await
    }

    /// Value of a custom variable. Predefined values only exist in a
    /// resolution context, see [`Self::resolve_all_variables`].
    #[must_use]
    pub fn get_variable(&self, name: &str) -> Option<&str> {
        self.storage.custom_variables.get(name).map(String::as_str)
    }

    #[must_use]
    pub fn custom_variables(&self) -> &VariableMap {
        &self.storage.custom_variables
    }

    #[must_use]
    pub fn predefined_variables(&self) -> &'static [&'static str] {
        PREDEFINED_VARIABLES
    }

    /// All names with their current values, predefined ones empty.
    #[must_use]
    pub fn list_variables(&self) -> VariableMap {
        self.resolve_all_variables(None)
    }

    /// Predefined values come from `context` (empty when absent); custom
    /// values are laid over them afterwards.
    #[must_use]
    pub fn resolve_all_variables(&self, context: Option<&VariableMap>) -> VariableMap {
        let mut resolved = VariableMap::new();
        for name in PREDEFINED_VARIABLES {
            let value = context.and_then(|c| c.get(*name)).cloned().unwrap_or_default();
            resolved.insert((*name).to_string(), value);
        }
        for (name, value) in &self.storage.custom_variables {
            if is_predefined(name) {
                tracing::warn!(name, "custom variable shadows a predefined name; ignored");
                continue;
            }
            resolved.insert(name.clone(), value.clone());
        }
        resolved
    }

    #[must_use]
    pub fn validate_variable_name(&self, name: &str) -> bool {
        is_valid_name(name)
    }

    #[must_use]
    pub fn is_predefined_variable(&self, name: &str) -> bool {
        is_predefined(name)
    }

    #[must_use]
    pub fn variable_source(&self, name: &str) -> Option<VariableSource> {
        if is_predefined(name) {
            Some(VariableSource::Predefined)
        } else if self.storage.custom_variables.contains_key(name) {
            Some(VariableSource::Custom)
        } else {
            None
        }
    }

    #[must_use]
    pub fn scan_variables_in_content(&self, content: &str) -> Vec<String> {
        scanner::scan_names(content)
    }

    /// Scan an untyped value; anything but a JSON string yields no names.
    #[must_use]
    pub fn scan_variables_in_value(&self, value: &Value) -> Vec<String> {
        value.as_str().map(scanner::scan_names).unwrap_or_default()
    }

    /// Referenced names that `available` (or the resolved namespace) lacks.
    #[must_use]
    pub fn detect_missing_variables(
        &self,
        content: &str,
        available: Option<&VariableMap>,
    ) -> Vec<String> {
        self.missing_in([content], available)
    }

    #[must_use]
    pub fn detect_missing_in_messages(
        &self,
        messages: &[ConversationMessage],
        available: Option<&VariableMap>,
    ) -> Vec<String> {
        self.missing_in(messages.iter().map(|m| m.content.as_str()), available)
    }

    fn missing_in<'a, I>(&self, texts: I, available: Option<&VariableMap>) -> Vec<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let resolved;
        let available = match available {
            Some(map) => map,
            None => {
                resolved = self.resolve_all_variables(None);
                &resolved
            }
        };
        scanner::scan_names_in(texts)
            .into_iter()
            .filter(|name| !available.contains_key(name))
            .collect()
    }

    /// Substitute placeholders; unresolved ones stay as written.
    #[must_use]
    pub fn replace_variables(&self, content: &str, variables: Option<&VariableMap>) -> String {
        match variables {
            Some(vars) => scanner::replace_variables(content, vars),
            None => scanner::replace_variables(content, &self.resolve_all_variables(None)),
        }
    }

    #[must_use]
    pub fn is_advanced_mode_enabled(&self) -> bool {
        self.storage.advanced_mode_enabled
    }

    pub async fn set_advanced_mode(&mut self, enabled: bool) -> Result<()> {
        let mut next = self.storage.clone();
        next.advanced_mode_enabled = enabled;
        self.commit(next).await
    }

    #[must_use]
    pub fn last_conversation_messages(&self) -> &[ConversationMessage] {
        &self.storage.last_conversation_messages
    }

    pub async fn set_last_conversation_messages(
        &mut self,
        messages: Vec<ConversationMessage>,
    ) -> Result<()> {
        let mut next = self.storage.clone();
        next.last_conversation_messages = messages;
        self.commit(next).await
    }

    #[must_use]
    pub fn export_variables(&self) -> String {
        let export = VariableExport {
            custom_variables: self.storage.custom_variables.clone(),
            advanced_mode_enabled: self.storage.advanced_mode_enabled,
            export_time: Utc::now().to_rfc3339(),
        };
        serde_json::to_string_pretty(&export).unwrap_or_default()
    }

    /// Merge an export into the namespace.
    ///
    /// Entries with a bad name, a predefined name, a non-string value or an
    /// oversized value are skipped and counted; only unparseable JSON fails.
    pub async fn import_variables(&mut self, json: &str) -> Result<ImportSummary> {
        let parsed: Value =
            serde_json::from_str(json).map_err(|e| VariableError::ImportError(e.to_string()))?;
        let Value::Object(root) = parsed else {
            return Err(VariableError::ImportError("expected a JSON object".into()));
        };

        let mut next = self.storage.clone();
        let mut summary = ImportSummary::default();

        if let Some(Value::Object(vars)) = root.get("customVariables") {
            for (name, value) in vars {
                let admitted = match value.as_str() {
                    Some(value) => match self.check_settable(name, value) {
                        Ok(()) => {
                            next.custom_variables.insert(name.clone(), value.to_string());
                            true
                        }
                        Err(e) => {
                            tracing::warn!("skipping imported variable: {e}");
                            false
                        }
                    },
                    None => {
                        tracing::warn!(name = %name, "skipping imported variable with non-string value");
                        false
                    }
                };
                if admitted {
                    summary.imported += 1;
                } else {
                    summary.skipped += 1;
                }
            }
        }

        if let Some(Value::Bool(enabled)) = root.get("advancedModeEnabled") {
            next.advanced_mode_enabled = *enabled;
        }

        self.commit(next).await?;
        tracing::debug!(imported = summary.imported, skipped = summary.skipped, "variables imported");
        Ok(summary)
    }

    #[must_use]
    pub fn limits(&self) -> VariableLimits {
        self.limits
    }
}
