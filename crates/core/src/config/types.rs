use std::path::PathBuf;

use serde::Deserialize;

use crate::vars::names::{MAX_INTERACTIVE_VALUE_LENGTH, MAX_VALUE_LENGTH, VariableLimits};

#[derive(Debug, Deserialize)]
pub struct ConfigFile {
    pub version: u32,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub limits: LimitsConfig,
    #[serde(default)]
    pub export: ExportConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct StorageConfig {
    /// Preference file; defaults to the platform data dir.
    pub path: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LimitsConfig {
    #[serde(default = "default_max_value_length")]
    pub max_value_length: usize,
    #[serde(default = "default_max_interactive_value_length")]
    pub max_interactive_value_length: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_value_length: default_max_value_length(),
            max_interactive_value_length: default_max_interactive_value_length(),
        }
    }
}

fn default_max_value_length() -> usize {
    MAX_VALUE_LENGTH
}

fn default_max_interactive_value_length() -> usize {
    MAX_INTERACTIVE_VALUE_LENGTH
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct ExportConfig {
    /// Directory export files are written to; defaults to the working dir.
    pub dir: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub file_level: Option<String>,
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: default_log_level(), file_level: None, file: None }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// File the config was read from, if any.
    pub source: Option<PathBuf>,
    pub storage_path: PathBuf,
    pub export_dir: PathBuf,
    pub limits: VariableLimits,
    pub logging: LoggingConfig,
}
