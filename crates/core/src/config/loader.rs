use crate::config::types::{
    ConfigFile, ExportConfig, LimitsConfig, LoggingConfig, ResolvedConfig, StorageConfig,
};
use crate::vars::names::VariableLimits;
use shellexpand::full;
use std::path::{Path, PathBuf};
use std::{env, fs};

use dirs::{data_dir, home_dir};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found at {0}")]
    NotFound(String),

    #[error("failed to read config file {0}: {1}")]
    ReadError(String, #[source] std::io::Error),

    #[error("failed to parse TOML in {0}: {1}")]
    ParseError(String, #[source] toml::de::Error),

    #[error("version {0} is unsupported (expected 1)")]
    BadVersion(u32),

    #[error("invalid limits: {0}")]
    InvalidLimits(String),

    #[error("home directory not available to expand '~'")]
    NoHome,
}

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config from `config_path`, or from the default location.
    ///
    /// An explicit path must exist. When the default file is absent the
    /// built-in defaults are used.
    pub fn load(config_path: Option<&Path>) -> Result<ResolvedConfig, ConfigError> {
        let path = match config_path {
            Some(p) => p.to_path_buf(),
            None => {
                let p = default_config_path();
                if !p.exists() {
                    return Self::resolve(None, &default_file());
                }
                p
            }
        };

        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }

        let s = fs::read_to_string(&path)
            .map_err(|e| ConfigError::ReadError(path.display().to_string(), e))?;

        let cf: ConfigFile = toml::from_str(&s)
            .map_err(|e| ConfigError::ParseError(path.display().to_string(), e))?;

        if cf.version != 1 {
            return Err(ConfigError::BadVersion(cf.version));
        }

        Self::resolve(Some(path), &cf)
    }

    fn resolve(source: Option<PathBuf>, cf: &ConfigFile) -> Result<ResolvedConfig, ConfigError> {
        let storage_path = match &cf.storage.path {
            Some(p) => expand_path(p)?,
            None => default_storage_path(),
        };
        let export_dir = match &cf.export.dir {
            Some(d) => expand_path(d)?,
            None => PathBuf::from("."),
        };

        let logging = match &cf.logging.file {
            Some(file) => LoggingConfig {
                file: Some(expand_path(&file.to_string_lossy())?),
                ..cf.logging.clone()
            },
            None => cf.logging.clone(),
        };

        Ok(ResolvedConfig {
            source,
            storage_path,
            export_dir,
            limits: resolve_limits(&cf.limits)?,
            logging,
        })
    }
}

fn default_file() -> ConfigFile {
    ConfigFile {
        version: 1,
        storage: StorageConfig::default(),
        limits: LimitsConfig::default(),
        export: ExportConfig::default(),
        logging: LoggingConfig::default(),
    }
}

fn resolve_limits(limits: &LimitsConfig) -> Result<VariableLimits, ConfigError> {
    if limits.max_value_length == 0 || limits.max_interactive_value_length == 0 {
        return Err(ConfigError::InvalidLimits("limits must be greater than zero".into()));
    }
    if limits.max_interactive_value_length > limits.max_value_length {
        return Err(ConfigError::InvalidLimits(format!(
            "max_interactive_value_length ({}) exceeds max_value_length ({})",
            limits.max_interactive_value_length, limits.max_value_length
        )));
    }
    Ok(VariableLimits {
        max_value_length: limits.max_value_length,
        max_interactive_value_length: limits.max_interactive_value_length,
    })
}

pub fn default_config_path() -> PathBuf {
    if let Ok(xdg) = env::var("XDG_CONFIG_HOME") {
        return Path::new(&xdg).join("promptvars").join("config.toml");
    }
    let home = home_dir().unwrap_or_else(|| PathBuf::from("~"));
    home.join(".config").join("promptvars").join("config.toml")
}

/// Default preference file: `<data dir>/promptvars/preferences.json`.
pub fn default_storage_path() -> PathBuf {
    if let Ok(xdg) = env::var("XDG_DATA_HOME") {
        return Path::new(&xdg).join("promptvars").join("preferences.json");
    }
    data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("promptvars")
        .join("preferences.json")
}

fn expand_path(input: &str) -> Result<PathBuf, ConfigError> {
    let expanded = full(input).map_err(|_| ConfigError::NoHome)?;
    Ok(PathBuf::from(expanded.to_string()))
}
