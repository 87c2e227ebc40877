//! TOML configuration: storage location, value limits, export dir, logging.

pub mod loader;
pub mod types;

pub use loader::{ConfigError, ConfigLoader, default_config_path, default_storage_path};
pub use types::{ConfigFile, LoggingConfig, ResolvedConfig};
