//! Configuration system for Palaver.
//!
//! Provides TOML-based configuration with:
//! - `[session]` cache TTL and reclaimer period
//! - `[chat]` model selection and room naming
//! - `[logging]` console level and JSON file output
//! - Config file layering (user config + project-local overrides)

pub mod discovery;
pub mod error;
pub mod types;

pub use discovery::{
    ConfigSource, LoadedConfig, PROJECT_CONFIG_FILE, config_dir, config_path, load_config,
    load_config_file, load_config_with_options, save_config,
};
pub use error::{ConfigError, Result};
pub use types::*;
