//! Configuration system for Flowhook.
//!
//! Provides TOML-based configuration with:
//! - Public webhook URL settings (`[webhook]`)
//! - Worker dispatch timeout and queue bounds (`[dispatch]`)
//! - Console and rotating JSON file logging (`[logging]`)
//! - Config file layering (XDG user config + project-local overrides)

pub mod discovery;
pub mod error;
pub mod types;

pub use discovery::{
    ConfigSource, LoadedConfig, load_config, load_config_file, load_config_with_options,
    xdg_config_dir, xdg_config_path,
};
pub use error::{ConfigError, Result};
pub use types::*;
