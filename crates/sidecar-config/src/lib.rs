//! Sidecar configuration system.
//!
//! TOML-based configuration for the shell sessions: which shell to run and
//! how, initial terminal geometry, the assistant startup sequence, and
//! logging. All sections use defaults so partial configs work out of the box.

pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use schema::{
    AssistantKind, LogLevel, LoggingConfig, ShellConfig, SidecarConfig, StartupConfig,
    TerminalConfig, CONFIG_SCHEMA_VERSION,
};

use sidecar_common::ConfigError;
use std::path::Path;

/// Load config from the platform default path, or from `path` when given.
///
/// The default location is created with a commented template if missing;
/// an explicit path must exist.
pub fn load_config(path: Option<&Path>) -> Result<SidecarConfig, ConfigError> {
    let config = match path {
        Some(path) => toml_loader::load_from_path(path)?,
        None => toml_loader::load_default()?,
    };
    validation::validate(&config)?;
    Ok(config)
}
