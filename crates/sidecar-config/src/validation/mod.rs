//! Full configuration validation.
//!
//! Validates numeric ranges and string shapes. Each domain has its own
//! submodule; this orchestrator calls them all and collects errors into a
//! single `ConfigError`.

mod helpers;
mod sections;


use crate::schema::SidecarConfig;
use sidecar_common::ConfigError;

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &SidecarConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    sections::validate_shell(&mut errors, config);
    sections::validate_terminal(&mut errors, config);
    sections::validate_startup(&mut errors, config);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}
