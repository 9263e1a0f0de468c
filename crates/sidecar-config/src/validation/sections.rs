//! Per-section validators: shell, terminal, startup.

use crate::schema::SidecarConfig;

use super::helpers::{validate_no_nul, validate_range};

/// Largest accepted terminal dimension, in cells.
pub(crate) const MAX_DIMENSION: u32 = 500;

/// Longest accepted settling delay, in milliseconds.
pub(crate) const MAX_DELAY_MS: u32 = 10_000;

pub(crate) fn validate_shell(errors: &mut Vec<String>, config: &SidecarConfig) {
    let shell = &config.shell;
    validate_no_nul(errors, "shell.program", &shell.program);
    for arg in &shell.args {
        validate_no_nul(errors, "shell.args", arg);
    }
    for (key, value) in &shell.env {
        if key.is_empty() || key.contains('=') {
            errors.push(format!("shell.env key '{key}' is not a valid variable name"));
        }
        validate_no_nul(errors, &format!("shell.env.{key}"), value);
    }
    for dir in &shell.extra_path_dirs {
        if dir.trim().is_empty() {
            errors.push("shell.extra_path_dirs must not contain empty entries".into());
        }
    }
}

pub(crate) fn validate_terminal(errors: &mut Vec<String>, config: &SidecarConfig) {
    validate_range(errors, "terminal.cols", config.terminal.cols, 1, MAX_DIMENSION);
    validate_range(errors, "terminal.rows", config.terminal.rows, 1, MAX_DIMENSION);
}

pub(crate) fn validate_startup(errors: &mut Vec<String>, config: &SidecarConfig) {
    let startup = &config.startup;
    validate_range(errors, "startup.banner_delay_ms", startup.banner_delay_ms, 0, MAX_DELAY_MS);
    validate_range(errors, "startup.launch_delay_ms", startup.launch_delay_ms, 0, MAX_DELAY_MS);
    if let Some(cmd) = &startup.launch_command {
        validate_no_nul(errors, "startup.launch_command", cmd);
        if cmd.contains('\r') || cmd.contains('\n') {
            errors.push("startup.launch_command must be a single line".into());
        }
    }
}
