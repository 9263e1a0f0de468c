//! Configuration schema types for Sidecar.
//!
//! All structs use `serde(default)` so partial configs work correctly.

mod shell;
mod startup;
mod system;
mod terminal;

pub use shell::*;
pub use startup::*;
pub use system::*;
pub use terminal::*;

use serde::{Deserialize, Serialize};

/// Current config schema version.
pub const CONFIG_SCHEMA_VERSION: u32 = 1;

/// Root configuration for Sidecar.
///
/// Only override what you want to change.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct SidecarConfig {
    pub shell: ShellConfig,
    pub terminal: TerminalConfig,
    pub startup: StartupConfig,
    pub logging: LoggingConfig,
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_yields_defaults() {
        let config: SidecarConfig = toml::from_str("").unwrap();
        assert_eq!(config.terminal.cols, 80);
        assert_eq!(config.terminal.rows, 30);
        assert_eq!(config.startup.assistant, AssistantKind::Claude);
        assert!(config.shell.login_shell);
        assert_eq!(config.logging.level, LogLevel::Info);
    }

    #[test]
    fn sections_parse_independently() {
        let toml_str = r#"
[startup]
assistant = "codex"
auto_launch = false

[terminal]
rows = 40
"#;
        let config: SidecarConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.startup.assistant, AssistantKind::Codex);
        assert!(!config.startup.auto_launch);
        assert_eq!(config.terminal.rows, 40);
        assert_eq!(config.terminal.cols, 80);
        assert_eq!(config.startup.banner_delay_ms, 100);
    }

    #[test]
    fn unknown_sections_are_ignored() {
        let config: SidecarConfig = toml::from_str("[theme]\nname = \"dark\"\n").unwrap();
        assert_eq!(config.terminal.cols, 80);
    }
}
