//! Startup sequence configuration types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The AI coding assistant launched inside each new session.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum AssistantKind {
    #[default]
    Claude,
    Codex,
}

impl AssistantKind {
    /// Command typed into the shell to start the assistant.
    pub fn command(self) -> &'static str {
        match self {
            Self::Claude => "claude",
            Self::Codex => "codex",
        }
    }

    /// Human-readable name used in banners and exit notices.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Claude => "Claude Code",
            Self::Codex => "Codex",
        }
    }
}

impl fmt::Display for AssistantKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.command())
    }
}

impl FromStr for AssistantKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "claude" => Ok(Self::Claude),
            "codex" => Ok(Self::Codex),
            other => Err(format!("unknown assistant '{other}' (expected claude or codex)")),
        }
    }
}

/// What happens right after a session's shell is spawned.
///
/// The delays are a best-effort wait for shell initialization (profile
/// sourcing, prompt setup); they do not detect readiness.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StartupConfig {
    pub assistant: AssistantKind,
    /// Replaces the assistant's default command when set.
    pub launch_command: Option<String>,
    /// Type the launch command automatically.
    pub auto_launch: bool,
    /// Delay before the banner line is shown (valid range: 0-10000).
    pub banner_delay_ms: u32,
    /// Delay between the banner and the launch command (valid range: 0-10000).
    pub launch_delay_ms: u32,
}

impl Default for StartupConfig {
    fn default() -> Self {
        Self {
            assistant: AssistantKind::Claude,
            launch_command: None,
            auto_launch: true,
            banner_delay_ms: 100,
            launch_delay_ms: 500,
        }
    }
}

impl StartupConfig {
    /// The configured launch command, if it is not blank.
    pub fn launch_override(&self) -> Option<&str> {
        self.launch_command
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn startup_config_defaults() {
        let config = StartupConfig::default();
        assert_eq!(config.assistant, AssistantKind::Claude);
        assert!(config.launch_command.is_none());
        assert!(config.auto_launch);
        assert_eq!(config.banner_delay_ms, 100);
        assert_eq!(config.launch_delay_ms, 500);
        assert_eq!(config.launch_override(), None);
    }

    #[test]
    fn assistant_kind_from_toml() {
        let config: StartupConfig = toml::from_str(r#"assistant = "codex""#).unwrap();
        assert_eq!(config.assistant, AssistantKind::Codex);
        assert_eq!(config.assistant.command(), "codex");
    }

    #[test]
    fn launch_command_override_wins() {
        let config = StartupConfig {
            launch_command: Some(" claude --continue\n".into()),
            ..StartupConfig::default()
        };
        assert_eq!(config.launch_override(), Some("claude --continue"));
    }

    #[test]
    fn blank_launch_command_is_no_override() {
        let config = StartupConfig {
            launch_command: Some("  ".into()),
            ..StartupConfig::default()
        };
        assert_eq!(config.launch_override(), None);
    }

    #[test]
    fn assistant_kind_parses_case_insensitively() {
        assert_eq!("Claude".parse::<AssistantKind>(), Ok(AssistantKind::Claude));
        assert_eq!(" codex ".parse::<AssistantKind>(), Ok(AssistantKind::Codex));
        assert!("gemini".parse::<AssistantKind>().is_err());
    }

    #[test]
    fn assistant_display_names() {
        assert_eq!(AssistantKind::Claude.display_name(), "Claude Code");
        assert_eq!(AssistantKind::Codex.display_name(), "Codex");
        assert_eq!(AssistantKind::Codex.to_string(), "codex");
    }
}
