//! Shell process configuration types.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Shell process settings.
///
/// Controls which shell to launch, its arguments, extra environment
/// variables, extra tool directories for `PATH`, and login shell behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    /// Shell program path. Empty string means auto-detect from `$SHELL`.
    pub program: String,
    /// Extra arguments passed to the shell after the login flag.
    pub args: Vec<String>,
    /// Extra environment variables injected into the shell. Applied last,
    /// so they win over the built-in terminal overlay.
    pub env: HashMap<String, String>,
    /// Directories appended to `PATH` after the built-in tool directories.
    pub extra_path_dirs: Vec<String>,
    /// Launch as a login shell so profile/rc files run.
    pub login_shell: bool,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            program: String::new(),
            args: Vec::new(),
            env: HashMap::new(),
            extra_path_dirs: Vec::new(),
            login_shell: true,
        }
    }
}

impl ShellConfig {
    /// The configured program, or `None` when the platform default applies.
    pub fn program_override(&self) -> Option<&str> {
        let program = self.program.trim();
        (!program.is_empty()).then_some(program)
    }
}

// =============================================================================
// Tests
// =============================================================================
