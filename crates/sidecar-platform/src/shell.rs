//! Shell detection and argument helpers.
//!
//! Detects the user's default shell from environment variables and provides
//! the arguments that turn it into a login shell.

use std::path::PathBuf;

/// Platform-specific decisions the session registry delegates.
///
/// [`NativePlatform`] is the real implementation; tests substitute their own
/// to pin the shell and the tool directories.
pub trait Platform: Send {
    /// The shell program to run when none is configured.
    fn default_shell(&self) -> String;

    /// Arguments that make `shell` a login shell.
    fn login_args(&self, shell: &str) -> Vec<String>;

    /// Directories appended to `PATH` so tools installed by package and
    /// version managers resolve even from a minimal GUI environment.
    fn tool_dirs(&self) -> Vec<PathBuf>;

    /// `LANG` value used when the inherited environment has none.
    fn fallback_locale(&self) -> &'static str {
        "en_US.UTF-8"
    }
}

/// The platform the binary was compiled for.
#[derive(Debug, Default, Clone, Copy)]
pub struct NativePlatform;

impl Platform for NativePlatform {
    fn default_shell(&self) -> String {
        detect_shell()
    }

    fn login_args(&self, shell: &str) -> Vec<String> {
        login_args(shell)
    }

    fn tool_dirs(&self) -> Vec<PathBuf> {
        match dirs::home_dir() {
            Some(home) => crate::search_path::tool_dirs(&home),
            None => {
                tracing::debug!("no home directory; using system tool dirs only");
                crate::search_path::system_tool_dirs()
            }
        }
    }
}

/// Detect the user's default shell.
///
/// - On Unix: reads `SHELL`, falling back to `/bin/zsh` on macOS and
///   `/bin/sh` elsewhere.
/// - On Windows: reads `COMSPEC`, falling back to `cmd.exe`.
pub fn detect_shell() -> String {
    #[cfg(unix)]
    {
        std::env::var("SHELL")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| fallback_shell().to_string())
    }

    #[cfg(windows)]
    {
        std::env::var("COMSPEC").unwrap_or_else(|_| "cmd.exe".to_string())
    }

    #[cfg(not(any(unix, windows)))]
    {
        "/bin/sh".to_string()
    }
}

#[cfg(unix)]
fn fallback_shell() -> &'static str {
    if cfg!(target_os = "macos") {
        "/bin/zsh"
    } else {
        "/bin/sh"
    }
}

/// Return the login-shell arguments for the given shell binary.
///
/// Every common Unix shell (sh, bash, zsh, fish, dash) accepts `-l`.
/// Windows shells have no login mode.
pub fn login_args(_shell: &str) -> Vec<String> {
    if cfg!(unix) {
        vec!["-l".to_string()]
    } else {
        Vec::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
