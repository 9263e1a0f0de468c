//! Process environment for session shells.
//!
//! The shell inherits the host environment, overlaid with the terminal
//! capabilities the display widget supports, a locale fallback, and a `PATH`
//! that also covers common tool install locations.

use std::collections::{BTreeMap, HashMap};
use std::ffi::{OsStr, OsString};
use std::path::PathBuf;

use sidecar_platform::{merge_search_path, Platform};

/// Terminal type advertised to the shell.
pub const TERM_NAME: &str = "xterm-256color";

/// Environment overlay applied on top of the inherited environment.
#[derive(Debug, Clone, Default)]
pub struct EnvOverlay {
    /// Appended to `PATH` after the platform's tool directories.
    pub extra_path_dirs: Vec<PathBuf>,
    /// Applied last; wins over every built-in value.
    pub extra_env: HashMap<String, String>,
}

/// Build the full environment for a session shell.
///
/// Returned sorted by key so the result is deterministic.
pub fn build_environment<I>(
    inherited: I,
    platform: &dyn Platform,
    overlay: &EnvOverlay,
) -> Vec<(OsString, OsString)>
where
    I: IntoIterator<Item = (OsString, OsString)>,
{
    let mut env: BTreeMap<OsString, OsString> = inherited.into_iter().collect();

    env.insert("FORCE_COLOR".into(), "1".into());
    env.insert("TERM".into(), TERM_NAME.into());
    env.insert("COLORTERM".into(), "truecolor".into());

    let has_lang = env.get(OsStr::new("LANG")).is_some_and(|v| !v.is_empty());
    if !has_lang {
        env.insert("LANG".into(), platform.fallback_locale().into());
    }

    let mut extra_dirs = platform.tool_dirs();
    extra_dirs.extend(overlay.extra_path_dirs.iter().cloned());
    let path_key = path_key(&env);
    let path = merge_search_path(env.get(&path_key).map(OsString::as_os_str), &extra_dirs);
    env.insert(path_key, path);

    for (key, value) in &overlay.extra_env {
        env.insert(key.into(), value.into());
    }

    env.into_iter().collect()
}

/// The key the inherited environment uses for the search path. Windows
/// keys are case-insensitive and usually spelled `Path`.
fn path_key(env: &BTreeMap<OsString, OsString>) -> OsString {
    if cfg!(windows) {
        if let Some(key) = env
            .keys()
            .find(|k| k.to_string_lossy().eq_ignore_ascii_case("PATH"))
        {
            return key.clone();
        }
    }
    OsString::from("PATH")
}

// =============================================================================
// TESTS
// =============================================================================
