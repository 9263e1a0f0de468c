//! `PATH` augmentation for GUI-launched shells.
//!
//! Apps started from a desktop launcher often inherit a minimal `PATH`
//! compared to an interactive terminal, so tools installed through Homebrew,
//! cargo, or a Node version manager would not resolve. The directories here
//! are appended after the inherited entries; the inherited order wins.

use std::collections::HashSet;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

/// System-wide binary directories.
pub fn system_tool_dirs() -> Vec<PathBuf> {
    if cfg!(windows) {
        return Vec::new();
    }
    [
        "/usr/local/bin",
        "/usr/bin",
        "/bin",
        "/usr/sbin",
        "/sbin",
        "/opt/homebrew/bin",
        "/usr/local/opt/node@20/bin",
    ]
    .iter()
    .map(PathBuf::from)
    .collect()
}

/// System directories plus the per-user install locations under `home`.
pub fn tool_dirs(home: &Path) -> Vec<PathBuf> {
    let mut dirs = system_tool_dirs();
    dirs.extend(nvm_node_bins(home));
    for rel in [".local/bin", ".cargo/bin", ".bun/bin", ".volta/bin"] {
        dirs.push(home.join(rel));
    }
    if cfg!(windows) {
        dirs.push(home.join("AppData").join("Roaming").join("npm"));
    }
    dirs
}

/// `bin` directories of every Node version installed through nvm, newest
/// name first.
fn nvm_node_bins(home: &Path) -> Vec<PathBuf> {
    let versions = home.join(".nvm").join("versions").join("node");
    let Ok(entries) = std::fs::read_dir(&versions) else {
        return Vec::new();
    };

    let mut bins: Vec<PathBuf> = entries
        .flatten()
        .map(|e| e.path().join("bin"))
        .filter(|p| p.is_dir())
        .collect();
    bins.sort();
    bins.reverse();
    bins
}

/// Append `extra` to an inherited `PATH` value.
///
/// Entries keep their first position; duplicates and empty entries are
/// dropped. Entries that cannot be represented in a `PATH` (they contain the
/// separator) are skipped.
pub fn merge_search_path(existing: Option<&OsStr>, extra: &[PathBuf]) -> OsString {
    let inherited: Vec<PathBuf> = existing
        .map(|p| std::env::split_paths(p).collect())
        .unwrap_or_default();

    let mut seen = HashSet::new();
    let merged: Vec<PathBuf> = inherited
        .into_iter()
        .chain(extra.iter().cloned())
        .filter(|p| !p.as_os_str().is_empty())
        .filter(|p| std::env::join_paths([p]).is_ok())
        .filter(|p| seen.insert(p.clone()))
        .collect();

    match std::env::join_paths(&merged) {
        Ok(joined) => joined,
        Err(e) => {
            tracing::warn!(error = %e, "could not join PATH entries; keeping inherited PATH");
            existing.map(OsStr::to_os_string).unwrap_or_default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split(path: &OsStr) -> Vec<PathBuf> {
        std::env::split_paths(path).collect()
    }

    #[test]
    #[cfg(unix)]
    fn inherited_entries_come_first() {
        let merged = merge_search_path(
            Some(OsStr::new("/custom/bin:/usr/bin")),
            &[PathBuf::from("/usr/local/bin"), PathBuf::from("/usr/bin")],
        );
        assert_eq!(
            split(&merged),
            vec![
                PathBuf::from("/custom/bin"),
                PathBuf::from("/usr/bin"),
                PathBuf::from("/usr/local/bin"),
            ]
        );
    }

    #[test]
    #[cfg(unix)]
    fn empty_entries_are_dropped() {
        let merged = merge_search_path(Some(OsStr::new("/a::/b:")), &[]);
        assert_eq!(split(&merged), vec![PathBuf::from("/a"), PathBuf::from("/b")]);
    }

    #[test]
    #[cfg(unix)]
    fn missing_path_uses_only_extras() {
        let merged = merge_search_path(None, &[PathBuf::from("/bin")]);
        assert_eq!(merged, OsString::from("/bin"));
    }

    #[test]
    #[cfg(unix)]
    fn entries_containing_separator_are_skipped() {
        let merged = merge_search_path(None, &[PathBuf::from("/weird:dir"), PathBuf::from("/ok")]);
        assert_eq!(merged, OsString::from("/ok"));
    }

    #[test]
    #[cfg(unix)]
    fn tool_dirs_include_user_locations() {
        let home = tempfile::tempdir().unwrap();
        let dirs = tool_dirs(home.path());
        assert!(dirs.contains(&home.path().join(".cargo/bin")));
        assert!(dirs.contains(&home.path().join(".local/bin")));
        assert!(dirs.contains(&PathBuf::from("/opt/homebrew/bin")));
    }

    #[test]
    fn nvm_versions_are_discovered_newest_first() {
        let home = tempfile::tempdir().unwrap();
        let node = home.path().join(".nvm/versions/node");
        for v in ["v18.20.0", "v20.19.2"] {
            std::fs::create_dir_all(node.join(v).join("bin")).unwrap();
        }
        // A version directory without bin/ is ignored.
        std::fs::create_dir_all(node.join("v16.0.0")).unwrap();

        let bins = nvm_node_bins(home.path());
        assert_eq!(
            bins,
            vec![node.join("v20.19.2/bin"), node.join("v18.20.0/bin")]
        );
    }

    #[test]
    fn no_nvm_means_no_node_bins() {
        let home = tempfile::tempdir().unwrap();
        assert!(nvm_node_bins(home.path()).is_empty());
    }
}
