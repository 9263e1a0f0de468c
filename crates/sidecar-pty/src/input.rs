//! Helpers for turning UI input into shell input.

use std::path::Path;

/// Join dropped file paths into one line of shell input.
///
/// Paths are separated by spaces; any path containing whitespace is wrapped
/// in double quotes.
pub fn quote_dropped_paths<P: AsRef<Path>>(paths: &[P]) -> String {
    paths
        .iter()
        .map(|p| {
            let text = p.as_ref().to_string_lossy();
            if text.chars().any(char::is_whitespace) {
                format!("\"{text}\"")
            } else {
                text.into_owned()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_paths_are_space_separated() {
        assert_eq!(quote_dropped_paths(&["/a/b.txt", "/c"]), "/a/b.txt /c");
    }

    #[test]
    fn paths_with_spaces_are_quoted() {
        assert_eq!(
            quote_dropped_paths(&["/Users/me/My Docs/spec.md", "/tmp/x"]),
            "\"/Users/me/My Docs/spec.md\" /tmp/x"
        );
    }

    #[test]
    fn tabs_count_as_whitespace() {
        assert_eq!(quote_dropped_paths(&["/a\tb"]), "\"/a\tb\"");
    }

    #[test]
    fn no_paths_is_empty() {
        let none: [&str; 0] = [];
        assert_eq!(quote_dropped_paths(&none), "");
    }
}
