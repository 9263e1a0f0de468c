//! Terminal geometry configuration.

use serde::{Deserialize, Serialize};

/// Initial PTY geometry for new sessions.
///
/// The display widget resizes the session once it has measured itself;
/// these values only cover the window between spawn and that first resize.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TerminalConfig {
    /// Initial columns (valid range: 1-500).
    pub cols: u32,
    /// Initial rows (valid range: 1-500).
    pub rows: u32,
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self { cols: 80, rows: 30 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_config_defaults() {
        let config = TerminalConfig::default();
        assert_eq!(config.cols, 80);
        assert_eq!(config.rows, 30);
    }

    #[test]
    fn terminal_config_partial_toml() {
        let config: TerminalConfig = toml::from_str("cols = 120").unwrap();
        assert_eq!(config.cols, 120);
        assert_eq!(config.rows, 30);
    }
}
