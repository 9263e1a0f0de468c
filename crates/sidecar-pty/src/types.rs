//! Shared constants and the terminal geometry type.

use portable_pty::PtySize;
use serde::{Deserialize, Serialize};

// =============================================================================
// CONSTANTS
// =============================================================================

/// Maximum bytes read from a PTY in a single `read` call (8 KB).
pub const PTY_READ_CHUNK: usize = 8_192;

/// Maximum bytes forwarded per session per poll (64 KB). Anything beyond
/// stays queued for the next poll.
pub const PTY_MAX_OUTPUT_PER_POLL: usize = 65_536;

/// Default terminal columns.
pub const DEFAULT_COLS: u16 = 80;

/// Default terminal rows.
pub const DEFAULT_ROWS: u16 = 30;

/// Largest accepted terminal dimension.
pub const MAX_DIMENSION: u16 = 500;

// =============================================================================
// TERMINAL SIZE
// =============================================================================

/// Terminal geometry in character cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerminalSize {
    pub cols: u16,
    pub rows: u16,
}

impl TerminalSize {
    /// Build a size, rejecting zero or absurd dimensions.
    pub fn new(cols: u16, rows: u16) -> Option<Self> {
        let valid = |n: u16| (1..=MAX_DIMENSION).contains(&n);
        (valid(cols) && valid(rows)).then_some(Self { cols, rows })
    }

    /// Build a size from config values, clamping into the accepted range.
    pub fn clamped(cols: u32, rows: u32) -> Self {
        let clamp = |n: u32| n.clamp(1, u32::from(MAX_DIMENSION)) as u16;
        Self {
            cols: clamp(cols),
            rows: clamp(rows),
        }
    }

    pub(crate) fn to_pty_size(self) -> PtySize {
        PtySize {
            rows: self.rows,
            cols: self.cols,
            pixel_width: 0,
            pixel_height: 0,
        }
    }
}

impl Default for TerminalSize {
    fn default() -> Self {
        Self {
            cols: DEFAULT_COLS,
            rows: DEFAULT_ROWS,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pty_constants_are_sane() {
        assert_eq!(PTY_READ_CHUNK, 8_192);
        assert_eq!(PTY_MAX_OUTPUT_PER_POLL, 65_536);
        assert_eq!(DEFAULT_COLS, 80);
        assert_eq!(DEFAULT_ROWS, 30);
    }

    #[test]
    fn new_rejects_zero() {
        assert_eq!(TerminalSize::new(0, 24), None);
        assert_eq!(TerminalSize::new(80, 0), None);
    }

    #[test]
    fn new_rejects_oversized() {
        assert_eq!(TerminalSize::new(501, 24), None);
        assert_eq!(TerminalSize::new(80, u16::MAX), None);
    }

    #[test]
    fn new_accepts_bounds() {
        assert_eq!(TerminalSize::new(1, 1), Some(TerminalSize { cols: 1, rows: 1 }));
        assert!(TerminalSize::new(MAX_DIMENSION, MAX_DIMENSION).is_some());
    }

    #[test]
    fn clamped_pulls_into_range() {
        assert_eq!(TerminalSize::clamped(0, 9_999), TerminalSize { cols: 1, rows: 500 });
        assert_eq!(TerminalSize::clamped(120, 40), TerminalSize { cols: 120, rows: 40 });
    }

    #[test]
    fn to_pty_size_has_no_pixels() {
        let size = TerminalSize { cols: 100, rows: 25 }.to_pty_size();
        assert_eq!((size.cols, size.rows), (100, 25));
        assert_eq!((size.pixel_width, size.pixel_height), (0, 0));
    }
}
