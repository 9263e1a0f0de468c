//! Console input: stdin lines become shell input or host commands.
//!
//! Lines starting with `:` are host commands; everything else is sent to the
//! focused session followed by a carriage return. `::` escapes a leading
//! colon.

use std::io::BufRead;
use std::path::PathBuf;
use std::thread;

use sidecar_common::{Event, ShutdownReason};
use sidecar_pty::quote_dropped_paths;
use tokio::sync::mpsc;

use super::core::SidecarApp;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputLine {
    /// Typed into the shell as-is, then `\r`.
    Shell(String),
    Resize { cols: u16, rows: u16 },
    /// Paths inserted at the prompt without pressing enter.
    Drop(Vec<PathBuf>),
    Close,
    Quit,
    Invalid(String),
}

impl InputLine {
    pub fn parse(line: &str) -> Self {
        let line = line.trim_end_matches(['\r', '\n']);
        if let Some(escaped) = line.strip_prefix("::") {
            return Self::Shell(format!(":{escaped}"));
        }
        let Some(command) = line.strip_prefix(':') else {
            return Self::Shell(line.to_string());
        };

        let (name, rest) = command.split_once(' ').unwrap_or((command, ""));
        match name {
            "resize" => {
                let mut dims = rest.split_whitespace().map(str::parse::<u16>);
                match (dims.next(), dims.next(), dims.next()) {
                    (Some(Ok(cols)), Some(Ok(rows)), None) => Self::Resize { cols, rows },
                    _ => Self::Invalid("usage: :resize COLS ROWS".into()),
                }
            }
            "drop" if !rest.trim().is_empty() => {
                Self::Drop(rest.split('\t').map(|p| PathBuf::from(p.trim())).collect())
            }
            "drop" => Self::Invalid("usage: :drop PATH[<tab>PATH...]".into()),
            "close" => Self::Close,
            "quit" => Self::Quit,
            other => Self::Invalid(format!("unknown command ':{other}'")),
        }
    }
}

impl SidecarApp {
    pub(super) fn handle_input_line(&mut self, line: &str) {
        let Some((window, session)) = self.focused.clone() else {
            tracing::debug!("input with no focused session; ignored");
            return;
        };

        match InputLine::parse(line) {
            InputLine::Shell(text) => {
                self.sessions.write(&session, format!("{text}\r").as_bytes());
            }
            InputLine::Resize { cols, rows } => {
                if !self.sessions.resize(&session, cols, rows) {
                    tracing::warn!(session_id = %session, cols, rows, "resize rejected");
                }
            }
            InputLine::Drop(paths) => {
                self.sessions
                    .write(&session, quote_dropped_paths(&paths).as_bytes());
            }
            InputLine::Close => {
                self.event_bus.publish(Event::WindowClosed(window));
            }
            InputLine::Quit => {
                self.event_bus.publish(Event::Shutdown(ShutdownReason::Quit));
            }
            InputLine::Invalid(reason) => tracing::warn!("{reason}"),
        }
    }
}

/// Read stdin lines on a background thread.
///
/// The channel closes when stdin reaches EOF or fails.
pub fn spawn_stdin_reader() -> std::io::Result<mpsc::UnboundedReceiver<String>> {
    let (tx, rx) = mpsc::unbounded_channel();
    thread::Builder::new()
        .name("stdin-reader".to_string())
        .spawn(move || {
            for line in std::io::stdin().lock().lines() {
                match line {
                    Ok(line) => {
                        if tx.send(line).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        tracing::debug!(error = %e, "stdin read failed");
                        break;
                    }
                }
            }
        })?;
    Ok(rx)
}
