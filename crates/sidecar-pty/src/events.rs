//! Typed session events emitted by the registry.

use portable_pty::ExitStatus;
use serde::{Deserialize, Serialize};
use sidecar_common::{SessionId, WindowId};

/// How a session's process ended, as far as the OS reported it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExitInfo {
    /// Exit code for a normal exit. `None` when killed by a signal, when the
    /// session was destroyed while still running, or when the status could
    /// not be collected.
    pub exit_code: Option<u32>,
    /// Signal name when the process was terminated by one.
    pub signal: Option<String>,
}

impl ExitInfo {
    pub(crate) fn from_status(status: &ExitStatus) -> Self {
        match status.signal() {
            Some(signal) => Self {
                exit_code: None,
                signal: Some(signal.to_string()),
            },
            None => Self {
                exit_code: Some(status.exit_code()),
                signal: None,
            },
        }
    }
}

/// Receiver for registry events.
///
/// Every session produces zero or more output events followed by exactly one
/// exit event; by the time `on_exit` runs the session is no longer
/// registered.
pub trait SessionEvents {
    fn on_output(&mut self, session: &SessionId, window: &WindowId, data: &[u8]);

    fn on_error(&mut self, session: &SessionId, window: &WindowId, message: &str);

    fn on_exit(&mut self, session: &SessionId, window: &WindowId, exit: ExitInfo);
}

/// One recorded event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    Output {
        session: SessionId,
        window: WindowId,
        data: Vec<u8>,
    },
    Error {
        session: SessionId,
        window: WindowId,
        message: String,
    },
    Exit {
        session: SessionId,
        window: WindowId,
        exit: ExitInfo,
    },
}

impl SessionEvent {
    pub fn session(&self) -> &SessionId {
        match self {
            Self::Output { session, .. } | Self::Error { session, .. } | Self::Exit { session, .. } => {
                session
            }
        }
    }
}

/// A [`SessionEvents`] sink that records everything it receives.
#[derive(Debug, Default)]
pub struct EventLog {
    events: Vec<SessionEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[SessionEvent] {
        &self.events
    }

    /// Remove and return everything recorded so far.
    pub fn take(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    /// Concatenated output bytes for one session, lossily decoded.
    pub fn output_text(&self, session: &SessionId) -> String {
        let bytes: Vec<u8> = self
            .events
            .iter()
            .filter_map(|e| match e {
                SessionEvent::Output { session: s, data, .. } if s == session => {
                    Some(data.as_slice())
                }
                _ => None,
            })
            .flatten()
            .copied()
            .collect();
        String::from_utf8_lossy(&bytes).into_owned()
    }

    /// The exit recorded for one session, if any.
    pub fn exit_of(&self, session: &SessionId) -> Option<&ExitInfo> {
        self.events.iter().find_map(|e| match e {
            SessionEvent::Exit { session: s, exit, .. } if s == session => Some(exit),
            _ => None,
        })
    }

    pub fn errors_of(&self, session: &SessionId) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|e| match e {
                SessionEvent::Error { session: s, message, .. } if s == session => {
                    Some(message.as_str())
                }
                _ => None,
            })
            .collect()
    }
}

impl SessionEvents for EventLog {
    fn on_output(&mut self, session: &SessionId, window: &WindowId, data: &[u8]) {
        self.events.push(SessionEvent::Output {
            session: session.clone(),
            window: window.clone(),
            data: data.to_vec(),
        });
    }

    fn on_error(&mut self, session: &SessionId, window: &WindowId, message: &str) {
        self.events.push(SessionEvent::Error {
            session: session.clone(),
            window: window.clone(),
            message: message.to_string(),
        });
    }

    fn on_exit(&mut self, session: &SessionId, window: &WindowId, exit: ExitInfo) {
        self.events.push(SessionEvent::Exit {
            session: session.clone(),
            window: window.clone(),
            exit,
        });
    }
}
