//! Routes registry events to the window that owns each session.
//!
//! The router is a [`SessionEvents`] sink: it turns each event into a
//! [`WindowMessage`] and hands it to the owning window. Nothing is buffered
//! or filtered; a message for a window that no longer exists is dropped.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use sidecar_common::{SessionId, WindowId};

use crate::events::{ExitInfo, SessionEvents};

// =============================================================================
// MESSAGES
// =============================================================================

/// A message delivered to a window, tagged with its IPC channel name.
///
/// Serializes as `{"kind": "<channel>", "payload": {...}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "payload")]
pub enum WindowMessage {
    /// Tells a freshly opened window which session it drives.
    #[serde(rename = "set-shell-id")]
    SessionAttached { session_id: SessionId },

    #[serde(rename = "shell-output")]
    ShellOutput {
        session_id: SessionId,
        #[serde(with = "lossy_text")]
        data: Vec<u8>,
    },

    #[serde(rename = "shell-error")]
    ShellError {
        session_id: SessionId,
        message: String,
    },

    #[serde(rename = "shell-exit")]
    ShellExit {
        session_id: SessionId,
        exit_code: Option<u32>,
        signal: Option<String>,
    },
}

impl WindowMessage {
    pub fn channel(&self) -> &'static str {
        match self {
            Self::SessionAttached { .. } => "set-shell-id",
            Self::ShellOutput { .. } => "shell-output",
            Self::ShellError { .. } => "shell-error",
            Self::ShellExit { .. } => "shell-exit",
        }
    }

    pub fn session_id(&self) -> &SessionId {
        match self {
            Self::SessionAttached { session_id }
            | Self::ShellOutput { session_id, .. }
            | Self::ShellError { session_id, .. }
            | Self::ShellExit { session_id, .. } => session_id,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Output bytes travel as text on JSON bridges. Invalid UTF-8 becomes U+FFFD.
mod lossy_text {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(data: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&String::from_utf8_lossy(data))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        String::deserialize(deserializer).map(String::into_bytes)
    }
}

// =============================================================================
// WINDOW TRAITS
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    /// The window closed; the message has nowhere to go.
    #[error("window is gone")]
    WindowGone,

    #[error("delivery failed: {0}")]
    Failed(String),
}

/// Something that displays a session: a webview panel, a console, a test
/// recorder.
pub trait TerminalWindow {
    fn send(&mut self, message: WindowMessage) -> Result<(), DeliveryError>;
}

/// Resolves window ids to live windows.
pub trait WindowLookup {
    type Window: TerminalWindow;

    fn window_mut(&mut self, id: &WindowId) -> Option<&mut Self::Window>;
}

/// Open windows keyed by id.
#[derive(Debug)]
pub struct WindowTable<W> {
    windows: HashMap<WindowId, W>,
}

impl<W> Default for WindowTable<W> {
    fn default() -> Self {
        Self {
            windows: HashMap::new(),
        }
    }
}

impl<W: TerminalWindow> WindowTable<W> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a window, returning any window it replaced.
    pub fn open(&mut self, id: WindowId, window: W) -> Option<W> {
        self.windows.insert(id, window)
    }

    pub fn close(&mut self, id: &WindowId) -> Option<W> {
        self.windows.remove(id)
    }

    pub fn get(&self, id: &WindowId) -> Option<&W> {
        self.windows.get(id)
    }

    pub fn contains(&self, id: &WindowId) -> bool {
        self.windows.contains_key(id)
    }

    /// Open window ids, sorted.
    pub fn ids(&self) -> Vec<WindowId> {
        let mut ids: Vec<WindowId> = self.windows.keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }
}

impl<W: TerminalWindow> WindowLookup for WindowTable<W> {
    type Window = W;

    fn window_mut(&mut self, id: &WindowId) -> Option<&mut W> {
        self.windows.get_mut(id)
    }
}

// =============================================================================
// ROUTER
// =============================================================================

pub struct SessionRouter<L: WindowLookup> {
    windows: L,
}

impl<L: WindowLookup> SessionRouter<L> {
    pub fn new(windows: L) -> Self {
        Self { windows }
    }

    pub fn windows(&self) -> &L {
        &self.windows
    }

    pub fn windows_mut(&mut self) -> &mut L {
        &mut self.windows
    }

    /// Hand `message` to `window`. Returns whether it was accepted.
    pub fn deliver(&mut self, window: &WindowId, message: WindowMessage) -> bool {
        let Some(target) = self.windows.window_mut(window) else {
            tracing::trace!(window_id = %window, channel = message.channel(), "no such window; dropped");
            return false;
        };

        match target.send(message) {
            Ok(()) => true,
            Err(DeliveryError::WindowGone) => {
                tracing::trace!(window_id = %window, "window gone; dropped");
                false
            }
            Err(e) => {
                tracing::warn!(window_id = %window, error = %e, "window delivery failed");
                false
            }
        }
    }
}

impl<L: WindowLookup> SessionEvents for SessionRouter<L> {
    fn on_output(&mut self, session: &SessionId, window: &WindowId, data: &[u8]) {
        self.deliver(
            window,
            WindowMessage::ShellOutput {
                session_id: session.clone(),
                data: data.to_vec(),
            },
        );
    }

    fn on_error(&mut self, session: &SessionId, window: &WindowId, message: &str) {
        self.deliver(
            window,
            WindowMessage::ShellError {
                session_id: session.clone(),
                message: message.to_string(),
            },
        );
    }

    fn on_exit(&mut self, session: &SessionId, window: &WindowId, exit: ExitInfo) {
        self.deliver(
            window,
            WindowMessage::ShellExit {
                session_id: session.clone(),
                exit_code: exit.exit_code,
                signal: exit.signal,
            },
        );
    }
}

// =============================================================================
// TESTS
// =============================================================================
