//! Window lifecycle: a window open creates its session, a close destroys it.

use sidecar_common::{Event, SessionId, SidecarError, WindowId};
use sidecar_config::AssistantKind;
use sidecar_pty::{CreateRequest, WindowMessage};

use super::console::ConsoleWindow;
use super::core::SidecarApp;

impl SidecarApp {
    /// The assistant a request will launch.
    pub fn assistant_for(&self, request: &CreateRequest) -> AssistantKind {
        request.assistant.unwrap_or(self.config.startup.assistant)
    }

    /// Register `console` as `request.window` and start its session.
    ///
    /// The window stays registered when the spawn fails so it can show the
    /// error notice.
    pub fn open_window(
        &mut self,
        request: CreateRequest,
        console: ConsoleWindow,
    ) -> Result<SessionId, SidecarError> {
        let window = request.window.clone();
        if self.windows().open(window.clone(), console).is_some() {
            tracing::warn!(window_id = %window, "window reopened; previous console replaced");
        }
        self.event_bus.publish(Event::WindowOpened(window.clone()));

        let session = self
            .sessions
            .create_with(request)
            .map_err(|e| SidecarError::Terminal(e.to_string()))?;

        self.sessions.events_mut().deliver(
            &window,
            WindowMessage::SessionAttached {
                session_id: session.clone(),
            },
        );
        self.focused = Some((window, session.clone()));
        Ok(session)
    }

    /// Destroy the window's sessions, then forget the window.
    pub fn close_window(&mut self, window: &WindowId) -> usize {
        let destroyed = self.sessions.destroy_by_window(window);
        self.windows().close(window);
        if self
            .focused
            .as_ref()
            .is_some_and(|(focused, _)| focused == window)
        {
            self.focused = None;
        }
        tracing::info!(window_id = %window, destroyed, "Window closed");
        destroyed
    }
}
