//! Graceful shutdown: destroy every session, then drop the windows.

use sidecar_common::ShutdownReason;

use super::core::SidecarApp;

impl SidecarApp {
    /// Destroy all sessions and close all windows. Safe to call repeatedly.
    ///
    /// Sessions go first so their exit notices still reach a window.
    pub fn shutdown(&mut self, reason: ShutdownReason) {
        tracing::info!(?reason, "Initiating graceful shutdown");

        let destroyed = self.sessions.destroy_all();
        for window in self.windows().ids() {
            self.windows().close(&window);
        }
        self.focused = None;
        self.shutdown_complete = true;

        tracing::info!(destroyed, "Graceful shutdown complete");
    }

    pub fn is_shut_down(&self) -> bool {
        self.shutdown_complete
    }
}

impl Drop for SidecarApp {
    fn drop(&mut self) {
        if !self.shutdown_complete {
            self.shutdown(ShutdownReason::Quit);
        }
    }
}
