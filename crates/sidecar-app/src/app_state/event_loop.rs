//! The host loop: poll sessions, forward console input, react to the bus.

use std::time::Duration;

use sidecar_common::{Event, ShutdownReason};
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;

use super::core::SidecarApp;

/// How often PTY output is drained (about one frame at 60 Hz).
const POLL_INTERVAL: Duration = Duration::from_millis(16);

impl SidecarApp {
    /// Run until a shutdown is requested or the last session ends.
    ///
    /// Shuts the app down before returning.
    pub async fn run(&mut self, mut input: mpsc::UnboundedReceiver<String>) -> ShutdownReason {
        let mut bus = self.event_bus.subscribe();
        let mut tick = tokio::time::interval(POLL_INTERVAL);
        tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut input_open = true;

        tracing::info!("Entering event loop");
        let reason = loop {
            tokio::select! {
                _ = tick.tick() => {
                    self.sessions.poll();
                    if self.sessions.is_empty() {
                        tracing::info!("No sessions left");
                        break ShutdownReason::Quit;
                    }
                }
                line = input.recv(), if input_open => match line {
                    Some(line) => self.handle_input_line(&line),
                    None => {
                        tracing::debug!("Console input closed");
                        input_open = false;
                    }
                },
                event = bus.recv() => match event {
                    Ok(Event::Shutdown(reason)) => break reason,
                    Ok(Event::WindowClosed(window)) => {
                        self.close_window(&window);
                    }
                    Ok(Event::WindowOpened(window)) => {
                        tracing::debug!(window_id = %window, "Window opened");
                    }
                    Ok(Event::Unknown) => {}
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "Event bus lagged");
                    }
                    Err(RecvError::Closed) => break ShutdownReason::Quit,
                },
            }
        };

        self.shutdown(reason);
        reason
    }
}
