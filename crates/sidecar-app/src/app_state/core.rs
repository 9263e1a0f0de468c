//! SidecarApp struct definition and constructor.

use sidecar_common::{EventBus, SessionId, WindowId};
use sidecar_config::SidecarConfig;
use sidecar_platform::{NativePlatform, Platform};
use sidecar_pty::{PtyRegistry, RegistryOptions, SessionRouter, WindowTable};

use super::console::ConsoleWindow;

pub(super) type Router = SessionRouter<WindowTable<ConsoleWindow>>;

/// Capacity of the app-level event bus.
const EVENT_BUS_CAPACITY: usize = 64;

/// Top-level application state.
pub struct SidecarApp {
    pub(super) config: SidecarConfig,
    pub(super) event_bus: EventBus,

    // Every PTY session, with the router that delivers to console windows
    pub(super) sessions: PtyRegistry<Router>,
    /// Where console input goes.
    pub(super) focused: Option<(WindowId, SessionId)>,

    pub(super) shutdown_complete: bool,
}

impl SidecarApp {
    pub fn new(config: SidecarConfig) -> Self {
        Self::with_platform(config, Box::new(NativePlatform))
    }

    pub fn with_platform(config: SidecarConfig, platform: Box<dyn Platform>) -> Self {
        let options = RegistryOptions::from_config(&config);
        let router = SessionRouter::new(WindowTable::new());
        Self {
            config,
            event_bus: EventBus::new(EVENT_BUS_CAPACITY),
            sessions: PtyRegistry::with_platform(options, platform, router),
            focused: None,
            shutdown_complete: false,
        }
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    pub(super) fn windows(&mut self) -> &mut WindowTable<ConsoleWindow> {
        self.sessions.events_mut().windows_mut()
    }
}
