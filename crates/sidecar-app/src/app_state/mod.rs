//! Top-level application state.
//!
//! Owns the session registry and the console windows it reports to, and
//! drives both from a tokio event loop.

mod console;
mod core;
mod event_loop;
mod input;
mod shutdown;
mod signals;
mod windows;

pub use console::ConsoleWindow;
pub use core::SidecarApp;
pub use input::spawn_stdin_reader;
pub use signals::spawn_signal_listener;
