//! PTY session manager.
//!
//! [`PtyRegistry`] owns one pseudo-terminal per session, each running a
//! login shell that auto-launches an AI coding assistant in a working
//! directory. [`SessionRouter`] forwards the registry's output, error, and
//! exit events to the window that owns each session.
//!
//! The registry is single-owner: every operation takes `&mut self`, and
//! PTY output reaches the owner through per-session reader threads and
//! channels drained by [`PtyRegistry::poll`].

pub mod env;
pub mod error;
pub mod events;
pub mod input;
mod io;
pub mod registry;
pub mod router;
mod spawn;
mod startup;
pub mod types;

pub use env::{build_environment, EnvOverlay};
pub use error::PtyError;
pub use events::{EventLog, ExitInfo, SessionEvent, SessionEvents};
pub use input::quote_dropped_paths;
pub use registry::{CreateRequest, PtyRegistry, RegistryOptions, SessionInfo};
pub use router::{
    DeliveryError, SessionRouter, TerminalWindow, WindowLookup, WindowMessage, WindowTable,
};
pub use types::{TerminalSize, DEFAULT_COLS, DEFAULT_ROWS, MAX_DIMENSION};
