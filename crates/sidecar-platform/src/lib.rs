//! Platform abstraction for shell sessions.
//!
//! Everything that differs between operating systems when spawning an
//! interactive shell lives here: which shell to run, how to make it a login
//! shell, and which tool directories belong on `PATH`.

pub mod search_path;
pub mod shell;

pub use search_path::{merge_search_path, tool_dirs};
pub use shell::{detect_shell, login_args, NativePlatform, Platform};
