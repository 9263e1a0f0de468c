//! PTY error types.

/// Errors originating from PTY operations.
#[derive(Debug, thiserror::Error)]
pub enum PtyError {
    #[error("failed to open PTY: {0}")]
    OpenFailed(String),

    #[error("failed to spawn shell '{shell}': {reason}")]
    SpawnFailed { shell: String, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("failed to resize PTY: {0}")]
    ResizeFailed(String),
}
