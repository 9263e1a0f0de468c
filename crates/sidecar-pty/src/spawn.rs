//! PTY spawn: open a pseudo-terminal, start the shell, attach the reader.

use std::ffi::OsString;
use std::io::Read;
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;

use portable_pty::{native_pty_system, CommandBuilder};

use crate::error::PtyError;
use crate::io::{spawn_watcher, PtyHandle, ReaderMsg};
use crate::types::{TerminalSize, PTY_READ_CHUNK};

/// Everything needed to start one session process.
#[derive(Debug, Clone)]
pub(crate) struct SpawnSpec {
    pub(crate) program: String,
    pub(crate) args: Vec<String>,
    pub(crate) cwd: PathBuf,
    /// The complete environment; nothing else is inherited.
    pub(crate) env: Vec<(OsString, OsString)>,
    pub(crate) size: TerminalSize,
}

impl SpawnSpec {
    fn command(&self) -> CommandBuilder {
        let mut cmd = CommandBuilder::new(&self.program);
        for arg in &self.args {
            cmd.arg(arg);
        }
        cmd.cwd(&self.cwd);
        cmd.env_clear();
        for (key, value) in &self.env {
            cmd.env(key, value);
        }
        cmd
    }

    fn spawn_failed(&self, reason: impl ToString) -> PtyError {
        PtyError::SpawnFailed {
            shell: self.program.clone(),
            reason: reason.to_string(),
        }
    }
}

/// Spawn a process on a new PTY.
///
/// The reader and watcher threads are running before this returns, so output
/// produced right after exec is queued rather than lost and an early exit is
/// still reported. `label` names the threads.
pub(crate) fn spawn_pty(spec: &SpawnSpec, label: &str) -> Result<PtyHandle, PtyError> {
    // portable-pty silently substitutes $HOME for a missing cwd; a session
    // must run where it was asked to or not at all.
    if !spec.cwd.is_dir() {
        return Err(spec.spawn_failed(format!(
            "working directory {} does not exist",
            spec.cwd.display()
        )));
    }

    let pair = native_pty_system()
        .openpty(spec.size.to_pty_size())
        .map_err(|e| PtyError::OpenFailed(e.to_string()))?;

    let child = pair
        .slave
        .spawn_command(spec.command())
        .map_err(|e| spec.spawn_failed(e))?;

    // Only the child holds the slave now, so the reader sees EOF once the
    // child and anything it left running are gone.
    drop(pair.slave);

    let watch = spawn_watcher(child, label)?;

    // From here on, dropping `watch` (or the handle) kills the child.
    let writer = pair
        .master
        .take_writer()
        .map_err(|e| PtyError::OpenFailed(format!("failed to take PTY writer: {e}")))?;
    let mut reader = pair
        .master
        .try_clone_reader()
        .map_err(|e| PtyError::OpenFailed(format!("failed to clone PTY reader: {e}")))?;

    let (tx, rx) = mpsc::channel::<ReaderMsg>();

    thread::Builder::new()
        .name(format!("pty-reader-{label}"))
        .spawn(move || {
            let mut buf = [0u8; PTY_READ_CHUNK];
            loop {
                match reader.read(&mut buf) {
                    Ok(0) => break,
                    Ok(n) => {
                        if tx.send(ReaderMsg::Output(buf[..n].to_vec())).is_err() {
                            return;
                        }
                    }
                    // EIO is how Linux reports that the slave side closed.
                    Err(e) => {
                        tracing::debug!(error = %e, "PTY reader stopped");
                        break;
                    }
                }
            }
            let _ = tx.send(ReaderMsg::Closed);
        })?;

    let handle = PtyHandle::new(writer, pair.master, rx, watch, spec.size);

    tracing::debug!(
        program = %spec.program,
        cwd = %spec.cwd.display(),
        pid = ?handle.process_id(),
        "PTY spawned"
    );
    Ok(handle)
}

// =============================================================================
// TESTS
// =============================================================================
