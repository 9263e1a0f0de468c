//! PTY I/O on a spawned session: write input, drain output, resize, reap.
//!
//! The child process is owned by a watcher thread, not by [`PtyHandle`]. The
//! watcher reports the exit status as soon as the process dies, whether or
//! not the terminal reached EOF, and performs the blocking parts of a kill.
//! Nothing here blocks the thread that owns the handle.

use std::io::Write;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::thread;
use std::time::{Duration, Instant};

use portable_pty::{Child, ChildKiller, MasterPty};

use crate::error::PtyError;
use crate::events::ExitInfo;
use crate::types::TerminalSize;

/// How long output may keep arriving after the process exited. Background
/// jobs can hold the terminal open indefinitely, so EOF is not waited for.
const OUTPUT_GRACE: Duration = Duration::from_millis(100);
/// How long a process may outlive its closed terminal before it is killed.
const EXIT_GRACE: Duration = Duration::from_millis(250);
const WATCH_INTERVAL: Duration = Duration::from_millis(20);

/// Messages sent from a session's reader thread.
#[derive(Debug)]
pub(crate) enum ReaderMsg {
    Output(Vec<u8>),
    /// EOF or a read error; nothing follows.
    Closed,
}

/// The owner's half of a session: the master side of the PTY plus the
/// channels to the reader and watcher threads.
pub(crate) struct PtyHandle {
    pub(crate) writer: Box<dyn Write + Send>,
    pub(crate) size: TerminalSize,
    output_rx: Receiver<ReaderMsg>,
    master: Box<dyn MasterPty + Send>,
    watch: ChildWatch,
    /// Bytes received but held back by the per-poll cap.
    carry: Vec<u8>,
    /// The last drain stopped at its limit, so more may be queued.
    saturated: bool,
    closed_at: Option<Instant>,
    exited: Option<(ExitInfo, Instant)>,
    kill_requested: bool,
}

impl PtyHandle {
    pub(crate) fn new(
        writer: Box<dyn Write + Send>,
        master: Box<dyn MasterPty + Send>,
        output_rx: Receiver<ReaderMsg>,
        watch: ChildWatch,
        size: TerminalSize,
    ) -> Self {
        Self {
            writer,
            size,
            output_rx,
            master,
            watch,
            carry: Vec::new(),
            saturated: false,
            closed_at: None,
            exited: None,
            kill_requested: false,
        }
    }
}

// =============================================================================
// INPUT
// =============================================================================

impl PtyHandle {
    /// Write raw bytes to the shell's stdin.
    pub(crate) fn write_input(&mut self, data: &[u8]) -> Result<(), PtyError> {
        self.writer.write_all(data)?;
        self.writer.flush()?;
        Ok(())
    }
}

// =============================================================================
// OUTPUT
// =============================================================================

impl PtyHandle {
    /// Drain pending output, at most `limit` bytes.
    ///
    /// Bytes beyond the limit are kept for the next call, never dropped.
    /// Non-blocking: returns an empty vec when nothing is pending.
    pub(crate) fn drain_output(&mut self, limit: usize) -> Vec<u8> {
        let mut buf = std::mem::take(&mut self.carry);
        if buf.len() > limit {
            self.carry = buf.split_off(limit);
            self.saturated = true;
            return buf;
        }

        while buf.len() < limit && self.closed_at.is_none() {
            match self.output_rx.try_recv() {
                Ok(ReaderMsg::Output(chunk)) => {
                    let room = limit - buf.len();
                    if chunk.len() > room {
                        buf.extend_from_slice(&chunk[..room]);
                        self.carry = chunk[room..].to_vec();
                    } else {
                        buf.extend_from_slice(&chunk);
                    }
                }
                Ok(ReaderMsg::Closed) | Err(TryRecvError::Disconnected) => {
                    self.closed_at = Some(Instant::now());
                }
                Err(TryRecvError::Empty) => break,
            }
        }

        self.saturated = buf.len() >= limit;
        buf
    }
}

// =============================================================================
// RESIZE
// =============================================================================

impl PtyHandle {
    pub(crate) fn resize(&mut self, size: TerminalSize) -> Result<(), PtyError> {
        self.master
            .resize(size.to_pty_size())
            .map_err(|e| PtyError::ResizeFailed(e.to_string()))?;
        self.size = size;
        Ok(())
    }
}

// =============================================================================
// TERMINATION
// =============================================================================

impl PtyHandle {
    pub(crate) fn process_id(&self) -> Option<u32> {
        self.watch.pid
    }

    /// Advance exit tracking. True once the session can be retired without
    /// losing output: the process exited and either the terminal closed or
    /// [`OUTPUT_GRACE`] passed, and nothing is left to drain.
    ///
    /// A process still running [`EXIT_GRACE`] after its terminal closed is
    /// sent a kill; its status arrives on a later call.
    pub(crate) fn ready_to_retire(&mut self) -> bool {
        self.check_exit();
        if self.saturated || !self.carry.is_empty() {
            return false;
        }
        let exited_at = self.exited.as_ref().map(|(_, at)| *at);
        match (exited_at, self.closed_at) {
            (Some(_), Some(_)) => true,
            (Some(at), None) => at.elapsed() >= OUTPUT_GRACE,
            (None, Some(closed)) => {
                if closed.elapsed() >= EXIT_GRACE && !self.kill_requested {
                    tracing::debug!(pid = ?self.watch.pid, "PTY closed but process still running; killing it");
                    self.request_kill();
                }
                false
            }
            (None, None) => false,
        }
    }

    /// The exit status, if the watcher has reported one.
    pub(crate) fn take_exit(&mut self) -> ExitInfo {
        self.check_exit();
        self.exited.take().map(|(info, _)| info).unwrap_or_default()
    }

    /// Stop the child without waiting for it.
    ///
    /// Returns the status when the process had already exited, otherwise an
    /// empty [`ExitInfo`]; the watcher escalates and reaps in the background.
    pub(crate) fn terminate(&mut self) -> ExitInfo {
        self.check_exit();
        if self.exited.is_none() {
            self.request_kill();
        }
        self.take_exit()
    }

    fn request_kill(&mut self) {
        self.kill_requested = true;
        if let Err(e) = self.watch.killer.kill() {
            tracing::debug!(error = %e, "PTY kill failed (process may already be gone)");
        }
        // The watcher may be gone already; then so is the child.
        let _ = self.watch.kill_tx.send(());
    }

    fn check_exit(&mut self) {
        if self.exited.is_some() {
            return;
        }
        let info = match self.watch.exit_rx.try_recv() {
            Ok(info) => info,
            Err(TryRecvError::Empty) => return,
            Err(TryRecvError::Disconnected) => ExitInfo::default(),
        };
        self.exited = Some((info, Instant::now()));
    }
}

// =============================================================================
// WATCHER
// =============================================================================

/// The owner's side of a watcher thread.
pub(crate) struct ChildWatch {
    pid: Option<u32>,
    /// Non-blocking signal sender, usable while the watcher owns the child.
    killer: Box<dyn ChildKiller + Send + Sync>,
    /// Asks the watcher to kill and reap; dropping it does the same.
    kill_tx: Sender<()>,
    exit_rx: Receiver<ExitInfo>,
}

/// Move `child` onto a watcher thread named `pty-watch-{label}`.
///
/// If the thread cannot be started the child is signalled before the error
/// is returned.
pub(crate) fn spawn_watcher(
    child: Box<dyn Child + Send + Sync>,
    label: &str,
) -> std::io::Result<ChildWatch> {
    let pid = child.process_id();
    let mut killer = child.clone_killer();
    let (kill_tx, kill_rx) = mpsc::channel();
    let (exit_tx, exit_rx) = mpsc::channel();

    let spawned = thread::Builder::new()
        .name(format!("pty-watch-{label}"))
        .spawn(move || watch_child(child, kill_rx, exit_tx));
    if let Err(e) = spawned {
        let _ = killer.kill();
        return Err(e);
    }

    Ok(ChildWatch {
        pid,
        killer,
        kill_tx,
        exit_rx,
    })
}

/// Poll the child until it exits, or kill it when asked to (or when the
/// handle is dropped), then report the status once.
fn watch_child(
    mut child: Box<dyn Child + Send + Sync>,
    kill_rx: Receiver<()>,
    exit_tx: Sender<ExitInfo>,
) {
    let info = loop {
        match child.try_wait() {
            Ok(Some(status)) => break ExitInfo::from_status(&status),
            Ok(None) => {}
            Err(e) => {
                tracing::debug!(error = %e, "PTY try_wait failed");
                break ExitInfo::default();
            }
        }
        match kill_rx.recv_timeout(WATCH_INTERVAL) {
            Err(RecvTimeoutError::Timeout) => {}
            Ok(()) | Err(RecvTimeoutError::Disconnected) => {
                // SIGHUP, a short wait, then SIGKILL.
                if let Err(e) = child.kill() {
                    tracing::debug!(error = %e, "PTY kill failed (process may already be gone)");
                }
                break match child.wait() {
                    Ok(status) => ExitInfo::from_status(&status),
                    Err(e) => {
                        tracing::debug!(error = %e, "PTY wait failed");
                        ExitInfo::default()
                    }
                };
            }
        }
    };
    tracing::trace!(exit_code = ?info.exit_code, signal = ?info.signal, "PTY child reaped");
    let _ = exit_tx.send(info);
}

// =============================================================================
// TESTS
// =============================================================================
