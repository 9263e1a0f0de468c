//! The session registry: id -> live PTY, plus the startup queue.
//!
//! One owner drives the registry. Per-session reader and watcher threads
//! only push bytes and exit statuses into channels; [`PtyRegistry::poll`]
//! drains them and is the only place where natural exits are noticed. A
//! shell counts as exited when its process does, even if a background job
//! still holds the terminal open. Every removal goes through
//! [`PtyRegistry::remove_and_reap`], so destroy and exit cannot both fire
//! for the same session. No operation waits on the child process.

use std::collections::HashMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use serde::Serialize;
use sidecar_common::{SessionId, SessionIdGenerator, WindowId};
use sidecar_config::{AssistantKind, SidecarConfig};
use sidecar_platform::{NativePlatform, Platform};

use crate::env::{build_environment, EnvOverlay};
use crate::error::PtyError;
use crate::events::{ExitInfo, SessionEvents};
use crate::io::PtyHandle;
use crate::spawn::{spawn_pty, SpawnSpec};
use crate::startup::{StartupPlan, StartupQueue, StepKind};
use crate::types::{TerminalSize, PTY_MAX_OUTPUT_PER_POLL};

// =============================================================================
// OPTIONS
// =============================================================================

/// Registry-wide settings, normally derived from [`SidecarConfig`].
#[derive(Debug, Clone)]
pub struct RegistryOptions {
    /// Shell to run; `None` asks the platform.
    pub shell_program: Option<String>,
    /// Arguments after the login flag.
    pub shell_args: Vec<String>,
    pub login_shell: bool,
    /// Geometry every session starts with.
    pub initial_size: TerminalSize,
    pub env: EnvOverlay,
    pub assistant: AssistantKind,
    /// Replaces the assistant's own command when set.
    pub launch_command: Option<String>,
    pub auto_launch: bool,
    pub banner_delay: Duration,
    pub launch_delay: Duration,
}

impl RegistryOptions {
    pub fn from_config(config: &SidecarConfig) -> Self {
        Self {
            shell_program: config.shell.program_override().map(str::to_string),
            shell_args: config.shell.args.clone(),
            login_shell: config.shell.login_shell,
            initial_size: TerminalSize::clamped(config.terminal.cols, config.terminal.rows),
            env: EnvOverlay {
                extra_path_dirs: config.shell.extra_path_dirs.iter().map(PathBuf::from).collect(),
                extra_env: config.shell.env.clone(),
            },
            assistant: config.startup.assistant,
            launch_command: config.startup.launch_override().map(str::to_string),
            auto_launch: config.startup.auto_launch,
            banner_delay: Duration::from_millis(u64::from(config.startup.banner_delay_ms)),
            launch_delay: Duration::from_millis(u64::from(config.startup.launch_delay_ms)),
        }
    }
}

impl Default for RegistryOptions {
    fn default() -> Self {
        Self::from_config(&SidecarConfig::default())
    }
}

/// Parameters for [`PtyRegistry::create_with`].
#[derive(Debug, Clone)]
pub struct CreateRequest {
    pub cwd: PathBuf,
    pub window: WindowId,
    /// Overrides the registry's assistant for this session.
    pub assistant: Option<AssistantKind>,
    /// Overrides the registry's `auto_launch` for this session.
    pub auto_launch: Option<bool>,
}

impl CreateRequest {
    pub fn new(cwd: impl Into<PathBuf>, window: impl Into<WindowId>) -> Self {
        Self {
            cwd: cwd.into(),
            window: window.into(),
            assistant: None,
            auto_launch: None,
        }
    }

    pub fn with_assistant(mut self, assistant: AssistantKind) -> Self {
        self.assistant = Some(assistant);
        self
    }

    pub fn without_launch(mut self) -> Self {
        self.auto_launch = Some(false);
        self
    }
}

// =============================================================================
// SESSION
// =============================================================================

/// Metadata snapshot of one session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionInfo {
    pub id: SessionId,
    pub window: WindowId,
    pub cwd: PathBuf,
    pub assistant: AssistantKind,
    pub created_at: DateTime<Utc>,
    pub size: TerminalSize,
    pub pid: Option<u32>,
}

struct Session {
    /// Counter value; orders sessions by creation.
    seq: u64,
    window: WindowId,
    cwd: PathBuf,
    assistant: AssistantKind,
    created_at: DateTime<Utc>,
    handle: PtyHandle,
}

impl Session {
    fn info(&self, id: &SessionId) -> SessionInfo {
        SessionInfo {
            id: id.clone(),
            window: self.window.clone(),
            cwd: self.cwd.clone(),
            assistant: self.assistant,
            created_at: self.created_at,
            size: self.handle.size,
            pid: self.handle.process_id(),
        }
    }
}

// =============================================================================
// REGISTRY
// =============================================================================

/// Owns every PTY session and reports on them through `E`.
pub struct PtyRegistry<E: SessionEvents> {
    sessions: HashMap<SessionId, Session>,
    ids: SessionIdGenerator,
    startup: StartupQueue,
    options: RegistryOptions,
    platform: Box<dyn Platform>,
    events: E,
}

impl<E: SessionEvents> PtyRegistry<E> {
    pub fn new(options: RegistryOptions, events: E) -> Self {
        Self::with_platform(options, Box::new(NativePlatform), events)
    }

    pub fn with_platform(options: RegistryOptions, platform: Box<dyn Platform>, events: E) -> Self {
        Self {
            sessions: HashMap::new(),
            ids: SessionIdGenerator::new(),
            startup: StartupQueue::new(),
            options,
            platform,
            events,
        }
    }

    pub fn options(&self) -> &RegistryOptions {
        &self.options
    }

    pub fn events(&self) -> &E {
        &self.events
    }

    pub fn events_mut(&mut self) -> &mut E {
        &mut self.events
    }

    // -------------------------------------------------------------------------
    // Lifecycle
    // -------------------------------------------------------------------------

    /// Start a shell in `cwd` owned by `window`.
    pub fn create(
        &mut self,
        cwd: impl Into<PathBuf>,
        window: impl Into<WindowId>,
    ) -> Result<SessionId, PtyError> {
        self.create_with(CreateRequest::new(cwd, window))
    }

    /// Start a shell with per-session overrides.
    ///
    /// The id is allocated before spawning, so a failed spawn still consumes
    /// its number. On failure an error event is emitted for that id and the
    /// error is returned; nothing is registered.
    pub fn create_with(&mut self, request: CreateRequest) -> Result<SessionId, PtyError> {
        let id = self.ids.next_id();
        let CreateRequest {
            cwd,
            window,
            assistant,
            auto_launch,
        } = request;
        let assistant = assistant.unwrap_or(self.options.assistant);

        let spec = self.spawn_spec(&cwd);
        let handle = match spawn_pty(&spec, id.as_str()) {
            Ok(handle) => handle,
            Err(e) => {
                tracing::warn!(session_id = %id, window_id = %window, error = %e, "Session spawn failed");
                self.events
                    .on_error(&id, &window, &format!("Failed to create shell: {e}"));
                return Err(e);
            }
        };

        let plan = self.startup_plan(assistant, auto_launch);
        for step in plan.steps(&id, &cwd, Instant::now()) {
            self.startup.schedule(step);
        }

        tracing::info!(
            session_id = %id,
            window_id = %window,
            cwd = %cwd.display(),
            shell = %spec.program,
            pid = ?handle.process_id(),
            "Session created"
        );

        self.sessions.insert(
            id.clone(),
            Session {
                seq: self.ids.issued(),
                window,
                cwd,
                assistant,
                created_at: Utc::now(),
                handle,
            },
        );
        Ok(id)
    }

    /// Kill a session. Returns `false` when it is not registered.
    ///
    /// The exit event fires before this returns. It carries a status only if
    /// the process had already exited; otherwise the kill completes in the
    /// background and the event has neither code nor signal.
    pub fn destroy(&mut self, id: &SessionId) -> bool {
        match self.remove_and_reap(id, |handle| handle.terminate()) {
            Some(_) => {
                tracing::info!(session_id = %id, "Session destroyed");
                true
            }
            None => false,
        }
    }

    /// Destroy every session owned by `window`. Returns how many went.
    pub fn destroy_by_window(&mut self, window: &WindowId) -> usize {
        let ids = self.sessions_for_window(window);
        let count = ids.iter().filter(|id| self.destroy(id)).count();
        if count > 0 {
            tracing::info!(window_id = %window, count, "Window sessions destroyed");
        }
        count
    }

    /// Destroy every session. Safe to call any number of times.
    pub fn destroy_all(&mut self) -> usize {
        let ids = self.session_ids();
        let count = ids.iter().filter(|id| self.destroy(id)).count();
        if count > 0 {
            tracing::info!(count, "All sessions destroyed");
        }
        count
    }

    // -------------------------------------------------------------------------
    // I/O
    // -------------------------------------------------------------------------

    /// Send bytes to a session's shell unchanged.
    ///
    /// `false` when the session is absent or the write failed; a failed
    /// write also emits an error event.
    pub fn write(&mut self, id: &SessionId, data: &[u8]) -> bool {
        let Some(session) = self.sessions.get_mut(id) else {
            tracing::trace!(session_id = %id, "write to unknown session");
            return false;
        };

        match session.handle.write_input(data) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(session_id = %id, error = %e, "PTY write failed");
                self.events
                    .on_error(id, &session.window, &format!("Write failed: {e}"));
                false
            }
        }
    }

    /// Change a session's terminal geometry. Zero or oversized dimensions
    /// are rejected.
    pub fn resize(&mut self, id: &SessionId, cols: u16, rows: u16) -> bool {
        let Some(size) = TerminalSize::new(cols, rows) else {
            tracing::debug!(session_id = %id, cols, rows, "rejected terminal size");
            return false;
        };
        let Some(session) = self.sessions.get_mut(id) else {
            return false;
        };

        match session.handle.resize(size) {
            Ok(()) => {
                tracing::debug!(session_id = %id, cols, rows, "PTY resized");
                true
            }
            Err(e) => {
                tracing::warn!(session_id = %id, error = %e, "PTY resize failed");
                false
            }
        }
    }

    /// Forward pending output, run due startup steps, and retire sessions
    /// whose process exited.
    pub fn poll(&mut self) {
        self.poll_at(Instant::now());
    }

    pub(crate) fn poll_at(&mut self, now: Instant) {
        let mut closed = Vec::new();
        for id in self.session_ids() {
            let Some(session) = self.sessions.get_mut(&id) else {
                continue;
            };
            let output = session.handle.drain_output(PTY_MAX_OUTPUT_PER_POLL);
            if !output.is_empty() {
                self.events.on_output(&id, &session.window, &output);
            }
            if session.handle.ready_to_retire() {
                closed.push(id);
            }
        }

        for id in closed {
            if let Some(exit) = self.remove_and_reap(&id, PtyHandle::take_exit) {
                tracing::info!(
                    session_id = %id,
                    exit_code = ?exit.exit_code,
                    signal = ?exit.signal,
                    "Session process exited"
                );
            }
        }

        self.run_startup_steps(now);
    }

    fn run_startup_steps(&mut self, now: Instant) {
        for step in self.startup.take_due(now) {
            match step.kind {
                StepKind::Banner(text) => match self.sessions.get(&step.session) {
                    Some(session) => {
                        self.events
                            .on_output(&step.session, &session.window, text.as_bytes());
                    }
                    None => tracing::trace!(session_id = %step.session, "banner skipped"),
                },
                StepKind::Launch(command) => {
                    if !self.write(&step.session, command.as_bytes()) {
                        tracing::debug!(session_id = %step.session, "launch command not delivered");
                    }
                }
            }
        }
    }

    /// The single removal path. Emits the exit event after the entry is gone.
    fn remove_and_reap(
        &mut self,
        id: &SessionId,
        reap: impl FnOnce(&mut PtyHandle) -> ExitInfo,
    ) -> Option<ExitInfo> {
        let mut session = self.sessions.remove(id)?;
        let exit = reap(&mut session.handle);
        self.events.on_exit(id, &session.window, exit.clone());
        Some(exit)
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    /// Active ids in creation order.
    pub fn session_ids(&self) -> Vec<SessionId> {
        let mut ids: Vec<(u64, &SessionId)> =
            self.sessions.iter().map(|(id, s)| (s.seq, id)).collect();
        ids.sort_unstable_by_key(|(seq, _)| *seq);
        ids.into_iter().map(|(_, id)| id.clone()).collect()
    }

    pub fn sessions_for_window(&self, window: &WindowId) -> Vec<SessionId> {
        self.session_ids()
            .into_iter()
            .filter(|id| self.sessions.get(id).is_some_and(|s| &s.window == window))
            .collect()
    }

    pub fn contains(&self, id: &SessionId) -> bool {
        self.sessions.contains_key(id)
    }

    pub fn info(&self, id: &SessionId) -> Option<SessionInfo> {
        self.sessions.get(id).map(|s| s.info(id))
    }

    pub fn size(&self, id: &SessionId) -> Option<TerminalSize> {
        self.sessions.get(id).map(|s| s.handle.size)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Startup steps not yet run, including those for sessions already gone.
    pub fn pending_startup_steps(&self) -> usize {
        self.startup.len()
    }

    // -------------------------------------------------------------------------
    // Spawn preparation
    // -------------------------------------------------------------------------

    fn spawn_spec(&self, cwd: &Path) -> SpawnSpec {
        let program = self
            .options
            .shell_program
            .clone()
            .unwrap_or_else(|| self.platform.default_shell());

        let mut args = if self.options.login_shell {
            self.platform.login_args(&program)
        } else {
            Vec::new()
        };
        args.extend(self.options.shell_args.iter().cloned());

        let env: Vec<(OsString, OsString)> =
            build_environment(std::env::vars_os(), self.platform.as_ref(), &self.options.env);

        SpawnSpec {
            program,
            args,
            cwd: cwd.to_path_buf(),
            env,
            size: self.options.initial_size,
        }
    }

    fn startup_plan(&self, assistant: AssistantKind, auto_launch: Option<bool>) -> StartupPlan {
        let launch_command = auto_launch
            .unwrap_or(self.options.auto_launch)
            .then(|| {
                self.options
                    .launch_command
                    .clone()
                    .unwrap_or_else(|| assistant.command().to_string())
            });

        StartupPlan {
            assistant_name: assistant.display_name().to_string(),
            launch_command,
            banner_delay: self.options.banner_delay,
            launch_delay: self.options.launch_delay,
        }
    }
}

#[cfg(test)]
mod tests;
