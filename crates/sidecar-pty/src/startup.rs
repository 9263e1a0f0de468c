//! Timed startup steps: the banner line and the assistant launch command.
//!
//! Shells need a moment to source their profiles and draw a prompt before
//! typed input is reliable. Each new session schedules two steps at fixed
//! delays; [`crate::PtyRegistry::poll`] runs whatever has come due.

use std::path::Path;
use std::time::{Duration, Instant};

use sidecar_common::SessionId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum StepKind {
    /// Emitted as session output; never written to the shell.
    Banner(String),
    /// Written to the shell's stdin.
    Launch(String),
}

#[derive(Debug, Clone)]
pub(crate) struct StartupStep {
    pub(crate) due: Instant,
    pub(crate) session: SessionId,
    pub(crate) kind: StepKind,
}

/// Pending steps, kept in due order.
#[derive(Debug, Default)]
pub(crate) struct StartupQueue {
    steps: Vec<StartupStep>,
}

impl StartupQueue {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Insert after every step due at or before `step.due`, so steps with
    /// equal deadlines run in scheduling order.
    pub(crate) fn schedule(&mut self, step: StartupStep) {
        let at = self.steps.partition_point(|s| s.due <= step.due);
        self.steps.insert(at, step);
    }

    /// Remove and return every step due at `now`.
    pub(crate) fn take_due(&mut self, now: Instant) -> Vec<StartupStep> {
        let split = self.steps.partition_point(|s| s.due <= now);
        self.steps.drain(..split).collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.steps.len()
    }
}

/// What to run after spawning one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct StartupPlan {
    pub(crate) assistant_name: String,
    /// `None` disables the launch step.
    pub(crate) launch_command: Option<String>,
    pub(crate) banner_delay: Duration,
    pub(crate) launch_delay: Duration,
}

impl StartupPlan {
    /// The steps for `session`, relative to `now`. The launch delay counts
    /// from the banner.
    pub(crate) fn steps(&self, session: &SessionId, cwd: &Path, now: Instant) -> Vec<StartupStep> {
        let banner_due = now + self.banner_delay;
        let mut steps = vec![StartupStep {
            due: banner_due,
            session: session.clone(),
            kind: StepKind::Banner(banner_text(&self.assistant_name, cwd)),
        }];
        if let Some(command) = &self.launch_command {
            steps.push(StartupStep {
                due: banner_due + self.launch_delay,
                session: session.clone(),
                kind: StepKind::Launch(format!("{command}\r")),
            });
        }
        steps
    }
}

pub(crate) fn banner_text(assistant_name: &str, cwd: &Path) -> String {
    format!("{assistant_name} shell initialized in {}\r\n", cwd.display())
}
