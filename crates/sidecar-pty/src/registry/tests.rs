//! Registry tests against real `/bin/sh` sessions.

#![cfg(unix)]

use std::path::PathBuf;
use std::time::{Duration, Instant};

use sidecar_common::{SessionId, WindowId};
use sidecar_config::AssistantKind;
use sidecar_platform::Platform;

use super::*;
use crate::events::{EventLog, SessionEvent};

const DEADLINE: Duration = Duration::from_secs(10);

struct PlainSh;

impl Platform for PlainSh {
    fn default_shell(&self) -> String {
        "/bin/sh".into()
    }

    fn login_args(&self, _shell: &str) -> Vec<String> {
        Vec::new()
    }

    fn tool_dirs(&self) -> Vec<PathBuf> {
        Vec::new()
    }
}

fn quiet_options() -> RegistryOptions {
    RegistryOptions {
        shell_program: None,
        login_shell: false,
        auto_launch: false,
        banner_delay: Duration::ZERO,
        launch_delay: Duration::ZERO,
        ..RegistryOptions::default()
    }
}

fn registry_with(options: RegistryOptions) -> PtyRegistry<EventLog> {
    PtyRegistry::with_platform(options, Box::new(PlainSh), EventLog::new())
}

fn registry() -> PtyRegistry<EventLog> {
    registry_with(quiet_options())
}

/// Poll until `done` holds or the deadline passes.
fn poll_until(
    registry: &mut PtyRegistry<EventLog>,
    mut done: impl FnMut(&PtyRegistry<EventLog>) -> bool,
) -> bool {
    let deadline = Instant::now() + DEADLINE;
    while Instant::now() < deadline {
        registry.poll();
        if done(registry) {
            return true;
        }
        std::thread::sleep(Duration::from_millis(10));
    }
    false
}

fn output_contains(registry: &PtyRegistry<EventLog>, id: &SessionId, needle: &str) -> bool {
    registry.events().output_text(id).contains(needle)
}

// =============================================================================
// IDENTIFIERS
// =============================================================================

#[test]
fn ids_are_unique_across_destroys() {
    let dir = tempfile::tempdir().unwrap();
    let mut reg = registry();

    let a = reg.create(dir.path(), "win-1").unwrap();
    assert!(reg.destroy(&a));
    let b = reg.create(dir.path(), "win-1").unwrap();
    let c = reg.create(dir.path(), "win-2").unwrap();

    assert_eq!(a.as_str(), "shell-1");
    assert_eq!(b.as_str(), "shell-2");
    assert_eq!(c.as_str(), "shell-3");
    assert_eq!(reg.session_ids(), vec![b, c]);
    reg.destroy_all();
}

#[test]
fn failed_spawn_consumes_its_number() {
    let dir = tempfile::tempdir().unwrap();
    let mut reg = registry();

    let err = reg.create(dir.path().join("missing"), "win-1");
    assert!(matches!(err, Err(PtyError::SpawnFailed { .. })));
    assert!(reg.is_empty());

    let failed = SessionId::from("shell-1");
    let errors = reg.events().errors_of(&failed);
    assert_eq!(errors.len(), 1);
    assert!(errors[0].starts_with("Failed to create shell:"), "got: {}", errors[0]);
    assert!(reg.events().exit_of(&failed).is_none());

    let next = reg.create(dir.path(), "win-1").unwrap();
    assert_eq!(next.as_str(), "shell-2");
    reg.destroy_all();
}

// =============================================================================
// DESTROY
// =============================================================================

#[test]
fn destroy_twice_reports_true_then_false() {
    let dir = tempfile::tempdir().unwrap();
    let mut reg = registry();
    let id = reg.create(dir.path(), "win-1").unwrap();

    assert!(reg.destroy(&id));
    assert!(!reg.destroy(&id));
    assert!(!reg.contains(&id));
}

#[test]
fn destroy_emits_exactly_one_exit_after_removal() {
    let dir = tempfile::tempdir().unwrap();
    let mut reg = registry();
    let id = reg.create(dir.path(), "win-1").unwrap();

    reg.destroy(&id);
    reg.destroy(&id);
    poll_until(&mut reg, |_| true);

    let exits = reg
        .events()
        .events()
        .iter()
        .filter(|e| matches!(e, SessionEvent::Exit { session, .. } if session == &id))
        .count();
    assert_eq!(exits, 1);
    assert!(matches!(reg.events().events().last(), Some(SessionEvent::Exit { .. })));
}

#[test]
fn destroy_returns_without_waiting_for_the_process() {
    let dir = tempfile::tempdir().unwrap();
    let mut reg = registry();
    let id = reg.create(dir.path(), "win-1").unwrap();

    // A shell that ignores SIGHUP has to be escalated to SIGKILL.
    reg.write(&id, b"trap '' HUP; echo TRAP$((1+1))SET\r");
    assert!(poll_until(&mut reg, |r| output_contains(r, &id, "TRAP2SET")));

    let start = Instant::now();
    assert!(reg.destroy(&id));
    assert!(start.elapsed() < Duration::from_millis(100), "took {:?}", start.elapsed());
    assert_eq!(reg.events().exit_of(&id), Some(&ExitInfo::default()));
}

#[test]
fn destroy_by_window_removes_only_that_window() {
    let dir = tempfile::tempdir().unwrap();
    let mut reg = registry();
    let a1 = reg.create(dir.path(), "win-a").unwrap();
    let b1 = reg.create(dir.path(), "win-b").unwrap();
    let a2 = reg.create(dir.path(), "win-a").unwrap();

    assert_eq!(reg.sessions_for_window(&WindowId::new("win-a")), vec![a1.clone(), a2.clone()]);
    assert_eq!(reg.destroy_by_window(&WindowId::new("win-a")), 2);

    assert_eq!(reg.session_ids(), vec![b1]);
    assert!(!reg.contains(&a1));
    assert!(!reg.contains(&a2));
    assert_eq!(reg.destroy_by_window(&WindowId::new("win-a")), 0);
    reg.destroy_all();
}

#[test]
fn destroy_all_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let mut reg = registry();
    assert_eq!(reg.destroy_all(), 0);

    reg.create(dir.path(), "win-1").unwrap();
    reg.create(dir.path(), "win-2").unwrap();
    assert_eq!(reg.destroy_all(), 2);
    assert_eq!(reg.destroy_all(), 0);
    assert!(reg.is_empty());
}

// =============================================================================
// I/O
// =============================================================================

#[test]
fn echo_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let mut reg = registry();
    let id = reg.create(dir.path(), "win-1").unwrap();

    assert!(reg.write(&id, b"echo hi\r"));
    assert!(poll_until(&mut reg, |r| output_contains(r, &id, "hi")));

    // Arithmetic only shows up if the shell actually ran the command.
    assert!(reg.write(&id, b"echo ROUND$((20+3))TRIP\r"));
    assert!(poll_until(&mut reg, |r| output_contains(r, &id, "ROUND23TRIP")));
    reg.destroy_all();
}

#[test]
fn shell_sees_terminal_environment() {
    let dir = tempfile::tempdir().unwrap();
    let mut reg = registry();
    let id = reg.create(dir.path(), "win-1").unwrap();

    reg.write(&id, b"echo \"T=$TERM C=$COLORTERM F=$FORCE_COLOR\"\r");
    assert!(poll_until(&mut reg, |r| output_contains(
        r,
        &id,
        "T=xterm-256color C=truecolor F=1"
    )));
    reg.destroy_all();
}

#[test]
fn shell_starts_in_requested_directory() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("repo-under-test");
    std::fs::create_dir(&nested).unwrap();
    let mut reg = registry();
    let id = reg.create(&nested, "win-1").unwrap();

    reg.write(&id, b"pwd\r");
    assert!(poll_until(&mut reg, |r| output_contains(r, &id, "repo-under-test")));
    reg.destroy_all();
}

#[test]
fn natural_exit_retires_session() {
    let dir = tempfile::tempdir().unwrap();
    let mut reg = registry();
    let id = reg.create(dir.path(), "win-1").unwrap();

    assert!(reg.write(&id, b"exit 3\r"));
    assert!(poll_until(&mut reg, |r| !r.contains(&id)));

    let exit = reg.events().exit_of(&id).cloned().unwrap();
    assert_eq!(exit.exit_code, Some(3));
    assert_eq!(exit.signal, None);

    assert!(!reg.write(&id, b"echo nope\r"));
    assert!(!reg.resize(&id, 100, 30));
    assert!(!reg.destroy(&id));
    assert!(reg.session_ids().is_empty());
}

#[test]
fn exit_is_noticed_while_background_job_holds_terminal() {
    let dir = tempfile::tempdir().unwrap();
    let mut reg = registry();
    let id = reg.create(dir.path(), "win-1").unwrap();

    // `sleep` inherits the terminal, so EOF only comes when it finishes.
    assert!(reg.write(&id, b"sleep 20 &\rexit 4\r"));
    let start = Instant::now();
    assert!(poll_until(&mut reg, |r| !r.contains(&id)));
    assert!(start.elapsed() < Duration::from_secs(2), "took {:?}", start.elapsed());

    assert_eq!(reg.events().exit_of(&id).and_then(|e| e.exit_code), Some(4));
    assert!(!reg.write(&id, b"echo nope\r"));
}

struct BrokenPipe;

impl std::io::Write for BrokenPipe {
    fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
        Err(std::io::ErrorKind::BrokenPipe.into())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[test]
fn failed_write_reports_error_event() {
    let dir = tempfile::tempdir().unwrap();
    let mut reg = registry();
    let id = reg.create(dir.path(), "win-1").unwrap();
    if let Some(session) = reg.sessions.get_mut(&id) {
        session.handle.writer = Box::new(BrokenPipe);
    }

    assert!(!reg.write(&id, b"echo hi\r"));
    let errors = reg.events().errors_of(&id);
    assert_eq!(errors.len(), 1);
    assert!(errors[0].starts_with("Write failed:"), "got: {}", errors[0]);

    // The session itself stays registered until its process exits.
    assert!(reg.contains(&id));
    reg.destroy_all();
}

#[test]
fn write_to_unknown_session_is_false() {
    let mut reg = registry();
    assert!(!reg.write(&SessionId::from("shell-99"), b"x"));
    assert!(reg.events().events().is_empty());
}

// =============================================================================
// RESIZE
// =============================================================================

#[test]
fn resize_updates_size_and_rejects_zero() {
    let dir = tempfile::tempdir().unwrap();
    let mut reg = registry();
    let id = reg.create(dir.path(), "win-1").unwrap();
    assert_eq!(reg.size(&id), Some(TerminalSize::default()));

    assert!(reg.resize(&id, 120, 40));
    assert_eq!(reg.size(&id), Some(TerminalSize { cols: 120, rows: 40 }));

    assert!(!reg.resize(&id, 0, 40));
    assert!(!reg.resize(&id, 120, 0));
    assert!(!reg.resize(&id, 501, 40));
    assert_eq!(reg.size(&id), Some(TerminalSize { cols: 120, rows: 40 }));

    reg.write(&id, b"stty size\r");
    assert!(poll_until(&mut reg, |r| output_contains(r, &id, "40 120")));
    reg.destroy_all();
}

// =============================================================================
// STARTUP SEQUENCE
// =============================================================================

#[test]
fn banner_then_launch_command() {
    let dir = tempfile::tempdir().unwrap();
    let mut reg = registry_with(RegistryOptions {
        auto_launch: true,
        launch_command: Some("echo LAUNCHED$((40+2))".into()),
        ..quiet_options()
    });
    let id = reg.create(dir.path(), "win-1").unwrap();
    assert_eq!(reg.pending_startup_steps(), 2);

    let banner = format!("Claude Code shell initialized in {}", dir.path().display());
    assert!(poll_until(&mut reg, |r| output_contains(r, &id, &banner)));
    assert!(poll_until(&mut reg, |r| output_contains(r, &id, "LAUNCHED42")));
    assert_eq!(reg.pending_startup_steps(), 0);
    reg.destroy_all();
}

#[test]
fn assistant_override_changes_banner() {
    let dir = tempfile::tempdir().unwrap();
    let mut reg = registry();
    let id = reg
        .create_with(CreateRequest::new(dir.path(), "win-1").with_assistant(AssistantKind::Codex))
        .unwrap();

    assert_eq!(reg.info(&id).map(|i| i.assistant), Some(AssistantKind::Codex));
    assert!(poll_until(&mut reg, |r| output_contains(r, &id, "Codex shell initialized")));
    reg.destroy_all();
}

#[test]
fn without_launch_schedules_banner_only() {
    let dir = tempfile::tempdir().unwrap();
    let mut reg = registry_with(RegistryOptions {
        auto_launch: true,
        ..quiet_options()
    });
    reg.create_with(CreateRequest::new(dir.path(), "win-1").without_launch())
        .unwrap();
    assert_eq!(reg.pending_startup_steps(), 1);
    reg.destroy_all();
}

#[test]
fn destroyed_session_gets_no_banner() {
    let dir = tempfile::tempdir().unwrap();
    let mut reg = registry_with(RegistryOptions {
        auto_launch: true,
        banner_delay: Duration::from_secs(60),
        ..quiet_options()
    });
    let id = reg.create(dir.path(), "win-1").unwrap();
    assert!(reg.destroy(&id));

    reg.poll_at(Instant::now() + Duration::from_secs(3_600));
    assert_eq!(reg.pending_startup_steps(), 0);
    assert!(!output_contains(&reg, &id, "shell initialized"));
    assert!(matches!(reg.events().events().last(), Some(SessionEvent::Exit { .. })));
}

// =============================================================================
// QUERIES
// =============================================================================

#[test]
fn info_reports_metadata() {
    let dir = tempfile::tempdir().unwrap();
    let mut reg = registry();
    let id = reg.create(dir.path(), "win-7").unwrap();

    let info = reg.info(&id).unwrap();
    assert_eq!(info.id, id);
    assert_eq!(info.window, WindowId::new("win-7"));
    assert_eq!(info.cwd, dir.path());
    assert_eq!(info.assistant, AssistantKind::Claude);
    assert!(info.pid.is_some());
    assert!(info.created_at <= chrono::Utc::now());
    assert_eq!(reg.len(), 1);

    reg.destroy_all();
    assert!(reg.info(&id).is_none());
    assert!(reg.size(&id).is_none());
}

#[test]
fn options_follow_config() {
    let mut config = sidecar_config::SidecarConfig::default();
    config.shell.program = "/bin/bash".into();
    config.shell.extra_path_dirs = vec!["/opt/extra".into()];
    config.terminal.cols = 132;
    config.startup.assistant = AssistantKind::Codex;
    config.startup.launch_command = Some("   ".into());
    config.startup.banner_delay_ms = 5;

    let options = RegistryOptions::from_config(&config);
    assert_eq!(options.shell_program.as_deref(), Some("/bin/bash"));
    assert_eq!(options.env.extra_path_dirs, vec![PathBuf::from("/opt/extra")]);
    assert_eq!(options.initial_size, TerminalSize { cols: 132, rows: 30 });
    assert_eq!(options.assistant, AssistantKind::Codex);
    assert_eq!(options.launch_command, None);
    assert_eq!(options.banner_delay, Duration::from_millis(5));
    assert_eq!(options.launch_delay, Duration::from_millis(500));
}

// =============================================================================
// END-TO-END
// =============================================================================

#[test]
fn two_windows_scenario() {
    let repo = tempfile::tempdir().unwrap();
    let repo2 = tempfile::tempdir().unwrap();
    let mut reg = registry();

    let s1 = reg.create(repo.path(), "win-1").unwrap();
    let s2 = reg.create(repo2.path(), "win-2").unwrap();
    assert_eq!(s1.as_str(), "shell-1");
    assert_eq!(s2.as_str(), "shell-2");

    reg.destroy_by_window(&WindowId::new("win-1"));
    assert!(!reg.contains(&s1));
    assert!(reg.contains(&s2));
    assert!(!reg.write(&s1, b"x"));
    assert!(reg.write(&s2, b"x"));

    reg.destroy_all();
}
