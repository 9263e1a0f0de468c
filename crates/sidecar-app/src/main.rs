mod app_state;
mod cli;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use sidecar_common::WindowId;
use sidecar_config::{LoggingConfig, SidecarConfig};
use sidecar_pty::CreateRequest;
use tracing_subscriber::EnvFilter;

use app_state::{ConsoleWindow, SidecarApp};

/// Build the log filter: `--log-level`, else `RUST_LOG`, else the config.
fn log_filter(cli_level: Option<&str>, logging: &LoggingConfig) -> EnvFilter {
    let configured = || EnvFilter::new(logging.level.as_directive());
    match cli_level {
        Some(level) => EnvFilter::try_new(level).unwrap_or_else(|_| configured()),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| configured()),
    }
}

/// Relative directories resolve against the current directory.
fn resolve_directory(arg: Option<&Path>) -> std::io::Result<PathBuf> {
    let cwd = std::env::current_dir()?;
    Ok(match arg {
        Some(dir) if dir.is_absolute() => dir.to_path_buf(),
        Some(dir) => cwd.join(dir),
        None => cwd,
    })
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = cli::parse();

    // Config before logging: the log level may come from it.
    let loaded = sidecar_config::load_config(args.config.as_deref());
    let mut config = match &loaded {
        Ok(config) => config.clone(),
        Err(_) => SidecarConfig::default(),
    };

    // stdout carries the shell stream, so logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(args.log_level.as_deref(), &config.logging))
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("Sidecar v{} starting...", env!("CARGO_PKG_VERSION"));
    if let Err(e) = &loaded {
        tracing::warn!("Config load failed, using defaults: {e}");
    }

    if let Some(assistant) = args.assistant {
        config.startup.assistant = assistant;
    }
    if args.no_launch {
        config.startup.auto_launch = false;
    }

    let directory = match resolve_directory(args.directory.as_deref()) {
        Ok(dir) => dir,
        Err(e) => {
            tracing::error!("Cannot determine working directory: {e}");
            return ExitCode::FAILURE;
        }
    };

    let mut app = SidecarApp::new(config);

    if let Err(e) = app_state::spawn_signal_listener(app.event_bus().sender()) {
        tracing::warn!("Signal handling unavailable: {e}");
    }

    let request = CreateRequest::new(directory, WindowId::new(args.window));
    let console = ConsoleWindow::stdio(app.assistant_for(&request).display_name());
    if let Err(e) = app.open_window(request, console) {
        tracing::error!("Failed to start session: {e}");
        app.shutdown(sidecar_common::ShutdownReason::Quit);
        return ExitCode::FAILURE;
    }

    let input = match app_state::spawn_stdin_reader() {
        Ok(input) => input,
        Err(e) => {
            tracing::error!("Failed to read console input: {e}");
            app.shutdown(sidecar_common::ShutdownReason::Quit);
            return ExitCode::FAILURE;
        }
    };

    let reason = app.run(input).await;
    tracing::info!(?reason, "Shutdown complete");
    ExitCode::SUCCESS
}
