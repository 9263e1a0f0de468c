use std::path::PathBuf;

use clap::Parser;
use sidecar_config::AssistantKind;

/// Sidecar: run an AI coding assistant in a login shell next to your project.
#[derive(Parser, Debug)]
#[command(name = "sidecar", version, about)]
pub struct Args {
    /// Project directory the shell starts in (defaults to the current directory).
    pub directory: Option<PathBuf>,

    /// Id of the window that owns the session.
    #[arg(long, default_value = "main")]
    pub window: String,

    /// Assistant to launch (claude or codex).
    #[arg(long)]
    pub assistant: Option<AssistantKind>,

    /// Print the banner but do not type the launch command.
    #[arg(long)]
    pub no_launch: bool,

    /// Config file path (default: `$SIDECAR_CONFIG`, else the platform config dir).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log level or filter directive (trace, debug, info, warn, error).
    #[arg(long)]
    pub log_level: Option<String>,
}

pub fn parse() -> Args {
    Args::parse()
}
