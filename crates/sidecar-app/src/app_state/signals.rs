//! Termination signals become `Shutdown` events on the bus.

use sidecar_common::{Event, PlatformError, ShutdownReason};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

/// Spawn a task that publishes one `Shutdown` event on SIGINT or SIGTERM.
///
/// Must be called inside a tokio runtime.
pub fn spawn_signal_listener(
    sender: broadcast::Sender<Event>,
) -> Result<JoinHandle<()>, PlatformError> {
    #[cfg(unix)]
    let mut terminate = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
        .map_err(|e| PlatformError::SignalError(format!("SIGTERM handler: {e}")))?;

    Ok(tokio::spawn(async move {
        #[cfg(unix)]
        let reason = tokio::select! {
            result = tokio::signal::ctrl_c() => interrupt_reason(result),
            _ = terminate.recv() => ShutdownReason::Terminate,
        };

        #[cfg(not(unix))]
        let reason = interrupt_reason(tokio::signal::ctrl_c().await);

        tracing::info!(?reason, "Shutdown signal received");
        let _ = sender.send(Event::Shutdown(reason));
    }))
}

fn interrupt_reason(result: std::io::Result<()>) -> ShutdownReason {
    if let Err(e) = result {
        tracing::warn!(error = %e, "Ctrl-C handler failed; treating as interrupt");
    }
    ShutdownReason::Interrupt
}
