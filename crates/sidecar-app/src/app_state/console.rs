//! A terminal window backed by the process's own stdout/stderr.
//!
//! Shell output is copied to stdout byte for byte, so the host terminal does
//! the rendering. Exit and error notices go to stderr.

use std::io::{self, Write};

use sidecar_pty::{DeliveryError, TerminalWindow, WindowMessage};

const YELLOW: &str = "\x1b[33m";
const RED: &str = "\x1b[31m";
const RESET: &str = "\x1b[0m";

pub struct ConsoleWindow {
    out: Box<dyn Write + Send>,
    notices: Box<dyn Write + Send>,
    /// Shown in the exit notice.
    assistant_name: String,
}

impl ConsoleWindow {
    pub fn stdio(assistant_name: impl Into<String>) -> Self {
        Self::new(
            Box::new(io::stdout()),
            Box::new(io::stderr()),
            assistant_name,
        )
    }

    pub fn new(
        out: Box<dyn Write + Send>,
        notices: Box<dyn Write + Send>,
        assistant_name: impl Into<String>,
    ) -> Self {
        Self {
            out,
            notices,
            assistant_name: assistant_name.into(),
        }
    }

    fn emit(target: &mut dyn Write, bytes: &[u8]) -> Result<(), DeliveryError> {
        target
            .write_all(bytes)
            .and_then(|()| target.flush())
            .map_err(|e| DeliveryError::Failed(e.to_string()))
    }
}

impl TerminalWindow for ConsoleWindow {
    fn send(&mut self, message: WindowMessage) -> Result<(), DeliveryError> {
        match message {
            WindowMessage::SessionAttached { session_id } => {
                tracing::debug!(session_id = %session_id, "console attached");
                Ok(())
            }
            WindowMessage::ShellOutput { data, .. } => Self::emit(&mut self.out, &data),
            WindowMessage::ShellError { message, .. } => {
                Self::emit(&mut self.notices, error_notice(&message).as_bytes())
            }
            WindowMessage::ShellExit {
                exit_code, signal, ..
            } => {
                let notice = exit_notice(&self.assistant_name, exit_code, signal.as_deref());
                Self::emit(&mut self.notices, notice.as_bytes())
            }
        }
    }
}

/// `"\r\n<name> shell exited[ with code N][ (signal: S)]\r\n"` in yellow.
pub fn exit_notice(assistant_name: &str, exit_code: Option<u32>, signal: Option<&str>) -> String {
    let mut text = format!("\r\n{assistant_name} shell exited");
    if let Some(code) = exit_code {
        text.push_str(&format!(" with code {code}"));
    }
    if let Some(signal) = signal {
        text.push_str(&format!(" (signal: {signal})"));
    }
    text.push_str("\r\n");
    format!("{YELLOW}{text}{RESET}")
}

pub fn error_notice(message: &str) -> String {
    format!("{RED}Error: {message}{RESET}\r\n")
}

/// A cloneable in-memory writer standing in for stdout/stderr.
#[cfg(test)]
#[derive(Clone, Default)]
pub(crate) struct SharedBuf(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

#[cfg(test)]
impl SharedBuf {
    pub(crate) fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }

    /// A console writing into fresh buffers: `(window, out, notices)`.
    pub(crate) fn console(assistant_name: &str) -> (ConsoleWindow, SharedBuf, SharedBuf) {
        let out = SharedBuf::default();
        let notices = SharedBuf::default();
        let window = ConsoleWindow::new(
            Box::new(out.clone()),
            Box::new(notices.clone()),
            assistant_name,
        );
        (window, out, notices)
    }
}

#[cfg(test)]
impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
