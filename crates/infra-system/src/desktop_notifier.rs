// Desktop notifier
//
// Tries a fixed, ordered list of backends and uses the first one present on
// PATH. Backends are plain commands; no shell is involved.

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use hypnos_core::error::{AppError, Result};
use hypnos_core::port::Notifier;

#[async_trait]
pub trait NotifierBackend: Send + Sync {
    fn name(&self) -> &'static str;

    /// Whether this backend can run on the current host
    fn is_available(&self) -> bool;

    async fn send(&self, title: &str, message: &str) -> Result<()>;
}

fn on_path(binary: &str) -> bool {
    which::which(binary).is_ok()
}

async fn run(binary: &str, args: &[&str]) -> Result<()> {
    let status = Command::new(binary)
        .args(args)
        .status()
        .await
        .map_err(|e| AppError::Notifier(format!("{}: {}", binary, e)))?;

    if status.success() {
        Ok(())
    } else {
        Err(AppError::Notifier(format!("{} exited with {}", binary, status)))
    }
}

/// AppleScript string literal body
fn applescript_escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

pub struct OsascriptBackend;

#[async_trait]
impl NotifierBackend for OsascriptBackend {
    fn name(&self) -> &'static str {
        "osascript"
    }

    fn is_available(&self) -> bool {
        cfg!(target_os = "macos") && on_path("osascript")
    }

    async fn send(&self, title: &str, message: &str) -> Result<()> {
        let script = format!(
            "display notification \"{}\" with title \"{}\"",
            applescript_escape(message),
            applescript_escape(title)
        );
        run("osascript", &["-e", &script]).await
    }
}

pub struct TerminalNotifierBackend;

#[async_trait]
impl NotifierBackend for TerminalNotifierBackend {
    fn name(&self) -> &'static str {
        "terminal-notifier"
    }

    fn is_available(&self) -> bool {
        on_path("terminal-notifier")
    }

    async fn send(&self, title: &str, message: &str) -> Result<()> {
        run("terminal-notifier", &["-title", title, "-message", message]).await
    }
}

pub struct NotifySendBackend;

#[async_trait]
impl NotifierBackend for NotifySendBackend {
    fn name(&self) -> &'static str {
        "notify-send"
    }

    fn is_available(&self) -> bool {
        on_path("notify-send")
    }

    async fn send(&self, title: &str, message: &str) -> Result<()> {
        run("notify-send", &["--", title, message]).await
    }
}

/// First-available-backend notifier
pub struct DesktopNotifier {
    backends: Vec<Box<dyn NotifierBackend>>,
}

impl DesktopNotifier {
    /// Backends in preference order
    pub fn with_backends(backends: Vec<Box<dyn NotifierBackend>>) -> Self {
        Self { backends }
    }

    pub fn backend_names(&self) -> Vec<&'static str> {
        self.backends.iter().map(|b| b.name()).collect()
    }
}

impl Default for DesktopNotifier {
    fn default() -> Self {
        Self::with_backends(vec![
            Box::new(OsascriptBackend),
            Box::new(TerminalNotifierBackend),
            Box::new(NotifySendBackend),
        ])
    }
}

#[async_trait]
impl Notifier for DesktopNotifier {
    async fn notify(&self, title: &str, message: &str) -> Result<()> {
        let backend = self
            .backends
            .iter()
            .find(|b| b.is_available())
            .ok_or_else(|| {
                AppError::Notifier(format!(
                    "no notifier available (tried {})",
                    self.backend_names().join(", ")
                ))
            })?;

        debug!(backend = backend.name(), title = %title, "Sending notification");
        backend.send(title, message).await
    }
}
