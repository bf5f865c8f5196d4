//! Desktop notifications through the platform's command-line notifier.
//!
//! - Linux: `notify-send`
//! - macOS: `osascript -e 'display notification ...'`
//!
//! Permission is modelled the way browsers do it: undecided until
//! requested, then granted if the notifier tool exists.

use std::path::PathBuf;
use std::time::Duration;

use tracing::{debug, info};

use super::error::NotificationError;
use super::{NativeNotifier, Permission};
use crate::platform::{find_program, reap_in_background, spawn_quiet, wait_with_timeout};

/// How long the notifier may take to hand the notification over.
pub const NOTIFIER_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tool {
    NotifySend,
    Osascript,
}

/// Sends notifications by spawning the platform notifier.
#[derive(Debug)]
pub struct CommandNotifier {
    tool: Option<(Tool, PathBuf)>,
    permission: Permission,
}

impl CommandNotifier {
    /// Locates the notifier for the current platform.
    #[must_use]
    pub fn detect() -> Self {
        let tool = if cfg!(target_os = "macos") {
            find_program("osascript").map(|p| (Tool::Osascript, p))
        } else {
            find_program("notify-send").map(|p| (Tool::NotifySend, p))
        };
        match &tool {
            Some((_, path)) => debug!("Native notifier found at {}", path.display()),
            None => debug!("No native notifier found"),
        }
        Self {
            permission: if tool.is_some() {
                Permission::Default
            } else {
                Permission::Unsupported
            },
            tool,
        }
    }
}

/// Escapes a string for use inside an AppleScript string literal.
fn applescript_quote(text: &str) -> String {
    let escaped = text.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{escaped}\"")
}

impl NativeNotifier for CommandNotifier {
    fn permission(&self) -> Permission {
        self.permission
    }

    fn request_permission(&mut self) -> Result<Permission, NotificationError> {
        if self.tool.is_none() {
            return Err(NotificationError::NotAvailable);
        }
        self.permission = Permission::Granted;
        info!("Desktop notifications enabled");
        Ok(self.permission)
    }

    fn show(&mut self, title: &str, body: &str) -> Result<(), NotificationError> {
        let (tool, path) = self.tool.as_ref().ok_or(NotificationError::NotAvailable)?;
        if self.permission != Permission::Granted {
            return Err(NotificationError::PermissionDenied);
        }

        let mut child = match tool {
            Tool::NotifySend => spawn_quiet(path, &["--urgency=critical", title, body]),
            Tool::Osascript => {
                let script = format!(
                    "display notification {} with title {}",
                    applescript_quote(body),
                    applescript_quote(title)
                );
                spawn_quiet(path, &["-e", script.as_str()])
            }
        }
        .map_err(|e| NotificationError::SendFailed(e.to_string()))?;

        // A notifier that cannot reach a notification daemon exits non-zero.
        match wait_with_timeout(&mut child, NOTIFIER_TIMEOUT) {
            Ok(Some(status)) if status.success() => Ok(()),
            Ok(Some(status)) => Err(NotificationError::SendFailed(format!(
                "{} exited with {status}",
                path.display()
            ))),
            Ok(None) => {
                let _ = child.kill();
                reap_in_background(child);
                Err(NotificationError::SendFailed(format!(
                    "{} did not finish within {:?}",
                    path.display(),
                    NOTIFIER_TIMEOUT
                )))
            }
            Err(e) => {
                reap_in_background(child);
                Err(NotificationError::SendFailed(e.to_string()))
            }
        }
    }
}
