//! Modern wake lock: a held sleep inhibitor.
//!
//! The inhibitor stands in for a looping silent video. It is started from
//! a user gesture and stopped when the session ends.

use std::path::PathBuf;
use std::process::Child;
use std::time::Duration;

use tracing::{debug, info, warn};

use super::capability::inhibitor_program;
use super::error::WakeLockError;
use crate::platform::{find_program, reap_in_background, spawn_quiet, wait_with_timeout};

/// How long a freshly started inhibitor must stay alive to count as held.
pub const INHIBITOR_STARTUP_GRACE: Duration = Duration::from_millis(200);

/// A looping keep-awake media resource.
pub trait KeepAwakeMedia {
    /// Starts playback. Calling it while already playing is fine.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform rejected playback.
    fn play(&mut self) -> Result<(), WakeLockError>;

    /// Stops playback. Never fails.
    fn pause(&mut self);

    /// Returns true while playback is actually running.
    fn is_active(&mut self) -> bool;
}

/// Holds `systemd-inhibit` (Linux) or `caffeinate` (macOS) running for as
/// long as the lock is wanted.
#[derive(Debug, Default)]
pub struct InhibitorProcess {
    program: Option<PathBuf>,
    child: Option<Child>,
}

impl InhibitorProcess {
    /// Locates the inhibitor on `PATH`.
    #[must_use]
    pub fn detect() -> Self {
        Self {
            program: find_program(inhibitor_program()),
            child: None,
        }
    }

    /// Uses `program` as the inhibitor, with the platform's arguments.
    #[must_use]
    pub fn with_program(program: PathBuf) -> Self {
        Self {
            program: Some(program),
            child: None,
        }
    }

    /// Returns true while the inhibitor process is alive.
    pub fn is_holding(&mut self) -> bool {
        match self.child.as_mut().map(Child::try_wait) {
            Some(Ok(None)) => true,
            Some(_) => {
                self.child = None;
                false
            }
            None => false,
        }
    }

    fn args() -> &'static [&'static str] {
        if cfg!(target_os = "macos") {
            &["-d"]
        } else {
            &[
                "--what=idle",
                "--who=cookalong",
                "--why=Cook-along session",
                "sleep",
                "infinity",
            ]
        }
    }
}

impl KeepAwakeMedia for InhibitorProcess {
    fn play(&mut self) -> Result<(), WakeLockError> {
        if self.is_holding() {
            return Ok(());
        }
        let program = self
            .program
            .as_ref()
            .ok_or_else(|| WakeLockError::InhibitorNotFound(inhibitor_program().to_string()))?;

        let mut child = spawn_quiet(program, Self::args()).map_err(|e| {
            WakeLockError::SpawnFailed(program.display().to_string(), e.to_string())
        })?;

        // An inhibitor refused by the system exits straight away.
        match wait_with_timeout(&mut child, INHIBITOR_STARTUP_GRACE) {
            Ok(None) => {
                info!("Sleep inhibitor started (pid {})", child.id());
                self.child = Some(child);
                Ok(())
            }
            Ok(Some(status)) => Err(WakeLockError::MediaRejected(format!(
                "{} exited with {status}",
                program.display()
            ))),
            Err(e) => {
                let _ = child.kill();
                reap_in_background(child);
                Err(WakeLockError::MediaRejected(e.to_string()))
            }
        }
    }

    fn pause(&mut self) {
        if let Some(mut child) = self.child.take() {
            if let Err(e) = child.kill() {
                warn!("Failed to stop sleep inhibitor: {}", e);
            }
            debug!("Sleep inhibitor stopped");
            reap_in_background(child);
        }
    }

    fn is_active(&mut self) -> bool {
        self.is_holding()
    }
}

impl Drop for InhibitorProcess {
    fn drop(&mut self) {
        self.pause();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_inhibitor_is_rejected() {
        let mut media = InhibitorProcess::default();
        let err = media.play().unwrap_err();
        assert!(matches!(err, WakeLockError::InhibitorNotFound(_)));
        assert!(!media.is_holding());
    }

    #[test]
    fn test_unspawnable_inhibitor() {
        let mut media = InhibitorProcess {
            program: Some(PathBuf::from("/nonexistent/systemd-inhibit")),
            child: None,
        };
        assert!(matches!(
            media.play(),
            Err(WakeLockError::SpawnFailed(_, _))
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_inhibitor_that_exits_is_rejected() {
        // `false` exits 1 like an inhibitor the system refused
        let Some(program) = find_program("false") else {
            return;
        };
        let mut media = InhibitorProcess {
            program: Some(program),
            child: None,
        };

        let err = media.play().unwrap_err();
        assert!(err.is_rejection());
        assert!(!media.is_active());

        // Still retryable
        assert!(media.play().unwrap_err().is_rejection());
    }

    #[test]
    fn test_pause_without_play_is_noop() {
        let mut media = InhibitorProcess::default();
        media.pause();
        media.pause();
        assert!(!media.is_holding());
    }

    #[cfg(unix)]
    #[test]
    fn test_play_and_pause_real_child() {
        let Some(sleep) = find_program("sleep") else {
            return;
        };
        // Stand in a harmless long-running program for the inhibitor.
        let mut media = InhibitorProcess {
            program: Some(sleep),
            child: None,
        };
        media.child = Some(spawn_quiet(media.program.as_ref().unwrap(), &["30"]).unwrap());
        assert!(media.is_holding());
        assert!(media.play().is_ok());
        assert!(media.is_active());

        media.pause();
        assert!(!media.is_holding());
        assert!(!media.is_active());
    }
}
