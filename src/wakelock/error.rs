//! Wake-lock error types.
//!
//! Losing the wake lock only means the screen may dim, so every error here
//! is recoverable and the session carries on.

use thiserror::Error;

/// Errors that can occur while keeping the device awake.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WakeLockError {
    /// The keep-awake media refused to start playing.
    #[error("keep-awake playback was rejected: {0}")]
    MediaRejected(String),

    /// No sleep inhibitor exists on this system.
    #[error("no sleep inhibitor found (looked for {0})")]
    InhibitorNotFound(String),

    /// A helper process could not be started.
    #[error("failed to start '{0}': {1}")]
    SpawnFailed(String, String),

    /// The activity simulation could not run.
    #[error("activity simulation failed: {0}")]
    ActivityFailed(String),
}

impl WakeLockError {
    /// Returns true if playback was refused, which a later gesture may fix.
    #[must_use]
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::MediaRejected(_))
    }

    /// Returns a user-friendly suggestion for resolving this error.
    #[must_use]
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::MediaRejected(_) => "Interact with the session again to retry",
            Self::InhibitorNotFound(_) => {
                "Install systemd-inhibit (Linux) or use --wake-lock legacy"
            }
            Self::SpawnFailed(_, _) => "Check that the helper program is executable",
            Self::ActivityFailed(_) => "Install xdg-utils to provide xdg-screensaver",
        }
    }
}
