//! Legacy wake lock: periodic activity simulation.
//!
//! Hosts without a wake-lock primitive reset their idle timer whenever
//! the page starts navigating. The legacy strategy starts a same-page
//! navigation and cancels it straight away. Here the "navigation" is a
//! short-lived screensaver reset command.

use std::path::PathBuf;
use std::process::Child;

use tracing::debug;

use super::error::WakeLockError;
use crate::platform::{find_program, reap_in_background, spawn_quiet};

/// The environment the legacy strategy simulates activity in.
pub trait ActivityHost {
    /// Returns true if the session is not visible; no activity is simulated then.
    fn is_hidden(&self) -> bool;

    /// Begins the activity that resets the idle timer.
    ///
    /// # Errors
    ///
    /// Returns an error if the activity could not be started.
    fn begin_navigation(&mut self) -> Result<(), WakeLockError>;

    /// Cancels the activity started by `begin_navigation`.
    fn cancel_navigation(&mut self);
}

/// Resets the screensaver idle timer with a short command.
///
/// - Linux: `xdg-screensaver reset`
/// - macOS: `caffeinate -u -t 1`
#[derive(Debug, Default)]
pub struct ScreensaverPoke {
    program: Option<PathBuf>,
    pending: Option<Child>,
}

impl ScreensaverPoke {
    #[must_use]
    pub fn detect() -> Self {
        Self {
            program: find_program(Self::program_name()),
            pending: None,
        }
    }

    fn program_name() -> &'static str {
        if cfg!(target_os = "macos") {
            "caffeinate"
        } else {
            "xdg-screensaver"
        }
    }

    fn args() -> &'static [&'static str] {
        if cfg!(target_os = "macos") {
            &["-u", "-t", "1"]
        } else {
            &["reset"]
        }
    }
}

impl ActivityHost for ScreensaverPoke {
    fn is_hidden(&self) -> bool {
        false
    }

    fn begin_navigation(&mut self) -> Result<(), WakeLockError> {
        let program = self.program.as_ref().ok_or_else(|| {
            WakeLockError::ActivityFailed(format!("{} not found", Self::program_name()))
        })?;
        let child = spawn_quiet(program, Self::args()).map_err(|e| {
            WakeLockError::SpawnFailed(program.display().to_string(), e.to_string())
        })?;
        self.pending = Some(child);
        Ok(())
    }

    fn cancel_navigation(&mut self) {
        if let Some(mut child) = self.pending.take() {
            match child.try_wait() {
                Ok(Some(_)) => debug!("Screensaver reset finished"),
                _ => reap_in_background(child),
            }
        }
    }
}
