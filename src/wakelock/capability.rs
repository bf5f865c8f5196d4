//! Platform capability detection.

use tracing::debug;

use crate::platform::find_program;
use crate::types::WakeLockMode;

/// Name of the program that holds a modern sleep inhibitor on this OS.
#[must_use]
pub fn inhibitor_program() -> &'static str {
    if cfg!(target_os = "macos") {
        "caffeinate"
    } else {
        "systemd-inhibit"
    }
}

/// Answers what the host platform can do.
pub trait PlatformCapabilities {
    /// Returns true if a real wake-lock primitive is available.
    fn supports_modern_wake_lock(&self) -> bool;
}

/// Capabilities fixed up front.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaticCapabilities {
    pub modern_wake_lock: bool,
}

impl StaticCapabilities {
    #[must_use]
    pub fn modern() -> Self {
        Self {
            modern_wake_lock: true,
        }
    }

    #[must_use]
    pub fn legacy() -> Self {
        Self {
            modern_wake_lock: false,
        }
    }

    /// Resolves a configured mode, probing the system for `Auto`.
    #[must_use]
    pub fn for_mode(mode: WakeLockMode) -> Self {
        match mode {
            WakeLockMode::Modern => Self::modern(),
            WakeLockMode::Legacy => Self::legacy(),
            WakeLockMode::Auto => Self {
                modern_wake_lock: DetectedCapabilities.supports_modern_wake_lock(),
            },
        }
    }
}

impl PlatformCapabilities for StaticCapabilities {
    fn supports_modern_wake_lock(&self) -> bool {
        self.modern_wake_lock
    }
}

/// Probes `PATH` for the platform's sleep inhibitor.
#[derive(Debug, Clone, Copy, Default)]
pub struct DetectedCapabilities;

impl PlatformCapabilities for DetectedCapabilities {
    fn supports_modern_wake_lock(&self) -> bool {
        let found = find_program(inhibitor_program()).is_some();
        debug!("{} available: {}", inhibitor_program(), found);
        found
    }
}
