//! Core data types for the cook-along engine.
//!
//! This module defines the data structures used for:
//! - Timer identity and status
//! - Renderable timer snapshots
//! - Session configuration with validation

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

// ============================================================================
// TimerId
// ============================================================================

/// Identifier of a timer, unique within its registry and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimerId(pub u64);

impl fmt::Display for TimerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

// ============================================================================
// TimerStatus
// ============================================================================

/// Lifecycle state of a single timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerStatus {
    /// Created or reset, never started since
    #[default]
    Idle,
    /// Counting down
    Running,
    /// Stopped mid-countdown
    Paused,
    /// Reached zero; terminal until reset
    Completed,
}

impl TimerStatus {
    /// Returns the string representation of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            TimerStatus::Idle => "idle",
            TimerStatus::Running => "running",
            TimerStatus::Paused => "paused",
            TimerStatus::Completed => "completed",
        }
    }

    /// Returns true if `start()` is accepted from this status.
    pub fn can_start(&self) -> bool {
        matches!(self, TimerStatus::Idle | TimerStatus::Paused)
    }
}

// ============================================================================
// TimerView
// ============================================================================

/// Snapshot of a timer's renderable fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimerView {
    pub id: TimerId,
    pub label: String,
    pub duration_seconds: u32,
    pub remaining_seconds: u32,
    /// `M:SS` or `H:MM:SS`
    pub formatted_remaining: String,
    pub running: bool,
    pub completed: bool,
    /// `(duration - remaining) / duration`, 0.0 for zero-length timers
    pub progress: f64,
}

// ============================================================================
// SessionConfig
// ============================================================================

/// A one-tap timer preset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuickPreset {
    pub label: String,
    pub seconds: u32,
}

impl QuickPreset {
    pub fn new(label: impl Into<String>, seconds: u32) -> Self {
        Self {
            label: label.into(),
            seconds,
        }
    }
}

/// How the wake-lock strategy is picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum WakeLockMode {
    /// Probe the platform
    #[default]
    Auto,
    /// Force the keep-awake media strategy
    Modern,
    /// Force the periodic activity strategy
    Legacy,
}

/// Longest timer a preset may define (one day).
pub const MAX_TIMER_SECONDS: u32 = 86_400;

fn default_presets() -> Vec<QuickPreset> {
    [1, 3, 5, 10, 15, 30]
        .into_iter()
        .map(|m| QuickPreset::new(format!("{m} min"), m * 60))
        .collect()
}

fn default_true() -> bool {
    true
}

fn default_notification_title() -> String {
    "Timer finished".to_string()
}

/// Configuration for a cook-along session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Quick-preset timers offered on every step
    #[serde(default = "default_presets")]
    pub presets: Vec<QuickPreset>,
    /// Start timers as soon as they are created
    #[serde(default = "default_true")]
    pub auto_start_timers: bool,
    /// Play the alert tone on completion
    #[serde(default = "default_true")]
    pub sound_enabled: bool,
    /// Title used for completion notifications
    #[serde(default = "default_notification_title")]
    pub notification_title: String,
    /// Wake-lock strategy selection
    #[serde(default)]
    pub wake_lock: WakeLockMode,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            presets: default_presets(),
            auto_start_timers: true,
            sound_enabled: true,
            notification_title: default_notification_title(),
            wake_lock: WakeLockMode::Auto,
        }
    }
}

impl SessionConfig {
    /// Sets the wake-lock mode.
    pub fn with_wake_lock(mut self, mode: WakeLockMode) -> Self {
        self.wake_lock = mode;
        self
    }

    /// Sets whether the alert tone plays.
    pub fn with_sound(mut self, enabled: bool) -> Self {
        self.sound_enabled = enabled;
        self
    }

    /// Sets whether new timers start immediately.
    pub fn with_auto_start(mut self, enabled: bool) -> Self {
        self.auto_start_timers = enabled;
        self
    }

    /// Validates the configuration.
    ///
    /// Returns an error message if validation fails.
    pub fn validate(&self) -> Result<(), String> {
        if self.notification_title.trim().is_empty() {
            return Err("notification title must not be empty".to_string());
        }
        for (index, preset) in self.presets.iter().enumerate() {
            if preset.label.trim().is_empty() {
                return Err(format!("preset {} has an empty label", index + 1));
            }
            if preset.seconds < 1 || preset.seconds > MAX_TIMER_SECONDS {
                return Err(format!(
                    "preset '{}' must be between 1 and {} seconds",
                    preset.label, MAX_TIMER_SECONDS
                ));
            }
        }
        Ok(())
    }

    /// Parses and validates a JSON configuration.
    pub fn from_json(json: &str) -> Result<Self, String> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| format!("invalid config: {e}"))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads a JSON configuration file.
    pub fn load(path: &Path) -> Result<Self, String> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
        Self::from_json(&json)
    }

    /// Default location: `<config dir>/cookalong/config.json`.
    pub fn default_path() -> Option<std::path::PathBuf> {
        dirs::config_dir().map(|dir| dir.join("cookalong").join("config.json"))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    mod timer_status_tests {
        use super::*;

        #[test]
        fn test_default_is_idle() {
            assert_eq!(TimerStatus::default(), TimerStatus::Idle);
        }

        #[test]
        fn test_as_str() {
            assert_eq!(TimerStatus::Idle.as_str(), "idle");
            assert_eq!(TimerStatus::Running.as_str(), "running");
            assert_eq!(TimerStatus::Paused.as_str(), "paused");
            assert_eq!(TimerStatus::Completed.as_str(), "completed");
        }

        #[test]
        fn test_can_start() {
            assert!(TimerStatus::Idle.can_start());
            assert!(TimerStatus::Paused.can_start());
            assert!(!TimerStatus::Running.can_start());
            assert!(!TimerStatus::Completed.can_start());
        }

        #[test]
        fn test_serialize() {
            let json = serde_json::to_string(&TimerStatus::Running).unwrap();
            assert_eq!(json, "\"running\"");
        }
    }

    mod session_config_tests {
        use super::*;

        #[test]
        fn test_default_config() {
            let config = SessionConfig::default();
            assert_eq!(config.presets.len(), 6);
            assert_eq!(config.presets[0], QuickPreset::new("1 min", 60));
            assert_eq!(config.presets[5].seconds, 1800);
            assert!(config.auto_start_timers);
            assert!(config.sound_enabled);
            assert_eq!(config.wake_lock, WakeLockMode::Auto);
            assert!(config.validate().is_ok());
        }

        #[test]
        fn test_builders() {
            let config = SessionConfig::default()
                .with_wake_lock(WakeLockMode::Legacy)
                .with_sound(false)
                .with_auto_start(false);
            assert_eq!(config.wake_lock, WakeLockMode::Legacy);
            assert!(!config.sound_enabled);
            assert!(!config.auto_start_timers);
        }

        #[test]
        fn test_validate_rejects_empty_title() {
            let config = SessionConfig {
                notification_title: "  ".to_string(),
                ..SessionConfig::default()
            };
            assert!(config.validate().is_err());
        }

        #[test]
        fn test_validate_rejects_bad_presets() {
            let config = SessionConfig {
                presets: vec![QuickPreset::new("", 60)],
                ..SessionConfig::default()
            };
            assert!(config.validate().unwrap_err().contains("empty label"));

            let config = SessionConfig {
                presets: vec![QuickPreset::new("Never", 0)],
                ..SessionConfig::default()
            };
            assert!(config.validate().unwrap_err().contains("Never"));

            let config = SessionConfig {
                presets: vec![QuickPreset::new("Forever", MAX_TIMER_SECONDS + 1)],
                ..SessionConfig::default()
            };
            assert!(config.validate().is_err());
        }

        #[test]
        fn test_from_json_fills_defaults() {
            let config = SessionConfig::from_json(r#"{"wake_lock": "legacy"}"#).unwrap();
            assert_eq!(config.wake_lock, WakeLockMode::Legacy);
            assert_eq!(config.presets, SessionConfig::default().presets);
            assert!(config.sound_enabled);
        }

        #[test]
        fn test_from_json_rejects_invalid() {
            assert!(SessionConfig::from_json("not json").is_err());
            assert!(SessionConfig::from_json(r#"{"notification_title": ""}"#).is_err());
        }

        #[test]
        fn test_load_from_file() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("config.json");
            std::fs::write(
                &path,
                r#"{"presets": [{"label": "Eggs", "seconds": 420}], "sound_enabled": false}"#,
            )
            .unwrap();

            let config = SessionConfig::load(&path).unwrap();
            assert_eq!(config.presets, vec![QuickPreset::new("Eggs", 420)]);
            assert!(!config.sound_enabled);
        }

        #[test]
        fn test_load_missing_file() {
            let err = SessionConfig::load(Path::new("/nonexistent/cookalong.json")).unwrap_err();
            assert!(err.contains("cannot read"));
        }
    }
}
