//! Display utilities for the cook-along CLI.
//!
//! This module renders:
//! - Session events as one-line messages
//! - The timer list with progress bars
//! - Detected durations for the `detect` command

use crate::parser::{format_duration, DetectedDuration};
use crate::session::SessionEvent;
use crate::types::{QuickPreset, TimerView};

const BAR_WIDTH: usize = 20;

// ============================================================================
// Display
// ============================================================================

/// Display utilities for CLI output.
pub struct Display;

impl Display {
    /// Renders an event, or `None` for events too frequent to print.
    #[must_use]
    pub fn render_event(event: &SessionEvent) -> Option<String> {
        let line = match event {
            SessionEvent::Started { strategy } => {
                format!("Cook-along started (wake lock: {strategy})")
            }
            SessionEvent::StepChanged {
                index,
                total,
                text,
                suggestions,
            } => Self::render_step(*index, *total, text, suggestions),
            SessionEvent::TimerCreated(view) => {
                format!("+ #{} {} ({})", view.id, view.label, format_duration(view.duration_seconds))
            }
            SessionEvent::TimerUpdated(view) => {
                let state = if view.running { "running" } else { "paused" };
                format!("  #{} {} {} at {}", view.id, view.label, state, view.formatted_remaining)
            }
            SessionEvent::TimerTicked(_) => return None,
            SessionEvent::TimerCompleted(view) => format!("* #{} {} is done!", view.id, view.label),
            SessionEvent::TimerReset(view) => {
                format!("  #{} {} reset to {}", view.id, view.label, view.formatted_remaining)
            }
            SessionEvent::TimerRemoved { id, label } => format!("- #{id} {label} removed"),
            SessionEvent::Unlocked { audio, wake_lock } => format!(
                "  sound {}, screen {}",
                if *audio { "ready" } else { "unavailable" },
                if *wake_lock { "kept awake" } else { "may sleep" }
            ),
            SessionEvent::Ended => "Session ended".to_string(),
        };
        Some(line)
    }

    /// Renders a step header with its suggested timers.
    #[must_use]
    pub fn render_step(
        index: usize,
        total: usize,
        text: &str,
        suggestions: &[DetectedDuration],
    ) -> String {
        if total == 0 {
            return "No steps".to_string();
        }
        let mut out = format!("Step {}/{}: {}", index + 1, total, text);
        if !suggestions.is_empty() {
            let offers: Vec<String> = suggestions
                .iter()
                .enumerate()
                .map(|(i, d)| format!("[{}] {}", i + 1, format_duration(d.seconds)))
                .collect();
            out.push_str("\n  Timers: ");
            out.push_str(&offers.join("  "));
            out.push_str("  (add N)");
        }
        out
    }

    /// Renders the quick presets on one line.
    #[must_use]
    pub fn render_presets(presets: &[QuickPreset]) -> String {
        let items: Vec<String> = presets
            .iter()
            .enumerate()
            .map(|(i, p)| format!("[{}] {}", i + 1, p.label))
            .collect();
        format!("Presets: {}  (preset N)", items.join("  "))
    }

    /// Renders every timer on its own line.
    #[must_use]
    pub fn render_timers(views: &[TimerView]) -> String {
        if views.is_empty() {
            return "No timers".to_string();
        }
        views
            .iter()
            .map(|v| {
                let state = if v.completed {
                    "done"
                } else if v.running {
                    "running"
                } else {
                    "paused"
                };
                format!(
                    "#{:<3} {:>8} {} {:<7} {}",
                    v.id,
                    v.formatted_remaining,
                    Self::progress_bar(v.progress),
                    state,
                    v.label
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Renders detected durations, one per line.
    #[must_use]
    pub fn render_detected(found: &[DetectedDuration]) -> String {
        if found.is_empty() {
            return "No durations found".to_string();
        }
        found
            .iter()
            .map(|d| {
                format!(
                    "{:>6}s  {:<8} \"{}\"",
                    d.seconds,
                    format_duration(d.seconds),
                    d.origin_token
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Shows an error message.
    pub fn show_error(message: &str) {
        eprintln!("Error: {}", message);
    }

    /// Renders a fixed-width progress bar.
    fn progress_bar(progress: f64) -> String {
        let filled = ((progress.clamp(0.0, 1.0) * BAR_WIDTH as f64).round() as usize).min(BAR_WIDTH);
        format!("[{}{}]", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled))
    }
}

// ============================================================================
// Tests
// ============================================================================
