//! Events emitted by a cook-along session for display collaborators.

use crate::parser::DetectedDuration;
use crate::types::{TimerId, TimerView};
use crate::wakelock::StrategyKind;

/// Something a renderer may want to show.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// The session began
    Started {
        strategy: StrategyKind,
    },
    /// The current step changed (or was shown for the first time)
    StepChanged {
        index: usize,
        total: usize,
        text: String,
        suggestions: Vec<DetectedDuration>,
    },
    TimerCreated(TimerView),
    /// Started, resumed or paused
    TimerUpdated(TimerView),
    TimerTicked(TimerView),
    TimerCompleted(TimerView),
    TimerReset(TimerView),
    TimerRemoved {
        id: TimerId,
        label: String,
    },
    /// A gesture changed the unlock state
    Unlocked {
        audio: bool,
        wake_lock: bool,
    },
    Ended,
}
