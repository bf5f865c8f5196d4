//! A single countdown timer.
//!
//! State machine:
//!
//! ```text
//!        start           tick (remaining == 0)
//! Idle ─────────▶ Running ────────────────────▶ Completed
//!   ▲   ◀──────── │  ▲                             │
//!   │    pause    ▼  │ start                       │
//!   │           Paused                             │
//!   └──────────────── reset (any state) ◀──────────┘
//! ```
//!
//! A running timer owns exactly one repeating task in the session's
//! scheduler. Pausing, resetting or completing cancels it, so a stale
//! firing can never reach the timer.

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::notification::NotificationDispatcher;
use crate::parser::format_clock;
use crate::scheduler::{Scheduler, TaskId, TICK_PERIOD};
use crate::sound::AudioAlertEngine;
use crate::types::{TimerId, TimerStatus, TimerView};

/// The side effects a completing timer triggers.
pub struct CompletionAlerts<'a> {
    pub audio: &'a mut AudioAlertEngine,
    pub notifier: &'a mut NotificationDispatcher,
}

/// Result of delivering a scheduler firing to a timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Not running, or the task is not this timer's
    Ignored,
    /// Counted down one second
    Ticked { remaining: u32 },
    /// Reached zero on this tick
    Completed,
}

/// One countdown.
#[derive(Debug)]
pub struct Timer {
    id: TimerId,
    label: String,
    duration: u32,
    remaining: u32,
    status: TimerStatus,
    schedule: Option<TaskId>,
    on_complete: Option<mpsc::UnboundedSender<TimerView>>,
}

impl Timer {
    pub(crate) fn new(id: TimerId, label: String, duration: u32) -> Self {
        Self {
            id,
            label,
            duration,
            remaining: duration,
            status: TimerStatus::Idle,
            schedule: None,
            on_complete: None,
        }
    }

    #[must_use]
    pub fn id(&self) -> TimerId {
        self.id
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Total length in seconds.
    #[must_use]
    pub fn duration(&self) -> u32 {
        self.duration
    }

    /// Seconds left.
    #[must_use]
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    #[must_use]
    pub fn status(&self) -> TimerStatus {
        self.status
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.status == TimerStatus::Running
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.status == TimerStatus::Completed
    }

    /// The active countdown task, if running.
    #[must_use]
    pub fn schedule(&self) -> Option<TaskId> {
        self.schedule
    }

    /// Fraction of the duration already elapsed.
    #[must_use]
    pub fn progress(&self) -> f64 {
        if self.duration == 0 {
            return 0.0;
        }
        f64::from(self.duration - self.remaining) / f64::from(self.duration)
    }

    #[must_use]
    pub fn view(&self) -> TimerView {
        TimerView {
            id: self.id,
            label: self.label.clone(),
            duration_seconds: self.duration,
            remaining_seconds: self.remaining,
            formatted_remaining: format_clock(self.remaining),
            running: self.is_running(),
            completed: self.is_completed(),
            progress: self.progress(),
        }
    }

    /// Starts or resumes the countdown.
    ///
    /// Returns false without side effects if already running or if nothing
    /// is left to count (reset first).
    pub fn start(&mut self, scheduler: &mut dyn Scheduler) -> bool {
        if !self.status.can_start() || self.remaining == 0 {
            return false;
        }
        let task = scheduler.schedule_repeating(TICK_PERIOD);
        self.schedule = Some(task);
        self.status = TimerStatus::Running;
        debug!("Timer {} started ({}s left, {})", self.id, self.remaining, task);
        true
    }

    /// Stops the countdown, keeping the remaining time. Only a running
    /// timer can be paused.
    pub fn pause(&mut self, scheduler: &mut dyn Scheduler) -> bool {
        if !self.is_running() {
            return false;
        }
        self.cancel_schedule(scheduler);
        self.status = TimerStatus::Paused;
        debug!("Timer {} paused ({}s left)", self.id, self.remaining);
        true
    }

    /// Pauses a running timer, otherwise starts it. Returns true if the
    /// timer is running afterwards.
    pub fn toggle(&mut self, scheduler: &mut dyn Scheduler) -> bool {
        if self.is_running() {
            self.pause(scheduler);
        } else {
            self.start(scheduler);
        }
        self.is_running()
    }

    /// Restores the full duration and returns to Idle from any state.
    pub fn reset(&mut self, scheduler: &mut dyn Scheduler) {
        self.cancel_schedule(scheduler);
        self.remaining = self.duration;
        self.status = TimerStatus::Idle;
        debug!("Timer {} reset to {}s", self.id, self.duration);
    }

    /// Handles one firing of `task`.
    ///
    /// On the tick that reaches zero the completion sequence runs once, in
    /// order: alert tone, notification, completion subscriber.
    pub fn tick(
        &mut self,
        task: TaskId,
        scheduler: &mut dyn Scheduler,
        alerts: &mut CompletionAlerts<'_>,
    ) -> TickOutcome {
        if !self.is_running() || self.schedule != Some(task) {
            return TickOutcome::Ignored;
        }

        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining > 0 {
            return TickOutcome::Ticked {
                remaining: self.remaining,
            };
        }

        self.cancel_schedule(scheduler);
        self.status = TimerStatus::Completed;
        info!("Timer {} ({}) completed", self.id, self.label);

        alerts.audio.alert();
        alerts.notifier.notify(&self.label);
        if let Some(tx) = &self.on_complete {
            if tx.send(self.view()).is_err() {
                debug!("Completion subscriber of timer {} is gone", self.id);
            }
        }
        TickOutcome::Completed
    }

    /// Registers the completion subscriber, replacing any previous one.
    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<TimerView> {
        let (tx, rx) = mpsc::unbounded_channel();
        if self.on_complete.replace(tx).is_some() {
            debug!("Timer {} completion subscriber replaced", self.id);
        }
        rx
    }

    /// Drops the completion subscriber.
    pub fn unsubscribe(&mut self) {
        self.on_complete = None;
    }

    fn cancel_schedule(&mut self, scheduler: &mut dyn Scheduler) {
        if let Some(task) = self.schedule.take() {
            scheduler.cancel(task);
        }
    }
}
