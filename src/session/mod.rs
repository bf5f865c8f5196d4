//! The guided cook-along session.
//!
//! [`PlaySessionController`] ties everything together: it walks through
//! recipe steps, offers timers for the durations mentioned in each step,
//! owns the timers, and keeps audio and the wake lock unlocked from user
//! gestures. It is also the only place that dispatches scheduler tasks.
//!
//! ```text
//!                  ┌───────────────────────┐
//!   gestures ────▶ │ PlaySessionController │ ────▶ SessionEvent stream
//!   commands ────▶ │                       │
//!                  └──┬──────┬──────┬───┬──┘
//!                     │      │      │   │
//!          ┌──────────┘      │      │   └───────────┐
//!          ▼                 ▼      ▼               ▼
//!   TimerRegistry   AudioAlertEngine  Notification  WakeLockController
//!          │                          Dispatcher    │
//!          └──────────── Scheduler ◀────────────────┘
//! ```

mod command;
mod event;
mod runtime;

use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::engine::{CompletionAlerts, TickOutcome, Timer, TimerRegistry};
use crate::gesture::UserGesture;
use crate::notification::NotificationDispatcher;
use crate::parser::{self, DetectedDuration};
use crate::scheduler::{ManualScheduler, Scheduler, TaskId, TokioScheduler};
use crate::sound::AudioAlertEngine;
use crate::types::{QuickPreset, SessionConfig, TimerId, TimerView};
use crate::wakelock::WakeLockController;

pub use command::{CommandError, SessionCommand};
pub use event::SessionEvent;
pub use runtime::{production_components, run};

/// The platform-facing parts a session drives.
#[derive(Debug)]
pub struct SessionComponents {
    pub audio: AudioAlertEngine,
    pub notifier: NotificationDispatcher,
    pub wake_lock: WakeLockController,
}

/// Controls one guided cooking session.
pub struct PlaySessionController<S: Scheduler> {
    config: SessionConfig,
    steps: Vec<String>,
    current_step: usize,
    suggestions: Vec<DetectedDuration>,
    registry: TimerRegistry,
    audio: AudioAlertEngine,
    notifier: NotificationDispatcher,
    wake_lock: WakeLockController,
    scheduler: S,
    started: bool,
    ended: bool,
    events: Option<mpsc::UnboundedSender<SessionEvent>>,
}

impl<S: Scheduler> PlaySessionController<S> {
    pub fn new(
        config: SessionConfig,
        steps: Vec<String>,
        scheduler: S,
        components: SessionComponents,
    ) -> Self {
        let SessionComponents {
            mut audio,
            notifier,
            wake_lock,
        } = components;
        audio.set_muted(!config.sound_enabled);

        let suggestions = steps.first().map(|s| parser::detect(s)).unwrap_or_default();
        Self {
            config,
            steps,
            current_step: 0,
            suggestions,
            registry: TimerRegistry::new(),
            audio,
            notifier,
            wake_lock,
            scheduler,
            started: false,
            ended: false,
            events: None,
        }
    }

    // ------------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------------

    /// Begins the session: asks for notification permission, requests the
    /// wake lock and starts accepting gestures. Only the first call acts.
    pub fn start(&mut self) {
        if self.started || self.ended {
            return;
        }
        self.started = true;

        self.notifier.request_permission();
        self.wake_lock.enable(&mut self.scheduler);
        info!(
            "Cook-along session started ({} steps, {} wake lock)",
            self.steps.len(),
            self.wake_lock.strategy()
        );

        self.emit(SessionEvent::Started {
            strategy: self.wake_lock.strategy(),
        });
        self.refresh_step();
    }

    /// Tears the session down: every timer is cleared and the wake lock
    /// released. Safe to call more than once.
    pub fn end(&mut self) {
        if self.ended {
            return;
        }
        self.ended = true;

        self.registry.clear(&mut self.scheduler);
        self.wake_lock.disable(&mut self.scheduler);
        info!("Cook-along session ended");
        self.emit(SessionEvent::Ended);
    }

    #[must_use]
    pub fn is_started(&self) -> bool {
        self.started
    }

    #[must_use]
    pub fn is_ended(&self) -> bool {
        self.ended
    }

    /// Opens the event stream, replacing any previous subscriber.
    pub fn subscribe_events(&mut self) -> mpsc::UnboundedReceiver<SessionEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.events = Some(tx);
        rx
    }

    /// Unlocks audio and the wake lock from a user interaction.
    ///
    /// Cheap and safe on every gesture; ignored before `start()` and after
    /// `end()`.
    pub fn handle_gesture(&mut self, gesture: &UserGesture) {
        if !self.started || self.ended {
            return;
        }
        let before = (self.audio.is_unlocked(), self.wake_lock.is_enabled());
        let audio = self.audio.unlock(gesture);
        let wake_lock = self.wake_lock.unlock(gesture);
        if (audio, wake_lock) != before {
            self.emit(SessionEvent::Unlocked { audio, wake_lock });
        }
    }

    // ------------------------------------------------------------------------
    // Steps
    // ------------------------------------------------------------------------

    #[must_use]
    pub fn current_step(&self) -> usize {
        self.current_step
    }

    #[must_use]
    pub fn current_step_text(&self) -> Option<&str> {
        self.steps.get(self.current_step).map(String::as_str)
    }

    #[must_use]
    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    /// Durations detected in the current step.
    #[must_use]
    pub fn suggestions(&self) -> &[DetectedDuration] {
        &self.suggestions
    }

    #[must_use]
    pub fn presets(&self) -> &[QuickPreset] {
        &self.config.presets
    }

    /// Moves to step `index`. Returns false if it does not exist.
    pub fn set_step(&mut self, index: usize) -> bool {
        if index >= self.steps.len() {
            return false;
        }
        self.current_step = index;
        self.refresh_step();
        true
    }

    pub fn next_step(&mut self) -> bool {
        self.set_step(self.current_step + 1)
    }

    pub fn previous_step(&mut self) -> bool {
        match self.current_step.checked_sub(1) {
            Some(index) => self.set_step(index),
            None => false,
        }
    }

    // ------------------------------------------------------------------------
    // Timer creation
    // ------------------------------------------------------------------------

    /// Creates a timer from quick preset `index`.
    pub fn add_preset_timer(&mut self, index: usize) -> Option<TimerId> {
        let preset = self.config.presets.get(index)?.clone();
        self.add_timer(preset.label, preset.seconds)
    }

    /// Creates a timer from detected duration `index` of the current step.
    pub fn add_suggested_timer(&mut self, index: usize) -> Option<TimerId> {
        let seconds = self.suggestions.get(index)?.seconds;
        let label = format!(
            "Step {} · {}",
            self.current_step + 1,
            parser::format_duration(seconds)
        );
        self.add_timer(label, seconds)
    }

    /// Creates a timer, starting it when `auto_start_timers` is set.
    /// Returns `None` once the session has ended.
    pub fn add_timer(&mut self, label: impl Into<String>, seconds: u32) -> Option<TimerId> {
        if self.ended {
            debug!("Session ended, not creating a timer");
            return None;
        }
        let view = self.registry.create(label, seconds).view();
        let id = view.id;
        self.emit(SessionEvent::TimerCreated(view));
        if self.config.auto_start_timers {
            self.start_timer(id);
        }
        Some(id)
    }

    // ------------------------------------------------------------------------
    // Timer control
    // ------------------------------------------------------------------------

    pub fn start_timer(&mut self, id: TimerId) -> bool {
        if self.ended {
            return false;
        }
        let started = self.registry.start(id, &mut self.scheduler);
        if started {
            self.emit_update(id);
        }
        started
    }

    pub fn pause_timer(&mut self, id: TimerId) -> bool {
        let paused = self.registry.pause(id, &mut self.scheduler);
        if paused {
            self.emit_update(id);
        }
        paused
    }

    /// Returns true if the timer is running afterwards.
    pub fn toggle_timer(&mut self, id: TimerId) -> bool {
        if self.ended || self.registry.get(id).is_none() {
            return false;
        }
        let running = self.registry.toggle(id, &mut self.scheduler);
        self.emit_update(id);
        running
    }

    pub fn reset_timer(&mut self, id: TimerId) -> bool {
        if !self.registry.reset(id, &mut self.scheduler) {
            return false;
        }
        if let Some(timer) = self.registry.get(id) {
            let view = timer.view();
            self.emit(SessionEvent::TimerReset(view));
        }
        true
    }

    pub fn remove_timer(&mut self, id: TimerId) -> bool {
        match self.registry.remove(id, &mut self.scheduler) {
            Some(timer) => {
                self.emit(SessionEvent::TimerRemoved {
                    id,
                    label: timer.label().to_string(),
                });
                true
            }
            None => false,
        }
    }

    /// Subscribes to one timer's completion, replacing its previous
    /// subscriber.
    pub fn subscribe_completion(
        &mut self,
        id: TimerId,
    ) -> Option<mpsc::UnboundedReceiver<TimerView>> {
        self.registry.get_mut(id).map(Timer::subscribe)
    }

    #[must_use]
    pub fn timer(&self, id: TimerId) -> Option<&Timer> {
        self.registry.get(id)
    }

    #[must_use]
    pub fn timers(&self) -> &[Timer] {
        self.registry.get_all()
    }

    #[must_use]
    pub fn views(&self) -> Vec<TimerView> {
        self.registry.views()
    }

    #[must_use]
    pub fn timer_count(&self) -> usize {
        self.registry.len()
    }

    #[must_use]
    pub fn running_count(&self) -> usize {
        self.registry.running_count()
    }

    #[must_use]
    pub fn audio(&self) -> &AudioAlertEngine {
        &self.audio
    }

    #[must_use]
    pub fn wake_lock(&self) -> &WakeLockController {
        &self.wake_lock
    }

    #[must_use]
    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    // ------------------------------------------------------------------------
    // Dispatch
    // ------------------------------------------------------------------------

    /// Runs every scheduler task whose deadline has passed. Returns the
    /// number of firings dispatched.
    pub fn process_due(&mut self) -> usize {
        let now = self.scheduler.now();
        let mut fired = 0;
        while let Some(task) = self.scheduler.pop_due(now) {
            self.dispatch(task);
            fired += 1;
        }
        fired
    }

    fn dispatch(&mut self, task: TaskId) {
        if self.wake_lock.owns_task(task) {
            self.wake_lock.reassert();
            return;
        }

        let mut alerts = CompletionAlerts {
            audio: &mut self.audio,
            notifier: &mut self.notifier,
        };
        match self
            .registry
            .tick_task(task, &mut self.scheduler, &mut alerts)
        {
            Some((id, TickOutcome::Ticked { .. })) => {
                if let Some(timer) = self.registry.get(id) {
                    let view = timer.view();
                    self.emit(SessionEvent::TimerTicked(view));
                }
            }
            Some((id, TickOutcome::Completed)) => {
                if let Some(timer) = self.registry.get(id) {
                    let view = timer.view();
                    self.emit(SessionEvent::TimerCompleted(view));
                }
            }
            Some((_, TickOutcome::Ignored)) => {}
            None => {
                debug!("{} has no owner, cancelling", task);
                self.scheduler.cancel(task);
            }
        }
    }

    fn refresh_step(&mut self) {
        let text = self.current_step_text().unwrap_or_default().to_string();
        self.suggestions = parser::detect(&text);
        debug!(
            "Step {} has {} suggested timers",
            self.current_step + 1,
            self.suggestions.len()
        );
        self.emit(SessionEvent::StepChanged {
            index: self.current_step,
            total: self.steps.len(),
            text,
            suggestions: self.suggestions.clone(),
        });
    }

    fn emit_update(&mut self, id: TimerId) {
        if let Some(timer) = self.registry.get(id) {
            let view = timer.view();
            self.emit(SessionEvent::TimerUpdated(view));
        }
    }

    fn emit(&mut self, event: SessionEvent) {
        if let Some(tx) = &self.events {
            if tx.send(event).is_err() {
                self.events = None;
            }
        }
    }
}

impl PlaySessionController<ManualScheduler> {
    /// Moves virtual time forward, dispatching every firing on the way in
    /// deadline order.
    pub fn advance(&mut self, by: Duration) -> usize {
        let target = self.scheduler.now() + by;
        let mut fired = 0;
        while let Some(deadline) = self.scheduler.next_deadline() {
            if deadline > target {
                break;
            }
            self.scheduler.set_now(deadline);
            fired += self.process_due();
        }
        self.scheduler.set_now(target);
        fired
    }
}

impl PlaySessionController<TokioScheduler> {
    /// When the runtime should next call `process_due()`.
    #[must_use]
    pub fn next_wakeup(&self) -> Option<tokio::time::Instant> {
        self.scheduler.deadline_instant()
    }
}

impl<S: Scheduler> Drop for PlaySessionController<S> {
    fn drop(&mut self) {
        self.end();
    }
}

impl<S: Scheduler> std::fmt::Debug for PlaySessionController<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaySessionController")
            .field("current_step", &self.current_step)
            .field("steps", &self.steps.len())
            .field("timers", &self.registry.len())
            .field("wake_lock", &self.wake_lock)
            .field("started", &self.started)
            .field("ended", &self.ended)
            .finish_non_exhaustive()
    }
}
