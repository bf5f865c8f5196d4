//! The set of live timers in a session.

use tracing::debug;

use super::timer::{CompletionAlerts, TickOutcome, Timer};
use crate::scheduler::{Scheduler, TaskId};
use crate::types::{TimerId, TimerView};

/// Owns every timer of a session, in creation order.
#[derive(Debug, Default)]
pub struct TimerRegistry {
    timers: Vec<Timer>,
    last_id: u64,
}

impl TimerRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an idle timer with a fresh id.
    pub fn create(&mut self, label: impl Into<String>, duration: u32) -> &mut Timer {
        self.last_id += 1;
        let timer = Timer::new(TimerId(self.last_id), label.into(), duration);
        debug!("Timer {} created: {} ({}s)", timer.id(), timer.label(), duration);

        let index = self.timers.len();
        self.timers.push(timer);
        &mut self.timers[index]
    }

    /// Pauses and detaches a timer. The removed timer never ticks again.
    pub fn remove(&mut self, id: TimerId, scheduler: &mut dyn Scheduler) -> Option<Timer> {
        let index = self.position(id)?;
        self.timers[index].pause(scheduler);
        let timer = self.timers.remove(index);
        debug!("Timer {} removed", id);
        Some(timer)
    }

    #[must_use]
    pub fn get(&self, id: TimerId) -> Option<&Timer> {
        self.timers.iter().find(|t| t.id() == id)
    }

    pub fn get_mut(&mut self, id: TimerId) -> Option<&mut Timer> {
        self.timers.iter_mut().find(|t| t.id() == id)
    }

    /// All timers, oldest first.
    #[must_use]
    pub fn get_all(&self) -> &[Timer] {
        &self.timers
    }

    #[must_use]
    pub fn views(&self) -> Vec<TimerView> {
        self.timers.iter().map(Timer::view).collect()
    }

    #[must_use]
    pub fn running_count(&self) -> usize {
        self.timers.iter().filter(|t| t.is_running()).count()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.timers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    /// Pauses every timer, then forgets them all.
    pub fn clear(&mut self, scheduler: &mut dyn Scheduler) {
        for timer in &mut self.timers {
            timer.pause(scheduler);
        }
        if !self.timers.is_empty() {
            debug!("Cleared {} timers", self.timers.len());
        }
        self.timers.clear();
    }

    /// Starts a timer. Unknown ids are ignored.
    pub fn start(&mut self, id: TimerId, scheduler: &mut dyn Scheduler) -> bool {
        self.get_mut(id).is_some_and(|t| t.start(scheduler))
    }

    /// Pauses a timer. Unknown ids are ignored.
    pub fn pause(&mut self, id: TimerId, scheduler: &mut dyn Scheduler) -> bool {
        self.get_mut(id).is_some_and(|t| t.pause(scheduler))
    }

    /// Toggles a timer. Returns true if it is running afterwards.
    pub fn toggle(&mut self, id: TimerId, scheduler: &mut dyn Scheduler) -> bool {
        self.get_mut(id).is_some_and(|t| t.toggle(scheduler))
    }

    /// Resets a timer. Returns false for unknown ids.
    pub fn reset(&mut self, id: TimerId, scheduler: &mut dyn Scheduler) -> bool {
        match self.get_mut(id) {
            Some(timer) => {
                timer.reset(scheduler);
                true
            }
            None => false,
        }
    }

    /// Returns true if `task` is some timer's countdown.
    #[must_use]
    pub fn owns_task(&self, task: TaskId) -> bool {
        self.timers.iter().any(|t| t.schedule() == Some(task))
    }

    /// Delivers a firing to the timer that owns `task`.
    pub fn tick_task(
        &mut self,
        task: TaskId,
        scheduler: &mut dyn Scheduler,
        alerts: &mut CompletionAlerts<'_>,
    ) -> Option<(TimerId, TickOutcome)> {
        let timer = self
            .timers
            .iter_mut()
            .find(|t| t.schedule() == Some(task))?;
        Some((timer.id(), timer.tick(task, scheduler, alerts)))
    }

    fn position(&self, id: TimerId) -> Option<usize> {
        self.timers.iter().position(|t| t.id() == id)
    }
}
