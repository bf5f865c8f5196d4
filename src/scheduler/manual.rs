//! Virtual-time scheduler.

use std::time::Duration;

use super::{Scheduler, TaskId, TaskTable};

/// A scheduler whose clock only moves when told to.
///
/// Used by tests and by anything that wants to replay a session
/// deterministically. Moving the clock does not dispatch anything; the
/// owner of the scheduler drains due tasks with [`Scheduler::pop_due`].
#[derive(Debug, Default)]
pub struct ManualScheduler {
    now: Duration,
    table: TaskTable,
}

impl ManualScheduler {
    /// Creates a scheduler at virtual time zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves the clock forward by `by`.
    pub fn advance(&mut self, by: Duration) {
        self.now += by;
    }

    /// Moves the clock to `now`. The clock never goes backwards.
    pub fn set_now(&mut self, now: Duration) {
        self.now = self.now.max(now);
    }
}

impl Scheduler for ManualScheduler {
    fn now(&self) -> Duration {
        self.now
    }

    fn schedule_repeating(&mut self, period: Duration) -> TaskId {
        self.table.insert(self.now, period)
    }

    fn cancel(&mut self, task: TaskId) -> bool {
        self.table.remove(task)
    }

    fn is_scheduled(&self, task: TaskId) -> bool {
        self.table.contains(task)
    }

    fn scheduled_count(&self) -> usize {
        self.table.len()
    }

    fn next_deadline(&self) -> Option<Duration> {
        self.table.next_deadline()
    }

    fn pop_due(&mut self, until: Duration) -> Option<TaskId> {
        self.table.pop_due(until)
    }
}
