//! Repeating task scheduling for the cook-along engine.
//!
//! Every periodic callback in a session (timer ticks, the legacy wake-lock
//! reassertion) is a task registered with a [`Scheduler`]. The scheduler
//! only keeps deadlines; the session pulls due tasks with
//! [`Scheduler::pop_due`] and dispatches them to their owners. Cancelling a
//! task removes it from the table, so a cancelled task can never be handed
//! out again.
//!
//! Two implementations exist:
//!
//! - [`ManualScheduler`]: virtual time advanced explicitly (tests)
//! - [`TokioScheduler`]: time measured against a tokio clock (runtime)

mod manual;
mod realtime;

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

pub use manual::ManualScheduler;
pub use realtime::TokioScheduler;

/// Period of a running timer's countdown task.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Handle of a scheduled repeating task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(u64);

impl TaskId {
    /// Returns the raw numeric value of this handle.
    #[must_use]
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "task#{}", self.0)
    }
}

/// Source of repeating scheduled callbacks.
///
/// Times are offsets from the scheduler's own origin.
pub trait Scheduler {
    /// Current time on this scheduler's clock.
    fn now(&self) -> Duration;

    /// Registers a task that first fires one `period` from now and then
    /// every `period` after that.
    fn schedule_repeating(&mut self, period: Duration) -> TaskId;

    /// Cancels a task. Returns false if it was not scheduled.
    fn cancel(&mut self, task: TaskId) -> bool;

    /// Returns true if the task is still scheduled.
    fn is_scheduled(&self, task: TaskId) -> bool;

    /// Number of live tasks.
    fn scheduled_count(&self) -> usize;

    /// Deadline of the earliest live task.
    fn next_deadline(&self) -> Option<Duration>;

    /// Takes the earliest task due at or before `until` and re-arms it one
    /// period later. Ties are broken by task creation order.
    fn pop_due(&mut self, until: Duration) -> Option<TaskId>;
}

#[derive(Debug, Clone, Copy)]
struct Entry {
    period: Duration,
    due: Duration,
}

/// Deadline bookkeeping shared by the scheduler implementations.
#[derive(Debug, Default)]
pub(crate) struct TaskTable {
    next_id: u64,
    entries: BTreeMap<TaskId, Entry>,
}

impl TaskTable {
    pub(crate) fn insert(&mut self, now: Duration, period: Duration) -> TaskId {
        // A zero period would make pop_due spin forever.
        let period = period.max(Duration::from_millis(1));
        self.next_id += 1;
        let id = TaskId(self.next_id);
        self.entries.insert(
            id,
            Entry {
                period,
                due: now + period,
            },
        );
        id
    }

    pub(crate) fn remove(&mut self, task: TaskId) -> bool {
        self.entries.remove(&task).is_some()
    }

    pub(crate) fn contains(&self, task: TaskId) -> bool {
        self.entries.contains_key(&task)
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn next_deadline(&self) -> Option<Duration> {
        self.entries.values().map(|e| e.due).min()
    }

    pub(crate) fn pop_due(&mut self, until: Duration) -> Option<TaskId> {
        let (id, entry) = self
            .entries
            .iter_mut()
            .filter(|(_, e)| e.due <= until)
            .min_by_key(|(id, e)| (e.due, **id))?;
        entry.due += entry.period;
        Some(*id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(s: u64) -> Duration {
        Duration::from_secs(s)
    }

    #[test]
    fn test_insert_assigns_increasing_ids() {
        let mut table = TaskTable::default();
        let a = table.insert(Duration::ZERO, secs(1));
        let b = table.insert(Duration::ZERO, secs(1));
        assert!(b > a);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_pop_due_respects_deadline() {
        let mut table = TaskTable::default();
        let task = table.insert(Duration::ZERO, secs(1));

        assert_eq!(table.pop_due(Duration::from_millis(999)), None);
        assert_eq!(table.pop_due(secs(1)), Some(task));
        // Re-armed one period later
        assert_eq!(table.pop_due(secs(1)), None);
        assert_eq!(table.next_deadline(), Some(secs(2)));
    }

    #[test]
    fn test_pop_due_orders_by_deadline_then_id() {
        let mut table = TaskTable::default();
        let slow = table.insert(Duration::ZERO, secs(15));
        let fast = table.insert(Duration::ZERO, secs(1));
        let also_fast = table.insert(Duration::ZERO, secs(1));

        let mut fired = Vec::new();
        while let Some(task) = table.pop_due(secs(15)) {
            fired.push(task);
        }

        assert_eq!(fired.len(), 31);
        assert_eq!(fired[0], fast);
        assert_eq!(fired[1], also_fast);
        // Ties at 15s: the older slow task goes first
        assert_eq!(fired[28], slow);
    }

    #[test]
    fn test_removed_task_never_fires() {
        let mut table = TaskTable::default();
        let task = table.insert(Duration::ZERO, secs(1));

        assert!(table.remove(task));
        assert!(!table.remove(task));
        assert!(!table.contains(task));
        assert_eq!(table.pop_due(secs(10)), None);
    }

    #[test]
    fn test_zero_period_is_clamped() {
        let mut table = TaskTable::default();
        table.insert(Duration::ZERO, Duration::ZERO);
        assert_eq!(table.next_deadline(), Some(Duration::from_millis(1)));
    }

    #[test]
    fn test_task_id_display() {
        let mut table = TaskTable::default();
        let task = table.insert(Duration::ZERO, secs(1));
        assert_eq!(task.to_string(), "task#1");
        assert_eq!(task.as_u64(), 1);
    }
}
