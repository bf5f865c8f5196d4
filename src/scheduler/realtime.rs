//! Scheduler backed by the tokio clock.

use std::time::Duration;

use tokio::time::Instant;

use super::{Scheduler, TaskId, TaskTable};

/// A scheduler measuring time from a tokio [`Instant`].
///
/// It never sleeps on its own: the session runtime asks for
/// [`TokioScheduler::deadline_instant`] and sleeps until then. Under
/// `tokio::time::pause` the clock follows tokio's virtual time.
#[derive(Debug)]
pub struct TokioScheduler {
    origin: Instant,
    table: TaskTable,
}

impl TokioScheduler {
    /// Creates a scheduler whose origin is the current tokio instant.
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            table: TaskTable::default(),
        }
    }

    /// Returns the instant at which the next task is due.
    #[must_use]
    pub fn deadline_instant(&self) -> Option<Instant> {
        self.table.next_deadline().map(|d| self.origin + d)
    }
}

impl Default for TokioScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler for TokioScheduler {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    fn schedule_repeating(&mut self, period: Duration) -> TaskId {
        let now = self.now();
        self.table.insert(now, period)
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

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_now_follows_tokio_clock() {
        let scheduler = TokioScheduler::new();
        tokio::time::advance(Duration::from_secs(3)).await;
        assert_eq!(scheduler.now(), Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_instant() {
        let mut scheduler = TokioScheduler::new();
        let start = Instant::now();
        assert!(scheduler.deadline_instant().is_none());

        let task = scheduler.schedule_repeating(Duration::from_secs(1));
        assert_eq!(
            scheduler.deadline_instant(),
            Some(start + Duration::from_secs(1))
        );

        tokio::time::sleep_until(start + Duration::from_secs(1)).await;
        let now = scheduler.now();
        assert_eq!(scheduler.pop_due(now), Some(task));
        assert_eq!(
            scheduler.deadline_instant(),
            Some(start + Duration::from_secs(2))
        );
    }
}
