//! Countdown timers and their registry.
//!
//! Timers do not own threads or tokio tasks. Each running timer holds one
//! repeating task in the session's [`Scheduler`](crate::scheduler::Scheduler)
//! and is ticked when the session dispatches that task.

mod registry;
mod timer;

pub use registry::TimerRegistry;
pub use timer::{CompletionAlerts, TickOutcome, Timer};

#[cfg(test)]
pub(crate) use timer::test_support;
