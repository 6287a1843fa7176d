//! Derived-state calculations over a goal's task list.
//!
//! # Responsibility
//! - Compute progress percentage and duration aggregates.
//!
//! # Invariants
//! - `progress` is always within [0, 100]; an empty list yields 0.
//! - Duration aggregates are minutes and non-negative by construction.

use crate::model::task::Task;

/// Duration aggregates in minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DurationSummary {
    /// Sum over every task.
    pub total: u64,
    /// Sum over completed tasks only.
    pub completed: u64,
    /// `total - completed`.
    pub remaining: u64,
}

/// Percentage of completed tasks, 0 for an empty list.
pub fn progress(tasks: &[Task]) -> f64 {
    if tasks.is_empty() {
        return 0.0;
    }
    let completed = tasks.iter().filter(|task| task.completed).count();
    completed as f64 / tasks.len() as f64 * 100.0
}

/// Sums task durations into total/completed/remaining minutes.
pub fn durations(tasks: &[Task]) -> DurationSummary {
    let total: u64 = tasks
        .iter()
        .map(|task| u64::from(task.duration_minutes))
        .sum();
    let completed: u64 = tasks
        .iter()
        .filter(|task| task.completed)
        .map(|task| u64::from(task.duration_minutes))
        .sum();

    DurationSummary {
        total,
        completed,
        remaining: total - completed,
    }
}
