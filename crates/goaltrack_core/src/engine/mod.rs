//! Pure mutation engine over the goal collection.
//!
//! # Responsibility
//! - Apply add/update/delete/reorder/complete transitions and return the
//!   next state without mutating any input in place.
//! - Enforce the completion guard and the reconciliation rule.
//!
//! # Invariants
//! - A goal cannot become complete while it has no tasks or any incomplete
//!   task; the guard signals `CompletionBlocked` instead of failing hard.
//! - Every task-mutating transition (and every wholesale goal replacement)
//!   runs the reconciliation rule, so a completed goal whose tasks diverge
//!   from its completion baseline is reset to incomplete.
//! - Reordering only reassigns `order` fields; identity and content are
//!   untouched.

use crate::model::goal::{CardColor, Goal};
use crate::model::task::Task;
use chrono::{DateTime, Utc};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Guard rejection for the incomplete→complete transition.
///
/// A signal for the caller to surface a transient notice, not a hard error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionBlocked {
    /// The goal has no tasks yet.
    NoTasks,
    /// At least one task is still incomplete.
    IncompleteTasks,
}

impl Display for CompletionBlocked {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoTasks => write!(f, "goal has no tasks to complete"),
            Self::IncompleteTasks => {
                write!(f, "complete all tasks before marking the goal as complete")
            }
        }
    }
}

impl Error for CompletionBlocked {}

/// Appends a newly-created goal to the collection.
pub fn add_goal(goals: &[Goal], goal: Goal) -> Vec<Goal> {
    let mut next = goals.to_vec();
    next.push(goal);
    next
}

/// Replaces the goal with a matching id wholesale; non-matching goals pass
/// through unchanged. When no id matches, the collection is returned as-is.
///
/// The replacement is reconciled first, so a caller cannot smuggle in a
/// `completed` flag that contradicts the task list.
pub fn update_goal(goals: &[Goal], updated: Goal) -> Vec<Goal> {
    let updated = reconcile_completion(updated);
    goals
        .iter()
        .map(|goal| {
            if goal.id == updated.id {
                updated.clone()
            } else {
                goal.clone()
            }
        })
        .collect()
}

/// Removes the goal with a matching id together with all its tasks.
pub fn delete_goal(goals: &[Goal], goal_id: &str) -> Vec<Goal> {
    goals
        .iter()
        .filter(|goal| goal.id != goal_id)
        .cloned()
        .collect()
}

/// Reassigns every goal's `order` to its 1-based position in the given
/// permutation. Identity and content are otherwise untouched.
pub fn reorder_goals(goals: &[Goal]) -> Vec<Goal> {
    goals
        .iter()
        .enumerate()
        .map(|(index, goal)| {
            let mut next = goal.clone();
            next.order = index as i64 + 1;
            next
        })
        .collect()
}

/// Flips the goal's completion flag.
///
/// # Contract
/// - incomplete→complete requires a non-empty, fully-completed task list;
///   otherwise returns [`CompletionBlocked`]. On success `completed_date`
///   is set to `now` and the completion baseline is recorded.
/// - complete→incomplete is unconditional and clears `completed_date` and
///   the baseline.
pub fn toggle_completion(goal: &Goal, now: DateTime<Utc>) -> Result<Goal, CompletionBlocked> {
    let mut next = goal.clone();

    if goal.completed {
        next.completed = false;
        next.completed_date = None;
        next.completion_baseline = None;
        return Ok(next);
    }

    if goal.tasks.is_empty() {
        return Err(CompletionBlocked::NoTasks);
    }
    if goal.tasks.iter().any(|task| !task.completed) {
        return Err(CompletionBlocked::IncompleteTasks);
    }

    next.completed = true;
    next.completed_date = Some(now);
    next.completion_baseline = Some(next.completed_task_count());
    Ok(next)
}

/// Reconciliation rule: completion is not durable once tasks diverge from
/// the state recorded at completion time.
///
/// A completed goal is reset to incomplete when any task is incomplete or
/// the completed-task count no longer equals the recorded baseline. A
/// missing baseline on a completed goal counts as divergence, so completion
/// can only be asserted through [`toggle_completion`].
pub fn reconcile_completion(goal: Goal) -> Goal {
    if !goal.completed {
        return goal;
    }

    let current = goal.completed_task_count();
    let baseline_diverged = goal.completion_baseline != Some(current);
    let any_incomplete = goal.tasks.iter().any(|task| !task.completed);

    if baseline_diverged || any_incomplete {
        let mut next = goal;
        next.completed = false;
        next.completed_date = None;
        next.completion_baseline = None;
        return next;
    }

    goal
}

/// Appends a task to the goal's list, then reconciles completion.
pub fn add_task(goal: &Goal, task: Task) -> Goal {
    let mut next = goal.clone();
    next.tasks.push(task);
    reconcile_completion(next)
}

/// Replaces the task with a matching id wholesale, then reconciles.
/// Non-matching tasks pass through unchanged.
pub fn update_task(goal: &Goal, updated: Task) -> Goal {
    let mut next = goal.clone();
    for task in &mut next.tasks {
        if task.id == updated.id {
            *task = updated.clone();
        }
    }
    reconcile_completion(next)
}

/// Removes the task with a matching id, then reconciles.
pub fn delete_task(goal: &Goal, task_id: &str) -> Goal {
    let mut next = goal.clone();
    next.tasks.retain(|task| task.id != task_id);
    reconcile_completion(next)
}

/// Reassigns every task's `order` to its 0-based position in the given
/// permutation and installs the permutation as the goal's task list.
pub fn reorder_tasks(goal: &Goal, tasks: Vec<Task>) -> Goal {
    let mut next = goal.clone();
    next.tasks = tasks
        .into_iter()
        .enumerate()
        .map(|(index, mut task)| {
            task.order = index as i64;
            task
        })
        .collect();
    reconcile_completion(next)
}

/// Replaces the goal's palette tag.
pub fn set_card_color(goal: &Goal, color: Option<CardColor>) -> Goal {
    let mut next = goal.clone();
    next.card_color = color;
    next
}
