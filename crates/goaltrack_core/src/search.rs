//! In-memory goal filtering for search and display.
//!
//! # Responsibility
//! - Match goals against a free-text query over names, descriptions and
//!   task names.
//! - Apply the hide-completed display filter.
//!
//! # Invariants
//! - Matching is case-insensitive substring containment.
//! - A blank query matches every goal.
//! - Filtering preserves the input order.

use crate::model::goal::Goal;

/// Returns whether the goal matches the query.
pub fn matches_query(goal: &Goal, query: &str) -> bool {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }

    goal.goal_name.to_lowercase().contains(&needle)
        || goal.goal_description.to_lowercase().contains(&needle)
        || goal
            .tasks
            .iter()
            .any(|task| task.task_name.to_lowercase().contains(&needle))
}

/// Filters goals for display: hide-completed first, then the query match.
pub fn filter_goals<'a>(goals: &'a [Goal], query: &str, hide_completed: bool) -> Vec<&'a Goal> {
    goals
        .iter()
        .filter(|goal| !(hide_completed && goal.completed))
        .filter(|goal| matches_query(goal, query))
        .collect()
}
