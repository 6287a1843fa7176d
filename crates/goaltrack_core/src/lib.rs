//! Core domain logic for goaltrack, a personal goal-and-task tracker.
//! This crate is the single source of truth for business invariants.

pub mod codec;
pub mod db;
pub mod engine;
pub mod logging;
pub mod model;
pub mod search;
pub mod service;
pub mod stats;
pub mod store;

pub use codec::{export_goals, import_goals_from_json, ImportError, ImportResult, EXPORT_VERSION};
pub use engine::CompletionBlocked;
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::goal::{CardColor, Goal, GoalValidationError};
pub use model::task::{Task, TaskValidationError, DEFAULT_TASK_DURATION_MINUTES};
pub use search::{filter_goals, matches_query};
pub use service::goal_service::{GoalService, ServiceError};
pub use stats::{durations, progress, DurationSummary};
pub use store::goal_store::{GoalStore, SqliteGoalStore, StoreError, StoreResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
