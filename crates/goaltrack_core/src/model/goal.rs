//! Goal domain model.
//!
//! # Responsibility
//! - Define the top-level trackable record and its owned task list.
//! - Construct new goals with defaulted fields and stable ids.
//!
//! # Invariants
//! - `id` is stable and never reused for another goal.
//! - `completed` must be false whenever any contained task is incomplete;
//!   the mutation engine enforces this via the reconciliation rule.
//! - `completion_baseline` is process-local state, never serialized; it is
//!   reconstructed from the task list after load/import.

use crate::model::task::Task;
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Canonical goal id prefix.
pub const GOAL_ID_PREFIX: &str = "goal-";

static CANONICAL_GOAL_ID_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^goal-[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}$")
        .expect("valid goal id regex")
});

/// Generates a fresh canonical goal id.
pub fn new_goal_id() -> String {
    format!("{GOAL_ID_PREFIX}{}", Uuid::new_v4())
}

/// Returns whether `id` matches the canonical goal id shape.
pub fn is_canonical_goal_id(id: &str) -> bool {
    CANONICAL_GOAL_ID_RE.is_match(id)
}

/// Validation failure raised by the goal factory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GoalValidationError {
    /// Goal name is empty or whitespace-only.
    EmptyName,
}

impl Display for GoalValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "goal name must not be empty"),
        }
    }
}

impl Error for GoalValidationError {}

/// Fixed palette tag for card styling.
///
/// Purely presentational, carried in the data model so the choice survives
/// persistence and export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardColor {
    Pink,
    Mint,
    Lavender,
    Peach,
    Sky,
    Sage,
}

impl CardColor {
    /// Parses a palette tag, returning `None` for unknown values.
    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "pink" => Some(Self::Pink),
            "mint" => Some(Self::Mint),
            "lavender" => Some(Self::Lavender),
            "peach" => Some(Self::Peach),
            "sky" => Some(Self::Sky),
            "sage" => Some(Self::Sage),
            _ => None,
        }
    }

    /// Returns the wire tag for this color.
    pub fn as_tag(self) -> &'static str {
        match self {
            Self::Pink => "pink",
            Self::Mint => "mint",
            Self::Lavender => "lavender",
            Self::Peach => "peach",
            Self::Sky => "sky",
            Self::Sage => "sage",
        }
    }
}

/// Top-level trackable objective containing zero or more tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    /// Stable identifier, unique across the whole collection.
    pub id: String,
    /// User-facing title.
    pub goal_name: String,
    /// User-facing summary, ≤150 chars by UI convention (not enforced here).
    pub goal_description: String,
    /// Creation timestamp, immutable after construction.
    pub created_date: DateTime<Utc>,
    /// Set when `completed` becomes true, cleared when it becomes false.
    pub completed_date: Option<DateTime<Utc>>,
    /// Completion flag guarded by the mutation engine.
    pub completed: bool,
    /// Manual sort position among goals, 1-based.
    pub order: i64,
    /// Optional palette tag; `None` means default styling.
    pub card_color: Option<CardColor>,
    /// Owned task list, ids unique within this goal.
    pub tasks: Vec<Task>,
    /// Completed-task count recorded when the goal was last marked complete.
    ///
    /// Used by the reconciliation rule to detect divergence from the state
    /// at completion time. Not serialized: after load/import it is rebuilt
    /// from the current task list.
    #[serde(skip)]
    pub completion_baseline: Option<u32>,
}

impl Goal {
    /// Creates a new goal with a fresh id, no tasks, and default flags.
    ///
    /// # Contract
    /// - `order = current_count + 1` (append position).
    /// - `completed` starts false, `card_color` starts absent.
    ///
    /// # Errors
    /// - `EmptyName` when `name` trims to nothing.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        current_count: usize,
    ) -> Result<Self, GoalValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(GoalValidationError::EmptyName);
        }

        Ok(Self {
            id: new_goal_id(),
            goal_name: name,
            goal_description: description.into(),
            created_date: Utc::now(),
            completed_date: None,
            completed: false,
            order: current_count as i64 + 1,
            card_color: None,
            tasks: Vec::new(),
            completion_baseline: None,
        })
    }

    /// Number of tasks currently marked complete.
    pub fn completed_task_count(&self) -> u32 {
        self.tasks.iter().filter(|task| task.completed).count() as u32
    }

    /// Rebuilds the process-local completion baseline after load/import.
    ///
    /// A completed goal adopts its current completed-task count as baseline,
    /// matching what an interactive session would have recorded at the
    /// moment of completion.
    pub fn restore_completion_baseline(&mut self) {
        self.completion_baseline = self.completed.then(|| self.completed_task_count());
    }
}
