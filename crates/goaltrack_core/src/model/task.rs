//! Task domain model.
//!
//! # Responsibility
//! - Define the task record owned by exactly one goal.
//! - Construct new tasks with defaulted duration and stable ids.
//!
//! # Invariants
//! - `id` is stable and never reused for another task.
//! - `duration_minutes` travels as a string-encoded integer on the wire,
//!   with `0` meaning "no duration set".
//! - `completed_date` is set exactly while `completed` is true.

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Canonical task id prefix.
pub const TASK_ID_PREFIX: &str = "task-";

/// Duration in minutes applied when the caller leaves it unset.
pub const DEFAULT_TASK_DURATION_MINUTES: u32 = 30;

static CANONICAL_TASK_ID_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^task-[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}$")
        .expect("valid task id regex")
});

/// Generates a fresh canonical task id.
pub fn new_task_id() -> String {
    format!("{TASK_ID_PREFIX}{}", Uuid::new_v4())
}

/// Returns whether `id` matches the canonical task id shape.
///
/// A bare `task-` prefix is not enough: legacy timestamp-derived ids must be
/// re-tagged on import because they are only unique per clock tick.
pub fn is_canonical_task_id(id: &str) -> bool {
    CANONICAL_TASK_ID_RE.is_match(id)
}

/// Validation failure raised by the task factory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskValidationError {
    /// Task name is empty or whitespace-only.
    EmptyName,
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "task name must not be empty"),
        }
    }
}

impl Error for TaskValidationError {}

/// A unit of work belonging to exactly one goal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Stable identifier, unique within the owning goal.
    pub id: String,
    /// User-facing label.
    pub task_name: String,
    /// Estimated effort in minutes. Wire encoding is a string-typed number.
    #[serde(rename = "duration", with = "duration_string")]
    pub duration_minutes: u32,
    /// Optional deadline, date-only granularity for UI purposes.
    pub deadline: Option<DateTime<Utc>>,
    /// Independently toggleable completion flag.
    pub completed: bool,
    /// Creation timestamp, immutable after construction.
    pub created_date: DateTime<Utc>,
    /// Set when `completed` becomes true, cleared when it becomes false.
    pub completed_date: Option<DateTime<Utc>>,
    /// Manual sort position among the goal's tasks, 0-based.
    pub order: i64,
}

impl Task {
    /// Creates a new task with a fresh id and default flags.
    ///
    /// # Contract
    /// - `duration = None` falls back to [`DEFAULT_TASK_DURATION_MINUTES`].
    /// - `completed` starts false, `completed_date` starts absent.
    ///
    /// # Errors
    /// - `EmptyName` when `name` trims to nothing.
    pub fn new(
        name: impl Into<String>,
        duration: Option<u32>,
        deadline: Option<DateTime<Utc>>,
        order: i64,
    ) -> Result<Self, TaskValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(TaskValidationError::EmptyName);
        }

        Ok(Self {
            id: new_task_id(),
            task_name: name,
            duration_minutes: duration.unwrap_or(DEFAULT_TASK_DURATION_MINUTES),
            deadline,
            completed: false,
            created_date: Utc::now(),
            completed_date: None,
            order,
        })
    }

    /// Sets the completion flag and keeps `completed_date` consistent.
    pub fn set_completion(&mut self, completed: bool, now: DateTime<Utc>) {
        self.completed = completed;
        self.completed_date = completed.then_some(now);
    }
}

mod duration_string {
    use serde::de::{Error as DeError, Unexpected};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(minutes: &u32, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&minutes.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
        // Own writes always produce the string form; bare numbers are
        // tolerated for data written by older exports.
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(u64),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Text(text) => text.trim().parse::<u32>().map_err(|_| {
                DeError::invalid_value(
                    Unexpected::Str(&text),
                    &"a string-encoded non-negative integer",
                )
            }),
            Raw::Number(value) => u32::try_from(value).map_err(|_| {
                DeError::invalid_value(
                    Unexpected::Unsigned(value),
                    &"a duration that fits in 32 bits",
                )
            }),
        }
    }
}
