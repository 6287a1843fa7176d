//! Import/export codec for the shareable goal document.
//!
//! # Responsibility
//! - Produce the versioned export document as formatted JSON text.
//! - Validate and normalize untrusted import text into typed goals.
//!
//! # Invariants
//! - Export is deterministic modulo the `exportedAt` timestamp.
//! - Import never panics on malformed input: parse/schema failures come
//!   back as typed errors, and individually malformed goal entries are
//!   silently dropped while well-formed siblings still import.
//! - Imported goals satisfy the completion invariant: a `completed` flag
//!   that contradicts the task list is reconciled away during
//!   normalization.
//! - Import output is never merged into live state here; the caller decides
//!   whether to replace or merge.

use crate::engine::reconcile_completion;
use crate::model::goal::{is_canonical_goal_id, new_goal_id, CardColor, Goal};
use crate::model::task::{is_canonical_task_id, new_task_id, Task};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Version stamped into every export document.
pub const EXPORT_VERSION: u32 = 1;

/// Result type used by the import path.
pub type ImportResult<T> = Result<T, ImportError>;

/// Typed failure returned by [`import_goals_from_json`].
#[derive(Debug)]
pub enum ImportError {
    /// Input text is not valid JSON.
    Parse(serde_json::Error),
    /// Parsed JSON lacks the required `goals` array.
    Schema(&'static str),
}

impl Display for ImportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "invalid JSON: {err}"),
            Self::Schema(message) => write!(f, "invalid import document: {message}"),
        }
    }
}

impl Error for ImportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            Self::Schema(_) => None,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ExportDocument<'a> {
    version: u32,
    exported_at: DateTime<Utc>,
    goals: &'a [Goal],
}

/// Serializes the collection into the versioned export document.
pub fn export_goals(goals: &[Goal]) -> String {
    let document = ExportDocument {
        version: EXPORT_VERSION,
        exported_at: Utc::now(),
        goals,
    };
    serde_json::to_string_pretty(&document).expect("export document serializes to JSON")
}

/// Parses and normalizes an export document into typed goals.
///
/// # Contract
/// - Entries that are not objects carrying a string `id`, a string
///   `goalName` and an array `tasks` are dropped, not errors.
/// - Surviving entries are coerced field by field with documented defaults;
///   non-canonical ids are re-tagged with fresh ones.
/// - `version` is accepted but not branched on (forward-compat placeholder).
///
/// # Errors
/// - `Parse` when the text is not JSON, `Schema` when `goals` is missing or
///   not an array.
pub fn import_goals_from_json(text: &str) -> ImportResult<Vec<Goal>> {
    let document: Value = serde_json::from_str(text).map_err(ImportError::Parse)?;

    let Some(entries) = document.get("goals").and_then(Value::as_array) else {
        return Err(ImportError::Schema("missing or invalid `goals` array"));
    };

    let now = Utc::now();
    Ok(entries
        .iter()
        .filter(|entry| has_goal_shape(entry))
        .map(|entry| normalize_goal(entry, now))
        .collect())
}

fn has_goal_shape(value: &Value) -> bool {
    value.is_object()
        && value.get("id").is_some_and(Value::is_string)
        && value.get("goalName").is_some_and(Value::is_string)
        && value.get("tasks").is_some_and(Value::is_array)
}

fn normalize_goal(value: &Value, now: DateTime<Utc>) -> Goal {
    // Shape is pre-checked, so `id` is a string here.
    let raw_id = value.get("id").and_then(Value::as_str).unwrap_or_default();
    let id = if is_canonical_goal_id(raw_id) {
        raw_id.to_string()
    } else {
        new_goal_id()
    };

    let tasks = value
        .get("tasks")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
        .iter()
        .enumerate()
        .map(|(index, task)| normalize_task(task, index, now))
        .collect();

    let mut goal = Goal {
        id,
        goal_name: string_field(value, "goalName"),
        goal_description: string_field(value, "goalDescription"),
        created_date: datetime_field(value, "createdDate").unwrap_or(now),
        completed_date: datetime_field(value, "completedDate"),
        completed: value
            .get("completed")
            .and_then(Value::as_bool)
            .unwrap_or(false),
        order: value.get("order").and_then(Value::as_i64).unwrap_or(0),
        card_color: value
            .get("cardColor")
            .and_then(Value::as_str)
            .and_then(CardColor::parse),
        tasks,
        completion_baseline: None,
    };
    goal.restore_completion_baseline();
    // A document can claim `completed: true` over an incomplete task list;
    // reconciliation strips the contradiction before the goal goes live.
    reconcile_completion(goal)
}

fn normalize_task(value: &Value, index: usize, now: DateTime<Utc>) -> Task {
    let raw_id = value.get("id").and_then(Value::as_str).unwrap_or_default();
    let id = if is_canonical_task_id(raw_id) {
        raw_id.to_string()
    } else {
        new_task_id()
    };

    // Legacy exports used `name` instead of `taskName`.
    let task_name = value
        .get("taskName")
        .or_else(|| value.get("name"))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    Task {
        id,
        task_name,
        duration_minutes: duration_field(value),
        deadline: datetime_field(value, "deadline"),
        completed: value
            .get("completed")
            .and_then(Value::as_bool)
            .unwrap_or(false),
        created_date: datetime_field(value, "createdDate").unwrap_or(now),
        completed_date: datetime_field(value, "completedDate"),
        order: value
            .get("order")
            .and_then(Value::as_i64)
            .unwrap_or(index as i64),
    }
}

fn duration_field(value: &Value) -> u32 {
    match value.get("duration") {
        Some(Value::String(text)) => text.trim().parse().unwrap_or(0),
        Some(Value::Number(number)) => number
            .as_u64()
            .and_then(|minutes| u32::try_from(minutes).ok())
            .unwrap_or(0),
        _ => 0,
    }
}

fn string_field(value: &Value, key: &str) -> String {
    value
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn datetime_field(value: &Value, key: &str) -> Option<DateTime<Utc>> {
    value
        .get(key)
        .and_then(Value::as_str)
        .and_then(|text| DateTime::parse_from_rfc3339(text).ok())
        .map(|parsed| parsed.with_timezone(&Utc))
}
