//! Goal store contract and SQLite implementation.
//!
//! # Responsibility
//! - Serialize/deserialize the goal collection to/from the `goals` key.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - `load_goals` never raises: absent key, storage failure, or corrupt
//!   JSON all degrade to an empty collection (logged, not surfaced).
//! - Completion baselines are reconstructed after every successful load,
//!   and loaded goals are reconciled so an externally-edited record cannot
//!   smuggle in a `completed` flag over incomplete tasks.
//! - Every save overwrites the whole serialized collection.

use crate::db::DbError;
use crate::engine::reconcile_completion;
use crate::model::goal::Goal;
use log::{info, warn};
use rusqlite::{params, Connection, OptionalExtension};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Key holding the entire goal collection as JSON text.
pub const GOALS_KEY: &str = "goals";

/// Key holding the hide-completed display preference ("true"/"false").
pub const HIDE_COMPLETED_KEY: &str = "goal-tracker-hide-completed";

pub type StoreResult<T> = Result<T, StoreError>;

/// Failure while writing to or reading from the durable store.
#[derive(Debug)]
pub enum StoreError {
    Db(DbError),
    Serialize(serde_json::Error),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Serialize(err) => write!(f, "failed to serialize goal collection: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Serialize(err) => Some(err),
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Store interface for the goal collection and display preferences.
pub trait GoalStore {
    /// Loads the full collection; degrades to empty on any failure.
    fn load_goals(&self) -> Vec<Goal>;
    /// Overwrites the full collection.
    fn save_goals(&self, goals: &[Goal]) -> StoreResult<()>;
    /// Loads the hide-completed preference; defaults to false.
    fn load_hide_completed(&self) -> bool;
    /// Persists the hide-completed preference.
    fn save_hide_completed(&self, hide: bool) -> StoreResult<()>;
}

/// SQLite-backed goal store over the `kv_store` table.
pub struct SqliteGoalStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteGoalStore<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn get_value(&self, key: &str) -> StoreResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1;",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn put_value(&self, key: &str, value: &str) -> StoreResult<()> {
        self.conn.execute(
            "INSERT INTO kv_store (key, value, updated_at)
             VALUES (?1, ?2, strftime('%s', 'now') * 1000)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, value],
        )?;
        Ok(())
    }
}

impl GoalStore for SqliteGoalStore<'_> {
    fn load_goals(&self) -> Vec<Goal> {
        let text = match self.get_value(GOALS_KEY) {
            Ok(Some(text)) => text,
            Ok(None) => {
                info!("event=store_load module=store status=ok count=0 source=absent");
                return Vec::new();
            }
            Err(err) => {
                warn!("event=store_load module=store status=error fallback=empty error={err}");
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<Goal>>(&text) {
            Ok(goals) => {
                let goals: Vec<Goal> = goals
                    .into_iter()
                    .map(|mut goal| {
                        goal.restore_completion_baseline();
                        reconcile_completion(goal)
                    })
                    .collect();
                info!(
                    "event=store_load module=store status=ok count={}",
                    goals.len()
                );
                goals
            }
            Err(err) => {
                warn!(
                    "event=store_load module=store status=error fallback=empty error_code=corrupt_record error={err}"
                );
                Vec::new()
            }
        }
    }

    fn save_goals(&self, goals: &[Goal]) -> StoreResult<()> {
        let text = serde_json::to_string(goals).map_err(StoreError::Serialize)?;
        self.put_value(GOALS_KEY, &text)?;
        info!(
            "event=store_save module=store status=ok count={}",
            goals.len()
        );
        Ok(())
    }

    fn load_hide_completed(&self) -> bool {
        match self.get_value(HIDE_COMPLETED_KEY) {
            Ok(value) => value.as_deref() == Some("true"),
            Err(err) => {
                warn!(
                    "event=store_load module=store status=error key={HIDE_COMPLETED_KEY} fallback=false error={err}"
                );
                false
            }
        }
    }

    fn save_hide_completed(&self, hide: bool) -> StoreResult<()> {
        self.put_value(HIDE_COMPLETED_KEY, if hide { "true" } else { "false" })
    }
}
