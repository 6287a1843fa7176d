//! Goal use-case service.
//!
//! # Responsibility
//! - Provide stable entry points for every goal/task mutation.
//! - Apply engine transitions to the owned collection and persist the
//!   result through the store.
//!
//! # Invariants
//! - The owned collection is replaced wholesale on every accepted mutation;
//!   no caller mutates it in place.
//! - Guard rejections (`Blocked`) and lookup misses are signaled as typed
//!   results, never panics.
//! - Save failures are logged warnings; the new state is kept in memory.

use crate::codec;
use crate::engine;
use crate::engine::CompletionBlocked;
use crate::model::goal::{CardColor, Goal, GoalValidationError};
use crate::model::task::{Task, TaskValidationError};
use crate::store::goal_store::GoalStore;
use chrono::{DateTime, Utc};
use log::warn;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service-level failure for goal/task operations.
#[derive(Debug)]
pub enum ServiceError {
    /// No goal with the given id exists in the collection.
    GoalNotFound(String),
    /// No task with the given id exists in the goal.
    TaskNotFound { goal_id: String, task_id: String },
    /// Goal factory input rejected.
    InvalidGoal(GoalValidationError),
    /// Task factory input rejected.
    InvalidTask(TaskValidationError),
    /// Completion transition guard rejected; surface a transient notice.
    Blocked(CompletionBlocked),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::GoalNotFound(id) => write!(f, "goal not found: {id}"),
            Self::TaskNotFound { goal_id, task_id } => {
                write!(f, "task not found: {task_id} in goal {goal_id}")
            }
            Self::InvalidGoal(err) => write!(f, "{err}"),
            Self::InvalidTask(err) => write!(f, "{err}"),
            Self::Blocked(reason) => write!(f, "{reason}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidGoal(err) => Some(err),
            Self::InvalidTask(err) => Some(err),
            Self::Blocked(reason) => Some(reason),
            _ => None,
        }
    }
}

impl From<GoalValidationError> for ServiceError {
    fn from(value: GoalValidationError) -> Self {
        Self::InvalidGoal(value)
    }
}

impl From<TaskValidationError> for ServiceError {
    fn from(value: TaskValidationError) -> Self {
        Self::InvalidTask(value)
    }
}

impl From<CompletionBlocked> for ServiceError {
    fn from(value: CompletionBlocked) -> Self {
        Self::Blocked(value)
    }
}

/// Owner of the in-memory goal collection, backed by a [`GoalStore`].
pub struct GoalService<S: GoalStore> {
    store: S,
    goals: Vec<Goal>,
}

impl<S: GoalStore> GoalService<S> {
    /// Loads the persisted collection and takes ownership of it.
    ///
    /// Load is fail-open: a fresh or unreadable store starts empty.
    pub fn open(store: S) -> Self {
        let goals = store.load_goals();
        Self { store, goals }
    }

    /// Current collection, in manual order as stored.
    pub fn goals(&self) -> &[Goal] {
        &self.goals
    }

    /// Creates and appends a goal; returns the new goal's id.
    pub fn create_goal(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<String, ServiceError> {
        let goal = Goal::new(name, description, self.goals.len())?;
        let id = goal.id.clone();
        let next = engine::add_goal(&self.goals, goal);
        self.commit(next);
        Ok(id)
    }

    /// Replaces a goal wholesale with a caller-supplied updated value.
    pub fn update_goal(&mut self, updated: Goal) -> Result<(), ServiceError> {
        if !self.goals.iter().any(|goal| goal.id == updated.id) {
            return Err(ServiceError::GoalNotFound(updated.id));
        }
        let next = engine::update_goal(&self.goals, updated);
        self.commit(next);
        Ok(())
    }

    /// Removes a goal and all its tasks.
    pub fn delete_goal(&mut self, goal_id: &str) -> Result<(), ServiceError> {
        self.goal(goal_id)?;
        let next = engine::delete_goal(&self.goals, goal_id);
        self.commit(next);
        Ok(())
    }

    /// Moves a goal from one position to another and re-indexes `order`.
    ///
    /// Out-of-range positions are a no-op, matching a drag released outside
    /// the list.
    pub fn move_goal(&mut self, from: usize, to: usize) {
        if from >= self.goals.len() || to >= self.goals.len() {
            return;
        }
        let mut permuted = self.goals.clone();
        let moved = permuted.remove(from);
        permuted.insert(to, moved);
        let next = engine::reorder_goals(&permuted);
        self.commit(next);
    }

    /// Flips a goal's completion flag; returns the new flag on success.
    ///
    /// # Errors
    /// - `Blocked` when the incomplete→complete guard rejects.
    pub fn toggle_completion(&mut self, goal_id: &str) -> Result<bool, ServiceError> {
        let goal = self.goal(goal_id)?;
        let toggled = engine::toggle_completion(goal, Utc::now())?;
        let completed = toggled.completed;
        let next = engine::update_goal(&self.goals, toggled);
        self.commit(next);
        Ok(completed)
    }

    /// Replaces a goal's palette tag.
    pub fn set_card_color(
        &mut self,
        goal_id: &str,
        color: Option<CardColor>,
    ) -> Result<(), ServiceError> {
        let goal = self.goal(goal_id)?;
        let recolored = engine::set_card_color(goal, color);
        let next = engine::update_goal(&self.goals, recolored);
        self.commit(next);
        Ok(())
    }

    /// Creates and appends a task to a goal; returns the new task's id.
    pub fn add_task(
        &mut self,
        goal_id: &str,
        name: impl Into<String>,
        duration: Option<u32>,
        deadline: Option<DateTime<Utc>>,
    ) -> Result<String, ServiceError> {
        let goal = self.goal(goal_id)?;
        let task = Task::new(name, duration, deadline, goal.tasks.len() as i64)?;
        let task_id = task.id.clone();
        let with_task = engine::add_task(goal, task);
        let next = engine::update_goal(&self.goals, with_task);
        self.commit(next);
        Ok(task_id)
    }

    /// Replaces a task wholesale within its goal.
    pub fn update_task(&mut self, goal_id: &str, updated: Task) -> Result<(), ServiceError> {
        let goal = self.goal(goal_id)?;
        if !goal.tasks.iter().any(|task| task.id == updated.id) {
            return Err(ServiceError::TaskNotFound {
                goal_id: goal_id.to_string(),
                task_id: updated.id,
            });
        }
        let with_update = engine::update_task(goal, updated);
        let next = engine::update_goal(&self.goals, with_update);
        self.commit(next);
        Ok(())
    }

    /// Flips one task's completion flag; returns the new flag.
    pub fn toggle_task(&mut self, goal_id: &str, task_id: &str) -> Result<bool, ServiceError> {
        let goal = self.goal(goal_id)?;
        let task = goal
            .tasks
            .iter()
            .find(|task| task.id == task_id)
            .ok_or_else(|| ServiceError::TaskNotFound {
                goal_id: goal_id.to_string(),
                task_id: task_id.to_string(),
            })?;

        let mut toggled = task.clone();
        toggled.set_completion(!task.completed, Utc::now());
        let completed = toggled.completed;

        let with_update = engine::update_task(goal, toggled);
        let next = engine::update_goal(&self.goals, with_update);
        self.commit(next);
        Ok(completed)
    }

    /// Removes a task from its goal.
    pub fn delete_task(&mut self, goal_id: &str, task_id: &str) -> Result<(), ServiceError> {
        let goal = self.goal(goal_id)?;
        if !goal.tasks.iter().any(|task| task.id == task_id) {
            return Err(ServiceError::TaskNotFound {
                goal_id: goal_id.to_string(),
                task_id: task_id.to_string(),
            });
        }
        let without_task = engine::delete_task(goal, task_id);
        let next = engine::update_goal(&self.goals, without_task);
        self.commit(next);
        Ok(())
    }

    /// Moves a task within its goal and re-indexes task `order`.
    pub fn move_task(
        &mut self,
        goal_id: &str,
        from: usize,
        to: usize,
    ) -> Result<(), ServiceError> {
        let goal = self.goal(goal_id)?;
        if from >= goal.tasks.len() || to >= goal.tasks.len() {
            return Ok(());
        }
        let mut permuted = goal.tasks.clone();
        let moved = permuted.remove(from);
        permuted.insert(to, moved);
        let reordered = engine::reorder_tasks(goal, permuted);
        let next = engine::update_goal(&self.goals, reordered);
        self.commit(next);
        Ok(())
    }

    /// Replaces the whole collection, e.g. with a normalized import result.
    ///
    /// Every incoming goal is reconciled, so a caller-built collection
    /// cannot install a `completed` flag that contradicts its task list.
    pub fn replace_all(&mut self, goals: Vec<Goal>) {
        let next = goals.into_iter().map(engine::reconcile_completion).collect();
        self.commit(next);
    }

    /// Serializes the current collection into the export document.
    pub fn export(&self) -> String {
        codec::export_goals(&self.goals)
    }

    /// Current hide-completed display preference.
    pub fn hide_completed(&self) -> bool {
        self.store.load_hide_completed()
    }

    /// Persists the hide-completed display preference.
    pub fn set_hide_completed(&mut self, hide: bool) {
        if let Err(err) = self.store.save_hide_completed(hide) {
            warn!("event=pref_save module=service status=error error={err}");
        }
    }

    fn goal(&self, goal_id: &str) -> Result<&Goal, ServiceError> {
        self.goals
            .iter()
            .find(|goal| goal.id == goal_id)
            .ok_or_else(|| ServiceError::GoalNotFound(goal_id.to_string()))
    }

    fn commit(&mut self, next: Vec<Goal>) {
        // Best-effort persistence: the session keeps running on the new
        // in-memory state even when the durable write fails.
        if let Err(err) = self.store.save_goals(&next) {
            warn!("event=store_save module=service status=error error={err}");
        }
        self.goals = next;
    }
}
