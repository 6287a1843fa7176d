//! Goal/task domain model.
//!
//! # Responsibility
//! - Define the canonical records persisted and exported by the core.
//! - Construct new entities with defaulted fields and stable identifiers.
//!
//! # Invariants
//! - Every entity carries a collision-resistant id (`goal-`/`task-` + UUID v4).
//! - A task is exclusively owned by exactly one goal.
//! - Records are replaced wholesale, never field-patched from outside the
//!   mutation engine.

pub mod goal;
pub mod task;
