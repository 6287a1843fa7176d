//! Use-case services tying the mutation engine to persistence.
//!
//! # Responsibility
//! - Own the single in-memory state value and keep it the only writer.
//! - Persist every accepted mutation best-effort through the store.
//!
//! # Invariants
//! - State changes flow one way: engine computes, service commits.
//! - A failed save never loses the in-memory state; it is logged and the
//!   session continues.

pub mod goal_service;
