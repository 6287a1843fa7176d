//! Persistence adapter over the durable key-value store.
//!
//! # Responsibility
//! - Round-trip the full goal collection through one kv key.
//! - Persist display preferences under their own keys.
//!
//! # Invariants
//! - Loads are fail-open: a missing or unreadable record degrades to the
//!   default value, never an error to the caller.
//! - Saves are full-record overwrites; there are no partial writes.

pub mod goal_store;
