//! Domain model for weekly goal tracking.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Keep goal/completion shapes identical across storage and reports.
//!
//! # Invariants
//! - Every domain object is identified by a stable UUID.
//! - Goals and completions are append-only; nothing in core mutates or
//!   deletes them after creation.

pub mod goal;
