//! Domain model for students, subjects and their enrollments.
//!
//! # Invariants
//! - Ids are surrogate keys assigned by storage; insert payloads carry none.
//! - Relation fields are `None` when not loaded and never persisted directly.

pub mod student;
pub mod subject;
