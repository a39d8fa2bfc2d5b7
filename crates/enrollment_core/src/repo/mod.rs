//! Repository layer over the enrollment store.
//!
//! # Responsibility
//! - Define the data access contract used by services.
//! - Keep SQL inside the core persistence boundary.
//!
//! # Invariants
//! - Lookups by an unknown id return `Ok(None)`, never an error.
//! - Transport failures surface as `RepoError::Db`.

pub mod enrollment_repo;
