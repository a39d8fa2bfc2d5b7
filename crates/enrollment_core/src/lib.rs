//! Core domain logic for the enrollment tracker.
//! Students, subjects and the enrollments between them live here; callers
//! only reach storage through the repository/service APIs.

pub mod db;
pub mod demo;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use demo::{run_demo, DemoError, DemoReport};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::student::{NewStudent, Student, StudentId};
pub use model::subject::{CapacityUsage, NewSubject, Subject, SubjectId};
pub use repo::enrollment_repo::{
    EnrollmentOutcome, EnrollmentRepository, RepoError, RepoResult, SqliteEnrollmentRepository,
};
pub use service::enrollment_service::EnrollmentService;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
