//! Enrollment use-case service.
//!
//! # Responsibility
//! - Give callers one explicit handle for every enrollment use case.
//! - Stamp creation-time fields the repository leaves to its caller.
//!
//! # Invariants
//! - Never bypasses the repository; storage stays behind `R`.
//! - Capacity is reported in logs only, never enforced.

use crate::model::student::{NewStudent, Student, StudentId};
use crate::model::subject::{CapacityUsage, NewSubject, Subject, SubjectId};
use crate::repo::enrollment_repo::{EnrollmentOutcome, EnrollmentRepository, RepoResult};
use chrono::Utc;
use log::{info, warn};

/// Use-case facade wrapping one repository instance.
pub struct EnrollmentService<R: EnrollmentRepository> {
    repo: R,
}

impl<R: EnrollmentRepository> EnrollmentService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn add_subject(&self, subject: &NewSubject) -> RepoResult<SubjectId> {
        self.repo.add_subject(subject)
    }

    pub fn add_student(&self, student: &NewStudent) -> RepoResult<StudentId> {
        self.repo.add_student(student)
    }

    /// Creates a subject from its title and advisory capacity.
    pub fn create_subject(
        &self,
        title: impl Into<String>,
        maximum_capacity: i64,
    ) -> RepoResult<SubjectId> {
        let subject = NewSubject::new(title, maximum_capacity);
        let id = self.add_subject(&subject)?;
        info!("event=subject_create module=service status=ok subject_id={id}");
        Ok(id)
    }

    /// Creates a student whose enrollment date is the current time.
    pub fn register_student(&self, name: impl Into<String>) -> RepoResult<StudentId> {
        let student = NewStudent::new(name, Utc::now());
        let id = self.add_student(&student)?;
        info!("event=student_register module=service status=ok student_id={id}");
        Ok(id)
    }

    /// Enrolls a student and logs the outcome.
    ///
    /// Returns repository outcomes and errors unchanged. Once the junction
    /// row is committed the result is `Ok`; the capacity check after it only
    /// logs.
    pub fn enroll(
        &self,
        student_id: StudentId,
        subject_id: SubjectId,
    ) -> RepoResult<EnrollmentOutcome> {
        let outcome = self
            .repo
            .enroll_student_to_subject(student_id, subject_id)
            .inspect_err(|err| {
                warn!(
                    "event=enroll module=service status=error student_id={student_id} subject_id={subject_id} error={err}"
                );
            })?;

        if outcome == EnrollmentOutcome::Enrolled {
            info!(
                "event=enroll module=service status=ok student_id={student_id} subject_id={subject_id}"
            );
            self.warn_if_over_capacity(subject_id);
        }

        Ok(outcome)
    }

    fn warn_if_over_capacity(&self, subject_id: SubjectId) {
        match self.repo.capacity_usage(subject_id) {
            Ok(Some(usage)) if usage.over_by() > 0 => warn!(
                "event=enroll module=service status=over_capacity subject_id={subject_id} enrolled={} maximum_capacity={} over_by={}",
                usage.enrolled,
                usage.maximum_capacity,
                usage.over_by()
            ),
            Ok(_) => {}
            Err(err) => warn!(
                "event=capacity_check module=service status=error subject_id={subject_id} error={err}"
            ),
        }
    }

    pub fn enroll_student_to_subject(
        &self,
        student_id: StudentId,
        subject_id: SubjectId,
    ) -> RepoResult<EnrollmentOutcome> {
        self.enroll(student_id, subject_id)
    }

    pub fn get_all_subjects(&self) -> RepoResult<Vec<Subject>> {
        self.repo.get_all_subjects()
    }

    pub fn get_all_students(&self) -> RepoResult<Vec<Student>> {
        self.repo.get_all_students()
    }

    pub fn get_students_for_subject(
        &self,
        subject_id: SubjectId,
    ) -> RepoResult<Option<Vec<Student>>> {
        self.repo.get_students_for_subject(subject_id)
    }

    pub fn get_subjects_for_student(
        &self,
        student_id: StudentId,
    ) -> RepoResult<Option<Vec<Subject>>> {
        self.repo.get_subjects_for_student(student_id)
    }

    pub fn get_subject(
        &self,
        subject_id: SubjectId,
        include_students: bool,
    ) -> RepoResult<Option<Subject>> {
        self.repo.get_subject(subject_id, include_students)
    }

    pub fn get_student(
        &self,
        student_id: StudentId,
        include_subjects: bool,
    ) -> RepoResult<Option<Student>> {
        self.repo.get_student(student_id, include_subjects)
    }

    pub fn capacity_usage(&self, subject_id: SubjectId) -> RepoResult<Option<CapacityUsage>> {
        self.repo.capacity_usage(subject_id)
    }
}
