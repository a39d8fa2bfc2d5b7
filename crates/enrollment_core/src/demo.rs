//! Fixed demo script: one subject, two students, two enrollments.
//!
//! Output is plain text, one line per item: the titles of the first
//! student's subjects, then the names of the subject's students.

use crate::model::student::StudentId;
use crate::model::subject::SubjectId;
use crate::repo::enrollment_repo::{EnrollmentRepository, RepoError};
use crate::service::enrollment_service::EnrollmentService;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::Write;

const DEMO_SUBJECT_TITLE: &str = ".NET";
const DEMO_SUBJECT_CAPACITY: i64 = 20;
const DEMO_STUDENT_NAMES: [&str; 2] = ["John", "Jane"];

/// Ids created by one demo run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemoReport {
    pub subject_id: SubjectId,
    pub student_ids: Vec<StudentId>,
}

#[derive(Debug)]
pub enum DemoError {
    Repo(RepoError),
    Io(std::io::Error),
}

impl Display for DemoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "{err}"),
            Self::Io(err) => write!(f, "failed to write demo output: {err}"),
        }
    }
}

impl Error for DemoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::Io(err) => Some(err),
        }
    }
}

impl From<RepoError> for DemoError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<std::io::Error> for DemoError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

/// Runs the demo against `service`, writing its lines to `out`.
pub fn run_demo<R: EnrollmentRepository>(
    service: &EnrollmentService<R>,
    out: &mut impl Write,
) -> Result<DemoReport, DemoError> {
    let subject_id = service.create_subject(DEMO_SUBJECT_TITLE, DEMO_SUBJECT_CAPACITY)?;
    let student_ids = DEMO_STUDENT_NAMES
        .iter()
        .map(|name| service.register_student(*name))
        .collect::<Result<Vec<_>, _>>()?;

    for student_id in &student_ids {
        service.enroll(*student_id, subject_id)?;
    }

    if let Some(first_id) = student_ids.first() {
        let subjects = service
            .get_subjects_for_student(*first_id)?
            .unwrap_or_default();
        for subject in &subjects {
            writeln!(out, "{}", subject.title)?;
        }
    }

    let enrolled = service
        .get_students_for_subject(subject_id)?
        .unwrap_or_default();
    for student in &enrolled {
        writeln!(out, "{}", student.name)?;
    }

    Ok(DemoReport {
        subject_id,
        student_ids,
    })
}
