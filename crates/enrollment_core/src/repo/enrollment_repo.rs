//! Enrollment repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Insert and read students and subjects.
//! - Own the `enrollments` junction table and its insert/query paths.
//!
//! # Invariants
//! - Every insert is committed immediately; there is no staged write.
//! - A `(student_id, subject_id)` pair is stored at most once.
//! - Relation reads return rows in enrollment insertion order.
//! - `maximum_capacity` is stored and returned, never checked.

use crate::db::migrations::{current_user_version, latest_version};
use crate::db::DbError;
use crate::model::student::{NewStudent, Student, StudentId};
use crate::model::subject::{CapacityUsage, NewSubject, Subject, SubjectId};
use chrono::{DateTime, SecondsFormat, Utc};
use log::{debug, info};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const STUDENT_SELECT_SQL: &str = "SELECT
    students.id AS id,
    students.name AS name,
    students.enrollment_date AS enrollment_date
FROM students";

const SUBJECT_SELECT_SQL: &str = "SELECT
    subjects.id AS id,
    subjects.title AS title,
    subjects.maximum_capacity AS maximum_capacity
FROM subjects";

const REQUIRED_COLUMNS: &[(&str, &[&str])] = &[
    ("students", &["id", "name", "enrollment_date"]),
    ("subjects", &["id", "title", "maximum_capacity"]),
    ("enrollments", &["id", "student_id", "subject_id"]),
];

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for enrollment persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    /// Enrollment referenced a student id with no stored row.
    StudentNotFound(StudentId),
    InvalidData(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::StudentNotFound(id) => write!(f, "student not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}; open it with db::open_db first"
            ),
            Self::MissingRequiredTable(table) => write!(f, "required table `{table}` is missing"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "required column `{table}.{column}` is missing")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Result of an enrollment request that did not hit a storage fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnrollmentOutcome {
    /// A new junction row was written.
    Enrolled,
    /// The pair was already enrolled; nothing changed.
    AlreadyEnrolled,
    /// No subject with this id exists; nothing changed.
    SubjectNotFound(SubjectId),
}

/// Repository interface for students, subjects and enrollments.
pub trait EnrollmentRepository {
    /// Inserts a subject and returns its generated id.
    fn add_subject(&self, subject: &NewSubject) -> RepoResult<SubjectId>;
    /// Inserts a student and returns its generated id.
    fn add_student(&self, student: &NewStudent) -> RepoResult<StudentId>;
    /// Enrolls one student in one subject.
    ///
    /// A missing subject is reported as an outcome; a missing student of an
    /// existing subject is an error.
    fn enroll_student_to_subject(
        &self,
        student_id: StudentId,
        subject_id: SubjectId,
    ) -> RepoResult<EnrollmentOutcome>;
    /// Lists every subject without loading enrollments.
    fn get_all_subjects(&self) -> RepoResult<Vec<Subject>>;
    /// Lists every student without loading enrollments.
    fn get_all_students(&self) -> RepoResult<Vec<Student>>;
    /// Returns enrolled students, or `None` when the subject does not exist.
    fn get_students_for_subject(&self, subject_id: SubjectId)
        -> RepoResult<Option<Vec<Student>>>;
    /// Returns enrolled subjects, or `None` when the student does not exist.
    fn get_subjects_for_student(&self, student_id: StudentId)
        -> RepoResult<Option<Vec<Subject>>>;
    fn get_subject(
        &self,
        subject_id: SubjectId,
        include_students: bool,
    ) -> RepoResult<Option<Subject>>;
    fn get_student(
        &self,
        student_id: StudentId,
        include_subjects: bool,
    ) -> RepoResult<Option<Student>>;
    /// Counts enrollments of a subject without loading them.
    ///
    /// Returns `None` when the subject does not exist.
    fn capacity_usage(&self, subject_id: SubjectId) -> RepoResult<Option<CapacityUsage>>;
}

/// SQLite-backed enrollment repository.
pub struct SqliteEnrollmentRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteEnrollmentRepository<'conn> {
    /// Wraps a connection returned by `db::open_db` / `db::open_db_in_memory`.
    ///
    /// # Errors
    /// - `UninitializedConnection` when migrations have not been applied.
    /// - `MissingRequiredTable` / `MissingRequiredColumn` when the schema
    ///   does not have the expected shape.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }

    fn subject_exists(&self, subject_id: SubjectId) -> RepoResult<bool> {
        row_exists(self.conn, "subjects", subject_id)
    }

    fn student_exists(&self, student_id: StudentId) -> RepoResult<bool> {
        row_exists(self.conn, "students", student_id)
    }

    fn load_students_for_subject(&self, subject_id: SubjectId) -> RepoResult<Vec<Student>> {
        let mut stmt = self.conn.prepare(&format!(
            "{STUDENT_SELECT_SQL}
             INNER JOIN enrollments e ON e.student_id = students.id
             WHERE e.subject_id = ?1
             ORDER BY e.id ASC;"
        ))?;
        let mut rows = stmt.query([subject_id])?;
        let mut students = Vec::new();
        while let Some(row) = rows.next()? {
            students.push(parse_student_row(row)?);
        }
        Ok(students)
    }

    fn load_subjects_for_student(&self, student_id: StudentId) -> RepoResult<Vec<Subject>> {
        let mut stmt = self.conn.prepare(&format!(
            "{SUBJECT_SELECT_SQL}
             INNER JOIN enrollments e ON e.subject_id = subjects.id
             WHERE e.student_id = ?1
             ORDER BY e.id ASC;"
        ))?;
        let mut rows = stmt.query([student_id])?;
        let mut subjects = Vec::new();
        while let Some(row) = rows.next()? {
            subjects.push(parse_subject_row(row)?);
        }
        Ok(subjects)
    }
}

impl EnrollmentRepository for SqliteEnrollmentRepository<'_> {
    fn add_subject(&self, subject: &NewSubject) -> RepoResult<SubjectId> {
        self.conn.execute(
            "INSERT INTO subjects (title, maximum_capacity) VALUES (?1, ?2);",
            params![subject.title.as_str(), subject.maximum_capacity],
        )?;
        let id = self.conn.last_insert_rowid();
        debug!("event=subject_add module=repo status=ok subject_id={id}");
        Ok(id)
    }

    fn add_student(&self, student: &NewStudent) -> RepoResult<StudentId> {
        self.conn.execute(
            "INSERT INTO students (name, enrollment_date) VALUES (?1, ?2);",
            params![
                student.name.as_str(),
                timestamp_to_db(&student.enrollment_date)
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        debug!("event=student_add module=repo status=ok student_id={id}");
        Ok(id)
    }

    fn enroll_student_to_subject(
        &self,
        student_id: StudentId,
        subject_id: SubjectId,
    ) -> RepoResult<EnrollmentOutcome> {
        if !self.subject_exists(subject_id)? {
            info!(
                "event=enroll module=repo status=skipped reason=subject_not_found student_id={student_id} subject_id={subject_id}"
            );
            return Ok(EnrollmentOutcome::SubjectNotFound(subject_id));
        }
        if !self.student_exists(student_id)? {
            return Err(RepoError::StudentNotFound(student_id));
        }

        let changed = self.conn.execute(
            "INSERT OR IGNORE INTO enrollments (student_id, subject_id) VALUES (?1, ?2);",
            params![student_id, subject_id],
        )?;

        if changed == 0 {
            info!(
                "event=enroll module=repo status=skipped reason=already_enrolled student_id={student_id} subject_id={subject_id}"
            );
            return Ok(EnrollmentOutcome::AlreadyEnrolled);
        }

        Ok(EnrollmentOutcome::Enrolled)
    }

    fn get_all_subjects(&self) -> RepoResult<Vec<Subject>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{SUBJECT_SELECT_SQL} ORDER BY subjects.id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut subjects = Vec::new();
        while let Some(row) = rows.next()? {
            subjects.push(parse_subject_row(row)?);
        }
        Ok(subjects)
    }

    fn get_all_students(&self) -> RepoResult<Vec<Student>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{STUDENT_SELECT_SQL} ORDER BY students.id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut students = Vec::new();
        while let Some(row) = rows.next()? {
            students.push(parse_student_row(row)?);
        }
        Ok(students)
    }

    fn get_students_for_subject(
        &self,
        subject_id: SubjectId,
    ) -> RepoResult<Option<Vec<Student>>> {
        if !self.subject_exists(subject_id)? {
            return Ok(None);
        }
        self.load_students_for_subject(subject_id).map(Some)
    }

    fn get_subjects_for_student(
        &self,
        student_id: StudentId,
    ) -> RepoResult<Option<Vec<Subject>>> {
        if !self.student_exists(student_id)? {
            return Ok(None);
        }
        self.load_subjects_for_student(student_id).map(Some)
    }

    fn get_subject(
        &self,
        subject_id: SubjectId,
        include_students: bool,
    ) -> RepoResult<Option<Subject>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{SUBJECT_SELECT_SQL} WHERE subjects.id = ?1;"))?;
        let mut rows = stmt.query([subject_id])?;
        let Some(row) = rows.next()? else {
            return Ok(None);
        };

        let mut subject = parse_subject_row(row)?;
        if include_students {
            subject.enrolled_students = Some(self.load_students_for_subject(subject_id)?);
        }
        Ok(Some(subject))
    }

    fn get_student(
        &self,
        student_id: StudentId,
        include_subjects: bool,
    ) -> RepoResult<Option<Student>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{STUDENT_SELECT_SQL} WHERE students.id = ?1;"))?;
        let mut rows = stmt.query([student_id])?;
        let Some(row) = rows.next()? else {
            return Ok(None);
        };

        let mut student = parse_student_row(row)?;
        if include_subjects {
            student.enrolled_subjects = Some(self.load_subjects_for_student(student_id)?);
        }
        Ok(Some(student))
    }

    fn capacity_usage(&self, subject_id: SubjectId) -> RepoResult<Option<CapacityUsage>> {
        let usage = self
            .conn
            .query_row(
                "SELECT
                    subjects.maximum_capacity,
                    (SELECT COUNT(*) FROM enrollments e WHERE e.subject_id = subjects.id)
                 FROM subjects
                 WHERE subjects.id = ?1;",
                [subject_id],
                |row| {
                    Ok(CapacityUsage {
                        maximum_capacity: row.get(0)?,
                        enrolled: row.get(1)?,
                    })
                },
            )
            .optional()?;
        Ok(usage)
    }
}

fn parse_student_row(row: &Row<'_>) -> RepoResult<Student> {
    let date_text: String = row.get("enrollment_date")?;
    Ok(Student {
        id: row.get("id")?,
        name: row.get("name")?,
        enrollment_date: parse_timestamp(&date_text)?,
        enrolled_subjects: None,
    })
}

fn parse_subject_row(row: &Row<'_>) -> RepoResult<Subject> {
    Ok(Subject {
        id: row.get("id")?,
        title: row.get("title")?,
        maximum_capacity: row.get("maximum_capacity")?,
        enrolled_students: None,
    })
}

/// RFC 3339 with nanoseconds, so a stored timestamp reads back unchanged.
fn timestamp_to_db(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

fn parse_timestamp(value: &str) -> RepoResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|_| {
            RepoError::InvalidData(format!(
                "invalid timestamp `{value}` in students.enrollment_date"
            ))
        })
}

fn row_exists(conn: &Connection, table: &'static str, id: i64) -> RepoResult<bool> {
    let found = conn
        .query_row(
            &format!("SELECT 1 FROM {table} WHERE id = ?1;"),
            [id],
            |row| row.get::<_, i64>(0),
        )
        .optional()?;
    Ok(found.is_some())
}

fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version = current_user_version(conn)?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    for &(table, columns) in REQUIRED_COLUMNS {
        if !table_exists(conn, table)? {
            return Err(RepoError::MissingRequiredTable(table));
        }
        for &column in columns {
            if !table_has_column(conn, table, column)? {
                return Err(RepoError::MissingRequiredColumn { table, column });
            }
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::{parse_timestamp, timestamp_to_db, RepoError};
    use chrono::{TimeZone, Utc};

    #[test]
    fn timestamp_text_keeps_nanoseconds() {
        let value = Utc
            .timestamp_opt(1_700_000_000, 123_456_789)
            .single()
            .expect("valid timestamp");
        let text = timestamp_to_db(&value);
        assert_eq!(text, "2023-11-14T22:13:20.123456789Z");
        assert_eq!(parse_timestamp(&text).unwrap(), value);
    }

    #[test]
    fn malformed_timestamp_is_invalid_data() {
        let err = parse_timestamp("yesterday").unwrap_err();
        assert!(matches!(err, RepoError::InvalidData(message) if message.contains("yesterday")));
    }
}
