//! Student records.

use crate::model::subject::Subject;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Storage-assigned student identifier.
pub type StudentId = i64;

/// Insert payload for a new student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewStudent {
    pub name: String,
    pub enrollment_date: DateTime<Utc>,
}

impl NewStudent {
    pub fn new(name: impl Into<String>, enrollment_date: DateTime<Utc>) -> Self {
        Self {
            name: name.into(),
            enrollment_date,
        }
    }
}

/// Persisted student, optionally carrying its enrolled subjects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub id: StudentId,
    pub name: String,
    pub enrollment_date: DateTime<Utc>,
    /// `None` until loaded eagerly; loaded subjects do not nest further.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enrolled_subjects: Option<Vec<Subject>>,
}

impl Student {
    /// Returns `true` when this record matches `new` in every stored field.
    pub fn matches(&self, new: &NewStudent) -> bool {
        self.name == new.name && self.enrollment_date == new.enrollment_date
    }
}
