//! Subject records.

use crate::model::student::Student;
use serde::{Deserialize, Serialize};

/// Storage-assigned subject identifier.
pub type SubjectId = i64;

/// Insert payload for a new subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSubject {
    pub title: String,
    /// Advisory upper bound on enrollment. Never enforced.
    pub maximum_capacity: i64,
}

impl NewSubject {
    pub fn new(title: impl Into<String>, maximum_capacity: i64) -> Self {
        Self {
            title: title.into(),
            maximum_capacity,
        }
    }
}

/// Persisted subject, optionally carrying its enrolled students.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub id: SubjectId,
    pub title: String,
    pub maximum_capacity: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enrolled_students: Option<Vec<Student>>,
}

impl Subject {
    pub fn matches(&self, new: &NewSubject) -> bool {
        self.title == new.title && self.maximum_capacity == new.maximum_capacity
    }

    /// Number of loaded students above the advisory capacity.
    ///
    /// Returns `None` while `enrolled_students` is not loaded.
    pub fn over_capacity_by(&self) -> Option<i64> {
        let enrolled = i64::try_from(self.enrolled_students.as_ref()?.len()).unwrap_or(i64::MAX);
        let usage = CapacityUsage {
            enrolled,
            maximum_capacity: self.maximum_capacity,
        };
        Some(usage.over_by())
    }
}

/// Enrollment count of one subject next to its advisory capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapacityUsage {
    pub enrolled: i64,
    pub maximum_capacity: i64,
}

impl CapacityUsage {
    /// Students above capacity, `0` when within it. Any `i64` capacity is
    /// accepted, negative ones included.
    pub fn over_by(&self) -> i64 {
        self.enrolled.saturating_sub(self.maximum_capacity).max(0)
    }
}
