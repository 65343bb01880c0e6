// Read-only projections over the store
//
// Joined views resolve foreign keys into their target entities. A reference
// that cannot be resolved at read time yields `Resolved::NotFound` instead of
// an error, so a consistency problem upstream never breaks the query path.

use crate::entities::{Course, CourseType, Registration};
use serde::{Deserialize, Serialize};

pub const NO_TYPE_LABEL: &str = "No Type";
pub const UNKNOWN_COURSE_LABEL: &str = "Unknown Course";

/// Outcome of resolving a reference at read time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum Resolved<T> {
    Found(T),
    NotFound,
}

impl<T> Resolved<T> {
    pub fn is_found(&self) -> bool {
        matches!(self, Resolved::Found(_))
    }

    pub fn as_ref(&self) -> Resolved<&T> {
        match self {
            Resolved::Found(value) => Resolved::Found(value),
            Resolved::NotFound => Resolved::NotFound,
        }
    }

    pub fn found(self) -> Option<T> {
        match self {
            Resolved::Found(value) => Some(value),
            Resolved::NotFound => None,
        }
    }
}

impl<T> From<Option<T>> for Resolved<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Resolved::Found(value),
            None => Resolved::NotFound,
        }
    }
}

/// A course with its type resolved
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseView {
    pub course: Course,
    pub resolved_type: Resolved<CourseType>,
}

impl CourseView {
    /// Display label, e.g. "Physics 101 (Science)"
    pub fn label(&self) -> String {
        let type_name = match &self.resolved_type {
            Resolved::Found(course_type) => course_type.name.as_str(),
            Resolved::NotFound => NO_TYPE_LABEL,
        };
        format!("{} ({})", self.course.name, type_name)
    }
}

/// A registration with its course and that course's type resolved
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistrationView {
    pub registration: Registration,
    pub course: Resolved<Course>,
    /// NotFound whenever `course` is NotFound
    pub course_type: Resolved<CourseType>,
}

impl RegistrationView {
    /// Display label, e.g. "Alice - Physics 101 (Science)"
    pub fn label(&self) -> String {
        let course_name = match &self.course {
            Resolved::Found(course) => course.name.as_str(),
            Resolved::NotFound => UNKNOWN_COURSE_LABEL,
        };
        let type_name = match &self.course_type {
            Resolved::Found(course_type) => course_type.name.as_str(),
            Resolved::NotFound => NO_TYPE_LABEL,
        };
        format!(
            "{} - {} ({})",
            self.registration.student_name, course_name, type_name
        )
    }
}

/// Collection sizes, as shown on the dashboard
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreStats {
    pub course_types: usize,
    pub courses: usize,
    pub registrations: usize,
}
