// 📚 Course Entity - belongs to exactly one CourseType
//
// `type_id` is a foreign key into the CourseType collection. It is
// validated by the store at creation time and never re-pointed afterwards.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    /// Stable identity (UUID)
    pub id: String,

    /// Course name (e.g., "Physics 101")
    pub name: String,

    /// CourseType UUID (foreign key)
    pub type_id: String,

    pub created_at: DateTime<Utc>,
}

impl Course {
    /// Create new course entity with UUID
    ///
    /// Does not check `type_id`; use `RelationalStore::create_course` for that.
    pub fn new(name: impl Into<String>, type_id: impl Into<String>) -> Self {
        Course {
            id: super::new_id(),
            name: name.into(),
            type_id: type_id.into(),
            created_at: Utc::now(),
        }
    }

    /// Check if this course belongs to the given type
    pub fn is_of_type(&self, type_id: &str) -> bool {
        self.type_id == type_id
    }
}
