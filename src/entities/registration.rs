// 📝 Registration Entity - links a student name to exactly one Course

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Registration {
    /// Stable identity (UUID)
    pub id: String,

    /// Course UUID (foreign key)
    pub course_id: String,

    pub student_name: String,

    pub created_at: DateTime<Utc>,
}

impl Registration {
    pub fn new(student_name: impl Into<String>, course_id: impl Into<String>) -> Self {
        Registration {
            id: super::new_id(),
            course_id: course_id.into(),
            student_name: student_name.into(),
            created_at: Utc::now(),
        }
    }
}
