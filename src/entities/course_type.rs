// 🏷️ CourseType Entity - Root of the reference chain
//
// A category under which courses are organized (e.g. "Science").
// Has no outgoing references.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Course category
///
/// Identity: UUID (never changes)
/// Values: name (immutable once created)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseType {
    /// Stable identity (UUID)
    pub id: String,

    /// Display name (e.g., "Science", "Math")
    pub name: String,

    pub created_at: DateTime<Utc>,
}

impl CourseType {
    /// Create new course type with a fresh UUID
    pub fn new(name: impl Into<String>) -> Self {
        CourseType {
            id: super::new_id(),
            name: name.into(),
            created_at: Utc::now(),
        }
    }
}
