// Entity Models
//
// Each entity has:
// - Stable identity (UUID v4) assigned once at creation, never changes
// - Immutable values (no update path exists)
// - A creation timestamp for display ordering and diagnostics
//
// References between entities are plain id strings. Only the store
// validates them; an entity on its own never checks its references.

use serde::{Deserialize, Serialize};
use std::fmt;

pub mod course;
pub mod course_type;
pub mod registration;

pub use course::Course;
pub use course_type::CourseType;
pub use registration::Registration;

/// The three collections held by the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    CourseType,
    Course,
    Registration,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::CourseType => "course type",
            EntityKind::Course => "course",
            EntityKind::Registration => "registration",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fresh identifier for a new entity
pub(crate) fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_kind_display() {
        assert_eq!(EntityKind::CourseType.to_string(), "course type");
        assert_eq!(EntityKind::Course.to_string(), "course");
        assert_eq!(EntityKind::Registration.to_string(), "registration");
    }

    #[test]
    fn test_new_id_is_uuid() {
        let id = new_id();
        assert!(uuid::Uuid::parse_str(&id).is_ok());
        assert_ne!(id, new_id());
    }
}
