// Store error taxonomy
//
// Only caller-contract violations live here. Nothing in the store touches
// I/O, so there is no transient or retryable class.

use crate::entities::EntityKind;

/// Result type alias for store operations
pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// Dangling foreign key: the referenced entity does not exist
    #[error("Reference error: {entity} not found: {id}")]
    Reference { entity: EntityKind, id: String },

    /// Empty or whitespace-only name under the strict name policy
    #[error("{entity} name must not be empty")]
    EmptyName { entity: EntityKind },
}

impl StoreError {
    pub fn is_reference(&self) -> bool {
        matches!(self, StoreError::Reference { .. })
    }
}
