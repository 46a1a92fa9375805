//! # Store Errors

use thiserror::Error;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Failures reported by a document store
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    // Transport
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    // Constraint errors
    #[error("Duplicate key: {0}")]
    DuplicateKey(String),

    #[error("Rejected by store validator: {0}")]
    Rejected(String),

    // Internal
    #[error("Unexpected store error: {0}")]
    Unexpected(String),
}

impl StoreError {
    /// Returns true for store-side constraint violations.
    pub fn is_constraint(&self) -> bool {
        matches!(self, StoreError::DuplicateKey(_) | StoreError::Rejected(_))
    }

    /// Returns true when the store could not be reached.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, StoreError::Unavailable(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constraint_classification() {
        assert!(StoreError::DuplicateKey("_id".into()).is_constraint());
        assert!(StoreError::Rejected("stats".into()).is_constraint());
        assert!(!StoreError::Unavailable("refused".into()).is_constraint());
        assert!(StoreError::Unavailable("refused".into()).is_unavailable());
    }

    #[test]
    fn test_display() {
        let err = StoreError::DuplicateKey("E11000 dup key".into());
        assert_eq!(err.to_string(), "Duplicate key: E11000 dup key");
    }
}
