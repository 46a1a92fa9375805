//! Operation error types
//!
//! Failure kinds:
//! - Connection: the store could not be reached
//! - Validation: the record broke the schema; nothing was written
//! - Constraint: the store refused the write (duplicate key, validator)
//! - Unexpected: anything else

use std::fmt;
use thiserror::Error;

use crate::schema::ValidationReport;
use crate::store::StoreError;

/// Coarse classification of an operation failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Connection,
    Validation,
    Constraint,
    Unexpected,
}

impl FailureKind {
    pub fn code(&self) -> &'static str {
        match self {
            FailureKind::Connection => "POKEDEX_STORE_UNAVAILABLE",
            FailureKind::Validation => "POKEDEX_VALIDATION_FAILED",
            FailureKind::Constraint => "POKEDEX_STORE_CONSTRAINT",
            FailureKind::Unexpected => "POKEDEX_UNEXPECTED",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl From<&StoreError> for FailureKind {
    fn from(err: &StoreError) -> Self {
        match err {
            StoreError::Unavailable(_) => FailureKind::Connection,
            StoreError::DuplicateKey(_) | StoreError::Rejected(_) => FailureKind::Constraint,
            StoreError::Unexpected(_) => FailureKind::Unexpected,
        }
    }
}

/// Why a record was not loaded
#[derive(Debug, Clone, Error)]
pub enum LoadError {
    #[error("Record failed validation: {0}")]
    Validation(ValidationReport),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl LoadError {
    pub fn kind(&self) -> FailureKind {
        match self {
            LoadError::Validation(_) => FailureKind::Validation,
            LoadError::Store(err) => FailureKind::from(err),
        }
    }

    /// Itemised schema violations, or the single store failure message
    pub fn errors(&self) -> Vec<String> {
        match self {
            LoadError::Validation(report) => report.errors(),
            LoadError::Store(err) => vec![err.to_string()],
        }
    }
}

/// A batch load stopped at the record at `index`
///
/// Every record before `index` was stored; none after it was attempted.
#[derive(Debug, Clone, Error)]
#[error("Record {index} not loaded: {source}")]
pub struct BatchError {
    pub index: usize,
    pub source: LoadError,
}

/// Why a sample could not be taken
#[derive(Debug, Clone, Error)]
pub enum InspectError {
    #[error("Sample limit must be a positive integer, got {0}")]
    InvalidLimit(usize),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl InspectError {
    pub fn kind(&self) -> FailureKind {
        match self {
            InspectError::InvalidLimit(_) => FailureKind::Unexpected,
            InspectError::Store(err) => FailureKind::from(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_errors_map_to_kinds() {
        let unavailable = LoadError::from(StoreError::Unavailable("refused".into()));
        let duplicate = LoadError::from(StoreError::DuplicateKey("_id".into()));
        let other = LoadError::from(StoreError::Unexpected("?".into()));
        assert_eq!(unavailable.kind(), FailureKind::Connection);
        assert_eq!(duplicate.kind(), FailureKind::Constraint);
        assert_eq!(other.kind(), FailureKind::Unexpected);
    }

    #[test]
    fn test_validation_kind_is_distinct_from_constraint() {
        let err = LoadError::Validation(ValidationReport::default());
        assert_eq!(err.kind(), FailureKind::Validation);
        assert_ne!(err.kind(), FailureKind::Constraint);
    }

    #[test]
    fn test_kind_codes() {
        assert_eq!(FailureKind::Connection.code(), "POKEDEX_STORE_UNAVAILABLE");
        assert_eq!(FailureKind::Validation.to_string(), "POKEDEX_VALIDATION_FAILED");
    }
}
