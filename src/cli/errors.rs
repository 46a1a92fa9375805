//! CLI-specific error types
//!
//! Every CLI error ends the process with a non-zero exit code.

use std::fmt;
use std::io;

use crate::ops::{BatchError, FailureKind, InspectError, LoadError};
use crate::schema::SchemaError;
use crate::store::StoreError;

/// CLI error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Configuration file error
    ConfigError,
    /// I/O error (files, stdout)
    IoError,
    /// Data file is not a list of records
    DataError,
    /// Schema document could not be resolved
    SchemaError,
    /// Store unreachable
    StoreUnavailable,
    /// Record broke the schema
    ValidationFailed,
    /// Store refused the write
    StoreConstraint,
    /// Anything else the store reported
    Unexpected,
}

impl CliErrorCode {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError => "POKEDEX_CLI_CONFIG_ERROR",
            Self::IoError => "POKEDEX_CLI_IO_ERROR",
            Self::DataError => "POKEDEX_CLI_DATA_ERROR",
            Self::SchemaError => "POKEDEX_CLI_SCHEMA_ERROR",
            Self::StoreUnavailable => FailureKind::Connection.code(),
            Self::ValidationFailed => FailureKind::Validation.code(),
            Self::StoreConstraint => FailureKind::Constraint.code(),
            Self::Unexpected => FailureKind::Unexpected.code(),
        }
    }
}

impl From<FailureKind> for CliErrorCode {
    fn from(kind: FailureKind) -> Self {
        match kind {
            FailureKind::Connection => Self::StoreUnavailable,
            FailureKind::Validation => Self::ValidationFailed,
            FailureKind::Constraint => Self::StoreConstraint,
            FailureKind::Unexpected => Self::Unexpected,
        }
    }
}

/// CLI error
#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
    /// Itemised details (one schema violation per entry)
    details: Vec<String>,
}

impl CliError {
    /// Create a new CLI error
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: Vec::new(),
        }
    }

    /// Config error
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ConfigError, msg)
    }

    /// I/O error
    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    /// Data file error
    pub fn data_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::DataError, msg)
    }

    pub fn with_details(mut self, details: Vec<String>) -> Self {
        self.details = details;
        self
    }

    /// Get the error code
    pub fn code(&self) -> CliErrorCode {
        self.code
    }

    /// Get the error code string
    pub fn code_str(&self) -> &'static str {
        self.code.code()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the itemised details
    pub fn details(&self) -> &[String] {
        &self.details
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)?;
        for detail in &self.details {
            write!(f, "\n  - {}", detail)?;
        }
        Ok(())
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::io_error(format!("JSON error: {}", e))
    }
}

impl From<SchemaError> for CliError {
    fn from(e: SchemaError) -> Self {
        Self::new(CliErrorCode::SchemaError, e.to_string())
    }
}

impl From<StoreError> for CliError {
    fn from(e: StoreError) -> Self {
        Self::new(FailureKind::from(&e).into(), e.to_string())
    }
}

impl From<LoadError> for CliError {
    fn from(e: LoadError) -> Self {
        match e {
            LoadError::Validation(report) => Self::new(
                CliErrorCode::ValidationFailed,
                format!("Record failed validation with {} violation(s)", report.violations().len()),
            )
            .with_details(report.errors()),
            LoadError::Store(store) => store.into(),
        }
    }
}

impl From<BatchError> for CliError {
    fn from(e: BatchError) -> Self {
        let index = e.index;
        let inner = CliError::from(e.source);
        Self::new(inner.code, format!("Record {}: {}", index, inner.message)).with_details(inner.details)
    }
}

impl From<InspectError> for CliError {
    fn from(e: InspectError) -> Self {
        match e {
            InspectError::InvalidLimit(_) => Self::config_error(e.to_string()),
            InspectError::Store(store) => store.into(),
        }
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;
