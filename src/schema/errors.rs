//! Schema error types
//!
//! Error codes:
//! - POKEDEX_SCHEMA_MALFORMED: a keyword has the wrong shape
//! - POKEDEX_SCHEMA_UNSUPPORTED: a keyword the rule tree cannot express
//! - POKEDEX_SCHEMA_UNKNOWN_REF: `$ref` names a missing definition
//! - POKEDEX_SCHEMA_REF_CYCLE: `$ref` chain loops back on itself
//!
//! Document violations are not errors of the schema itself; they are
//! collected as `Violation`s inside a `ValidationReport`.

use std::fmt;

/// Schema-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaErrorCode {
    /// Keyword present with an invalid value
    Malformed,
    /// Keyword not supported by the rule tree
    Unsupported,
    /// Reference to a definition that does not exist
    UnknownRef,
    /// Reference chain that never reaches a concrete rule
    RefCycle,
}

impl SchemaErrorCode {
    /// Returns the stable string code
    pub fn code(&self) -> &'static str {
        match self {
            SchemaErrorCode::Malformed => "POKEDEX_SCHEMA_MALFORMED",
            SchemaErrorCode::Unsupported => "POKEDEX_SCHEMA_UNSUPPORTED",
            SchemaErrorCode::UnknownRef => "POKEDEX_SCHEMA_UNKNOWN_REF",
            SchemaErrorCode::RefCycle => "POKEDEX_SCHEMA_REF_CYCLE",
        }
    }
}

impl fmt::Display for SchemaErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Error raised while turning a schema document into a rule tree.
#[derive(Debug, Clone)]
pub struct SchemaError {
    code: SchemaErrorCode,
    /// JSON pointer of the offending keyword within the schema document
    location: String,
    message: String,
}

impl SchemaError {
    pub fn malformed(location: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            code: SchemaErrorCode::Malformed,
            location: location.into(),
            message: reason.into(),
        }
    }

    pub fn unsupported(location: impl Into<String>, keyword: &str) -> Self {
        Self {
            code: SchemaErrorCode::Unsupported,
            location: location.into(),
            message: format!("keyword '{}' is not supported", keyword),
        }
    }

    pub fn unknown_ref(location: impl Into<String>, reference: &str) -> Self {
        Self {
            code: SchemaErrorCode::UnknownRef,
            location: location.into(),
            message: format!("reference '{}' does not resolve", reference),
        }
    }

    pub fn ref_cycle(location: impl Into<String>, chain: &[String]) -> Self {
        Self {
            code: SchemaErrorCode::RefCycle,
            location: location.into(),
            message: format!("reference cycle: {}", chain.join(" -> ")),
        }
    }

    /// Returns the error code
    pub fn code(&self) -> SchemaErrorCode {
        self.code
    }

    /// Returns the location inside the schema document
    pub fn location(&self) -> &str {
        &self.location
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at '{}': {}", self.code, self.location, self.message)
    }
}

impl std::error::Error for SchemaError {}

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;

/// The rule a document value broke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViolationKind {
    /// Wrong JSON type
    TypeMismatch,
    /// Number outside the inclusive bounds
    OutOfRange,
    /// String not in the enumeration
    NotInEnum,
    /// Property not declared on a closed object
    AdditionalProperty,
    /// Required property absent
    MissingRequired,
}

impl ViolationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViolationKind::TypeMismatch => "type mismatch",
            ViolationKind::OutOfRange => "out of range",
            ViolationKind::NotInEnum => "disallowed enum value",
            ViolationKind::AdditionalProperty => "disallowed additional property",
            ViolationKind::MissingRequired => "missing required field",
        }
    }
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One failed rule at one field path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Field path (e.g. "stats.hp", "element[1]", "$root")
    pub field: String,
    /// Violated rule
    pub kind: ViolationKind,
    /// Expected type or condition
    pub expected: String,
    /// Actual value or type found
    pub actual: String,
}

impl Violation {
    pub fn type_mismatch(
        field: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            kind: ViolationKind::TypeMismatch,
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    pub fn out_of_range(
        field: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            kind: ViolationKind::OutOfRange,
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    pub fn not_in_enum(field: impl Into<String>, allowed: &[String], actual: &str) -> Self {
        Self {
            field: field.into(),
            kind: ViolationKind::NotInEnum,
            expected: format!("one of [{}]", allowed.join(", ")),
            actual: format!("'{}'", actual),
        }
    }

    pub fn additional_property(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            kind: ViolationKind::AdditionalProperty,
            expected: "no undeclared fields".into(),
            actual: "extra field present".into(),
        }
    }

    pub fn missing_required(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            kind: ViolationKind::MissingRequired,
            expected: "field to be present".into(),
            actual: "missing".into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "field '{}': {}: expected {}, got {}",
            self.field, self.kind, self.expected, self.actual
        )
    }
}
