//! Schema Definition subsystem
//!
//! Rules describing a valid Record are declarative data, never hand-written
//! field checks.
//!
//! # Design Principles
//!
//! - `$ref`s are resolved once, at load time, into a flat rule tree
//! - Validation collects every violation and never mutates the document
//! - The same tree is exported as the store-side `$jsonSchema` validator
//! - No nulls, defaults, or coercion

mod definition;
mod errors;
mod loader;
mod types;
mod validator;

pub use definition::{Definition, Strictness, DEFAULT_ELEMENTS, STAT_MAX, STAT_MIN, STAT_NAMES};
pub use errors::{SchemaError, SchemaErrorCode, SchemaResult, Violation, ViolationKind};
pub use loader::SchemaLoader;
pub use types::{ObjectRule, Rule, Schema};
pub use validator::ValidationReport;
