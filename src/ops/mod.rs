//! Record operations
//!
//! Each operation borrows an explicit store handle for its lifetime:
//! - Loader: validate, then insert
//! - Inspector: bounded sample
//! - Reset: drop everything

mod errors;
mod inspector;
mod loader;
mod reset;

pub use errors::{BatchError, FailureKind, InspectError, LoadError};
pub use inspector::{Inspector, DEFAULT_SAMPLE_LIMIT};
pub use loader::{LoadOutcome, Loader};
pub use reset::Reset;
