//! # Record Store
//!
//! The document store that holds persisted Records. Each utility opens one
//! store handle, performs its single operation, and drops the handle, which
//! releases the connection on every path.

pub mod errors;
pub mod memory;
pub mod mongo;

use serde::{Deserialize, Serialize};

use crate::record::{Record, RecordId};
use crate::schema::Schema;

pub use errors::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use mongo::MongoStore;

/// Where the record collection lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Connection string of the store instance
    pub uri: String,
    /// Database name within the instance
    pub database: String,
    /// Collection holding the records
    pub collection: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            uri: "mongodb://localhost:27017".to_string(),
            database: "pokedex".to_string(),
            collection: "pokemon".to_string(),
        }
    }
}

/// Operations a record store must support.
pub trait Store: std::fmt::Debug {
    /// Create the record collection, enforcing `validator` on every write
    ///
    /// An already existing collection is left untouched.
    fn create_collection(&mut self, validator: Option<&Schema>) -> StoreResult<()>;

    /// Insert one record, returning the identifier the store assigned
    fn insert(&mut self, record: &Record) -> StoreResult<Option<RecordId>>;

    /// Return up to `limit` records in natural order
    fn sample(&self, limit: usize) -> StoreResult<Vec<Record>>;

    /// Remove the collection and every record in it
    ///
    /// Dropping a missing collection succeeds.
    fn drop_collection(&mut self) -> StoreResult<()>;
}
