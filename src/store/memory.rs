//! # In-Memory Store
//!
//! Behaves like a single document collection: `_id` is assigned on insert and
//! must be unique, an attached validator rejects non-conforming writes, and
//! inserting into a missing collection creates it.

use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use super::errors::{StoreError, StoreResult};
use super::Store;
use crate::record::{Record, RecordId};
use crate::schema::Schema;

const ID_FIELD: &str = "_id";

#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Vec<Record>,
    validator: Option<Schema>,
    exists: bool,
    offline: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose every call fails as if the server could not be reached.
    pub fn unreachable() -> Self {
        Self {
            offline: true,
            ..Self::default()
        }
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Whether the collection currently exists.
    pub fn collection_exists(&self) -> bool {
        self.exists
    }

    /// Whether a validator is attached to the collection.
    pub fn has_validator(&self) -> bool {
        self.validator.is_some()
    }

    fn check_online(&self) -> StoreResult<()> {
        if self.offline {
            return Err(StoreError::Unavailable("connection refused".into()));
        }
        Ok(())
    }
}

impl Store for MemoryStore {
    fn create_collection(&mut self, validator: Option<&Schema>) -> StoreResult<()> {
        self.check_online()?;
        if self.exists {
            debug!("collection already exists");
            return Ok(());
        }
        self.exists = true;
        self.validator = validator.cloned();
        Ok(())
    }

    fn insert(&mut self, record: &Record) -> StoreResult<Option<RecordId>> {
        self.check_online()?;

        if let Some(validator) = &self.validator {
            let report = validator.validate(&record.to_value());
            if !report.is_valid() {
                return Err(StoreError::Rejected(report.to_string()));
            }
        }

        let mut fields = record.fields().clone();
        let id = match fields.get(ID_FIELD) {
            Some(existing) => {
                if self.records.iter().any(|r| r.get(ID_FIELD) == Some(existing)) {
                    return Err(StoreError::DuplicateKey(format!(
                        "{} {} already exists",
                        ID_FIELD, existing
                    )));
                }
                match existing {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                }
            }
            None => {
                let id = Uuid::new_v4().to_string();
                fields.insert(ID_FIELD.to_string(), Value::String(id.clone()));
                id
            }
        };

        self.exists = true;
        self.records.push(Record::new(fields));
        Ok(Some(RecordId::new(id)))
    }

    fn sample(&self, limit: usize) -> StoreResult<Vec<Record>> {
        self.check_online()?;
        Ok(self.records.iter().take(limit).cloned().collect())
    }

    fn drop_collection(&mut self) -> StoreResult<()> {
        self.check_online()?;
        self.records.clear();
        self.validator = None;
        self.exists = false;
        Ok(())
    }
}
