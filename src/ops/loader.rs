//! Loader: validate a candidate record, then persist it
//!
//! A record that breaks the schema never reaches the store. Store failures
//! are reported as they happen and never retried.

use serde::Serialize;
use tracing::{info, warn};

use super::errors::{BatchError, LoadError};
use crate::record::{Record, RecordId};
use crate::schema::Schema;
use crate::store::Store;

/// Result of a successful load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadOutcome {
    /// Identifier assigned by the store, if it provides one
    pub id: Option<RecordId>,
    /// The record's name, for reporting
    pub name: Option<String>,
}

pub struct Loader<'a, S: Store> {
    store: &'a mut S,
    schema: &'a Schema,
}

impl<'a, S: Store> Loader<'a, S> {
    pub fn new(store: &'a mut S, schema: &'a Schema) -> Self {
        Self { store, schema }
    }

    /// Creates the target collection with the schema as its store-side
    /// validator. An existing collection is left as it is.
    pub fn prepare(&mut self) -> Result<(), LoadError> {
        self.store.create_collection(Some(self.schema))?;
        Ok(())
    }

    /// Validates `record` and, if it conforms, inserts it.
    pub fn load(&mut self, record: &Record) -> Result<LoadOutcome, LoadError> {
        let report = self.schema.validate(&record.to_value());
        if !report.is_valid() {
            warn!(
                name = record.name().unwrap_or("<unnamed>"),
                violations = report.violations().len(),
                "record rejected by schema"
            );
            return Err(LoadError::Validation(report));
        }

        let id = self.store.insert(record)?;
        info!(
            name = record.name().unwrap_or("<unnamed>"),
            id = id.as_ref().map(RecordId::as_str).unwrap_or("-"),
            "record inserted"
        );

        Ok(LoadOutcome {
            id,
            name: record.name().map(str::to_string),
        })
    }

    /// Loads `records` in order, stopping at the first failure.
    pub fn load_all(&mut self, records: &[Record]) -> Result<Vec<LoadOutcome>, BatchError> {
        let mut outcomes = Vec::with_capacity(records.len());
        for (index, record) in records.iter().enumerate() {
            let outcome = self
                .load(record)
                .map_err(|source| BatchError { index, source })?;
            outcomes.push(outcome);
        }
        Ok(outcomes)
    }
}
