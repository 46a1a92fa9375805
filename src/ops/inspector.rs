//! Inspector: read a bounded sample of stored records

use tracing::info;

use super::errors::InspectError;
use crate::record::Record;
use crate::store::Store;

/// Sample size used when the caller gives none.
pub const DEFAULT_SAMPLE_LIMIT: usize = 5;

pub struct Inspector<'a, S: Store> {
    store: &'a S,
}

impl<'a, S: Store> Inspector<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Returns at most `limit` records (default 5) in the store's natural
    /// order. Nothing is sorted or modified.
    pub fn sample(&self, limit: Option<usize>) -> Result<Vec<Record>, InspectError> {
        let limit = limit.unwrap_or(DEFAULT_SAMPLE_LIMIT);
        if limit == 0 {
            return Err(InspectError::InvalidLimit(limit));
        }

        let mut records = self.store.sample(limit)?;
        records.truncate(limit);
        info!(limit, returned = records.len(), "sampled records");
        Ok(records)
    }
}
