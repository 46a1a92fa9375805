//! Reset: remove every stored record

use tracing::info;

use crate::store::{Store, StoreResult};

pub struct Reset<'a, S: Store> {
    store: &'a mut S,
}

impl<'a, S: Store> Reset<'a, S> {
    pub fn new(store: &'a mut S) -> Self {
        Self { store }
    }

    /// Drops the record collection. Running it on an empty store is a no-op.
    pub fn run(&mut self) -> StoreResult<()> {
        self.store.drop_collection()?;
        info!("record collection dropped");
        Ok(())
    }
}
