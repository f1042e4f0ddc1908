//! Volatile in-memory places store.

use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use tracing::debug;

use places_core::{PlacesStore, Record, RecordPatch, Result};

use crate::table::RecordTable;

/// Places store held in process memory.
#[derive(Debug, Default)]
pub struct MemoryPlacesStore {
    table: Mutex<RecordTable>,
}

impl MemoryPlacesStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with `records`.
    pub fn with_records(records: Vec<Record>) -> Self {
        Self {
            table: Mutex::new(RecordTable::from_records(records)),
        }
    }

    pub fn len(&self) -> usize {
        self.lock().records().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, RecordTable> {
        self.table.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl PlacesStore for MemoryPlacesStore {
    async fn fetch_all(&self) -> Result<Vec<Record>> {
        Ok(self.lock().records().to_vec())
    }

    async fn upsert(&self, patch: RecordPatch) -> Result<()> {
        patch.validate()?;
        self.lock().upsert(patch);
        Ok(())
    }

    async fn delete(&self, url: &str) -> Result<()> {
        let removed = self.lock().delete(url);
        debug!(url, removed, "Memory store delete");
        Ok(())
    }

    async fn delete_all(&self) -> Result<()> {
        let removed = self.lock().delete_history();
        debug!(record_count = removed, "Memory store history cleared");
        Ok(())
    }
}
