//! Record table shared by the store implementations.

use places_core::{Record, RecordPatch};

/// Records in first-insertion order, unique by URL.
#[derive(Debug, Default, Clone)]
pub(crate) struct RecordTable {
    records: Vec<Record>,
}

impl RecordTable {
    pub(crate) fn from_records(records: Vec<Record>) -> Self {
        let mut table = Self::default();
        // Later duplicates win, keeping the first position.
        for record in records {
            match table.position(&record.url) {
                Some(i) => table.records[i] = record,
                None => table.records.push(record),
            }
        }
        table
    }

    pub(crate) fn records(&self) -> &[Record] {
        &self.records
    }

    fn position(&self, url: &str) -> Option<usize> {
        self.records.iter().position(|r| r.url == url)
    }

    pub(crate) fn upsert(&mut self, patch: RecordPatch) {
        match self.position(&patch.url) {
            Some(i) => {
                let existing = self.records[i].clone();
                self.records[i] = patch.apply(Some(existing));
            }
            None => self.records.push(patch.apply(None)),
        }
    }

    /// Returns whether a record was removed.
    pub(crate) fn delete(&mut self, url: &str) -> bool {
        match self.position(url) {
            Some(i) => {
                self.records.remove(i);
                true
            }
            None => false,
        }
    }

    /// Drop history-only records. Returns how many were removed.
    pub(crate) fn delete_history(&mut self) -> usize {
        let before = self.records.len();
        self.records.retain(|r| r.is_bookmarked);
        before - self.records.len()
    }
}
