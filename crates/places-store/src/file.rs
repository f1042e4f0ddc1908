//! Places store persisted as a JSON file.
//!
//! The file is the only copy of the table: every read and every mutation
//! loads it again, so several processes sharing one data directory (a
//! long-running `watch` next to one-off commands) see each other's writes.
//! Mutations are rewritten via `write_atomic`, so a crash leaves either the
//! old or the new document.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, info};

use places_core::{read_to_string_if_exists, write_atomic, PlacesStore, Record, RecordPatch, Result};

use crate::table::RecordTable;

/// Places store backed by a pretty-printed JSON array of records.
///
/// Each mutation reads, re-encodes, and fsyncs the whole document, so it
/// costs time proportional to the store size; importing N bookmarks one
/// upsert at a time writes O(N²) bytes. Mutations that leave the records
/// unchanged (re-importing the same file) skip the write.
///
/// Mutations from this instance are serialized. Writers in other processes
/// are not locked out: a read-modify-write racing another process's can
/// still lose one of the two changes.
#[derive(Debug)]
pub struct JsonFilePlacesStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFilePlacesStore {
    /// Open the store at `path`. A missing or blank file is an empty store;
    /// a file that does not parse is an error.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let store = Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        };
        let table = store.load().await?;
        info!(
            path = %store.path.display(),
            record_count = table.records().len(),
            "Places store opened"
        );
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<RecordTable> {
        let records: Vec<Record> = match read_to_string_if_exists(&self.path).await? {
            Some(raw) if !raw.trim().is_empty() => serde_json::from_str(&raw)?,
            _ => Vec::new(),
        };
        Ok(RecordTable::from_records(records))
    }

    async fn persist(&self, table: &RecordTable) -> Result<()> {
        let raw = serde_json::to_string_pretty(table.records())?;
        write_atomic(&self.path, raw.as_bytes()).await?;
        debug!(
            path = %self.path.display(),
            record_count = table.records().len(),
            "Places store saved"
        );
        Ok(())
    }

    /// Load the current file, apply `change`, and persist the result when
    /// the records differ. `change` returns `false` when it touched nothing.
    async fn mutate<F>(&self, change: F) -> Result<()>
    where
        F: FnOnce(&mut RecordTable) -> bool + Send,
    {
        let _guard = self.write_lock.lock().await;
        let mut table = self.load().await?;
        let before = serde_json::to_value(table.records())?;
        if !change(&mut table) || serde_json::to_value(table.records())? == before {
            debug!(path = %self.path.display(), "Places store unchanged");
            return Ok(());
        }
        self.persist(&table).await
    }
}

#[async_trait]
impl PlacesStore for JsonFilePlacesStore {
    async fn fetch_all(&self) -> Result<Vec<Record>> {
        let _guard = self.write_lock.lock().await;
        Ok(self.load().await?.records().to_vec())
    }

    async fn upsert(&self, patch: RecordPatch) -> Result<()> {
        patch.validate()?;
        self.mutate(move |table| {
            table.upsert(patch);
            true
        })
        .await
    }

    async fn delete(&self, url: &str) -> Result<()> {
        self.mutate(|table| table.delete(url)).await
    }

    async fn delete_all(&self) -> Result<()> {
        self.mutate(|table| table.delete_history() > 0).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_file_is_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFilePlacesStore::open(dir.path().join("places.json"))
            .await
            .unwrap();
        assert!(store.fetch_all().await.unwrap().is_empty());
        assert!(!store.path().exists());
    }

    #[tokio::test]
    async fn test_mutations_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("places.json");

        let store = JsonFilePlacesStore::open(&path).await.unwrap();
        store
            .upsert(
                RecordPatch::new("https://a.example/")
                    .with_title("A")
                    .with_bookmarked(true),
            )
            .await
            .unwrap();
        store
            .upsert(RecordPatch::new("https://b.example/").with_last_visit(10))
            .await
            .unwrap();
        store.delete_all().await.unwrap();
        drop(store);

        let reopened = JsonFilePlacesStore::open(&path).await.unwrap();
        let records = reopened.fetch_all().await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].url, "https://a.example/");
        assert_eq!(records[0].title, "A");
    }

    #[tokio::test]
    async fn test_instances_on_one_file_see_each_others_writes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("places.json");
        let watcher = JsonFilePlacesStore::open(&path).await.unwrap();
        let command = JsonFilePlacesStore::open(&path).await.unwrap();

        command
            .upsert(RecordPatch::new("https://c.example/").with_bookmarked(true))
            .await
            .unwrap();
        let seen = watcher.fetch_all().await.unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].url, "https://c.example/");

        watcher
            .upsert(RecordPatch::new("https://w.example/").with_bookmarked(true))
            .await
            .unwrap();
        let urls: Vec<String> = command
            .fetch_all()
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.url)
            .collect();
        assert_eq!(urls, vec!["https://c.example/", "https://w.example/"]);
    }

    #[tokio::test]
    async fn test_unchanged_upsert_leaves_file_alone() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("places.json");
        let compact = r#"[{"url":"https://a.example/","title":"A","isBookmarked":true,"tags":["x"],"lastVisit":5}]"#;
        std::fs::write(&path, compact).unwrap();
        let store = JsonFilePlacesStore::open(&path).await.unwrap();

        store
            .upsert(
                RecordPatch::new("https://a.example/")
                    .with_title("A")
                    .with_bookmarked(true),
            )
            .await
            .unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), compact);

        store
            .upsert(RecordPatch::new("https://a.example/").with_title("B"))
            .await
            .unwrap();
        assert_ne!(std::fs::read_to_string(&path).unwrap(), compact);
        assert_eq!(store.fetch_all().await.unwrap()[0].title, "B");
    }

    #[tokio::test]
    async fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("places.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert!(JsonFilePlacesStore::open(&path).await.is_err());
    }
}
