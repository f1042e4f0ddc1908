//! `PlacesClient` against `serve` over an in-process channel.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use places_core::{Error, PlacesStore, Record, RecordPatch, Result};
use places_rpc::{serve, Channel, PlacesClient, PortOpener};

/// Store whose writes always fail, as a full disk would.
#[derive(Default)]
struct ReadOnlyStore {
    records: Mutex<Vec<Record>>,
}

#[async_trait]
impl PlacesStore for ReadOnlyStore {
    async fn fetch_all(&self) -> Result<Vec<Record>> {
        Ok(self.records.lock().unwrap().clone())
    }

    async fn upsert(&self, _patch: RecordPatch) -> Result<()> {
        Err(Error::Internal("store is read-only".to_string()))
    }

    async fn delete(&self, _url: &str) -> Result<()> {
        Err(Error::Internal("store is read-only".to_string()))
    }

    async fn delete_all(&self) -> Result<()> {
        Err(Error::Internal("store is read-only".to_string()))
    }
}

struct ServedPort {
    store: Arc<dyn PlacesStore>,
}

#[async_trait]
impl PortOpener for ServedPort {
    async fn open(&self) -> Result<Channel> {
        let (client, server) = Channel::pair();
        tokio::spawn(serve(server, self.store.clone()));
        Ok(client)
    }
}

fn client() -> PlacesClient {
    let store = ReadOnlyStore::default();
    store.records.lock().unwrap().push(Record {
        url: "https://example.com/".into(),
        title: "Example".into(),
        is_bookmarked: true,
        tags: vec!["a".into()],
        last_visit: 42,
    });
    PlacesClient::new(Arc::new(ServedPort {
        store: Arc::new(store),
    }))
}

#[tokio::test]
async fn test_store_failure_reaches_caller() {
    let places = client();

    match places.upsert(RecordPatch::new("https://new.example/")).await {
        Err(Error::Store(message)) => assert!(message.contains("read-only")),
        other => panic!("Expected store error, got {:?}", other),
    }
    match places.delete_all().await {
        Err(Error::Store(_)) => {}
        other => panic!("Expected store error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_reads_still_work_after_failed_writes() {
    let places = client();

    let _ = places.delete_one("https://example.com/").await;
    let records = places.fetch_all().await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].last_visit, 42);
    assert_eq!(places.correlation().pending_count(), 0);
}
