//! End-to-end tests: `PlacesClient` over a `LocalPort` against real stores.

use std::sync::Arc;

use chrono::Utc;
use places_core::{BookmarksView, HistoryView, PlacesStore, RecordPatch};
use places_rpc::PlacesClient;
use places_store::{JsonFilePlacesStore, LocalPort, MemoryPlacesStore};

fn client_for(store: Arc<dyn PlacesStore>) -> PlacesClient {
    PlacesClient::new(Arc::new(LocalPort::new(store)))
}

#[tokio::test]
async fn test_upsert_then_fetch_through_client() {
    let store = Arc::new(MemoryPlacesStore::new());
    let places = client_for(store.clone());

    places
        .upsert(
            RecordPatch::new("https://example.com/")
                .with_title("Example")
                .with_bookmarked(true)
                .with_last_visit(1_000),
        )
        .await
        .unwrap();

    let records = places.fetch_all().await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].title, "Example");
    assert_eq!(store.len(), 1);
}

#[tokio::test]
async fn test_many_concurrent_calls_share_one_channel() {
    let store = Arc::new(MemoryPlacesStore::new());
    let places = client_for(store.clone());

    let writes = (0..20).map(|i| {
        let places = places.clone();
        async move {
            places
                .upsert(RecordPatch::new(format!("https://site{i}.example/")))
                .await
        }
    });
    for result in futures::future::join_all(writes).await {
        result.unwrap();
    }

    assert_eq!(places.fetch_all().await.unwrap().len(), 20);
    assert_eq!(places.correlation().pending_count(), 0);
}

#[tokio::test]
async fn test_unbookmark_keeps_history_and_delete_all_removes_it() {
    let store = Arc::new(MemoryPlacesStore::new());
    let places = client_for(store.clone());

    places
        .upsert(RecordPatch::new("https://keep.example/").with_bookmarked(true))
        .await
        .unwrap();
    places
        .upsert(RecordPatch::new("https://drop.example/").with_bookmarked(true))
        .await
        .unwrap();
    places.unbookmark("https://drop.example/").await.unwrap();

    let records = places.fetch_all().await.unwrap();
    assert_eq!(records.len(), 2);
    assert!(!records.iter().find(|r| r.url == "https://drop.example/").unwrap().is_bookmarked);

    places.delete_all().await.unwrap();
    let records = places.fetch_all().await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].url, "https://keep.example/");

    places.delete_one("https://keep.example/").await.unwrap();
    places.delete_one("https://never.example/").await.unwrap();
    assert!(places.fetch_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_views_over_client() {
    let store = Arc::new(MemoryPlacesStore::new());
    let places: Arc<dyn PlacesStore> = Arc::new(client_for(store));
    let now = Utc::now().timestamp_millis();

    let mut bookmarks = BookmarksView::new(places.clone());
    let url = bookmarks.add("rust-lang.org", "", now).await.unwrap();
    assert_eq!(url.as_deref(), Some("https://rust-lang.org"));
    assert_eq!(bookmarks.add("   ", "", now).await.unwrap(), None);
    assert_eq!(bookmarks.items().len(), 1);
    assert_eq!(bookmarks.items()[0].title, "https://rust-lang.org");

    places
        .upsert(RecordPatch::new("https://old.example/").with_last_visit(now - 10))
        .await
        .unwrap();
    places
        .upsert(RecordPatch::new("https://new.example/").with_last_visit(now))
        .await
        .unwrap();

    let mut history = HistoryView::new(places.clone());
    history.refresh().await.unwrap();
    let urls: Vec<&str> = history.items().iter().map(|r| r.url.as_str()).collect();
    assert_eq!(urls, vec!["https://new.example/", "https://old.example/"]);
    assert_eq!(history.group_by_day(&Utc).len(), 1);

    bookmarks.remove("https://rust-lang.org").await.unwrap();
    assert!(bookmarks.items().is_empty());
    history.refresh().await.unwrap();
    assert_eq!(history.items().len(), 3);

    history.clear().await.unwrap();
    assert!(history.items().is_empty());
}

#[tokio::test]
async fn test_json_file_store_through_client() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("places.json");

    {
        let store = Arc::new(JsonFilePlacesStore::open(&path).await.unwrap());
        let places = client_for(store);
        places
            .upsert(RecordPatch::new("https://persist.example/").with_bookmarked(true))
            .await
            .unwrap();
    }

    let store = Arc::new(JsonFilePlacesStore::open(&path).await.unwrap());
    let places = client_for(store);
    let records = places.fetch_all().await.unwrap();
    assert_eq!(records.len(), 1);
    assert!(records[0].is_bookmarked);
}
