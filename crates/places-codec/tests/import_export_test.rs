//! Import/export behavior against a real in-memory store.

use places_codec::{export_all, export_bookmarks, import};
use places_core::{ManualClock, PlacesStore, Record, RecordPatch};
use places_store::MemoryPlacesStore;

const NOW: i64 = 1_800_000_000_000;

const FIREFOX_STYLE: &str = r#"<!DOCTYPE NETSCAPE-Bookmark-file-1>
<!-- This is an automatically generated file.
     It will be read and overwritten.
     DO NOT EDIT! -->
<META HTTP-EQUIV="Content-Type" CONTENT="text/html; charset=UTF-8">
<meta http-equiv="Content-Security-Policy" content="default-src 'self'">
<TITLE>Bookmarks</TITLE>
<H1>Bookmarks Menu</H1>

<DL><p>
    <DT><A HREF="https://top.example/" ADD_DATE="1600000000" LAST_MODIFIED="1600000001">Top level</A>
    <DT><H3 ADD_DATE="1600000000" LAST_MODIFIED="1600000000">Work</H3>
    <DL><p>
        <DT><A HREF="https://plain.example/" ADD_DATE="1600000100">Plain</A>
        <DT><A HREF="https://tagged.example/" ADD_DATE="1600000200" TAGS="a,b">Tagged</A>
        <DT><A HREF="javascript:void(0)">Bookmarklet</A>
        <DD>A description that is not an anchor
    </DL><p>
    <DT><H3>Side   Projects</H3>
    <DL><p>
        <DT><A HREF="file:///C:/notes.html" ADD_DATE="soon">Notes</A>
    </DL><p>
</DL>
"#;

async fn by_url(store: &MemoryPlacesStore, url: &str) -> Record {
    store
        .fetch_all()
        .await
        .unwrap()
        .into_iter()
        .find(|r| r.url == url)
        .unwrap_or_else(|| panic!("Expected record for {url}"))
}

#[tokio::test]
async fn test_import_browser_export() {
    let store = MemoryPlacesStore::new();
    let clock = ManualClock::new(NOW);

    let summary = import(&store, FIREFOX_STYLE, &clock).await.unwrap();
    assert_eq!(summary.imported, 4);
    assert_eq!(summary.skipped, 1);

    let top = by_url(&store, "https://top.example/").await;
    assert!(top.tags.is_empty());
    assert_eq!(top.last_visit, 1_600_000_000_000);
    assert!(top.is_bookmarked);

    let plain = by_url(&store, "https://plain.example/").await;
    assert_eq!(plain.tags, vec!["Work"]);
    assert_eq!(plain.title, "Plain");

    let tagged = by_url(&store, "https://tagged.example/").await;
    assert_eq!(tagged.tags, vec!["Work", "a", "b"]);

    let notes = by_url(&store, "file:///C:/notes.html").await;
    assert_eq!(notes.tags, vec!["Side-Projects"]);
    assert_eq!(notes.last_visit, NOW);
}

#[tokio::test]
async fn test_import_twice_keeps_one_record_per_url() {
    let store = MemoryPlacesStore::new();
    let clock = ManualClock::new(NOW);

    import(&store, FIREFOX_STYLE, &clock).await.unwrap();
    import(&store, FIREFOX_STYLE, &clock).await.unwrap();

    assert_eq!(store.len(), 4);
}

#[tokio::test]
async fn test_duplicate_url_last_write_wins() {
    let store = MemoryPlacesStore::new();
    let clock = ManualClock::new(NOW);
    let html = r#"<DL><p>
        <DT><H3>First</H3><DL><p><DT><A HREF="https://dup.example/">one</A></DL><p>
        <DT><H3>Second</H3><DL><p><DT><A HREF="https://dup.example/">two</A></DL><p>
    </DL>"#;

    let summary = import(&store, html, &clock).await.unwrap();
    assert_eq!(summary.imported, 2);

    let record = by_url(&store, "https://dup.example/").await;
    assert_eq!(record.title, "two");
    assert_eq!(record.tags, vec!["Second"]);
}

#[tokio::test]
async fn test_import_merges_into_history_record() {
    let store = MemoryPlacesStore::new();
    store
        .upsert(RecordPatch::new("https://plain.example/").with_last_visit(5))
        .await
        .unwrap();

    import(&store, FIREFOX_STYLE, &ManualClock::new(NOW))
        .await
        .unwrap();

    let plain = by_url(&store, "https://plain.example/").await;
    assert!(plain.is_bookmarked);
    assert_eq!(plain.last_visit, 1_600_000_100_000);
}

#[tokio::test]
async fn test_export_then_import_round_trip() {
    let source = MemoryPlacesStore::new();
    let originals = vec![
        RecordPatch::new("https://a.example/")
            .with_title("Alpha & Omega")
            .with_bookmarked(true)
            .with_tags(vec!["x".into(), "y".into()])
            .with_last_visit(1_700_000_000_456),
        RecordPatch::new("https://b.example/path?q=\"quoted\"")
            .with_title("<b>Beta</b>")
            .with_bookmarked(true)
            .with_last_visit(1_700_000_123_000),
        RecordPatch::new("https://history.example/").with_last_visit(1),
    ];
    for patch in originals {
        source.upsert(patch).await.unwrap();
    }

    let html = export_all(&source).await.unwrap();
    assert_eq!(html, export_bookmarks(&source.fetch_all().await.unwrap()));

    let target = MemoryPlacesStore::new();
    let summary = import(&target, &html, &ManualClock::new(NOW)).await.unwrap();
    assert_eq!(summary.imported, 2);

    for original in source.fetch_all().await.unwrap().into_iter().filter(|r| r.is_bookmarked) {
        let copy = by_url(&target, &original.url).await;
        assert_eq!(copy.title, original.title);
        assert_eq!(copy.last_visit, original.last_visit.div_euclid(1000) * 1000);
        for tag in &original.tags {
            assert!(copy.tags.contains(tag), "missing tag {tag}");
        }
    }
}
