//! Netscape bookmark file import.

use tracing::{debug, info};

use places_core::defaults::IMPORT_ALLOWED_SCHEMES;
use places_core::{Clock, PlacesStore, RecordPatch, Result};

use crate::tree;

/// Upserts extracted from one bookmark file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedBookmarks {
    pub patches: Vec<RecordPatch>,
    /// Anchors without an href or with an unsupported scheme.
    pub skipped: usize,
}

/// Outcome of [`import`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub imported: usize,
    pub skipped: usize,
}

fn has_allowed_scheme(href: &str) -> bool {
    IMPORT_ALLOWED_SCHEMES
        .iter()
        .any(|scheme| href.starts_with(*scheme))
}

/// `ADD_DATE` seconds to epoch milliseconds, or `now_ms` when unusable.
fn visit_time(add_date: Option<&str>, now_ms: i64) -> i64 {
    add_date
        .map(str::trim)
        .and_then(|raw| {
            raw.parse::<i64>().ok().or_else(|| {
                raw.parse::<f64>()
                    .ok()
                    .filter(|secs| secs.is_finite())
                    .map(|secs| secs.trunc() as i64)
            })
        })
        .map(|secs| secs.saturating_mul(1000))
        .unwrap_or(now_ms)
}

/// Folder tag first, then explicit tags; blanks and repeats dropped.
fn merge_tags(folder: Option<String>, explicit: Option<&str>) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    let explicit = explicit
        .into_iter()
        .flat_map(|raw| raw.split(','))
        .map(|t| t.trim().to_string());
    for tag in folder.into_iter().chain(explicit) {
        if !tag.is_empty() && !tags.contains(&tag) {
            tags.push(tag);
        }
    }
    tags
}

/// Extract one bookmark upsert per usable anchor, in document order.
pub fn parse_bookmarks(html: &str, now_ms: i64) -> ParsedBookmarks {
    let dom = tree::parse(html);
    let mut parsed = ParsedBookmarks::default();

    for anchor in tree::elements_named(&dom.document, "a") {
        let Some(url) = tree::attr(&anchor, "href").filter(|h| has_allowed_scheme(h)) else {
            parsed.skipped += 1;
            continue;
        };

        let add_date = tree::attr(&anchor, "add_date");
        let explicit_tags = tree::attr(&anchor, "tags");
        let patch = RecordPatch::new(url)
            .with_title(tree::text_content(&anchor))
            .with_bookmarked(true)
            .with_last_visit(visit_time(add_date.as_deref(), now_ms))
            .with_tags(merge_tags(tree::folder_name(&anchor), explicit_tags.as_deref()));
        parsed.patches.push(patch);
    }

    debug!(
        record_count = parsed.patches.len(),
        skipped = parsed.skipped,
        "Bookmark file parsed"
    );
    parsed
}

/// Import a bookmark file into `store`, one upsert per accepted anchor.
///
/// A URL that appears more than once is upserted each time; the last one
/// wins. Stops at the first failed upsert.
pub async fn import(store: &dyn PlacesStore, html: &str, clock: &dyn Clock) -> Result<ImportSummary> {
    let ParsedBookmarks { patches, skipped } = parse_bookmarks(html, clock.now_ms());
    let mut summary = ImportSummary {
        imported: 0,
        skipped,
    };
    for patch in patches {
        store.upsert(patch).await?;
        summary.imported += 1;
    }
    info!(
        record_count = summary.imported,
        skipped = summary.skipped,
        "Bookmarks imported"
    );
    Ok(summary)
}
