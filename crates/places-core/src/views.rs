//! Read-through list snapshots for the bookmarks and history surfaces.
//!
//! A view caches the result of `fetch_all`, filtered and sorted for its
//! surface. Every mutation issued through the view rebuilds the snapshot;
//! mutations made by other surfaces only show up on the next `refresh`.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, TimeZone};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;
use url::Url;

use crate::error::Result;
use crate::models::{Record, RecordPatch};
use crate::traits::PlacesStore;

static SCHEME_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z][a-zA-Z0-9+.-]*:").unwrap());

/// Turn user input into a URL, adding `https://` when no scheme is present.
///
/// Returns `None` for blank input.
pub fn normalize_url(input: &str) -> Option<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }
    if SCHEME_PREFIX.is_match(trimmed) {
        Some(trimmed.to_string())
    } else {
        Some(format!("https://{trimmed}"))
    }
}

/// Short form of a URL for list rows: host and path without a trailing slash.
pub fn display_url(raw: &str) -> String {
    let Ok(url) = Url::parse(raw) else {
        return raw.to_string();
    };
    let host = match (url.host_str(), url.port()) {
        (Some(host), Some(port)) => format!("{host}:{port}"),
        (Some(host), None) => host.to_string(),
        (None, _) => String::new(),
    };
    let joined = format!("{host}{}", url.path());
    let trimmed = joined.strip_suffix('/').unwrap_or(&joined);
    if !trimmed.is_empty() {
        trimmed.to_string()
    } else if !host.is_empty() {
        host
    } else {
        raw.to_string()
    }
}

/// "Today", "Yesterday", or the ISO date.
pub fn relative_day_label(day: NaiveDate, today: NaiveDate) -> String {
    match (today - day).num_days() {
        0 => "Today".to_string(),
        1 => "Yesterday".to_string(),
        _ => day.format("%Y-%m-%d").to_string(),
    }
}

fn matches_term(record: &Record, term: &str) -> bool {
    record.title.to_lowercase().contains(term) || record.url.to_lowercase().contains(term)
}

fn filter_records<'a>(records: &'a [Record], term: &str) -> Vec<&'a Record> {
    let term = term.trim().to_lowercase();
    records
        .iter()
        .filter(|r| term.is_empty() || matches_term(r, &term))
        .collect()
}

fn newest_first(records: &mut [Record]) {
    records.sort_by(|a, b| b.last_visit.cmp(&a.last_visit));
}

/// Bookmarked records, newest first.
pub struct BookmarksView {
    store: Arc<dyn PlacesStore>,
    items: Vec<Record>,
}

impl BookmarksView {
    pub fn new(store: Arc<dyn PlacesStore>) -> Self {
        Self {
            store,
            items: Vec::new(),
        }
    }

    pub fn items(&self) -> &[Record] {
        &self.items
    }

    /// Rebuild the snapshot from the store.
    pub async fn refresh(&mut self) -> Result<&[Record]> {
        let mut items: Vec<Record> = self
            .store
            .fetch_all()
            .await?
            .into_iter()
            .filter(|r| r.is_bookmarked)
            .collect();
        newest_first(&mut items);
        debug!(record_count = items.len(), "Bookmarks snapshot rebuilt");
        self.items = items;
        Ok(&self.items)
    }

    /// Case-insensitive match on title or URL. An empty term matches all.
    pub fn filter(&self, term: &str) -> Vec<&Record> {
        filter_records(&self.items, term)
    }

    /// Bookmark user-entered input. Returns the normalized URL, or `None`
    /// when the input was blank and nothing was stored.
    pub async fn add(&mut self, input: &str, title: &str, now_ms: i64) -> Result<Option<String>> {
        let Some(url) = normalize_url(input) else {
            return Ok(None);
        };
        let title = match title.trim() {
            "" => url.clone(),
            t => t.to_string(),
        };
        self.store
            .upsert(
                RecordPatch::new(url.clone())
                    .with_title(title)
                    .with_bookmarked(true)
                    .with_last_visit(now_ms),
            )
            .await?;
        self.refresh().await?;
        Ok(Some(url))
    }

    pub async fn rename(&mut self, url: &str, title: &str) -> Result<()> {
        self.store
            .upsert(
                RecordPatch::new(url)
                    .with_title(title)
                    .with_bookmarked(true),
            )
            .await?;
        self.refresh().await?;
        Ok(())
    }

    /// Clear the bookmark flag; the record stays as history.
    pub async fn remove(&mut self, url: &str) -> Result<()> {
        self.store
            .upsert(RecordPatch::new(url).with_bookmarked(false))
            .await?;
        self.refresh().await?;
        Ok(())
    }
}

/// Records of one calendar day, newest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayGroup {
    pub day: NaiveDate,
    pub records: Vec<Record>,
}

/// History-only records, newest first.
pub struct HistoryView {
    store: Arc<dyn PlacesStore>,
    items: Vec<Record>,
}

impl HistoryView {
    pub fn new(store: Arc<dyn PlacesStore>) -> Self {
        Self {
            store,
            items: Vec::new(),
        }
    }

    pub fn items(&self) -> &[Record] {
        &self.items
    }

    pub async fn refresh(&mut self) -> Result<&[Record]> {
        let mut items: Vec<Record> = self
            .store
            .fetch_all()
            .await?
            .into_iter()
            .filter(|r| !r.is_bookmarked)
            .collect();
        newest_first(&mut items);
        debug!(record_count = items.len(), "History snapshot rebuilt");
        self.items = items;
        Ok(&self.items)
    }

    pub fn filter(&self, term: &str) -> Vec<&Record> {
        filter_records(&self.items, term)
    }

    pub async fn remove(&mut self, url: &str) -> Result<()> {
        self.store.delete(url).await?;
        self.refresh().await?;
        Ok(())
    }

    pub async fn clear(&mut self) -> Result<()> {
        self.store.delete_all().await?;
        self.refresh().await?;
        Ok(())
    }

    /// Group the snapshot by calendar day in `tz`, newest day first.
    pub fn group_by_day<Tz: TimeZone>(&self, tz: &Tz) -> Vec<DayGroup> {
        let mut groups: Vec<DayGroup> = Vec::new();
        for record in &self.items {
            let day = DateTime::from_timestamp_millis(record.last_visit)
                .map(|utc| utc.with_timezone(tz).date_naive())
                .unwrap_or_default();
            match groups.iter_mut().find(|g| g.day == day) {
                Some(group) => group.records.push(record.clone()),
                None => groups.push(DayGroup {
                    day,
                    records: vec![record.clone()],
                }),
            }
        }
        groups.sort_by(|a, b| b.day.cmp(&a.day));
        groups
    }
}
