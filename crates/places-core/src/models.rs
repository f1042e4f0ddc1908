//! Record model shared by the client, store, codec, and backup crates.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// One entry in the places store, keyed by URL.
///
/// Tag order is preserved for display but ignored for equality.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    /// Scheme-qualified URL; case-sensitive unique key.
    pub url: String,
    /// Display name. New records default to the URL.
    #[serde(default)]
    pub title: String,
    /// `false` for history-only entries.
    #[serde(default)]
    pub is_bookmarked: bool,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Unix epoch milliseconds of the last visit.
    #[serde(default)]
    pub last_visit: i64,
}

impl Record {
    /// Title to show in lists; falls back to the URL when empty.
    pub fn display_title(&self) -> &str {
        if self.title.is_empty() {
            &self.url
        } else {
            &self.title
        }
    }

    fn sorted_tags(&self) -> Vec<&str> {
        let mut tags: Vec<&str> = self.tags.iter().map(String::as_str).collect();
        tags.sort_unstable();
        tags
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.url == other.url
            && self.title == other.title
            && self.is_bookmarked == other.is_bookmarked
            && self.last_visit == other.last_visit
            && self.sorted_tags() == other.sorted_tags()
    }
}

impl Eq for Record {}

/// Partial record sent with an upsert. Absent fields keep the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordPatch {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_bookmarked: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_visit: Option<i64>,
}

impl RecordPatch {
    /// Create an empty patch for a URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Set the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the bookmark flag.
    pub fn with_bookmarked(mut self, bookmarked: bool) -> Self {
        self.is_bookmarked = Some(bookmarked);
        self
    }

    /// Replace the tag list.
    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = Some(tags);
        self
    }

    /// Set the last visit time (epoch ms).
    pub fn with_last_visit(mut self, last_visit: i64) -> Self {
        self.last_visit = Some(last_visit);
        self
    }

    /// Reject patches that cannot identify a record.
    pub fn validate(&self) -> Result<()> {
        if self.url.is_empty() {
            return Err(Error::InvalidInput("url must not be empty".into()));
        }
        Ok(())
    }

    /// Merge this patch into an existing record, or build a new one.
    ///
    /// A new record's title defaults to its URL and it is not bookmarked
    /// unless the patch says so.
    pub fn apply(self, existing: Option<Record>) -> Record {
        let mut record = existing.unwrap_or_else(|| Record {
            title: self.url.clone(),
            url: self.url.clone(),
            is_bookmarked: false,
            tags: Vec::new(),
            last_visit: 0,
        });
        if let Some(title) = self.title {
            record.title = title;
        }
        if let Some(bookmarked) = self.is_bookmarked {
            record.is_bookmarked = bookmarked;
        }
        if let Some(tags) = self.tags {
            record.tags = tags;
        }
        if let Some(last_visit) = self.last_visit {
            record.last_visit = last_visit;
        }
        record
    }
}

/// Payload addressing a single record by URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlPayload {
    pub url: String,
}
