//! Core traits for places abstractions.
//!
//! These traits define the interfaces that concrete implementations must
//! satisfy: the remote client and the local stores both implement
//! [`PlacesStore`], so the codec, views, and backup scheduler work against
//! either.

use async_trait::async_trait;
use serde_json::Value as JsonValue;

use crate::error::Result;
use crate::models::{Record, RecordPatch};

/// The four logical operations of a places record store.
#[async_trait]
pub trait PlacesStore: Send + Sync {
    /// Fetch every record, bookmarked or not.
    async fn fetch_all(&self) -> Result<Vec<Record>>;

    /// Insert a record or merge the patch into the stored one.
    async fn upsert(&self, patch: RecordPatch) -> Result<()>;

    /// Delete one record by URL. Deleting a missing URL is not an error.
    async fn delete(&self, url: &str) -> Result<()>;

    /// Delete every history-only record. Bookmarked records are kept.
    async fn delete_all(&self) -> Result<()>;
}

/// Key/value settings persistence (JSON values per key).
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Load the raw value for a key.
    async fn get(&self, key: &str) -> Result<Option<JsonValue>>;

    /// Store a raw value for a key.
    async fn set(&self, key: &str, value: JsonValue) -> Result<()>;
}

/// Wall-clock source in Unix epoch milliseconds.
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> i64;
}
