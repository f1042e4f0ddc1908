//! Typed places facade over the correlation client.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value as JsonValue};

use places_core::defaults::{ACTION_DELETE, ACTION_DELETE_ALL, ACTION_FETCH_ALL, ACTION_UPSERT};
use places_core::{PlacesStore, Record, RecordPatch, Result, UrlPayload};

use crate::correlation::CorrelationClient;
use crate::transport::PortOpener;

/// Places operations for UI surfaces. Cheap to clone; clones share one channel.
#[derive(Clone)]
pub struct PlacesClient {
    rpc: Arc<CorrelationClient>,
}

impl PlacesClient {
    pub fn new(opener: Arc<dyn PortOpener>) -> Self {
        Self::from_correlation(Arc::new(CorrelationClient::new(opener)))
    }

    pub fn from_correlation(rpc: Arc<CorrelationClient>) -> Self {
        Self { rpc }
    }

    pub fn correlation(&self) -> &CorrelationClient {
        &self.rpc
    }

    /// Every record in the store, bookmarks and history alike.
    pub async fn fetch_all(&self) -> Result<Vec<Record>> {
        let result = self.rpc.call(ACTION_FETCH_ALL, json!({})).await?;
        // An endpoint with nothing stored may answer null.
        if result.is_null() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_value(result)?)
    }

    /// Merge `patch` into the record with the same URL, creating it if needed.
    pub async fn upsert(&self, patch: RecordPatch) -> Result<()> {
        patch.validate()?;
        self.send(ACTION_UPSERT, serde_json::to_value(&patch)?).await
    }

    /// Remove one record by URL. Missing URLs are not an error.
    pub async fn delete_one(&self, url: &str) -> Result<()> {
        let payload = serde_json::to_value(UrlPayload {
            url: url.to_string(),
        })?;
        self.send(ACTION_DELETE, payload).await
    }

    /// Remove all history-only records. Bookmarks survive.
    pub async fn delete_all(&self) -> Result<()> {
        self.send(ACTION_DELETE_ALL, json!({})).await
    }

    /// Clear the bookmark flag, keeping the record as history.
    pub async fn unbookmark(&self, url: &str) -> Result<()> {
        self.upsert(RecordPatch::new(url).with_bookmarked(false))
            .await
    }

    async fn send(&self, action: &str, payload: JsonValue) -> Result<()> {
        self.rpc.call(action, payload).await.map(|_| ())
    }
}

#[async_trait]
impl PlacesStore for PlacesClient {
    async fn fetch_all(&self) -> Result<Vec<Record>> {
        PlacesClient::fetch_all(self).await
    }

    async fn upsert(&self, patch: RecordPatch) -> Result<()> {
        PlacesClient::upsert(self, patch).await
    }

    async fn delete(&self, url: &str) -> Result<()> {
        self.delete_one(url).await
    }

    async fn delete_all(&self) -> Result<()> {
        PlacesClient::delete_all(self).await
    }
}
