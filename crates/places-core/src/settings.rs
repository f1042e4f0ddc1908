//! Settings store implementations and typed helpers.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value as JsonValue};
use tracing::debug;

use crate::error::Result;
use crate::file_io::{read_to_string_if_exists, write_atomic};
use crate::traits::SettingsStore;

/// In-memory settings store keyed by string.
#[derive(Debug, Default)]
pub struct MemorySettingsStore {
    inner: Mutex<HashMap<String, JsonValue>>,
}

#[async_trait]
impl SettingsStore for MemorySettingsStore {
    async fn get(&self, key: &str) -> Result<Option<JsonValue>> {
        let inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(inner.get(key).cloned())
    }

    async fn set(&self, key: &str, value: JsonValue) -> Result<()> {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        inner.insert(key.to_string(), value);
        Ok(())
    }
}

/// Settings persisted as one JSON object in a file.
///
/// The file is read on every access and rewritten atomically on every set,
/// so several processes sharing the file see each other's writes.
#[derive(Debug)]
pub struct JsonFileSettingsStore {
    path: PathBuf,
    write_lock: tokio::sync::Mutex<()>,
}

impl JsonFileSettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: tokio::sync::Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<Map<String, JsonValue>> {
        let Some(raw) = read_to_string_if_exists(&self.path).await? else {
            return Ok(Map::new());
        };
        if raw.trim().is_empty() {
            return Ok(Map::new());
        }
        Ok(serde_json::from_str(&raw)?)
    }
}

#[async_trait]
impl SettingsStore for JsonFileSettingsStore {
    async fn get(&self, key: &str) -> Result<Option<JsonValue>> {
        Ok(self.load().await?.remove(key))
    }

    async fn set(&self, key: &str, value: JsonValue) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut settings = self.load().await?;
        settings.insert(key.to_string(), value);
        let raw = serde_json::to_string_pretty(&settings)?;
        write_atomic(&self.path, raw.as_bytes()).await?;
        debug!(key, path = %self.path.display(), "Setting saved");
        Ok(())
    }
}

/// Load and deserialize a typed setting.
pub async fn load_setting<S, T>(store: &S, key: &str) -> Result<Option<T>>
where
    S: SettingsStore + ?Sized,
    T: DeserializeOwned,
{
    match store.get(key).await? {
        Some(JsonValue::Null) | None => Ok(None),
        Some(value) => Ok(Some(serde_json::from_value(value)?)),
    }
}

/// Serialize and save a typed setting.
pub async fn save_setting<S, T>(store: &S, key: &str, value: &T) -> Result<()>
where
    S: SettingsStore + ?Sized,
    T: Serialize,
{
    store.set(key, serde_json::to_value(value)?).await
}
