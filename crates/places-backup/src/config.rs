//! Backup scheduler configuration.

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use places_core::defaults::{
    BACKUP_CHECKS_PER_INTERVAL, BACKUP_FILE_NAME, BACKUP_INITIAL_DELAY_MS, BACKUP_INTERVAL_MS,
    BACKUP_MIN_BYTES, DATA_DIR, ENV_BACKUP_ENABLED, ENV_BACKUP_INITIAL_DELAY_MS,
    ENV_BACKUP_INTERVAL_MS, ENV_BACKUP_MIN_BYTES,
};
use places_core::{Error, Result};

/// Configuration for the backup scheduler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupConfig {
    /// Minimum age of the last backup before a new one is written.
    pub interval_ms: u64,
    /// Exports of this many bytes or fewer are never written.
    pub min_bytes: usize,
    /// Delay before the first check after `start`.
    pub initial_delay_ms: u64,
    /// Whether `start` arms the timers at all.
    pub enabled: bool,
    /// Backup file location.
    pub path: PathBuf,
}

impl Default for BackupConfig {
    fn default() -> Self {
        Self {
            interval_ms: BACKUP_INTERVAL_MS,
            min_bytes: BACKUP_MIN_BYTES,
            initial_delay_ms: BACKUP_INITIAL_DELAY_MS,
            enabled: true,
            path: Path::new(DATA_DIR).join(BACKUP_FILE_NAME),
        }
    }
}

impl BackupConfig {
    /// Create config from environment variables (with defaults).
    ///
    /// | Variable | Default | Description |
    /// |----------|---------|-------------|
    /// | `BOOKMARK_BACKUP_ENABLED` | `true` | Enable/disable automatic backups |
    /// | `BOOKMARK_BACKUP_INTERVAL_MS` | `259200000` | Minimum age between backups |
    /// | `BOOKMARK_BACKUP_MIN_BYTES` | `512` | Size floor for a backup |
    /// | `BOOKMARK_BACKUP_INITIAL_DELAY_MS` | `10000` | Delay before the first check |
    ///
    /// Unset or empty variables take the default. A value that does not parse
    /// is an `Error::Config` naming the variable.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as `from_env`, reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let enabled = match setting(&lookup, ENV_BACKUP_ENABLED) {
            None => true,
            Some(v) => parse_flag(ENV_BACKUP_ENABLED, &v)?,
        };
        let interval_ms =
            parse_number(&lookup, ENV_BACKUP_INTERVAL_MS, BACKUP_INTERVAL_MS)?.max(1);
        let min_bytes = parse_number(&lookup, ENV_BACKUP_MIN_BYTES, BACKUP_MIN_BYTES)?;
        let initial_delay_ms =
            parse_number(&lookup, ENV_BACKUP_INITIAL_DELAY_MS, BACKUP_INITIAL_DELAY_MS)?;

        Ok(Self {
            interval_ms,
            min_bytes,
            initial_delay_ms,
            enabled,
            ..Self::default()
        })
    }

    pub fn with_interval_ms(mut self, ms: u64) -> Self {
        self.interval_ms = ms;
        self
    }

    pub fn with_min_bytes(mut self, bytes: usize) -> Self {
        self.min_bytes = bytes;
        self
    }

    pub fn with_initial_delay_ms(mut self, ms: u64) -> Self {
        self.initial_delay_ms = ms;
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = path.into();
        self
    }

    /// Period of the repeating check: a third of the interval, at least 1 ms.
    pub fn check_period(&self) -> Duration {
        Duration::from_millis((self.interval_ms / u64::from(BACKUP_CHECKS_PER_INTERVAL)).max(1))
    }

    /// Interval as a signed millisecond span for comparing epoch times.
    pub(crate) fn interval_span_ms(&self) -> i64 {
        i64::try_from(self.interval_ms).unwrap_or(i64::MAX)
    }
}

fn setting(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Option<String> {
    lookup(name)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_flag(name: &str, value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(Error::Config(format!(
            "{name} must be true or false, got {value:?}"
        ))),
    }
}

fn parse_number<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
    default: T,
) -> Result<T> {
    match setting(lookup, name) {
        None => Ok(default),
        Some(v) => v.parse().map_err(|_| {
            Error::Config(format!("{name} must be a non-negative integer, got {v:?}"))
        }),
    }
}
