//! Centralized default constants for the places workspace.
//!
//! **This module is the single source of truth** for shared default values.
//! Crates reference these constants instead of defining their own magic
//! numbers. Organized by domain area.

// =============================================================================
// BOOKMARK BACKUP
// =============================================================================

/// How old the last backup must be before a new one is written (3 days).
pub const BACKUP_INTERVAL_MS: u64 = 3 * 24 * 60 * 60 * 1000;

/// Number of scheduler ticks per backup interval.
///
/// Checking more often than the interval tightens the worst-case staleness
/// window without writing a backup on every tick.
pub const BACKUP_CHECKS_PER_INTERVAL: u32 = 3;

/// Minimum byte length an export must exceed to be written.
///
/// After the store is wiped the application starts with no bookmarks; an
/// export of that state must not replace the last good backup.
pub const BACKUP_MIN_BYTES: usize = 512;

/// Delay before the first check after the scheduler is armed.
pub const BACKUP_INITIAL_DELAY_MS: u64 = 10_000;

/// Settings key holding the last successful backup time (epoch ms).
pub const BACKUP_WATERMARK_KEY: &str = "lastBookmarksBackup";

/// File name of the backup artifact inside the data directory.
pub const BACKUP_FILE_NAME: &str = "bookmarksBackup.html";

/// Environment variable to enable or disable automatic backups.
pub const ENV_BACKUP_ENABLED: &str = "BOOKMARK_BACKUP_ENABLED";

/// Environment variable overriding [`BACKUP_INTERVAL_MS`].
pub const ENV_BACKUP_INTERVAL_MS: &str = "BOOKMARK_BACKUP_INTERVAL_MS";

/// Environment variable overriding [`BACKUP_MIN_BYTES`].
pub const ENV_BACKUP_MIN_BYTES: &str = "BOOKMARK_BACKUP_MIN_BYTES";

/// Environment variable overriding [`BACKUP_INITIAL_DELAY_MS`].
pub const ENV_BACKUP_INITIAL_DELAY_MS: &str = "BOOKMARK_BACKUP_INITIAL_DELAY_MS";

/// Default scheduler event broadcast channel capacity.
pub const EVENT_BUS_CAPACITY: usize = 64;

// =============================================================================
// STORE
// =============================================================================

/// File name of the JSON places store inside the data directory.
pub const STORE_FILE_NAME: &str = "places.json";

/// File name of the JSON settings store inside the data directory.
pub const SETTINGS_FILE_NAME: &str = "settings.json";

/// Environment variable for the data directory.
pub const ENV_DATA_DIR: &str = "PLACES_DATA_DIR";

/// Default data directory when none is configured.
pub const DATA_DIR: &str = ".places";

// =============================================================================
// RPC ACTIONS
// =============================================================================

/// Fetch every record.
pub const ACTION_FETCH_ALL: &str = "getAllPlaces";

/// Insert or merge one record.
pub const ACTION_UPSERT: &str = "updatePlace";

/// Delete one record by URL.
pub const ACTION_DELETE: &str = "deleteHistory";

/// Delete every history-only record.
pub const ACTION_DELETE_ALL: &str = "deleteAllHistory";

// =============================================================================
// IMPORT
// =============================================================================

/// URL prefixes accepted when importing a bookmark file.
pub const IMPORT_ALLOWED_SCHEMES: &[&str] = &["http:", "https:", "file:"];
