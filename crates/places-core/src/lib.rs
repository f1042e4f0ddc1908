//! # places-core
//!
//! Core types, traits, and abstractions for the places store.
//!
//! This crate provides the record model, the error type, and the service
//! traits (`PlacesStore`, `SettingsStore`, `Clock`) that the client, codec,
//! store, and backup crates depend on.

pub mod clock;
pub mod defaults;
pub mod error;
pub mod file_io;
pub mod logging;
pub mod models;
pub mod settings;
pub mod traits;
pub mod views;

// Re-export commonly used types at crate root
pub use clock::{ManualClock, SystemClock};
pub use error::{Error, Result};
pub use file_io::{read_to_string_if_exists, write_atomic};
pub use models::*;
pub use settings::{load_setting, save_setting, JsonFileSettingsStore, MemorySettingsStore};
pub use traits::*;
pub use views::{display_url, normalize_url, relative_day_label, BookmarksView, DayGroup, HistoryView};
