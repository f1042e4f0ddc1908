//! # places-backup
//!
//! Background bookmark backups.
//!
//! [`BackupScheduler`] checks shortly after it is started and then every third
//! of the backup interval. A check writes a new backup only when the last one
//! is older than the interval and the export is larger than a size floor, so
//! an empty store can never replace a good backup.

pub mod config;
pub mod event;
pub mod scheduler;

pub use config::BackupConfig;
pub use event::{BackupEvent, BackupOutcome};
pub use scheduler::BackupScheduler;
