//! Scheduler outcomes and broadcast events.

use std::path::PathBuf;

/// Result of one check-and-export run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackupOutcome {
    /// A backup was written and the watermark advanced.
    Written { path: PathBuf, bytes: usize },
    /// The last backup is not older than the interval.
    TooSoon { last_backup_ms: i64 },
    /// The export was not larger than the size floor; nothing was written.
    TooSmall { bytes: usize },
    /// Another check was still running.
    Busy,
}

impl BackupOutcome {
    pub fn is_written(&self) -> bool {
        matches!(self, BackupOutcome::Written { .. })
    }
}

/// Event emitted by the backup scheduler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackupEvent {
    /// Timers armed.
    Started,
    /// Timers cancelled.
    Stopped,
    /// A check finished without error.
    Checked(BackupOutcome),
    /// A check failed; the watermark is unchanged.
    Failed { error: String },
}
