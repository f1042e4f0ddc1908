//! Structured logging field name constants.
//!
//! All crates use these constants for consistent structured logging fields so
//! log output can be filtered by the same names across subsystems.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Degraded service, requires operator attention |
//! | WARN  | Recoverable issue, will be retried on the next tick |
//! | INFO  | Lifecycle events (scheduler armed/stopped), backups written |
//! | DEBUG | Decision points (too soon, too small, dropped responses) |
//! | TRACE | Per-message channel traffic |

// ─── Identity fields ───────────────────────────────────────────────────────

/// Subsystem originating the log event.
/// Values: "rpc", "store", "codec", "backup", "cli"
pub const SUBSYSTEM: &str = "subsystem";

/// Correlation id of one outstanding call.
pub const CALL_ID: &str = "call_id";

/// Action name carried by a request.
pub const ACTION: &str = "action";

/// Record URL being operated on.
pub const URL: &str = "url";

// ─── Measurement fields ────────────────────────────────────────────────────

/// Number of calls still awaiting a response.
pub const PENDING: &str = "pending";

/// Byte length of an export or backup.
pub const BYTES: &str = "bytes";

/// Number of records returned or processed.
pub const RECORD_COUNT: &str = "record_count";

/// Wall-clock duration in milliseconds.
pub const DURATION_MS: &str = "duration_ms";

// ─── Backup fields ─────────────────────────────────────────────────────────

/// Filesystem path of a backup or store file.
pub const PATH: &str = "path";

/// Persisted last-backup watermark (epoch ms).
pub const WATERMARK: &str = "watermark";

// ─── Outcome fields ────────────────────────────────────────────────────────

/// Error message when an operation fails.
pub const ERROR_MSG: &str = "error";
