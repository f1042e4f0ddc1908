//! Error types for the places workspace.

use thiserror::Error;

/// Result type alias using the places Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for places operations.
#[derive(Error, Debug)]
pub enum Error {
    /// The channel to the store endpoint could not be opened, or a message
    /// could not be sent or received on it.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The store endpoint processed the request and reported a failure.
    #[error("Store error: {0}")]
    Store(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// File I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_transport() {
        let err = Error::Transport("port closed".to_string());
        assert_eq!(err.to_string(), "Transport error: port closed");
    }

    #[test]
    fn test_error_display_store() {
        let err = Error::Store("unknown action: frobnicate".to_string());
        assert_eq!(err.to_string(), "Store error: unknown action: frobnicate");
    }

    #[test]
    fn test_error_display_invalid_input() {
        let err = Error::InvalidInput("url must not be empty".to_string());
        assert_eq!(err.to_string(), "Invalid input: url must not be empty");
    }

    #[test]
    fn test_error_display_config() {
        let err = Error::Config("interval must be positive".to_string());
        assert_eq!(
            err.to_string(),
            "Configuration error: interval must be positive"
        );
    }

    #[test]
    fn test_error_display_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = Error::Io(io_err);
        assert!(err.to_string().contains("I/O error:"));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_from_serde_json_error() {
        let json_err = serde_json::from_str::<i32>("not a number").unwrap_err();
        let err: Error = json_err.into();
        match err {
            Error::Serialization(msg) => assert!(!msg.is_empty()),
            _ => panic!("Expected Serialization error"),
        }
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<Error>();
        assert_sync::<Error>();
    }
}
