//! Error types for Slotwatch
//!
//! Centralized error handling using thiserror. Booking Service failures are
//! not errors here: the client classifies them into `PollOutcome` and
//! `BookingResult` so the loop decides retry vs. stop from the tag alone.

use std::path::PathBuf;

use thiserror::Error;

/// All error types that can occur in Slotwatch
#[derive(Debug, Error)]
pub enum SlotwatchError {
    /// Credential file is absent
    #[error("Credential file not found: {}", .0.display())]
    CredentialsNotFound(PathBuf),

    /// Credential entries cannot be used as HTTP headers
    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    /// Configuration value out of range or unusable
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Target date selection rejected before the loop starts
    #[error("Invalid target dates: {0}")]
    InvalidTargets(String),

    /// Poll interval outside the accepted range
    #[error("Invalid poll interval: {0}s (expected 1-3600)")]
    InvalidInterval(u64),

    /// A watch loop is already running in this session
    #[error("A watch loop is already running")]
    SessionActive,

    /// HTTP client construction failed
    #[error("HTTP error: {0}")]
    Http(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML configuration parse error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Result type alias for Slotwatch operations
pub type Result<T> = std::result::Result<T, SlotwatchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_not_found_error() {
        let err = SlotwatchError::CredentialsNotFound(PathBuf::from("config.txt"));
        assert_eq!(err.to_string(), "Credential file not found: config.txt");
    }

    #[test]
    fn test_invalid_interval_error() {
        let err = SlotwatchError::InvalidInterval(0);
        assert_eq!(err.to_string(), "Invalid poll interval: 0s (expected 1-3600)");
    }

    #[test]
    fn test_invalid_targets_error() {
        let err = SlotwatchError::InvalidTargets("no dates selected".to_string());
        assert_eq!(err.to_string(), "Invalid target dates: no dates selected");
    }

    #[test]
    fn test_session_active_error() {
        assert_eq!(
            SlotwatchError::SessionActive.to_string(),
            "A watch loop is already running"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: SlotwatchError = io_err.into();
        assert!(matches!(err, SlotwatchError::Io(_)));
        assert!(err.to_string().contains("denied"));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid").unwrap_err();
        let err: SlotwatchError = json_err.into();
        assert!(matches!(err, SlotwatchError::Json(_)));
    }

    #[test]
    fn test_result_type_alias() {
        fn returns_ok() -> Result<i32> {
            Ok(42)
        }

        fn returns_err() -> Result<i32> {
            Err(SlotwatchError::Configuration("test".to_string()))
        }

        assert!(returns_ok().is_ok());
        assert!(returns_err().is_err());
    }
}
