//! Error types for the monq job queue library.

use thiserror::Error;

/// The main error type for the monq library.
#[derive(Error, Debug)]
pub enum MonqError {
    /// JSON encoding/decoding error for payloads and stored records.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error (malformed endpoint descriptor, etc.).
    ///
    /// Raised at configuration time, never deferred to first use.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Backend-specific storage error.
    ///
    /// An empty queue is not an error; backends report it as a typed
    /// empty result instead.
    #[error("Backend error: {0}")]
    Backend(String),
}

/// Result type alias using MonqError.
pub type Result<T> = std::result::Result<T, MonqError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_serialization() {
        let json_err: serde_json::Error = serde_json::from_str::<i32>("invalid").unwrap_err();
        let err = MonqError::Serialization(json_err);
        let display = format!("{}", err);
        assert!(display.starts_with("Serialization error:"));
    }

    #[test]
    fn test_error_display_config() {
        let err = MonqError::Config("invalid endpoint".to_string());
        assert_eq!(format!("{}", err), "Configuration error: invalid endpoint");
    }

    #[test]
    fn test_error_display_backend() {
        let err = MonqError::Backend("connection refused".to_string());
        assert_eq!(format!("{}", err), "Backend error: connection refused");
    }

    #[test]
    fn test_error_from_serde_json() {
        let json_err: serde_json::Error = serde_json::from_str::<i32>("not a number").unwrap_err();
        let err: MonqError = json_err.into();
        assert!(matches!(err, MonqError::Serialization(_)));
    }

    #[test]
    fn test_error_debug() {
        let err = MonqError::Backend("test".to_string());
        let debug = format!("{:?}", err);
        assert!(debug.contains("Backend"));
        assert!(debug.contains("test"));
    }
}
