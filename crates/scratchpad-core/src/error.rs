//! Error types for scratchpad.

use thiserror::Error;

/// Result type alias using scratchpad's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for scratchpad operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Input failed validation (empty category or content after normalization)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Identifier is not a well-formed note id
    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    /// Note not found
    #[error("Note not found: {0}")]
    NotFound(uuid::Uuid),

    /// Database operation failed (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The backing store did not answer before the deadline
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Whether this error describes a problem with the caller's input rather
    /// than with the service.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Error::Validation(_) | Error::InvalidIdentifier(_) | Error::NotFound(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_error_display_validation() {
        let err = Error::Validation("category is required".to_string());
        assert_eq!(err.to_string(), "Validation error: category is required");
    }

    #[test]
    fn test_error_display_invalid_identifier() {
        let err = Error::InvalidIdentifier("abc".to_string());
        assert_eq!(err.to_string(), "Invalid identifier: abc");
    }

    #[test]
    fn test_error_display_not_found() {
        let id = Uuid::nil();
        let err = Error::NotFound(id);
        assert_eq!(err.to_string(), format!("Note not found: {}", id));
    }

    #[test]
    fn test_error_display_unavailable() {
        let err = Error::Unavailable("search timed out after 10s".to_string());
        assert_eq!(
            err.to_string(),
            "Store unavailable: search timed out after 10s"
        );
    }

    #[test]
    fn test_client_error_classification() {
        assert!(Error::Validation("x".into()).is_client_error());
        assert!(Error::InvalidIdentifier("x".into()).is_client_error());
        assert!(Error::NotFound(Uuid::nil()).is_client_error());
        assert!(!Error::Unavailable("x".into()).is_client_error());
        assert!(!Error::Internal("x".into()).is_client_error());
        assert!(!Error::Database(sqlx::Error::PoolTimedOut).is_client_error());
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<Error>();
        assert_sync::<Error>();
    }
}
