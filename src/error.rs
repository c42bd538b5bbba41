//! Error types for chanboard.

use thiserror::Error;

/// Common error type for chanboard.
#[derive(Error, Debug)]
pub enum ChanError {
    /// Database error.
    ///
    /// Errors from sqlx are converted into this variant automatically.
    #[error("database error: {0}")]
    Database(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Authentication error (bad credentials, unknown account).
    #[error("authentication error: {0}")]
    Auth(String),

    /// Permission denied error.
    #[error("permission denied: {0}")]
    Permission(String),

    /// Validation error for user input.
    #[error("validation error: {0}")]
    Validation(String),

    /// Resource not found.
    #[error("{0} not found")]
    NotFound(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<sqlx::Error> for ChanError {
    fn from(e: sqlx::Error) -> Self {
        ChanError::Database(e.to_string())
    }
}

/// Returns true if the error is a violated UNIQUE constraint.
///
/// Application-level existence checks can race; the store is the final word.
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.is_unique_violation(),
        _ => false,
    }
}

/// Returns true if the error is a violated FOREIGN KEY constraint.
///
/// Raised when a referenced row was deleted after it was looked up.
pub fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.is_foreign_key_violation(),
        _ => false,
    }
}

/// Result type alias for chanboard operations.
pub type Result<T> = std::result::Result<T, ChanError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_error_display() {
        let err = ChanError::Auth("invalid password".to_string());
        assert_eq!(err.to_string(), "authentication error: invalid password");
    }

    #[test]
    fn test_permission_error_display() {
        let err = ChanError::Permission("admin access required".to_string());
        assert_eq!(err.to_string(), "permission denied: admin access required");
    }

    #[test]
    fn test_validation_error_display() {
        let err = ChanError::Validation("username is required".to_string());
        assert_eq!(err.to_string(), "validation error: username is required");
    }

    #[test]
    fn test_not_found_error_display() {
        let err = ChanError::NotFound("board".to_string());
        assert_eq!(err.to_string(), "board not found");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: ChanError = io_err.into();
        assert!(matches!(err, ChanError::Io(_)));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_sqlx_error_conversion() {
        let err: ChanError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, ChanError::Database(_)));
        assert!(!is_unique_violation(&sqlx::Error::RowNotFound));
        assert!(!is_foreign_key_violation(&sqlx::Error::RowNotFound));
    }
}
