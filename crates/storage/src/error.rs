//! Storage error types and result alias.
//!
//! Repository implementations map their internal failures onto these
//! variants. Authenticators treat every storage error as a definitive
//! "not found" and never retry.
//!
//! # Example
//!
//! ```
//! use sigil_storage::{StorageError, StorageResult};
//!
//! fn lookup(username: &str) -> StorageResult<String> {
//!     Err(StorageError::not_found(username))
//! }
//!
//! assert!(lookup("bob").is_err());
//! ```

use thiserror::Error;

/// Result type alias for repository operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur during repository operations.
///
/// # Non-exhaustive
///
/// New variants may be added in future minor releases. Downstream match
/// expressions must include a wildcard arm (`_ =>`).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    /// The requested record does not exist.
    #[error("Record not found: {key}")]
    NotFound {
        /// The key that was not found.
        key: String,
    },

    /// The record already exists and cannot be inserted again.
    #[error("Record already exists: {key}")]
    AlreadyExists {
        /// The conflicting key.
        key: String,
    },

    /// Connection or network error talking to the backing store.
    #[error("Connection error: {message}")]
    Connection {
        /// Description of the connection error.
        message: String,
    },
}

impl StorageError {
    /// Creates a new `NotFound` error for the given key.
    #[must_use]
    pub fn not_found(key: impl Into<String>) -> Self {
        Self::NotFound { key: key.into() }
    }

    /// Creates a new `AlreadyExists` error for the given key.
    #[must_use]
    pub fn already_exists(key: impl Into<String>) -> Self {
        Self::AlreadyExists { key: key.into() }
    }

    /// Creates a new `Connection` error with the given message.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection { message: message.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(StorageError::not_found("bob").to_string(), "Record not found: bob");
        assert_eq!(
            StorageError::already_exists("tok").to_string(),
            "Record already exists: tok"
        );
        assert_eq!(
            StorageError::connection("refused").to_string(),
            "Connection error: refused"
        );
    }
}
