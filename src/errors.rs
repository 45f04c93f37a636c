//! Unified error types for the maintenance tracker.
//!
//! Every layer (store, core, API) reports failures through [`Error`]; the API
//! layer maps each variant onto an HTTP status in [`crate::api::error`].

use thiserror::Error;

/// Crate-wide error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be read or parsed.
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong
        message: String,
    },

    /// The persisted record document could not be read or written.
    #[error("Storage error: {message}")]
    Storage {
        /// What went wrong
        message: String,
    },

    /// A mutation targeted an identifier that is not in the collection.
    #[error("Record not found: {sin}")]
    RecordNotFound {
        /// Identifier that was looked up
        sin: String,
    },

    /// A create (or identifier-changing update) would duplicate an existing SIN.
    #[error("SIN already exists: {sin}")]
    DuplicateSin {
        /// Identifier that already exists
        sin: String,
    },

    /// Malformed or missing input to a record or report operation.
    #[error("Invalid input: {message}")]
    InvalidInput {
        /// What was wrong with the input
        message: String,
    },

    /// Raw I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Shorthand for an [`Error::InvalidInput`].
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Shorthand for an [`Error::Storage`].
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
