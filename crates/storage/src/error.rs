//! Storage error types

use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StorageError {
    /// Backing file could not be read or written
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Stored bytes could not be encoded or decoded
    #[error("Serialization error for {key}: {message}")]
    Serialization { key: String, message: String },

    /// Snapshot file is not a valid ledger image
    #[error("Corrupt ledger snapshot: {0}")]
    Corrupt(String),
}

impl From<StorageError> for common::Error {
    fn from(err: StorageError) -> Self {
        common::Error::storage(err.to_string())
    }
}
