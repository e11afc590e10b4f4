//! Error types for the phonetic store.
//!
//! Provides a unified error type covering database access, connection
//! lifecycle, table-name validation and row decoding failures.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// SQLite database operation failure.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// The database file is missing or could not be opened.
    #[error("database not connected ({}): {reason}", path.display())]
    NotConnected { path: PathBuf, reason: String },

    /// Table name contains invalid characters.
    #[error("invalid table name '{0}': must contain only alphanumeric characters and underscores")]
    InvalidTableName(String),

    /// A stored row does not decode into a record.
    #[error("conversion error: {0}")]
    Conversion(#[from] cns_phonetics_core::CoreError),

    /// Filesystem failure while replacing the database file.
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience alias for results with [`StoreError`].
pub type Result<T> = std::result::Result<T, StoreError>;
