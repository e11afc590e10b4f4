//! Error types for record construction and reading selection.

use thiserror::Error;

/// Errors that can occur while building or decoding phonetic records.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    /// The joined reading columns of a stored row split into sequences of
    /// different lengths.
    #[error(
        "reading count mismatch for U+{unicode}: {phonetic} phonetic, {tonal} tonal, {alt} alternate"
    )]
    ReadingCountMismatch {
        unicode: String,
        phonetic: usize,
        tonal: usize,
        alt: usize,
    },

    /// A display mode index outside `0..=2`.
    #[error("invalid display mode index {0}: expected 0, 1 or 2")]
    InvalidDisplayMode(u8),

    /// A column name that is not part of the persisted schema.
    #[error("unknown column '{0}'")]
    UnknownColumn(String),
}

/// Convenience alias for results with [`CoreError`].
pub type Result<T> = std::result::Result<T, CoreError>;
