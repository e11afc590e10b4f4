//! Error types for source fetching, configuration and manifests.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while fetching source tables or reading
/// configuration and manifest files.
#[derive(Debug, Error)]
pub enum SourceError {
    /// A local file could not be read or written.
    #[error("I/O error on '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The HTTP request could not be completed.
    #[error("HTTP error fetching '{url}': {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-success status.
    #[error("HTTP status {status} fetching '{url}'")]
    HttpStatus { url: String, status: u16 },

    /// A source file is not valid UTF-8.
    #[error("'{location}' is not valid UTF-8: {source}")]
    Encoding {
        location: String,
        #[source]
        source: std::string::FromUtf8Error,
    },

    /// JSON parsing or serialization failure.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),
}

impl SourceError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Convenience alias for results with [`SourceError`].
pub type Result<T> = std::result::Result<T, SourceError>;
