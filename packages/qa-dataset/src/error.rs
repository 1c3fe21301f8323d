//! Typed errors for the dataset library.
//!
//! Uses `thiserror` for library errors (not `anyhow`). Only fatal and
//! infrastructure failures are errors here: a model reply that cannot be
//! structured is reported through
//! [`ParseStatus`](crate::types::extraction::ParseStatus) instead.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while building the dataset.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// Required input file does not exist
    #[error("input not found: {}", path.display())]
    InputNotFound { path: PathBuf },

    /// Reading or writing a file failed
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON (de)serialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Unknown source encoding label
    #[error("unknown encoding label: {label}")]
    Encoding { label: String },

    /// Invalid configuration value
    #[error("invalid config: {reason}")]
    InvalidConfig { reason: String },

    /// Remote completion failed; worth retrying
    #[error("completion error: {0}")]
    Completion(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Remote completion refused the request (bad request, auth, unparseable
    /// reply); retrying cannot help
    #[error("completion rejected: {0}")]
    CompletionRejected(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Record sink failed to persist a record
    #[error("sink error: {0}")]
    Sink(String),
}

impl DatasetError {
    /// Wrap an I/O error, mapping `NotFound` to [`DatasetError::InputNotFound`].
    pub fn from_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::InputNotFound { path }
        } else {
            Self::Io { path, source }
        }
    }

    /// Wrap an I/O error on an output path. Never reported as a missing input.
    pub fn write_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether another attempt at the same call could succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Completion(_))
    }

    /// Build a config error.
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }
}

/// Result type alias for dataset operations.
pub type Result<T> = std::result::Result<T, DatasetError>;
