//! # World Error Types
//!
//! Errors returned while loading configuration, catalogs and save blobs.
//!
//! Generation, mutation and extraction never return these: they are total
//! over their inputs and report "nothing happened" through `Option`/`bool`.

use thiserror::Error;

/// Errors that can occur while loading world inputs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WorldError {
    /// A file could not be read or written.
    #[error("i/o error on {path}: {reason}")]
    Io {
        /// The file involved.
        path: String,
        /// The underlying error message.
        reason: String,
    },

    /// The configuration document is unreadable or has invalid values.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The catalog document does not have the expected top-level shape.
    ///
    /// Individual malformed entries never produce this; they are skipped.
    #[error("invalid block catalog: {0}")]
    InvalidCatalog(String),

    /// A player save blob could not be encoded or decoded.
    #[error("invalid save data: {0}")]
    InvalidSave(String),
}

impl WorldError {
    /// Wraps an I/O error with the path that caused it.
    #[must_use]
    pub fn io(path: &std::path::Path, err: &std::io::Error) -> Self {
        Self::Io {
            path: path.display().to_string(),
            reason: err.to_string(),
        }
    }
}

/// Result type for world loading operations.
pub type WorldResult<T> = Result<T, WorldError>;
