//! Error types for the blueprint store.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::blueprint::ModelError;

/// Errors that can occur during store operations.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid placement: {0}")]
    InvalidPlacement(String),

    #[error("Invalid name '{name}': {reason}")]
    InvalidName { name: String, reason: &'static str },

    #[error("Book not found: {0}")]
    BookNotFound(String),

    #[error("No entry with index {index} in book '{book}'")]
    EntryNotFound { book: String, index: u64 },

    #[error("'{0}' holds standalone items and is not a book")]
    NotABookArea(String),

    #[error("Book entry at position {position} has no index")]
    MissingIndex { position: usize },

    #[error("Invalid version marker {}: '{content}'", path.display())]
    InvalidVersionMarker { path: PathBuf, content: String },

    #[error(transparent)]
    Model(#[from] ModelError),
}

impl StoreError {
    /// Returns `true` for filesystem failures.
    pub fn is_io(&self) -> bool {
        matches!(self, Self::Io { .. })
    }

    /// Returns `true` when a requested book or entry does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::BookNotFound(_) | Self::EntryNotFound { .. })
    }
}

/// Attach a path to an I/O error.
pub(crate) fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> StoreError + '_ {
    move |source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    }
}
