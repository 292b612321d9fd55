//! Data types returned by store operations.

use std::fmt;
use std::path::PathBuf;

use super::error::StoreError;

/// An item file found in a book directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredEntry {
    /// Index parsed from the filename prefix; `None` for standalone items.
    pub index: Option<u64>,
    /// Name parsed from the filename.
    pub name: String,
    /// Filename within the book directory.
    pub filename: String,
}

/// Whether a write created something new or replaced existing content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Created,
    Updated,
}

impl fmt::Display for WriteOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Created => f.write_str("Created"),
            Self::Updated => f.write_str("Updated"),
        }
    }
}

/// A book entry that could not be written.
#[derive(Debug)]
pub struct EntryFailure {
    /// Position of the entry in the book's `blueprints` array.
    pub position: usize,
    pub index: Option<u64>,
    pub name: String,
    pub error: StoreError,
}

/// Result of [`store_book`](super::BlueprintDb::store_book).
#[derive(Debug)]
pub struct BookReport {
    pub book: String,
    pub directory: PathBuf,
    /// `Created` for a new directory, `Updated` when previous content was replaced.
    pub outcome: WriteOutcome,
    pub written: Vec<StoredEntry>,
    pub failed: Vec<EntryFailure>,
    /// Version written to the marker file, if the book had one.
    pub version: Option<u64>,
}

impl BookReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Result of [`store_single`](super::BlueprintDb::store_single).
#[derive(Debug, Clone)]
pub struct StoredItem {
    pub book: String,
    pub entry: StoredEntry,
    pub path: PathBuf,
    pub outcome: WriteOutcome,
}

/// Result of [`store_item`](super::BlueprintDb::store_item).
#[derive(Debug)]
pub enum StoreOutcome {
    Book(BookReport),
    Item(StoredItem),
}

/// Result of a store-wide rewrite (entity migration, label reconciliation).
#[derive(Debug, Default, Clone)]
pub struct RewriteReport {
    /// Number of item files examined.
    pub scanned: usize,
    /// Files whose content changed (rewritten unless dry-run).
    pub modified: Vec<PathBuf>,
}
