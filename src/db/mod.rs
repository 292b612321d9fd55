//! Filesystem store for blueprint items.
//!
//! Books become directories (one JSON file per entry plus a version
//! marker); standalone items share a single folder.

mod error;
pub mod filename;
mod store;
mod types;

pub use error::StoreError;
pub use filename::{EntryFileName, entry_filename, parse_entry_filename};
pub use store::{BlueprintDb, DEFAULT_LOCATION, DEFAULT_UNGROUPED_FOLDER, DEFAULT_VERSION_MARKER};
pub use types::{
    BookReport, EntryFailure, RewriteReport, StoreOutcome, StoredEntry, StoredItem, WriteOutcome,
};
