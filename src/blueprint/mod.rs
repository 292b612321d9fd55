//! Blueprint object model.
//!
//! Decoded payloads are classified into one of four [`BlueprintKind`]s.
//! Books own their entries, which may themselves be books.

mod describe;
mod error;
mod item;

pub use describe::{Description, describe};
pub use error::ModelError;
pub use item::{
    BlueprintBook, BlueprintItem, BlueprintKind, BookEntry, JsonObject, NO_NAME, UNKNOWN_VERSION,
    classify, enumerate_book_entries, find_entry_by_index, read_name, read_version,
};
