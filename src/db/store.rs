//! Filesystem-backed blueprint store.
//!
//! Layout under the root directory:
//!
//! ```text
//! <root>/
//!   <book label>/
//!     000 - <entry name>.json
//!     001 - <entry name>.json
//!     version.txt
//!   _not_a_book/
//!     <item name>.json
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::blueprint::{BlueprintBook, BlueprintItem, BookEntry, ModelError, classify};
use crate::logging::{debug, info, warn};
use crate::migrate::{RenameTable, reconcile_label, rename_entities};

use super::error::{StoreError, io_error};
use super::filename::{
    entry_filename, parse_entry_filename, validate_book_name, validate_entry_name,
};
use super::types::{
    BookReport, EntryFailure, RewriteReport, StoreOutcome, StoredEntry, StoredItem, WriteOutcome,
};

/// Default root directory of the store.
pub const DEFAULT_LOCATION: &str = "blueprints-db";

/// Default directory for items that do not belong to a book.
pub const DEFAULT_UNGROUPED_FOLDER: &str = "_not_a_book";

/// Default name of the file holding a book's game version.
pub const DEFAULT_VERSION_MARKER: &str = "version.txt";

/// Blueprint store rooted at a directory.
#[derive(Debug, Clone)]
pub struct BlueprintDb {
    root: PathBuf,
    ungrouped: String,
    version_marker: String,
}

impl Default for BlueprintDb {
    fn default() -> Self {
        Self::new(DEFAULT_LOCATION)
    }
}

impl BlueprintDb {
    /// Store at `root` with the default folder and marker names.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ungrouped: DEFAULT_UNGROUPED_FOLDER.to_string(),
            version_marker: DEFAULT_VERSION_MARKER.to_string(),
        }
    }

    pub fn with_ungrouped_folder(mut self, name: impl Into<String>) -> Self {
        self.ungrouped = name.into();
        self
    }

    pub fn with_version_marker(mut self, name: impl Into<String>) -> Self {
        self.version_marker = name.into();
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn ungrouped_folder(&self) -> &str {
        &self.ungrouped
    }

    pub fn version_marker(&self) -> &str {
        &self.version_marker
    }

    /// Directory of `book`. Names that would resolve outside the root
    /// (separators, `..`, absolute paths, empty) are rejected.
    fn book_dir(&self, book: &str) -> Result<PathBuf, StoreError> {
        validate_book_name(book)?;
        Ok(self.root.join(book))
    }

    /// Create the root and the standalone-items folder if missing.
    pub fn ensure_directories(&self) -> Result<(), StoreError> {
        let ungrouped = self.book_dir(&self.ungrouped)?;
        fs::create_dir_all(&ungrouped).map_err(io_error(&ungrouped))
    }

    /// Whether a directory for `book` exists.
    pub fn book_exists(&self, book: &str) -> bool {
        self.book_dir(book).is_ok_and(|dir| dir.is_dir())
    }

    /// Store a book as a directory, anything else as a standalone item.
    pub fn store_item(&self, item: &BlueprintItem) -> Result<StoreOutcome, StoreError> {
        if item.as_book().is_some() {
            self.store_book(item).map(StoreOutcome::Book)
        } else {
            self.store_single(item, None, None).map(StoreOutcome::Item)
        }
    }

    /// Replace the directory named after the book's label with one file per
    /// entry and a version marker.
    ///
    /// Existing `.json` files and the marker are removed first. Entries that
    /// cannot be written are reported in [`BookReport::failed`] without
    /// aborting the rest.
    pub fn store_book(&self, item: &BlueprintItem) -> Result<BookReport, StoreError> {
        let Some(book) = item.as_book() else {
            return Err(ModelError::NotABook(item.kind()).into());
        };
        let name = item.name();
        if name == self.ungrouped {
            return Err(StoreError::InvalidName {
                name: name.to_string(),
                reason: "reserved for standalone items",
            });
        }

        let directory = self.book_dir(name)?;
        let outcome = if directory.is_dir() {
            self.clear_book_dir(&directory)?;
            WriteOutcome::Updated
        } else {
            fs::create_dir_all(&directory).map_err(io_error(&directory))?;
            WriteOutcome::Created
        };
        info!(book = name, outcome = %outcome, entries = book.entries().len(), "storing book");

        let mut written = Vec::new();
        let mut failed = Vec::new();
        for (position, entry) in book.entries().iter().enumerate() {
            match write_book_entry(&directory, position, entry) {
                Ok(stored) => written.push(stored),
                Err(error) => {
                    warn!(book = name, position, error = %error, "skipping book entry");
                    failed.push(EntryFailure {
                        position,
                        index: entry.index,
                        name: entry.item.name().to_string(),
                        error,
                    });
                }
            }
        }

        let version = item.version();
        if let Some(version) = version {
            let marker = directory.join(&self.version_marker);
            fs::write(&marker, version.to_string()).map_err(io_error(&marker))?;
        }

        Ok(BookReport {
            book: name.to_string(),
            directory,
            outcome,
            written,
            failed,
            version,
        })
    }

    fn clear_book_dir(&self, directory: &Path) -> Result<(), StoreError> {
        for dir_entry in fs::read_dir(directory).map_err(io_error(directory))? {
            let dir_entry = dir_entry.map_err(io_error(directory))?;
            let path = dir_entry.path();
            if !path.is_file() {
                continue;
            }
            let Some(filename) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if parse_entry_filename(filename).is_some() || filename == self.version_marker {
                debug!(path = %path.display(), "removing stale file");
                fs::remove_file(&path).map_err(io_error(&path))?;
            }
        }
        Ok(())
    }

    /// Write one item file.
    ///
    /// With neither `book` nor `index`, the item goes to the standalone
    /// folder. Placing into a book requires an index; the standalone folder
    /// refuses one.
    pub fn store_single(
        &self,
        item: &BlueprintItem,
        index: Option<u64>,
        book: Option<&str>,
    ) -> Result<StoredItem, StoreError> {
        let book = book.unwrap_or(self.ungrouped.as_str());
        let ungrouped = book == self.ungrouped;
        match (ungrouped, index) {
            (true, Some(index)) => {
                return Err(StoreError::InvalidPlacement(format!(
                    "index {index} given for an item outside any book"
                )));
            }
            (false, None) => {
                return Err(StoreError::InvalidPlacement(format!(
                    "an index is required to place an item in book '{book}'"
                )));
            }
            _ => {}
        }
        let directory = self.book_dir(book)?;

        let name = item.name();
        validate_entry_name(name, index)?;

        fs::create_dir_all(&directory).map_err(io_error(&directory))?;

        let filename = entry_filename(name, index);
        let path = directory.join(&filename);
        let outcome = if path.exists() {
            WriteOutcome::Updated
        } else {
            WriteOutcome::Created
        };
        write_json(&path, &item.to_value())?;
        info!(book = book, file = %filename, outcome = %outcome, "stored item");

        Ok(StoredItem {
            book: book.to_string(),
            entry: StoredEntry {
                index,
                name: name.to_string(),
                filename,
            },
            path,
            outcome,
        })
    }

    /// Names of every book directory, sorted, with the standalone folder last.
    ///
    /// Directories that are not valid book names, hidden ones included, are
    /// skipped. A missing root lists as empty.
    pub fn list_books(&self) -> Result<Vec<String>, StoreError> {
        if !self.root.is_dir() {
            return Ok(Vec::new());
        }
        let mut books = Vec::new();
        let mut has_ungrouped = false;
        for dir_entry in fs::read_dir(&self.root).map_err(io_error(&self.root))? {
            let dir_entry = dir_entry.map_err(io_error(&self.root))?;
            if !dir_entry.path().is_dir() {
                continue;
            }
            let Ok(name) = dir_entry.file_name().into_string() else {
                continue;
            };
            if validate_book_name(&name).is_err() {
                debug!(name = %name, "skipping directory that is not a book name");
                continue;
            }
            if name == self.ungrouped {
                has_ungrouped = true;
            } else {
                books.push(name);
            }
        }
        books.sort();
        if has_ungrouped {
            books.push(self.ungrouped.clone());
        }
        Ok(books)
    }

    /// Item files of a book (or the standalone folder), in directory order.
    pub fn list_book(&self, book: &str) -> Result<Vec<StoredEntry>, StoreError> {
        let directory = self.book_dir(book)?;
        if !directory.is_dir() {
            return Err(StoreError::BookNotFound(book.to_string()));
        }

        let mut entries = Vec::new();
        for dir_entry in fs::read_dir(&directory).map_err(io_error(&directory))? {
            let dir_entry = dir_entry.map_err(io_error(&directory))?;
            if !dir_entry.path().is_file() {
                continue;
            }
            let Ok(filename) = dir_entry.file_name().into_string() else {
                continue;
            };
            if filename.starts_with('.') || filename == self.version_marker {
                continue;
            }
            if let Some(parsed) = parse_entry_filename(&filename) {
                entries.push(StoredEntry {
                    index: parsed.index,
                    name: parsed.name,
                    filename,
                });
            }
        }
        Ok(entries)
    }

    /// Path of a listed entry.
    pub fn entry_path(&self, book: &str, entry: &StoredEntry) -> Result<PathBuf, StoreError> {
        Ok(self.book_dir(book)?.join(&entry.filename))
    }

    /// Read and classify a listed entry.
    pub fn read_entry(&self, book: &str, entry: &StoredEntry) -> Result<BlueprintItem, StoreError> {
        read_item(&self.entry_path(book, entry)?)
    }

    /// Read the entry stored under `index` in `book`.
    pub fn find_entry(&self, book: &str, index: u64) -> Result<BlueprintItem, StoreError> {
        let entry = self
            .list_book(book)?
            .into_iter()
            .find(|entry| entry.index == Some(index))
            .ok_or_else(|| StoreError::EntryNotFound {
                book: book.to_string(),
                index,
            })?;
        self.read_entry(book, &entry)
    }

    /// Game version recorded for a book, if any.
    pub fn read_version_marker(&self, book: &str) -> Result<Option<u64>, StoreError> {
        let path = self.book_dir(book)?.join(&self.version_marker);
        if !path.is_file() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path).map_err(io_error(&path))?;
        content
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| StoreError::InvalidVersionMarker {
                path,
                content: content.trim().to_string(),
            })
    }

    /// Rebuild a book item from its directory.
    ///
    /// Entries appear in directory order with the index taken from their
    /// filename.
    pub fn assemble_book(&self, book: &str) -> Result<BlueprintItem, StoreError> {
        if book == self.ungrouped {
            return Err(StoreError::NotABookArea(book.to_string()));
        }
        let stored = self.list_book(book)?;

        let mut assembled = BlueprintBook::new(book);
        if let Some(version) = self.read_version_marker(book)? {
            assembled
                .body_mut()
                .insert("version".to_string(), Value::from(version));
        }
        for entry in &stored {
            let item = self.read_entry(book, entry)?;
            assembled.push(BookEntry {
                index: entry.index,
                item,
            });
        }
        debug!(book = book, entries = stored.len(), "assembled book");
        Ok(assembled.into())
    }

    /// [`assemble_book`](Self::assemble_book) as compact JSON.
    pub fn assemble_book_json(&self, book: &str) -> Result<String, StoreError> {
        let item = self.assemble_book(book)?;
        let directory = self.book_dir(book)?;
        serde_json::to_string(&item.to_value()).map_err(|source| StoreError::Json {
            path: directory,
            source,
        })
    }

    /// Apply `table` to every stored item, rewriting only files that change.
    pub fn migrate_entities(
        &self,
        table: &RenameTable,
        dry_run: bool,
    ) -> Result<RewriteReport, StoreError> {
        self.rewrite_all(dry_run, |item, _| rename_entities(item, table))
    }

    /// Set every stored item's label to the name in its filename.
    pub fn reconcile_labels(&self, dry_run: bool) -> Result<RewriteReport, StoreError> {
        self.rewrite_all(dry_run, |item, entry| reconcile_label(item, &entry.name))
    }

    fn rewrite_all<F>(&self, dry_run: bool, mut rewrite: F) -> Result<RewriteReport, StoreError>
    where
        F: FnMut(&mut BlueprintItem, &StoredEntry) -> bool,
    {
        let mut report = RewriteReport::default();
        for book in self.list_books()? {
            for entry in self.list_book(&book)? {
                let path = self.entry_path(&book, &entry)?;
                let mut item = read_item(&path)?;
                report.scanned += 1;
                if rewrite(&mut item, &entry) {
                    if dry_run {
                        info!(path = %path.display(), "would rewrite");
                    } else {
                        write_json(&path, &item.to_value())?;
                        debug!(path = %path.display(), "rewrote");
                    }
                    report.modified.push(path);
                }
            }
        }
        Ok(report)
    }
}

fn write_book_entry(
    directory: &Path,
    position: usize,
    entry: &BookEntry,
) -> Result<StoredEntry, StoreError> {
    let index = entry.index.ok_or(StoreError::MissingIndex { position })?;
    let name = entry.item.name();
    validate_entry_name(name, Some(index))?;
    let filename = entry_filename(name, Some(index));
    write_json(&directory.join(&filename), &entry.item.to_value())?;
    Ok(StoredEntry {
        index: Some(index),
        name: name.to_string(),
        filename,
    })
}

fn write_json(path: &Path, value: &Value) -> Result<(), StoreError> {
    let text = serde_json::to_string_pretty(value).map_err(|source| StoreError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, text).map_err(io_error(path))
}

fn read_item(path: &Path) -> Result<BlueprintItem, StoreError> {
    let text = fs::read_to_string(path).map_err(io_error(path))?;
    let value: Value = serde_json::from_str(&text).map_err(|source| StoreError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(classify(value)?)
}
