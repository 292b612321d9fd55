//! Blueprint items: the four exchange-string payload kinds.
//!
//! Every payload is a JSON object with exactly one recognized top-level key
//! (`blueprint`, `blueprint_book`, `deconstruction_planner` or
//! `upgrade_planner`) whose value is the item body. Books additionally hold
//! a `blueprints` array of indexed entries, each of which is itself an item,
//! so a book is a recursive tree of owned items.

use std::fmt;

use serde_json::{Map, Value};

use crate::exchange::decode_version;
use crate::logging::trace;

use super::error::ModelError;

/// A JSON object body.
pub type JsonObject = Map<String, Value>;

/// Name reported for items without a `label`.
pub const NO_NAME: &str = "no-name";

/// Version reported for items without a `version`.
pub const UNKNOWN_VERSION: &str = "unknown";

/// Key of the entry array inside a book body.
const BOOK_ENTRIES_KEY: &str = "blueprints";
/// Key of the entry position inside a book entry.
const ENTRY_INDEX_KEY: &str = "index";

/// The four recognized payload kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlueprintKind {
    Blueprint,
    BlueprintBook,
    DeconstructionPlanner,
    UpgradePlanner,
}

impl BlueprintKind {
    pub const ALL: [Self; 4] = [
        Self::Blueprint,
        Self::BlueprintBook,
        Self::DeconstructionPlanner,
        Self::UpgradePlanner,
    ];

    /// Top-level JSON key identifying this kind.
    pub const fn key(self) -> &'static str {
        match self {
            Self::Blueprint => "blueprint",
            Self::BlueprintBook => "blueprint_book",
            Self::DeconstructionPlanner => "deconstruction_planner",
            Self::UpgradePlanner => "upgrade_planner",
        }
    }

    /// Human-readable name.
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Blueprint => "Blueprint",
            Self::BlueprintBook => "Blueprint Book",
            Self::DeconstructionPlanner => "Deconstruction Planner",
            Self::UpgradePlanner => "Upgrade Planner",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.key() == key)
    }
}

impl fmt::Display for BlueprintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// A classified blueprint payload.
#[derive(Debug, Clone, PartialEq)]
pub enum BlueprintItem {
    Blueprint(JsonObject),
    BlueprintBook(BlueprintBook),
    DeconstructionPlanner(JsonObject),
    UpgradePlanner(JsonObject),
}

/// A blueprint book: its own body plus the ordered entries it owns.
///
/// `body` never contains the `blueprints` array; it is rebuilt from
/// `entries` on serialization.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BlueprintBook {
    body: JsonObject,
    entries: Vec<BookEntry>,
}

/// One indexed child of a book.
#[derive(Debug, Clone, PartialEq)]
pub struct BookEntry {
    /// Slot in the book. `None` when the entry carries no (non-negative)
    /// index; such entries never match an index lookup.
    pub index: Option<u64>,
    pub item: BlueprintItem,
}

impl BookEntry {
    pub fn new(index: u64, item: BlueprintItem) -> Self {
        Self {
            index: Some(index),
            item,
        }
    }

    fn from_value(position: usize, value: Value) -> Result<Self, ModelError> {
        let Value::Object(mut object) = value else {
            return Err(ModelError::InvalidEntry {
                position,
                reason: format!("expected an object, found {}", json_type_name(&value)),
            });
        };

        let index = match object.remove(ENTRY_INDEX_KEY) {
            None => None,
            Some(Value::Number(n)) if n.as_u64().is_some() => n.as_u64(),
            // Negative indices read as "no index".
            Some(Value::Number(n)) if n.as_i64().is_some() => None,
            Some(other) => {
                return Err(ModelError::InvalidEntry {
                    position,
                    reason: format!("index must be an integer, found {}", json_type_name(&other)),
                });
            }
        };

        let item = BlueprintItem::from_value(Value::Object(object)).map_err(|e| {
            ModelError::InvalidEntry {
                position,
                reason: e.to_string(),
            }
        })?;

        Ok(Self { index, item })
    }

    /// The entry as it appears inside a book's `blueprints` array.
    pub fn to_value(&self) -> Value {
        let mut object = self.item.to_object();
        if let Some(index) = self.index {
            object.insert(ENTRY_INDEX_KEY.to_string(), Value::from(index));
        }
        Value::Object(object)
    }
}

impl BlueprintBook {
    /// An empty book with the given label.
    pub fn new(label: impl Into<String>) -> Self {
        let mut body = JsonObject::new();
        body.insert("label".to_string(), Value::String(label.into()));
        body.insert("item".to_string(), Value::from("blueprint-book"));
        body.insert("active_index".to_string(), Value::from(0));
        Self {
            body,
            entries: Vec::new(),
        }
    }

    fn from_body(mut body: JsonObject) -> Result<Self, ModelError> {
        let entries = match body.remove(BOOK_ENTRIES_KEY) {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(values)) => values
                .into_iter()
                .enumerate()
                .map(|(position, value)| BookEntry::from_value(position, value))
                .collect::<Result<Vec<_>, _>>()?,
            Some(_) => return Err(ModelError::InvalidBody { key: BOOK_ENTRIES_KEY }),
        };
        Ok(Self { body, entries })
    }

    pub fn body(&self) -> &JsonObject {
        &self.body
    }

    pub fn body_mut(&mut self) -> &mut JsonObject {
        &mut self.body
    }

    pub fn entries(&self) -> &[BookEntry] {
        &self.entries
    }

    pub fn entries_mut(&mut self) -> &mut Vec<BookEntry> {
        &mut self.entries
    }

    pub fn push(&mut self, entry: BookEntry) {
        self.entries.push(entry);
    }

    /// Find the item stored at `index` (first match, linear scan).
    pub fn find_entry(&self, index: u64) -> Option<&BlueprintItem> {
        self.entries
            .iter()
            .find(|entry| entry.index == Some(index))
            .map(|entry| &entry.item)
    }

    /// Sort entries by index; entries without an index go last.
    pub fn sort_entries(&mut self) {
        self.entries
            .sort_by_key(|entry| (entry.index.is_none(), entry.index));
    }

    fn to_body(&self) -> JsonObject {
        let mut body = self.body.clone();
        let entries = self.entries.iter().map(BookEntry::to_value).collect();
        body.insert(BOOK_ENTRIES_KEY.to_string(), Value::Array(entries));
        body
    }
}

impl BlueprintItem {
    /// Classify a decoded JSON payload.
    ///
    /// Exactly one recognized top-level key must be present. Other top-level
    /// keys are ignored.
    pub fn from_value(value: Value) -> Result<Self, ModelError> {
        let Value::Object(mut object) = value else {
            return Err(ModelError::NotAnObject {
                found: json_type_name(&value),
            });
        };

        let mut present = BlueprintKind::ALL
            .into_iter()
            .filter(|kind| object.contains_key(kind.key()));
        let (Some(kind), None) = (present.next(), present.next()) else {
            return Err(ModelError::UnknownBlueprintType {
                keys: object.keys().cloned().collect(),
            });
        };

        let key = kind.key();
        let body = match object.remove(key) {
            Some(Value::Object(body)) => body,
            _ => return Err(ModelError::InvalidBody { key }),
        };
        if !object.is_empty() {
            trace!(kind = key, ignored = object.len(), "ignoring extra top-level keys");
        }

        Ok(match kind {
            BlueprintKind::Blueprint => Self::Blueprint(body),
            BlueprintKind::BlueprintBook => Self::BlueprintBook(BlueprintBook::from_body(body)?),
            BlueprintKind::DeconstructionPlanner => Self::DeconstructionPlanner(body),
            BlueprintKind::UpgradePlanner => Self::UpgradePlanner(body),
        })
    }

    pub fn kind(&self) -> BlueprintKind {
        match self {
            Self::Blueprint(_) => BlueprintKind::Blueprint,
            Self::BlueprintBook(_) => BlueprintKind::BlueprintBook,
            Self::DeconstructionPlanner(_) => BlueprintKind::DeconstructionPlanner,
            Self::UpgradePlanner(_) => BlueprintKind::UpgradePlanner,
        }
    }

    /// The item body (for books, without the entries).
    pub fn body(&self) -> &JsonObject {
        match self {
            Self::Blueprint(body) | Self::DeconstructionPlanner(body) | Self::UpgradePlanner(body) => body,
            Self::BlueprintBook(book) => book.body(),
        }
    }

    pub fn body_mut(&mut self) -> &mut JsonObject {
        match self {
            Self::Blueprint(body) | Self::DeconstructionPlanner(body) | Self::UpgradePlanner(body) => body,
            Self::BlueprintBook(book) => book.body_mut(),
        }
    }

    /// The `label`, if present and a string.
    pub fn label(&self) -> Option<&str> {
        self.body().get("label").and_then(Value::as_str)
    }

    /// Display name: the label, or [`NO_NAME`].
    pub fn name(&self) -> &str {
        self.label().unwrap_or(NO_NAME)
    }

    pub fn set_label(&mut self, label: impl Into<String>) {
        self.body_mut()
            .insert("label".to_string(), Value::String(label.into()));
    }

    /// The packed game version, if present.
    pub fn version(&self) -> Option<u64> {
        self.body().get("version").and_then(Value::as_u64)
    }

    /// Dotted game version, or [`UNKNOWN_VERSION`].
    pub fn version_string(&self) -> String {
        self.version()
            .map(decode_version)
            .unwrap_or_else(|| UNKNOWN_VERSION.to_string())
    }

    pub fn as_book(&self) -> Option<&BlueprintBook> {
        match self {
            Self::BlueprintBook(book) => Some(book),
            _ => None,
        }
    }

    pub fn as_book_mut(&mut self) -> Option<&mut BlueprintBook> {
        match self {
            Self::BlueprintBook(book) => Some(book),
            _ => None,
        }
    }

    /// Entries of a book; fails with [`ModelError::NotABook`] for other kinds.
    pub fn entries(&self) -> Result<&[BookEntry], ModelError> {
        self.as_book()
            .map(BlueprintBook::entries)
            .ok_or(ModelError::NotABook(self.kind()))
    }

    fn to_object(&self) -> JsonObject {
        let body = match self {
            Self::BlueprintBook(book) => book.to_body(),
            other => other.body().clone(),
        };
        let mut object = JsonObject::new();
        object.insert(self.kind().key().to_string(), Value::Object(body));
        object
    }

    /// The full payload (`{"<kind-key>": {...}}`).
    pub fn to_value(&self) -> Value {
        Value::Object(self.to_object())
    }
}

impl TryFrom<Value> for BlueprintItem {
    type Error = ModelError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::from_value(value)
    }
}

impl From<BlueprintBook> for BlueprintItem {
    fn from(book: BlueprintBook) -> Self {
        Self::BlueprintBook(book)
    }
}

/// Classify a decoded JSON payload into a [`BlueprintItem`].
pub fn classify(value: Value) -> Result<BlueprintItem, ModelError> {
    BlueprintItem::from_value(value)
}

/// Name of an item, defaulting to [`NO_NAME`].
pub fn read_name(item: &BlueprintItem) -> String {
    item.name().to_string()
}

/// Dotted game version of an item, defaulting to [`UNKNOWN_VERSION`].
pub fn read_version(item: &BlueprintItem) -> String {
    item.version_string()
}

/// Entries of a book. Non-book items are an error, not an empty sequence.
pub fn enumerate_book_entries(item: &BlueprintItem) -> Result<&[BookEntry], ModelError> {
    item.entries()
}

/// Look up a book entry by index. Non-book items have no entries.
pub fn find_entry_by_index(book: &BlueprintItem, index: u64) -> Option<&BlueprintItem> {
    book.as_book()?.find_entry(index)
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
