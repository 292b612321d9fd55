//! Factorio blueprint exchange strings and a directory-backed blueprint store.
//!
//! Exchange strings are the copy-and-paste form the game uses to share
//! blueprints: a version character followed by base64 of zlib-compressed
//! JSON. This library decodes and generates them, classifies the payload,
//! rewrites entity names after game updates, and stores books as
//! directories of per-entry JSON files so they can live under version
//! control.
//!
//! # Quick Start
//!
//! ```ignore
//! use blueprint_db::prelude::*;
//!
//! let codec = ExchangeCodec::default();
//! let item = classify(codec.parse_value(exchange_string)?)?;
//!
//! let db = BlueprintDb::new("blueprints-db");
//! db.ensure_directories()?;
//! db.store_item(&item)?;
//!
//! let exported = codec.generate(&db.assemble_book_json("My Book")?)?;
//! ```
//!
//! # Modules
//!
//! - [`exchange`] - Exchange string codec, game versions, map strings
//! - [`blueprint`] - Blueprint items, books, and their description
//! - [`migrate`] - Leaf walker, entity renaming, label reconciliation
//! - [`db`] - Filesystem store
//! - [`config`] - TOML configuration
//!
//! # Feature Flags
//!
//! - `logging` - Enable library-level tracing (consumers provide their own subscriber)
//! - `cli` - Enable the `bpdb` command-line binary
//! - `full` - Enable all features

mod logging;

pub mod blueprint;
pub mod config;
pub mod db;
pub mod exchange;
pub mod migrate;
pub mod prelude;

mod error;

// Re-export the unified error type
pub use error::{Error, Result};

pub use blueprint::{
    BlueprintBook, BlueprintItem, BlueprintKind, BookEntry, ModelError, classify, describe,
    enumerate_book_entries, find_entry_by_index, read_name, read_version,
};
pub use config::{Config, ConfigError};
pub use db::{BlueprintDb, StoreError};
pub use exchange::{CodecError, ExchangeCodec, GameVersion, MapExchange, decode_version};
pub use migrate::{RenameTable, reconcile_label, rename_entities, walk_and_map};
