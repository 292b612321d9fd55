//! Convenient re-exports for common usage patterns.
//!
//! # Example
//!
//! ```ignore
//! use blueprint_db::prelude::*;
//!
//! let item = classify(ExchangeCodec::default().parse_value(input)?)?;
//! println!("{}", describe(&item, 1));
//! ```

// Unified error handling
pub use crate::error::{Error, Result};

// Exchange strings
pub use crate::exchange::{
    CodecError, ExchangeCodec, GameVersion, MapExchange, canonicalize, decode_version,
};

// Object model
pub use crate::blueprint::{
    BlueprintBook, BlueprintItem, BlueprintKind, BookEntry, ModelError, classify, describe,
    find_entry_by_index,
};

// Rewriting
pub use crate::migrate::{LeafVisitor, RenameTable, reconcile_label, rename_entities, walk_and_map};

// Store
pub use crate::db::{BlueprintDb, StoreError, StoreOutcome, WriteOutcome};

pub use crate::config::Config;
