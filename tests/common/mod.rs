//! Common test utilities and fixtures.
//!
//! Fixture exchange strings live in `tests/fixtures/`, one per file.

#![allow(dead_code)]

use std::path::PathBuf;

use blueprint_db::{BlueprintDb, BlueprintItem, ExchangeCodec, classify};
use serde_json::{Value, json};
use tempfile::TempDir;

// =============================================================================
// Fixture files
// =============================================================================

/// Book "My Book" (0.17.9.1) with entries at 0, 2 and a nested book at 5.
pub const BOOK_FIXTURE: &str = "book.txt";
/// Blueprint "Crude Oil Processing - step 1" (1.1.8).
pub const OIL_FIXTURE: &str = "oil.txt";
/// Deconstruction planner "Coal Rocks" (1.1.107).
pub const DECON_FIXTURE: &str = "decon.txt";
/// Blueprint "Red Circuits Block" (2.0.11.3).
pub const RED_CIRCUITS_FIXTURE: &str = "red_circuits.txt";
/// `{"blueprint":{"label":"X","version":0}}`.
pub const MINIMAL_FIXTURE: &str = "minimal.txt";
/// Map exchange string generated by 1.1.110.
pub const MAP_FIXTURE: &str = "map.txt";
/// Oil and decon strings separated by blank lines.
pub const BATCH_FIXTURE: &str = "batch.txt";

/// Packed 0.17.9.1.
pub const BOOK_VERSION: u64 = 73_015_033_857;

pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Raw fixture text, trailing newline included.
pub fn fixture(name: &str) -> String {
    std::fs::read_to_string(fixture_path(name)).unwrap()
}

pub fn decode_fixture(name: &str) -> BlueprintItem {
    let value = ExchangeCodec::default().parse_value(&fixture(name)).unwrap();
    classify(value).unwrap()
}

// =============================================================================
// Store helpers
// =============================================================================

/// A store rooted inside a fresh temporary directory.
///
/// Keep the `TempDir` alive for as long as the store is used.
pub fn temp_db() -> (TempDir, BlueprintDb) {
    let dir = TempDir::new().unwrap();
    let db = BlueprintDb::new(dir.path().join("blueprints-db"));
    db.ensure_directories().unwrap();
    (dir, db)
}

/// Entries of a book as an unordered comparable collection.
pub fn entry_set(item: &BlueprintItem) -> Vec<(Option<u64>, Value)> {
    let mut entries: Vec<_> = item
        .entries()
        .unwrap()
        .iter()
        .map(|entry| (entry.index, entry.item.to_value()))
        .collect();
    entries.sort_by(|a, b| a.0.cmp(&b.0));
    entries
}

pub fn simple_blueprint(label: &str) -> BlueprintItem {
    classify(json!({"blueprint": {
        "label": label,
        "item": "blueprint",
        "entities": [{"entity_number": 1, "name": "transport-belt", "position": {"x": 0.5, "y": 0.5}}]
    }}))
    .unwrap()
}
