//! Store operations against a temporary directory.

mod common;

use std::fs;

use blueprint_db::db::{StoreOutcome, WriteOutcome};
use blueprint_db::{
    BlueprintKind, Config, ExchangeCodec, RenameTable, StoreError, classify,
};
use common::*;

#[test]
fn test_store_then_assemble_recovers_entries() {
    let (_dir, db) = temp_db();
    let book = decode_fixture(BOOK_FIXTURE);

    let report = db.store_book(&book).unwrap();
    assert!(report.is_complete());
    assert_eq!(report.written.len(), 3);
    assert_eq!(report.version, Some(BOOK_VERSION));

    let json = db.assemble_book_json("My Book").unwrap();
    let assembled = classify(serde_json::from_str(&json).unwrap()).unwrap();
    assert_eq!(assembled.kind(), BlueprintKind::BlueprintBook);
    assert_eq!(assembled.name(), "My Book");
    assert_eq!(assembled.version(), Some(BOOK_VERSION));
    assert_eq!(entry_set(&assembled), entry_set(&book));
}

#[test]
fn test_nested_book_is_one_file() {
    let (_dir, db) = temp_db();
    db.store_book(&decode_fixture(BOOK_FIXTURE)).unwrap();

    let dir = db.root().join("My Book");
    assert!(dir.join("005 - Nested.json").is_file());
    assert!(!dir.join("Nested").exists());

    let nested = db.find_entry("My Book", 5).unwrap();
    assert_eq!(nested.kind(), BlueprintKind::BlueprintBook);
    assert_eq!(nested.entries().unwrap().len(), 1);
}

#[test]
fn test_entry_files_are_pretty_and_unindexed() {
    let (_dir, db) = temp_db();
    db.store_book(&decode_fixture(BOOK_FIXTURE)).unwrap();

    let text = fs::read_to_string(db.root().join("My Book").join("000 - Smelting.json")).unwrap();
    assert!(text.starts_with("{\n  \"blueprint\": {"));
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert!(value.get("index").is_none());
}

#[test]
fn test_standalone_index_is_invalid_placement() {
    let (_dir, db) = temp_db();
    let item = simple_blueprint("Belt");
    for index in [0, 1, 10] {
        assert!(matches!(
            db.store_single(&item, Some(index), None),
            Err(StoreError::InvalidPlacement(_))
        ));
        assert!(matches!(
            db.store_single(&item, Some(index), Some(db.ungrouped_folder())),
            Err(StoreError::InvalidPlacement(_))
        ));
    }
}

#[test]
fn test_store_item_dispatches_by_kind() {
    let (_dir, db) = temp_db();

    match db.store_item(&decode_fixture(OIL_FIXTURE)).unwrap() {
        StoreOutcome::Item(stored) => {
            assert_eq!(stored.outcome, WriteOutcome::Created);
            assert_eq!(stored.entry.filename, "Crude Oil Processing - step 1.json");
        }
        StoreOutcome::Book(_) => panic!("blueprint stored as a book"),
    }
    match db.store_item(&decode_fixture(BOOK_FIXTURE)).unwrap() {
        StoreOutcome::Book(report) => assert_eq!(report.outcome, WriteOutcome::Created),
        StoreOutcome::Item(_) => panic!("book stored as an item"),
    }

    let listed = db.list_book("_not_a_book").unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed.first().unwrap().index, None);
    assert_eq!(listed.first().unwrap().name, "Crude Oil Processing - step 1");
}

#[test]
fn test_list_books_skips_hidden_and_orders_ungrouped_last() {
    let (_dir, db) = temp_db();
    db.store_book(&decode_fixture(BOOK_FIXTURE)).unwrap();
    db.store_single(&decode_fixture(DECON_FIXTURE), None, None)
        .unwrap();
    fs::create_dir_all(db.root().join(".git")).unwrap();
    fs::create_dir_all(db.root().join("Another")).unwrap();

    assert_eq!(
        db.list_books().unwrap(),
        vec!["Another", "My Book", "_not_a_book"]
    );
    assert!(db.book_exists("My Book"));
    assert!(!db.book_exists("Missing"));
    assert!(matches!(
        db.list_book("Missing"),
        Err(StoreError::BookNotFound(_))
    ));
}

#[test]
fn test_unrelated_files_survive_restore() {
    let (_dir, db) = temp_db();
    let book = decode_fixture(BOOK_FIXTURE);
    db.store_book(&book).unwrap();

    let readme = db.root().join("My Book").join("README.md");
    fs::write(&readme, "notes").unwrap();
    fs::write(db.root().join("My Book").join("999 - Stale.json"), "{}").unwrap();

    let report = db.store_book(&book).unwrap();
    assert_eq!(report.outcome, WriteOutcome::Updated);
    assert!(readme.is_file());
    assert!(!db.root().join("My Book").join("999 - Stale.json").exists());
    assert_eq!(db.list_book("My Book").unwrap().len(), 3);
}

#[test]
fn test_migrate_entities_rewrites_changed_files_only() {
    let (_dir, db) = temp_db();
    db.store_book(&decode_fixture(BOOK_FIXTURE)).unwrap();
    db.store_single(&decode_fixture(OIL_FIXTURE), None, None)
        .unwrap();

    let table: RenameTable = [("science-pack-1", "automation-science-pack")]
        .into_iter()
        .collect();

    let dry = db.migrate_entities(&table, true).unwrap();
    assert_eq!(dry.scanned, 4);
    assert_eq!(dry.modified.len(), 1);
    let science = db.root().join("My Book").join("002 - Science.json");
    assert!(fs::read_to_string(&science).unwrap().contains("\"science-pack-1\""));

    let report = db.migrate_entities(&table, false).unwrap();
    assert_eq!(report.modified, vec![science.clone()]);
    assert!(fs::read_to_string(&science)
        .unwrap()
        .contains("automation-science-pack"));

    assert!(db.migrate_entities(&table, false).unwrap().modified.is_empty());
}

#[test]
fn test_reconcile_labels_follows_filenames() {
    let (_dir, db) = temp_db();
    db.store_book(&decode_fixture(BOOK_FIXTURE)).unwrap();

    let dir = db.root().join("My Book");
    fs::rename(dir.join("000 - Smelting.json"), dir.join("000 - Furnaces.json")).unwrap();

    let report = db.reconcile_labels(false).unwrap();
    assert_eq!(report.modified, vec![dir.join("000 - Furnaces.json")]);
    assert_eq!(db.find_entry("My Book", 0).unwrap().name(), "Furnaces");
    assert!(db.reconcile_labels(false).unwrap().modified.is_empty());
}

#[test]
fn test_config_drives_layout() {
    let dir = tempfile::TempDir::new().unwrap();
    let root = dir.path().join("store");
    let config = Config::from_str(&format!(
        "[database]\nlocation = {:?}\nnot_a_book_folder = \"loose\"\nversion_marker = \"VERSION\"\n",
        root.display().to_string()
    ))
    .unwrap();

    let db = config.database();
    db.ensure_directories().unwrap();
    db.store_item(&decode_fixture(BOOK_FIXTURE)).unwrap();
    db.store_item(&decode_fixture(DECON_FIXTURE)).unwrap();

    assert!(root.join("loose").join("Coal Rocks.json").is_file());
    assert_eq!(
        fs::read_to_string(root.join("My Book").join("VERSION")).unwrap(),
        BOOK_VERSION.to_string()
    );
}

#[test]
fn test_export_matches_import_after_sorting() {
    let (_dir, db) = temp_db();
    let codec = ExchangeCodec::default();
    let book = decode_fixture(BOOK_FIXTURE);
    db.store_book(&book).unwrap();

    let mut assembled = db.assemble_book("My Book").unwrap();
    assembled.as_book_mut().unwrap().sort_entries();
    let exported = codec.generate_value(&assembled.to_value()).unwrap();

    let reimported = classify(codec.parse_value(&exported).unwrap()).unwrap();
    assert_eq!(entry_set(&reimported), entry_set(&book));
}

#[test]
fn test_batch_file_lines_store_independently() {
    let (_dir, db) = temp_db();
    let codec = ExchangeCodec::default();

    let mut stored = Vec::new();
    for line in fixture(BATCH_FIXTURE).lines().filter(|l| !l.trim().is_empty()) {
        let item = classify(codec.parse_value(line).unwrap()).unwrap();
        if let StoreOutcome::Item(item) = db.store_item(&item).unwrap() {
            stored.push(item.entry.name);
        }
    }
    stored.sort();
    assert_eq!(stored, vec!["Coal Rocks", "Crude Oil Processing - step 1"]);
}
