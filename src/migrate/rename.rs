//! Entity renaming and label reconciliation.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;

use crate::blueprint::{BlueprintItem, JsonObject};
use crate::logging::trace;

use super::walker::{LeafVisitor, walk, walk_item};

/// Old → new identifier mapping applied after a game version bump
/// (renamed items, recipes, technologies).
///
/// No name may be both a source and a target; under that condition
/// applying the table twice gives the same result as applying it once.
///
/// Loaded from the `[migration.renames]` section of the configuration:
///
/// ```toml
/// [migration.renames]
/// "science-pack-1" = "automation-science-pack"
/// "science-pack-2" = "logistic-science-pack"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct RenameTable(BTreeMap<String, String>);

impl RenameTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, from: impl Into<String>, to: impl Into<String>) {
        self.0.insert(from.into(), to.into());
    }

    pub fn get(&self, from: &str) -> Option<&str> {
        self.0.get(from).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(from, to)| (from.as_str(), to.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RenameTable {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(from, to)| (from.into(), to.into()))
                .collect(),
        )
    }
}

/// Rewrites string leaves found in a [`RenameTable`].
struct EntityRenamer<'a> {
    table: &'a RenameTable,
}

impl LeafVisitor for EntityRenamer<'_> {
    fn visit_string(&mut self, parent: &mut JsonObject, key: &str) -> bool {
        let Some(Value::String(current)) = parent.get_mut(key) else {
            return false;
        };
        match self.table.get(current.as_str()) {
            Some(renamed) if renamed != current.as_str() => {
                trace!(key = key, from = %current, to = renamed, "renaming");
                *current = renamed.to_string();
                true
            }
            _ => false,
        }
    }
}

/// Replace every string member of `item` (recursively, through book
/// entries) that appears in `table`. Returns whether anything changed.
pub fn rename_entities(item: &mut BlueprintItem, table: &RenameTable) -> bool {
    if table.is_empty() {
        return false;
    }
    let mut renamer = EntityRenamer { table };
    walk_item(item, &mut renamer)
}

/// [`rename_entities`] over raw JSON.
pub fn rename_entities_in_value(value: &mut Value, table: &RenameTable) -> bool {
    if table.is_empty() {
        return false;
    }
    let mut renamer = EntityRenamer { table };
    walk(value, &mut renamer)
}

/// Force the item's label to `expected_name`. Returns whether it changed.
///
/// An unlabelled item already reads as [`NO_NAME`](crate::blueprint::NO_NAME)
/// and is left alone when that is the expected name.
pub fn reconcile_label(item: &mut BlueprintItem, expected_name: &str) -> bool {
    if item.name() == expected_name {
        return false;
    }
    item.set_label(expected_name);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blueprint::classify;
    use serde_json::json;

    fn science_table() -> RenameTable {
        [
            ("science-pack-1", "automation-science-pack"),
            ("science-pack-2", "logistic-science-pack"),
        ]
        .into_iter()
        .collect()
    }

    fn lab_book() -> BlueprintItem {
        classify(json!({"blueprint_book": {
            "label": "Science",
            "blueprints": [
                {"index": 0, "blueprint": {
                    "label": "Red",
                    "entities": [
                        {"entity_number": 1, "name": "assembling-machine-2", "recipe": "science-pack-1"},
                        {"entity_number": 2, "name": "lab"}
                    ]
                }},
                {"index": 1, "blueprint_book": {"label": "Inner", "blueprints": [
                    {"index": 0, "blueprint": {"label": "Green", "entities": [
                        {"entity_number": 1, "name": "assembling-machine-2", "recipe": "science-pack-2"}
                    ]}}
                ]}}
            ]
        }}))
        .unwrap()
    }

    #[test]
    fn test_rename_through_nested_books() {
        let mut item = lab_book();
        assert!(rename_entities(&mut item, &science_table()));

        let text = item.to_value().to_string();
        assert!(text.contains("automation-science-pack"));
        assert!(text.contains("logistic-science-pack"));
        assert!(!text.contains("\"science-pack-1\""));
    }

    #[test]
    fn test_rename_is_idempotent() {
        let table = science_table();
        let mut item = lab_book();
        assert!(rename_entities(&mut item, &table));
        let once = item.clone();
        assert!(!rename_entities(&mut item, &table));
        assert_eq!(item, once);
    }

    #[test]
    fn test_rename_without_matches() {
        let mut item = classify(json!({"blueprint": {"label": "Plain", "entities": [
            {"entity_number": 1, "name": "transport-belt"}
        ]}}))
        .unwrap();
        let before = item.clone();
        assert!(!rename_entities(&mut item, &science_table()));
        assert!(!rename_entities(&mut item, &RenameTable::new()));
        assert_eq!(item, before);
    }

    #[test]
    fn test_rename_raw_value() {
        let mut value = json!({"a": {"recipe": "science-pack-2"}});
        assert!(rename_entities_in_value(&mut value, &science_table()));
        assert_eq!(value["a"]["recipe"], "logistic-science-pack");
    }

    #[test]
    fn test_reconcile_label() {
        let mut item = classify(json!({"blueprint": {"label": "Old"}})).unwrap();
        assert!(reconcile_label(&mut item, "New"));
        assert_eq!(item.name(), "New");
        assert!(!reconcile_label(&mut item, "New"));

        let mut unlabelled = classify(json!({"upgrade_planner": {}})).unwrap();
        assert!(!reconcile_label(&mut unlabelled, "no-name"));
        assert!(unlabelled.label().is_none());
        assert!(reconcile_label(&mut unlabelled, "Belts"));
        assert_eq!(unlabelled.label(), Some("Belts"));
    }

    #[test]
    fn test_table_from_toml() {
        let table: RenameTable = toml::from_str(
            r#"
"science-pack-3" = "chemical-science-pack"
"#,
        )
        .unwrap();
        assert_eq!(table.get("science-pack-3"), Some("chemical-science-pack"));
        assert_eq!(table.len(), 1);
    }
}
