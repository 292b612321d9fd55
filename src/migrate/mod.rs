//! In-place rewriting of blueprint JSON.
//!
//! [`walker`] is the generic leaf traversal; [`rename`] builds entity
//! renaming on top of it and adds the single-field label reconciliation.

pub mod rename;
pub mod walker;

pub use rename::{RenameTable, reconcile_label, rename_entities, rename_entities_in_value};
pub use walker::{FnVisitor, LeafVisitor, unchanged, walk, walk_and_map, walk_item, walk_object};
