//! Depth-first leaf rewriting over JSON trees.
//!
//! The walker visits every member of every object. String, integer and
//! float members are handed to a [`LeafVisitor`] together with their parent
//! object, so the visitor can replace the value in place; object and array
//! members are descended into. Elements of arrays are only descended into:
//! a bare string inside an array is never offered to the visitor.
//!
//! A walk never stops early. Every leaf is visited and the results are
//! OR-ed, so the returned flag is `true` iff at least one visit reported a
//! change anywhere in the tree.

use serde_json::Value;

use crate::blueprint::{BlueprintItem, JsonObject};

/// Callbacks invoked for leaf members of JSON objects.
///
/// Each callback receives the parent object and the member key and returns
/// whether it modified anything. The defaults leave the leaf untouched.
pub trait LeafVisitor {
    fn visit_string(&mut self, parent: &mut JsonObject, key: &str) -> bool {
        let _ = (parent, key);
        false
    }

    fn visit_integer(&mut self, parent: &mut JsonObject, key: &str) -> bool {
        let _ = (parent, key);
        false
    }

    fn visit_float(&mut self, parent: &mut JsonObject, key: &str) -> bool {
        let _ = (parent, key);
        false
    }
}

enum Member {
    String,
    Integer,
    Float,
    Nested,
}

fn classify_member(value: &Value) -> Option<Member> {
    match value {
        Value::String(_) => Some(Member::String),
        Value::Number(n) if n.is_f64() => Some(Member::Float),
        Value::Number(_) => Some(Member::Integer),
        Value::Object(_) | Value::Array(_) => Some(Member::Nested),
        Value::Null | Value::Bool(_) => None,
    }
}

/// Walk an arbitrary JSON value.
pub fn walk<V: LeafVisitor + ?Sized>(value: &mut Value, visitor: &mut V) -> bool {
    match value {
        Value::Object(object) => walk_object(object, visitor),
        Value::Array(items) => {
            let mut changed = false;
            for item in items {
                changed |= walk(item, visitor);
            }
            changed
        }
        _ => false,
    }
}

/// Walk the members of one object.
pub fn walk_object<V: LeafVisitor + ?Sized>(object: &mut JsonObject, visitor: &mut V) -> bool {
    // Visitors may mutate the parent, so iterate over a snapshot of the keys.
    let keys: Vec<String> = object.keys().cloned().collect();
    let mut changed = false;

    for key in keys {
        let Some(member) = object.get(&key).and_then(classify_member) else {
            continue;
        };
        changed |= match member {
            Member::String => visitor.visit_string(object, &key),
            Member::Integer => visitor.visit_integer(object, &key),
            Member::Float => visitor.visit_float(object, &key),
            Member::Nested => object
                .get_mut(&key)
                .is_some_and(|child| walk(child, visitor)),
        };
    }

    changed
}

/// Walk a classified item: its body and, for books, every entry's item.
///
/// Entry indices are structure, not content, and are not offered to the
/// visitor.
pub fn walk_item<V: LeafVisitor + ?Sized>(item: &mut BlueprintItem, visitor: &mut V) -> bool {
    let mut changed = walk_object(item.body_mut(), visitor);
    if let Some(book) = item.as_book_mut() {
        for entry in book.entries_mut() {
            changed |= walk_item(&mut entry.item, visitor);
        }
    }
    changed
}

/// [`LeafVisitor`] built from three closures.
pub struct FnVisitor<S, I, F> {
    pub on_string: S,
    pub on_integer: I,
    pub on_float: F,
}

impl<S, I, F> LeafVisitor for FnVisitor<S, I, F>
where
    S: FnMut(&mut JsonObject, &str) -> bool,
    I: FnMut(&mut JsonObject, &str) -> bool,
    F: FnMut(&mut JsonObject, &str) -> bool,
{
    fn visit_string(&mut self, parent: &mut JsonObject, key: &str) -> bool {
        (self.on_string)(parent, key)
    }

    fn visit_integer(&mut self, parent: &mut JsonObject, key: &str) -> bool {
        (self.on_integer)(parent, key)
    }

    fn visit_float(&mut self, parent: &mut JsonObject, key: &str) -> bool {
        (self.on_float)(parent, key)
    }
}

/// Closure form of [`walk`].
///
/// ```ignore
/// let changed = walk_and_map(&mut value, |parent, key| {
///     if let Some(Value::String(s)) = parent.get_mut(key) {
///         s.make_ascii_uppercase();
///         return true;
///     }
///     false
/// }, unchanged, unchanged);
/// ```
pub fn walk_and_map<S, I, F>(value: &mut Value, on_string: S, on_integer: I, on_float: F) -> bool
where
    S: FnMut(&mut JsonObject, &str) -> bool,
    I: FnMut(&mut JsonObject, &str) -> bool,
    F: FnMut(&mut JsonObject, &str) -> bool,
{
    let mut visitor = FnVisitor {
        on_string,
        on_integer,
        on_float,
    };
    walk(value, &mut visitor)
}

/// Leaf callback that never changes anything.
pub fn unchanged(_parent: &mut JsonObject, _key: &str) -> bool {
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_dispatch_by_leaf_type() {
        let mut value = json!({
            "s": "text",
            "i": 3,
            "f": 1.5,
            "b": true,
            "n": null,
            "nested": {"s2": "more", "list": [{"i2": -7}, "bare", 2.5]}
        });
        let mut strings = Vec::new();
        let mut ints = Vec::new();
        let mut floats = Vec::new();
        let changed = walk_and_map(
            &mut value,
            |_, key| {
                strings.push(key.to_string());
                false
            },
            |_, key| {
                ints.push(key.to_string());
                false
            },
            |_, key| {
                floats.push(key.to_string());
                false
            },
        );
        assert!(!changed);
        strings.sort();
        ints.sort();
        assert_eq!(strings, ["s", "s2"]);
        assert_eq!(ints, ["i", "i2"]);
        assert_eq!(floats, ["f"]);
    }

    #[test]
    fn test_array_leaves_are_not_rewritten() {
        let mut value = json!({"list": ["a", "a"], "name": "a"});
        let changed = walk_and_map(
            &mut value,
            |parent, key| {
                if let Some(Value::String(s)) = parent.get_mut(key) {
                    if s == "a" {
                        *s = "b".to_string();
                        return true;
                    }
                }
                false
            },
            unchanged,
            unchanged,
        );
        assert!(changed);
        assert_eq!(value, json!({"list": ["a", "a"], "name": "b"}));
    }

    #[test]
    fn test_changes_are_or_accumulated() {
        // Only the first visited sibling changes; a later unchanged sibling
        // must not mask it.
        let mut value = json!({"a": 1, "b": 2, "c": 3});
        let changed = walk_and_map(
            &mut value,
            unchanged,
            |parent, key| {
                if key == "a" {
                    parent.insert(key.to_string(), json!(10));
                    true
                } else {
                    false
                }
            },
            unchanged,
        );
        assert!(changed);
        assert_eq!(value["a"], 10);
    }

    #[test]
    fn test_every_leaf_visited_after_change() {
        let mut value = json!([{"x": "1"}, {"x": "2"}, {"deep": {"x": "3"}}]);
        let mut visits = 0;
        let changed = walk_and_map(
            &mut value,
            |_, _| {
                visits += 1;
                true
            },
            unchanged,
            unchanged,
        );
        assert!(changed);
        assert_eq!(visits, 3);
    }

    #[test]
    fn test_no_op_leaves_tree_unchanged() {
        let original = json!({"a": {"b": ["c", {"d": "e"}]}, "f": 1.25});
        let mut value = original.clone();
        assert!(!walk_and_map(&mut value, unchanged, unchanged, unchanged));
        assert_eq!(value, original);
    }
}
