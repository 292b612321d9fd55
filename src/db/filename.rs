//! File naming inside the store.
//!
//! Entry files follow `^(([0-9]{3,}) - )?(.*)\.json$`: book entries carry
//! their index zero-padded to at least three digits, standalone items have
//! no prefix.
//!
//! | index | name        | file                   |
//! |-------|-------------|------------------------|
//! | -     | `Mall`      | `Mall.json`            |
//! | 7     | `Smelting`  | `007 - Smelting.json`  |
//! | 1234  | `Rails`     | `1234 - Rails.json`    |

use super::error::StoreError;

/// Extension of item files.
pub const JSON_SUFFIX: &str = ".json";

const INDEX_SEPARATOR: &str = " - ";
const MIN_INDEX_DIGITS: usize = 3;

/// Index and name recovered from an entry filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryFileName {
    pub index: Option<u64>,
    pub name: String,
}

/// Build the filename of an entry.
pub fn entry_filename(name: &str, index: Option<u64>) -> String {
    match index {
        Some(index) => format!(
            "{index:0width$}{INDEX_SEPARATOR}{name}{JSON_SUFFIX}",
            width = MIN_INDEX_DIGITS
        ),
        None => format!("{name}{JSON_SUFFIX}"),
    }
}

/// Split an entry filename into index and name.
///
/// Returns `None` for files that are not `.json`.
pub fn parse_entry_filename(filename: &str) -> Option<EntryFileName> {
    let stem = filename.strip_suffix(JSON_SUFFIX)?;
    let digits = stem.bytes().take_while(u8::is_ascii_digit).count();

    if digits >= MIN_INDEX_DIGITS {
        if let Some((prefix, rest)) = stem.split_at_checked(digits) {
            if let (Some(name), Ok(index)) = (rest.strip_prefix(INDEX_SEPARATOR), prefix.parse()) {
                return Some(EntryFileName {
                    index: Some(index),
                    name: name.to_string(),
                });
            }
        }
    }

    Some(EntryFileName {
        index: None,
        name: stem.to_string(),
    })
}

fn check_common(name: &str) -> Result<(), StoreError> {
    let invalid = |reason| {
        Err(StoreError::InvalidName {
            name: name.to_string(),
            reason,
        })
    };
    if name.contains(['/', '\\']) {
        return invalid("contains a path separator");
    }
    if name.chars().any(char::is_control) {
        return invalid("contains a control character");
    }
    Ok(())
}

/// Check that a book label can be used as a directory name.
pub fn validate_book_name(name: &str) -> Result<(), StoreError> {
    check_common(name)?;
    if name.is_empty() || name.starts_with('.') {
        return Err(StoreError::InvalidName {
            name: name.to_string(),
            reason: "book names must be non-empty and must not start with '.'",
        });
    }
    Ok(())
}

/// Check that an item name survives the trip through its filename.
pub fn validate_entry_name(name: &str, index: Option<u64>) -> Result<(), StoreError> {
    check_common(name)?;
    let filename = entry_filename(name, index);
    if filename.starts_with('.') {
        return Err(StoreError::InvalidName {
            name: name.to_string(),
            reason: "would produce a hidden file",
        });
    }
    let expected = EntryFileName {
        index,
        name: name.to_string(),
    };
    if parse_entry_filename(&filename).as_ref() != Some(&expected) {
        return Err(StoreError::InvalidName {
            name: name.to_string(),
            reason: "would be read back as an indexed entry",
        });
    }
    Ok(())
}
