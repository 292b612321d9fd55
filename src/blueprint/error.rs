//! Error types for the blueprint object model.

use thiserror::Error;

use super::item::BlueprintKind;

/// Errors raised while classifying or navigating blueprint JSON.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// The object carries none, or more than one, of the recognized
    /// top-level keys.
    #[error("Could not identify the type of blueprint, top-level keys: {keys:?}")]
    UnknownBlueprintType { keys: Vec<String> },

    #[error("Expected a JSON object, found {found}")]
    NotAnObject { found: &'static str },

    #[error("The '{key}' member must be a JSON object")]
    InvalidBody { key: &'static str },

    #[error("Book entry {position}: {reason}")]
    InvalidEntry { position: usize, reason: String },

    #[error("Expected a blueprint book, found {0}")]
    NotABook(BlueprintKind),
}
