//! Unified error type for the blueprint-db library.
//!
//! This module provides a single [`Error`] type that encompasses all errors
//! that can occur in the library, making it easier to handle errors in
//! application code.

use thiserror::Error;

use crate::blueprint::ModelError;
use crate::config::ConfigError;
use crate::db::StoreError;
use crate::exchange::CodecError;

/// Unified error type for all blueprint-db operations.
///
/// # Example
///
/// ```ignore
/// use blueprint_db::{BlueprintDb, ExchangeCodec, Result, classify};
///
/// fn import(db: &BlueprintDb, exchange: &str) -> Result<()> {
///     let value = ExchangeCodec::default().parse_value(exchange)?;
///     db.store_item(&classify(value)?)?;
///     Ok(())
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// Exchange string could not be parsed or generated.
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// Decoded JSON is not a recognized blueprint item.
    #[error(transparent)]
    Model(#[from] ModelError),

    /// Store operation failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// A [`Result`] type alias using the unified [`Error`] type.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Returns `true` if this is an exchange codec error.
    pub fn is_codec(&self) -> bool {
        matches!(self, Self::Codec(_))
    }

    /// Returns `true` if this is an object model error.
    pub fn is_model(&self) -> bool {
        matches!(self, Self::Model(_))
    }

    /// Returns `true` if this is a store error.
    pub fn is_store(&self) -> bool {
        matches!(self, Self::Store(_))
    }

    /// Returns `true` if the store failed on a filesystem operation.
    pub fn is_io(&self) -> bool {
        matches!(self, Self::Store(e) if e.is_io())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BlueprintDb;

    #[test]
    fn test_store_errors_convert() {
        let dir = tempfile::TempDir::new().unwrap();
        let file = dir.path().join("plain-file");
        std::fs::write(&file, "not a directory").unwrap();

        let err: Error = BlueprintDb::new(&file).ensure_directories().unwrap_err().into();
        assert!(err.is_store());
        assert!(err.is_io());

        let err: Error = BlueprintDb::new(dir.path()).list_book("..").unwrap_err().into();
        assert!(err.is_store());
        assert!(!err.is_io());
        assert!(!err.is_codec());
    }
}
