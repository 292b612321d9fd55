//! Configuration parsing.
//!
//! ```toml
//! [exchange]
//! version = 0
//! supported_versions = [0]
//!
//! [database]
//! location = "blueprints-db"
//! not_a_book_folder = "_not_a_book"
//! version_marker = "version.txt"
//!
//! [migration.renames]
//! "science-pack-1" = "automation-science-pack"
//! ```
//!
//! Every section and key is optional.

use serde::Deserialize;
use std::path::Path;

use crate::db::{BlueprintDb, DEFAULT_LOCATION, DEFAULT_UNGROUPED_FOLDER, DEFAULT_VERSION_MARKER};
use crate::exchange::{DEFAULT_EXCHANGE_VERSION, ExchangeCodec};
use crate::migrate::RenameTable;

/// Configuration loaded from a TOML file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Exchange string settings.
    pub exchange: ExchangeConfig,
    /// Store layout.
    pub database: DatabaseConfig,
    /// Entity migration.
    pub migration: MigrationConfig,
}

/// Exchange string settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExchangeConfig {
    /// Version character written by `generate`.
    pub version: u8,
    /// Versions accepted by `parse`.
    pub supported_versions: Vec<u8>,
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            version: DEFAULT_EXCHANGE_VERSION,
            supported_versions: vec![DEFAULT_EXCHANGE_VERSION],
        }
    }
}

/// Store layout.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Root directory of the store.
    pub location: String,
    /// Folder for items outside any book.
    pub not_a_book_folder: String,
    /// Filename of the per-book version marker.
    pub version_marker: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            location: DEFAULT_LOCATION.to_string(),
            not_a_book_folder: DEFAULT_UNGROUPED_FOLDER.to_string(),
            version_marker: DEFAULT_VERSION_MARKER.to_string(),
        }
    }
}

/// Entity migration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MigrationConfig {
    pub renames: RenameTable,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::Io(path.as_ref().display().to_string(), e))?;
        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::Parse)
    }

    /// Load `path` if it exists, defaults otherwise.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Codec built from the `[exchange]` section.
    pub fn codec(&self) -> ExchangeCodec {
        ExchangeCodec::new(
            self.exchange.version,
            self.exchange.supported_versions.iter().copied(),
        )
    }

    /// Store built from the `[database]` section.
    pub fn database(&self) -> BlueprintDb {
        BlueprintDb::new(&self.database.location)
            .with_ungrouped_folder(&self.database.not_a_book_folder)
            .with_version_marker(&self.database.version_marker)
    }
}

/// Configuration error.
#[derive(Debug)]
pub enum ConfigError {
    /// IO error reading config file.
    Io(String, std::io::Error),
    /// TOML parse error.
    Parse(toml::de::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(path, e) => write!(f, "Failed to read config file '{}': {}", path, e),
            ConfigError::Parse(e) => write!(f, "Failed to parse config: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(_, e) => Some(e),
            ConfigError::Parse(e) => Some(e),
        }
    }
}
