//! Error types for the exchange string codecs.

use thiserror::Error;

/// Errors that can occur while parsing or generating exchange strings.
#[derive(Error, Debug)]
pub enum CodecError {
    #[error("Exchange string is empty")]
    Empty,

    #[error("Exchange string version '{found}' is not among the supported versions {supported:?}")]
    UnsupportedVersion { found: String, supported: Vec<u8> },

    #[error("Invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("Failed to decompress payload: {0}")]
    Decompression(#[source] std::io::Error),

    #[error("Failed to compress payload: {0}")]
    Compression(#[source] std::io::Error),

    #[error("Decompressed payload is not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),

    #[error("Invalid JSON payload: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid map exchange string: {0}")]
    MapFormat(String),
}

impl CodecError {
    /// Returns `true` when the envelope itself is damaged (as opposed to an
    /// unsupported version or a failure on the generating side).
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            Self::Empty
                | Self::Base64(_)
                | Self::Decompression(_)
                | Self::Encoding(_)
                | Self::Json(_)
                | Self::MapFormat(_)
        )
    }

    /// Returns `true` if the version digit is outside the supported set.
    pub fn is_unsupported_version(&self) -> bool {
        matches!(self, Self::UnsupportedVersion { .. })
    }
}
