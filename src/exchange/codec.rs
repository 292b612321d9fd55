//! Blueprint exchange string codec.
//!
//! An exchange string is one version digit followed by the standard base64
//! encoding of a zlib stream that holds the blueprint JSON:
//!
//! ```text
//! 0eNqrVkrKKU0tKMrMK1GyqlZKzs8pzc0DsZWsso3NdJQKEvOzU4tApgA0awxS
//! ^ ^--------------------- base64(zlib(json)) ---------------------
//! version
//! ```

use std::io::{Read, Write};

use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use flate2::Compression;
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use serde_json::Value;

use crate::logging::trace;

use super::error::CodecError;

/// Exchange string version produced by current game releases.
pub const DEFAULT_EXCHANGE_VERSION: u8 = 0;

/// Converts between exchange strings and JSON text.
///
/// The codec carries its default output version and the set of versions it
/// accepts, so callers (and tests) decide both instead of relying on globals.
///
/// # Example
///
/// ```ignore
/// use blueprint_db::ExchangeCodec;
///
/// let codec = ExchangeCodec::default();
/// let s = codec.generate(r#"{"blueprint":{"label":"X","version":0}}"#)?;
/// assert!(s.starts_with('0'));
/// let json = codec.parse(&s)?;
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExchangeCodec {
    default_version: u8,
    supported: Vec<u8>,
}

impl Default for ExchangeCodec {
    fn default() -> Self {
        Self {
            default_version: DEFAULT_EXCHANGE_VERSION,
            supported: vec![DEFAULT_EXCHANGE_VERSION],
        }
    }
}

impl ExchangeCodec {
    /// Create a codec with an explicit default version and supported set.
    ///
    /// The default version is added to the supported set if missing.
    pub fn new(default_version: u8, supported: impl IntoIterator<Item = u8>) -> Self {
        let mut supported: Vec<u8> = supported.into_iter().collect();
        if !supported.contains(&default_version) {
            supported.push(default_version);
        }
        supported.sort_unstable();
        supported.dedup();
        Self {
            default_version,
            supported,
        }
    }

    pub fn default_version(&self) -> u8 {
        self.default_version
    }

    pub fn supported_versions(&self) -> &[u8] {
        &self.supported
    }

    pub fn is_supported(&self, version: u8) -> bool {
        self.supported.contains(&version)
    }

    /// Versions are written as a single decimal digit.
    fn check_version(&self, version: u8) -> Result<(), CodecError> {
        if version <= 9 && self.is_supported(version) {
            Ok(())
        } else {
            Err(CodecError::UnsupportedVersion {
                found: version.to_string(),
                supported: self.supported.clone(),
            })
        }
    }

    /// Decode an exchange string to its JSON text.
    ///
    /// Whitespace around and inside the string is ignored.
    pub fn parse(&self, input: &str) -> Result<String, CodecError> {
        let input = input.trim();
        let mut chars = input.chars();
        let first = chars.next().ok_or(CodecError::Empty)?;
        let version = first
            .to_digit(10)
            .and_then(|d| u8::try_from(d).ok())
            .ok_or_else(|| CodecError::UnsupportedVersion {
                found: first.to_string(),
                supported: self.supported.clone(),
            })?;
        self.check_version(version)?;

        let body: String = chars.filter(|c| !c.is_whitespace()).collect();
        let compressed = BASE64.decode(body)?;
        let mut raw = Vec::new();
        ZlibDecoder::new(compressed.as_slice())
            .read_to_end(&mut raw)
            .map_err(CodecError::Decompression)?;
        trace!(
            version = version,
            compressed = compressed.len(),
            decompressed = raw.len(),
            "decoded exchange string"
        );

        Ok(String::from_utf8(raw)?)
    }

    /// Decode an exchange string and parse its JSON payload.
    pub fn parse_value(&self, input: &str) -> Result<Value, CodecError> {
        let json = self.parse(input)?;
        Ok(serde_json::from_str(&json)?)
    }

    /// Encode JSON text at the codec's default version.
    ///
    /// The text is compressed as given; use [`generate_value`](Self::generate_value)
    /// to get the canonical form.
    pub fn generate(&self, json: &str) -> Result<String, CodecError> {
        self.generate_with_version(json, self.default_version)
    }

    /// Encode JSON text at an explicit version.
    pub fn generate_with_version(&self, json: &str, version: u8) -> Result<String, CodecError> {
        self.check_version(version)?;

        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::best());
        encoder
            .write_all(json.as_bytes())
            .map_err(CodecError::Compression)?;
        let compressed = encoder.finish().map_err(CodecError::Compression)?;

        let mut out = version.to_string();
        BASE64.encode_string(&compressed, &mut out);
        Ok(out)
    }

    /// Encode a JSON value in canonical form at the default version.
    pub fn generate_value(&self, value: &Value) -> Result<String, CodecError> {
        self.generate(&canonicalize(value)?)
    }
}

/// Serialize a JSON value in its canonical exchange form: object keys
/// sorted, no whitespace between tokens.
///
/// `serde_json::Map` is ordered by key, so plain compact serialization
/// already yields sorted keys. Two semantically equal values therefore
/// produce identical text and identical exchange strings.
pub fn canonicalize(value: &Value) -> Result<String, CodecError> {
    Ok(serde_json::to_string(value)?)
}
