//! Map exchange strings.
//!
//! A map exchange string is `>>>` + base64 + `<<<`. The game wraps the
//! base64 body over several lines, so interior whitespace is ignored. Since
//! 0.16 the payload is a zlib stream; older maps store it uncompressed. The
//! binary map settings have changed layout many times, so only the leading
//! game version is interpreted here.

use std::io::Read;

use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use flate2::read::ZlibDecoder;

use crate::logging::debug;

use super::error::CodecError;
use super::version::GameVersion;

const MAP_PREFIX: &str = ">>>";
const MAP_SUFFIX: &str = "<<<";

/// Decoded map exchange data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapExchange {
    /// Raw (decompressed) map settings bytes.
    pub data: Vec<u8>,
    /// Whether the payload was zlib-compressed.
    pub compressed: bool,
}

impl MapExchange {
    /// Parse a `>>>...<<<` map exchange string.
    pub fn parse(input: &str) -> Result<Self, CodecError> {
        let body = input
            .trim()
            .strip_prefix(MAP_PREFIX)
            .and_then(|s| s.strip_suffix(MAP_SUFFIX))
            .ok_or_else(|| {
                CodecError::MapFormat(format!("expected '{MAP_PREFIX}...{MAP_SUFFIX}' framing"))
            })?;

        let body: String = body.chars().filter(|c| !c.is_whitespace()).collect();
        let raw = BASE64.decode(body)?;

        let mut data = Vec::new();
        match ZlibDecoder::new(raw.as_slice()).read_to_end(&mut data) {
            Ok(_) => Ok(Self {
                data,
                compressed: true,
            }),
            Err(_) => {
                debug!(len = raw.len(), "map payload is not zlib, reading as uncompressed");
                Ok(Self {
                    data: raw,
                    compressed: false,
                })
            }
        }
    }

    /// Game version that generated the map.
    pub fn game_version(&self) -> Result<GameVersion, CodecError> {
        GameVersion::from_le_header(&self.data).ok_or_else(|| {
            CodecError::MapFormat(format!(
                "map data too short for a version header ({} bytes)",
                self.data.len()
            ))
        })
    }
}
