//! Game version decoding.
//!
//! Factorio packs a game version into four 16-bit fields. Blueprint JSON
//! stores it as one 64-bit integer with `major` in the most significant
//! field; map exchange data stores the same four fields as little-endian
//! `u16`s at the start of the payload.

use std::fmt;

/// A decoded game version (`major.minor.patch[.dev]`).
///
/// # Example
///
/// ```ignore
/// use blueprint_db::GameVersion;
///
/// let v = GameVersion::from_packed(281479278886912);
/// assert_eq!(v.to_string(), "1.1.110");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct GameVersion {
    pub major: u16,
    pub minor: u16,
    pub patch: u16,
    pub dev: u16,
}

impl GameVersion {
    pub const fn new(major: u16, minor: u16, patch: u16, dev: u16) -> Self {
        Self {
            major,
            minor,
            patch,
            dev,
        }
    }

    /// Unpack the 64-bit representation used in blueprint JSON.
    ///
    /// Total over the whole `u64` domain.
    pub const fn from_packed(packed: u64) -> Self {
        Self {
            major: (packed >> 48) as u16,
            minor: (packed >> 32) as u16,
            patch: (packed >> 16) as u16,
            dev: packed as u16,
        }
    }

    /// Pack back into the 64-bit blueprint representation.
    pub const fn packed(&self) -> u64 {
        ((self.major as u64) << 48)
            | ((self.minor as u64) << 32)
            | ((self.patch as u64) << 16)
            | self.dev as u64
    }

    /// Read the version header of map exchange data: four little-endian `u16`.
    ///
    /// Returns `None` when fewer than 8 bytes are available.
    pub fn from_le_header(bytes: &[u8]) -> Option<Self> {
        let header: &[u8; 8] = bytes.get(..8)?.try_into().ok()?;
        let [a0, a1, b0, b1, c0, c1, d0, d1] = *header;
        Some(Self {
            major: u16::from_le_bytes([a0, a1]),
            minor: u16::from_le_bytes([b0, b1]),
            patch: u16::from_le_bytes([c0, c1]),
            dev: u16::from_le_bytes([d0, d1]),
        })
    }
}

impl fmt::Display for GameVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if self.dev != 0 {
            write!(f, ".{}", self.dev)?;
        }
        Ok(())
    }
}

/// Decode a packed blueprint game version to its dotted form.
pub fn decode_version(packed: u64) -> String {
    GameVersion::from_packed(packed).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_known_vector() {
        assert_eq!(decode_version(281479278886912), "1.1.110");
    }

    #[test]
    fn test_decode_zero() {
        assert_eq!(decode_version(0), "0.0.0");
    }

    #[test]
    fn test_dev_suffix_only_when_nonzero() {
        assert_eq!(GameVersion::new(0, 17, 9, 1).to_string(), "0.17.9.1");
        assert_eq!(GameVersion::new(2, 0, 11, 3).to_string(), "2.0.11.3");
        assert_eq!(GameVersion::new(1, 1, 8, 0).to_string(), "1.1.8");
    }

    #[test]
    fn test_decode_max() {
        assert_eq!(decode_version(u64::MAX), "65535.65535.65535.65535");
    }

    #[test]
    fn test_packed_roundtrip() {
        let v = GameVersion::new(1, 1, 107, 0);
        assert_eq!(GameVersion::from_packed(v.packed()), v);
        assert_eq!(v.packed(), 281479278690304);
    }

    #[test]
    fn test_le_header() {
        let bytes = [1, 0, 1, 0, 110, 0, 0, 0, 0xff];
        assert_eq!(
            GameVersion::from_le_header(&bytes),
            Some(GameVersion::new(1, 1, 110, 0))
        );
        assert_eq!(GameVersion::from_le_header(&bytes[..7]), None);
    }
}
