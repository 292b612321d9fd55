//! Exchange string codecs.
//!
//! - [`codec`]: blueprint exchange strings (version digit + base64 + zlib JSON)
//! - [`map`]: map exchange strings (`>>>...<<<`, version header only)
//! - [`version`]: packed game version decoding

pub mod codec;
mod error;
pub mod map;
pub mod version;

pub use codec::{DEFAULT_EXCHANGE_VERSION, ExchangeCodec, canonicalize};
pub use error::CodecError;
pub use map::MapExchange;
pub use version::{GameVersion, decode_version};
