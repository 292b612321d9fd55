//! Logging macros used inside the library.
//!
//! With the `logging` feature the macros forward to `tracing`; without it
//! they expand to nothing, so the store and codec carry no logging cost.
//!
//! ```rust,ignore
//! use crate::logging::{debug, info};
//!
//! info!(book = %name, "book created");
//! debug!(path = %path.display(), "writing entry");
//! ```

/// Very detailed internal steps (per-file scans, walker decisions).
#[cfg(feature = "logging")]
macro_rules! log_trace {
    ($($arg:tt)*) => { tracing::trace!($($arg)*) }
}

#[cfg(not(feature = "logging"))]
macro_rules! log_trace {
    ($($arg:tt)*) => {};
}

/// Operation details useful while debugging a store.
#[cfg(feature = "logging")]
macro_rules! log_debug {
    ($($arg:tt)*) => { tracing::debug!($($arg)*) }
}

#[cfg(not(feature = "logging"))]
macro_rules! log_debug {
    ($($arg:tt)*) => {};
}

/// Store mutations: books and items created or updated.
#[cfg(feature = "logging")]
macro_rules! log_info {
    ($($arg:tt)*) => { tracing::info!($($arg)*) }
}

#[cfg(not(feature = "logging"))]
macro_rules! log_info {
    ($($arg:tt)*) => {};
}

/// Failures that were absorbed (a skipped book entry, an unreadable file).
#[cfg(feature = "logging")]
macro_rules! log_warn {
    ($($arg:tt)*) => { tracing::warn!($($arg)*) }
}

#[cfg(not(feature = "logging"))]
macro_rules! log_warn {
    ($($arg:tt)*) => {};
}

pub(crate) use log_debug as debug;
pub(crate) use log_info as info;
pub(crate) use log_trace as trace;
pub(crate) use log_warn as warn;
