//! Error types for cache store operations.

use std::path::PathBuf;

/// Errors that can occur while writing cache entries.
///
/// Reads are fail-safe and never produce these: a missing or corrupt entry
/// is simply not there.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// An I/O error occurred while reading or writing cache files.
    #[error("cache I/O error at {path}: {source}")]
    Io {
        /// The path that caused the error.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Records could not be serialized or compressed.
    #[error("serialization error: {reason}")]
    Serialization {
        /// Description of the serialization failure.
        reason: String,
    },
}
