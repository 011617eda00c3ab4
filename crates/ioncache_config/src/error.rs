//! Error types for configuration and compound source loading.

use std::path::PathBuf;

/// Errors that can occur when loading configuration inputs.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An I/O error occurred while reading a configuration file.
    #[error("failed to read {path}: {source}")]
    IoError {
        /// The file that could not be read.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse configuration: {0}")]
    ParseError(String),

    /// The compound source document could not be parsed.
    #[error("malformed compound source {path}: {reason}")]
    MalformedSource {
        /// The compound source file.
        path: PathBuf,
        /// Description of the parse failure.
        reason: String,
    },

    /// A configuration value failed validation.
    #[error("validation error: {0}")]
    ValidationError(String),
}
