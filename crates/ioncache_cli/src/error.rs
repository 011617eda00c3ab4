use std::path::PathBuf;

use ioncache_common::ParseCacheKeyError;
use ioncache_config::ConfigError;
use ioncache_engine::EngineError;

/// Errors that end a CLI invocation with exit code 1.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration or compound source could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The pipeline could not run.
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// The log file could not be created.
    #[error("cannot create log file {}: {source}", path.display())]
    LogFile {
        /// Requested log file path.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// A global tracing subscriber was already installed.
    #[error("failed to initialize logging: {0}")]
    Logging(String),

    /// `--home` was given but no home directory is known.
    #[error("cannot determine the home directory")]
    NoHomeDir,

    /// A cache key argument is not 16 hex digits.
    #[error(transparent)]
    InvalidKey(#[from] ParseCacheKeyError),

    /// Records could not be rendered as JSON.
    #[error("failed to render records: {0}")]
    Json(#[from] serde_json::Error),
}
