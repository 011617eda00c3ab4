//! Error types for the precomputation pipeline.

use ioncache_chem::ChemError;

/// Errors that stop a run.
///
/// Per-configuration failures never surface here; they degrade to invalid
/// cache entries inside the generation phase.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// No compound could be loaded, so there is nothing to precompute.
    #[error("no compounds loaded")]
    NoCompounds,

    /// The thread pool or async runtime could not be started or joined.
    #[error("runtime failure: {reason}")]
    Runtime {
        /// Description of the failure.
        reason: String,
    },
}

/// Reasons a single configuration could not produce an ion.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    /// The adduct label is not in the adduct table.
    #[error("unknown adduct label '{0}'")]
    UnknownAdduct(String),

    /// The isotope label is not in the adduct table.
    #[error("unknown isotope label '{0}'")]
    UnknownIsotope(String),

    /// The chemistry engine could not construct a composed expression.
    #[error(transparent)]
    Chem(#[from] ChemError),

    /// The engine produced an m/z that is not a finite number.
    #[error("non-finite m/z {mz} for '{expression}'")]
    NonFiniteMz {
        /// The offending value.
        mz: f64,
        /// The expression it was computed from.
        expression: String,
    },
}
