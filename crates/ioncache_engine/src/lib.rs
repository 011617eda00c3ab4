//! Ion cache precomputation pipeline.
//!
//! For each polarity the pipeline enumerates every (compound, adduct,
//! isotope) configuration, probes the cache concurrently to find the ones
//! not yet attempted, and generates those on a pool of worker threads. Each
//! generated configuration ends up as either a valid entry holding its ion
//! record or an invalid sentinel, so interrupted runs resume where they
//! stopped.

#![warn(missing_docs)]

pub mod catalog;
pub mod enumerate;
pub mod error;
pub mod generator;
pub mod orchestrator;
pub mod progress;
pub mod rules;
pub mod scheduler;

pub use catalog::{CompoundCatalog, CompoundRef};
pub use enumerate::{enumerate, Candidate};
pub use error::{EngineError, GenerateError};
pub use generator::{Generator, Outcome};
pub use orchestrator::{Orchestrator, PolaritySummary, RunOptions, RunSummary};
pub use progress::{Progress, ProgressCallback, ProgressReporter};
pub use rules::{compose, AdductClass};
pub use scheduler::{scan, ScanOptions, ScanReport, Task};
