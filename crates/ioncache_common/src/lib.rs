//! Shared value types for the ion cache precomputation toolchain.
//!
//! This crate provides the ion configuration that identifies one cached
//! artifact, the deterministic cache key derived from it, the persisted ion
//! record, and the polarity and mass-type selectors used across the pipeline.

#![warn(missing_docs)]

pub mod hash;
pub mod ion;

pub use hash::{CacheKey, ParseCacheKeyError};
pub use ion::{IonConfig, IonRecord, MassType, Polarity};
