//! Configuration inputs of the ion cache precomputation.
//!
//! This crate reads the optional `ioncache.toml` tool configuration, loads the
//! compound source document, and exposes the fixed adduct table together with
//! the isotope labels derived from it.

#![warn(missing_docs)]

pub mod adducts;
pub mod compounds;
pub mod error;
pub mod loader;
pub mod types;

pub use adducts::AdductTable;
pub use compounds::{load_compounds, CompoundEntry, CompoundSource};
pub use error::ConfigError;
pub use loader::{load_config, load_config_from_str, load_config_or_default, CONFIG_FILE};
pub use types::*;
