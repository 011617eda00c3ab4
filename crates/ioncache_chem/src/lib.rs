//! Chemistry engine used by the ion cache.
//!
//! The precomputation pipeline only talks to the [`ChemistryEngine`] and
//! [`ChemicalCompound`] traits: construct a compound from a formula
//! expression, ask whether it is chemically valid, and compute its m/z for a
//! charge. [`FormulaEngine`] is the bundled implementation backed by an
//! explicitly owned element table.

#![warn(missing_docs)]

pub mod compound;
pub mod element;
pub mod engine;
pub mod error;
pub mod formula;

pub use compound::Compound;
pub use element::{Element, ElementTable, ELECTRON_MASS};
pub use engine::{ChemicalCompound, ChemistryEngine, FormulaEngine, MzPair};
pub use error::ChemError;
pub use formula::{Atom, Composition};
