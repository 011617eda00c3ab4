//! Compounds produced by [`FormulaEngine`](crate::FormulaEngine).

use crate::engine::{ChemicalCompound, MzPair};
use crate::formula::Composition;

/// A parsed formula with precomputed neutral masses.
#[derive(Debug, Clone, PartialEq)]
pub struct Compound {
    expression: String,
    composition: Composition,
    mass: MzPair,
    proton: MzPair,
}

impl Compound {
    pub(crate) fn new(
        expression: &str,
        composition: Composition,
        mass: MzPair,
        proton: MzPair,
    ) -> Self {
        Self {
            expression: expression.to_string(),
            composition,
            mass,
            proton,
        }
    }

    /// Summed atom counts.
    pub fn composition(&self) -> &Composition {
        &self.composition
    }

    /// Neutral monoisotopic and average masses.
    pub fn mass(&self) -> MzPair {
        self.mass
    }

    /// Condensed formula with one term per atom kind, e.g. `C6H11NaO6`.
    pub fn formula(&self) -> String {
        self.composition.to_string()
    }
}

impl ChemicalCompound for Compound {
    /// Valid when at least one atom remains and no count is negative.
    fn is_valid(&self) -> bool {
        !self.composition.is_empty() && !self.composition.has_negative()
    }

    fn expression(&self) -> &str {
        &self.expression
    }

    fn mz(&self, charge: i32) -> MzPair {
        if charge == 0 {
            return self.mass;
        }
        let z = f64::from(charge);
        let divisor = z.abs();
        MzPair {
            monoisotopic: (self.mass.monoisotopic + self.proton.monoisotopic * z) / divisor,
            average: (self.mass.average + self.proton.average * z) / divisor,
        }
    }
}
