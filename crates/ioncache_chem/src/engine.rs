//! The engine interface consumed by the cache pipeline, and its bundled
//! formula-based implementation.

use ioncache_common::MassType;

use crate::compound::Compound;
use crate::element::{ElementTable, ELECTRON_MASS};
use crate::error::ChemError;
use crate::formula::Composition;

/// A pair of masses or m/z values, one per mass convention.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MzPair {
    /// Monoisotopic value.
    pub monoisotopic: f64,
    /// Average value.
    pub average: f64,
}

impl MzPair {
    /// Selects the value for a mass convention.
    pub fn get(&self, mass_type: MassType) -> f64 {
        match mass_type {
            MassType::Monoisotopic => self.monoisotopic,
            MassType::Average => self.average,
        }
    }
}

/// A compound constructed by a [`ChemistryEngine`].
pub trait ChemicalCompound {
    /// Whether the composition is chemically possible.
    fn is_valid(&self) -> bool;

    /// The expression the compound was built from.
    fn expression(&self) -> &str;

    /// Mass-to-charge values for a signed charge. A charge of zero yields
    /// the neutral mass.
    fn mz(&self, charge: i32) -> MzPair;
}

/// Constructs compounds from formula expressions.
///
/// Implementations carry their own state (element tables, caches); callers
/// pass the engine by reference wherever compounds are built.
pub trait ChemistryEngine: Send + Sync {
    /// Compound type produced by this engine.
    type Compound: ChemicalCompound;

    /// Builds a compound, failing on malformed expressions.
    fn compound(&self, expression: &str) -> Result<Self::Compound, ChemError>;
}

/// Formula engine over an owned [`ElementTable`].
///
/// Ions are charged by adding or removing protons: `mz(z)` is the neutral
/// mass plus `z` proton masses, divided by `|z|`.
#[derive(Debug, Clone)]
pub struct FormulaEngine {
    elements: ElementTable,
    proton: MzPair,
}

impl FormulaEngine {
    /// Creates an engine over the standard element table.
    pub fn new() -> Self {
        Self::with_elements(ElementTable::standard())
    }

    /// Creates an engine over a caller-supplied element table.
    ///
    /// The table must contain hydrogen, which is the charging agent.
    pub fn with_elements(elements: ElementTable) -> Self {
        let proton = elements
            .get("H")
            .map(|h| MzPair {
                monoisotopic: h.monoisotopic_mass() - ELECTRON_MASS,
                average: h.average_mass - ELECTRON_MASS,
            })
            .unwrap_or_default();
        Self { elements, proton }
    }

    /// The element table backing this engine.
    pub fn elements(&self) -> &ElementTable {
        &self.elements
    }

    fn mass_of(&self, composition: &Composition) -> MzPair {
        let mut mass = MzPair::default();
        for (atom, &count) in composition.iter() {
            let Some(element) = self.elements.get(atom.symbol) else {
                continue;
            };
            let (mono, avg) = match atom.mass_number.and_then(|n| element.isotope(n)) {
                Some(isotope) => (isotope.mass, isotope.mass),
                None => (element.monoisotopic_mass(), element.average_mass),
            };
            mass.monoisotopic += mono * count as f64;
            mass.average += avg * count as f64;
        }
        mass
    }
}

impl Default for FormulaEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ChemistryEngine for FormulaEngine {
    type Compound = Compound;

    fn compound(&self, expression: &str) -> Result<Compound, ChemError> {
        let composition = Composition::parse(expression, &self.elements)?;
        let mass = self.mass_of(&composition);
        Ok(Compound::new(expression, composition, mass, self.proton))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-4,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn glucose_neutral_mass() {
        let engine = FormulaEngine::new();
        let glucose = engine.compound("C6H12O6").unwrap();
        let mass = glucose.mz(0);
        assert_close(mass.monoisotopic, 180.063_388);
        assert_close(mass.average, 180.155_88);
    }

    #[test]
    fn sodium_adduct_mz() {
        // [M+Na]+ composes as M + Na - H, then charges with one proton.
        let engine = FormulaEngine::new();
        let ion = engine.compound("C6H12O6(Na)(H-1)").unwrap();
        assert!(ion.is_valid());
        assert_close(ion.mz(1).monoisotopic, 203.052_609);
    }

    #[test]
    fn deprotonated_mz() {
        let engine = FormulaEngine::new();
        let glucose = engine.compound("C6H12O6").unwrap();
        assert_close(glucose.mz(-1).monoisotopic, 179.056_112);
    }

    #[test]
    fn doubly_charged_divides_by_two() {
        let engine = FormulaEngine::new();
        let glucose = engine.compound("C6H12O6").unwrap();
        let single = glucose.mz(1).monoisotopic;
        let double = glucose.mz(2).monoisotopic;
        assert_close(double, (single + engine.proton.monoisotopic) / 2.0);
    }

    #[test]
    fn isotope_shifts_mass() {
        let engine = FormulaEngine::new();
        let light = engine.compound("C6H12O6").unwrap().mz(0);
        let heavy = engine.compound("C6H12O6(C-1C{13})").unwrap().mz(0);
        assert_close(heavy.monoisotopic - light.monoisotopic, 1.003_355);
    }

    #[test]
    fn select_mass_type() {
        let pair = MzPair {
            monoisotopic: 1.0,
            average: 2.0,
        };
        assert_eq!(pair.get(MassType::Monoisotopic), 1.0);
        assert_eq!(pair.get(MassType::Average), 2.0);
    }

    #[test]
    fn malformed_expression_fails_construction() {
        let engine = FormulaEngine::new();
        assert!(engine.compound("C6H12O6(").is_err());
    }
}
