//! The set of compounds to precompute.

use std::collections::BTreeMap;
use std::sync::Arc;

use ioncache_chem::{ChemicalCompound, ChemistryEngine};
use ioncache_config::CompoundEntry;
use tracing::{debug, warn};

/// A named compound and its base formula expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompoundRef {
    /// Display name, part of the cache key.
    pub name: Arc<str>,
    /// Base formula expression, also the store subdirectory name.
    pub expression: Arc<str>,
}

/// Compounds keyed by name.
///
/// Names are unique; a later entry with the same name replaces an earlier
/// one. Iteration is in name order so enumeration is deterministic.
#[derive(Debug, Clone, Default)]
pub struct CompoundCatalog {
    compounds: BTreeMap<Arc<str>, Arc<CompoundRef>>,
}

impl CompoundCatalog {
    /// Builds a catalog from source entries, checking each formula with the
    /// chemistry engine. Entries whose formula the engine rejects are
    /// skipped with a warning.
    pub fn load<E: ChemistryEngine>(entries: &[CompoundEntry], engine: &E) -> Self {
        let mut catalog = Self::default();
        for entry in entries {
            match engine.compound(&entry.formula) {
                Ok(compound) => {
                    catalog.insert(&entry.name, compound.expression());
                }
                Err(e) => {
                    warn!(name = %entry.name, formula = %entry.formula, error = %e, "skipping compound");
                }
            }
        }
        debug!(count = catalog.len(), "compound catalog loaded");
        catalog
    }

    /// Adds or replaces a compound.
    pub fn insert(&mut self, name: &str, expression: &str) {
        let key: Arc<str> = Arc::from(name);
        let compound = Arc::new(CompoundRef {
            name: Arc::clone(&key),
            expression: Arc::from(expression),
        });
        if self.compounds.insert(key, compound).is_some() {
            debug!(name, "duplicate compound name, keeping the later entry");
        }
    }

    /// Looks up a compound by name.
    pub fn get(&self, name: &str) -> Option<&Arc<CompoundRef>> {
        self.compounds.get(name)
    }

    /// Compounds in name order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<CompoundRef>> {
        self.compounds.values()
    }

    /// Number of compounds.
    pub fn len(&self) -> usize {
        self.compounds.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.compounds.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ioncache_chem::FormulaEngine;

    fn entry(name: &str, formula: &str) -> CompoundEntry {
        CompoundEntry {
            name: name.to_string(),
            formula: formula.to_string(),
        }
    }

    #[test]
    fn load_keeps_parseable_formulas() {
        let engine = FormulaEngine::new();
        let catalog = CompoundCatalog::load(
            &[entry("Glucose", "C6H12O6"), entry("Broken", "C6H12(O6")],
            &engine,
        );
        assert_eq!(catalog.len(), 1);
        let glucose = catalog.get("Glucose").unwrap();
        assert_eq!(&*glucose.expression, "C6H12O6");
        assert!(catalog.get("Broken").is_none());
    }

    #[test]
    fn later_duplicate_replaces_earlier() {
        let engine = FormulaEngine::new();
        let catalog = CompoundCatalog::load(
            &[entry("Sugar", "C6H12O6"), entry("Sugar", "C12H22O11")],
            &engine,
        );
        assert_eq!(catalog.len(), 1);
        assert_eq!(&*catalog.get("Sugar").unwrap().expression, "C12H22O11");
    }

    #[test]
    fn out_of_range_formulas_are_skipped() {
        let engine = FormulaEngine::new();
        let deep = format!("{}H{}", "(".repeat(10_000), ")".repeat(10_000));
        let catalog = CompoundCatalog::load(
            &[
                entry("Glucose", "C6H12O6"),
                entry("Huge", "C9223372036854775807C"),
                entry("Deep", &deep),
            ],
            &engine,
        );
        assert_eq!(catalog.len(), 1);
        assert!(catalog.get("Glucose").is_some());
    }

    #[test]
    fn insert_replaces_existing_name() {
        let mut catalog = CompoundCatalog::default();
        catalog.insert("Water", "H2O");
        catalog.insert("Water", "D2O");
        assert_eq!(catalog.len(), 1);
        let water = catalog.get("Water").unwrap();
        assert_eq!(&*water.name, "Water");
        assert_eq!(&*water.expression, "D2O");
    }

    #[test]
    fn iteration_is_name_ordered() {
        let mut catalog = CompoundCatalog::default();
        catalog.insert("b", "H2O");
        catalog.insert("a", "CO2");
        let names: Vec<_> = catalog.iter().map(|c| c.name.to_string()).collect();
        assert_eq!(names, ["a", "b"]);
    }

    #[test]
    fn empty_catalog() {
        let catalog = CompoundCatalog::load(&[], &FormulaEngine::new());
        assert!(catalog.is_empty());
    }
}
