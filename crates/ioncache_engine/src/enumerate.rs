//! Configuration enumeration.

use std::sync::Arc;

use ioncache_common::{IonConfig, MassType, Polarity};

use crate::catalog::{CompoundCatalog, CompoundRef};

/// One configuration to consider, with the compound it was built from.
#[derive(Debug, Clone)]
pub struct Candidate {
    /// Source compound.
    pub compound: Arc<CompoundRef>,
    /// The configuration.
    pub config: IonConfig,
}

/// Expands the catalog into every configuration for one polarity.
///
/// For each compound and adduct label this yields one configuration per
/// isotope label followed by one without an isotope, so the result holds
/// `compounds * adducts * (isotopes + 1)` candidates in that order. Label
/// strings are shared across candidates.
pub fn enumerate(
    catalog: &CompoundCatalog,
    adducts: &[&str],
    isotopes: &[&str],
    polarity: Polarity,
    mass_type: MassType,
) -> Vec<Candidate> {
    let adducts: Vec<Arc<str>> = adducts.iter().map(|&a| Arc::from(a)).collect();
    let isotopes: Vec<Arc<str>> = isotopes.iter().map(|&i| Arc::from(i)).collect();
    let charge = polarity.charge();

    let mut out = Vec::with_capacity(catalog.len() * adducts.len() * (isotopes.len() + 1));
    for compound in catalog.iter() {
        for adduct in &adducts {
            let isotope_options = isotopes.iter().map(Some).chain(std::iter::once(None));
            for isotope in isotope_options {
                let config = IonConfig::new(
                    Arc::clone(&compound.name),
                    Arc::clone(adduct),
                    charge,
                    isotope.cloned(),
                    mass_type,
                );
                out.push(Candidate {
                    compound: Arc::clone(compound),
                    config,
                });
            }
        }
    }
    out
}
