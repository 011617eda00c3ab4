//! Ion configurations, records, and the selectors that parameterize them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Mass convention used when reading an m/z value from the chemistry engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MassType {
    /// Mass of the most abundant isotope of each element.
    #[default]
    Monoisotopic,
    /// Abundance-weighted average mass.
    Average,
}

impl MassType {
    /// Numeric selector used in canonical key strings (`0` or `1`).
    pub fn index(self) -> usize {
        match self {
            MassType::Monoisotopic => 0,
            MassType::Average => 1,
        }
    }
}

impl fmt::Display for MassType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MassType::Monoisotopic => write!(f, "monoisotopic"),
            MassType::Average => write!(f, "average"),
        }
    }
}

/// Sign of the ionization charge. Each polarity is a separate pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Polarity {
    /// Charge +1.
    Positive,
    /// Charge -1.
    Negative,
}

impl Polarity {
    /// Both polarities, in processing order.
    pub const ALL: [Polarity; 2] = [Polarity::Positive, Polarity::Negative];

    /// The signed unit charge of this polarity.
    pub fn charge(self) -> i32 {
        match self {
            Polarity::Positive => 1,
            Polarity::Negative => -1,
        }
    }
}

impl fmt::Display for Polarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:+}", self.charge())
    }
}

/// One desired cache artifact: a compound ionized with an adduct at a given
/// charge, optionally with an isotope substitution.
///
/// Immutable. String fields are reference counted so the enumeration can
/// share one allocation per compound and adduct label across millions of
/// configurations.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IonConfig {
    compound: Arc<str>,
    adduct: Arc<str>,
    charge: i32,
    isotope: Option<Arc<str>>,
    mass_type: MassType,
}

impl IonConfig {
    /// Creates a configuration.
    pub fn new(
        compound: impl Into<Arc<str>>,
        adduct: impl Into<Arc<str>>,
        charge: i32,
        isotope: Option<impl Into<Arc<str>>>,
        mass_type: MassType,
    ) -> Self {
        Self {
            compound: compound.into(),
            adduct: adduct.into(),
            charge,
            isotope: isotope.map(Into::into),
            mass_type,
        }
    }

    /// Compound name.
    pub fn compound(&self) -> &str {
        &self.compound
    }

    /// Adduct label, e.g. `[M+Na]+`.
    pub fn adduct(&self) -> &str {
        &self.adduct
    }

    /// Signed charge.
    pub fn charge(&self) -> i32 {
        self.charge
    }

    /// Isotope label, if any.
    pub fn isotope(&self) -> Option<&str> {
        self.isotope.as_deref()
    }

    /// Mass convention.
    pub fn mass_type(&self) -> MassType {
        self.mass_type
    }

    /// Field-ordered, `|`-delimited encoding hashed into the cache key:
    /// `compound|adduct|charge|isotope-or-empty|mass_type_index`.
    pub fn canonical(&self) -> String {
        format!(
            "{}|{}|{}|{}|{}",
            self.compound,
            self.adduct,
            self.charge,
            self.isotope.as_deref().unwrap_or(""),
            self.mass_type.index()
        )
    }
}

/// A computed ion, the payload of a valid cache entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IonRecord {
    /// Compound name.
    pub name: String,
    /// Mass-to-charge ratio for the configured mass type.
    pub mz: f64,
    /// Signed charge.
    pub charge: i32,
    /// Adduct label.
    pub adduct: String,
    /// Isotope label, if the ion carries an isotope substitution.
    pub isotope: Option<String>,
    /// Composed chemical expression the m/z was computed from.
    pub formula: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_without_isotope() {
        let c = IonConfig::new("Glucose", "[M+Na]+", 1, None::<&str>, MassType::Monoisotopic);
        assert_eq!(c.canonical(), "Glucose|[M+Na]+|1||0");
    }

    #[test]
    fn canonical_with_isotope_and_average_mass() {
        let c = IonConfig::new("Glucose", "[M-H]-", -1, Some("(13C)"), MassType::Average);
        assert_eq!(c.canonical(), "Glucose|[M-H]-|-1|(13C)|1");
    }

    #[test]
    fn polarity_order_and_charge() {
        let charges: Vec<i32> = Polarity::ALL.iter().map(|p| p.charge()).collect();
        assert_eq!(charges, vec![1, -1]);
        assert_eq!(Polarity::Negative.to_string(), "-1");
        assert_eq!(Polarity::Positive.to_string(), "+1");
    }

    #[test]
    fn mass_type_serde_lowercase() {
        let m: MassType = serde_json::from_str("\"average\"").unwrap();
        assert_eq!(m, MassType::Average);
        assert_eq!(MassType::default(), MassType::Monoisotopic);
    }

    #[test]
    fn record_serde_roundtrip() {
        let rec = IonRecord {
            name: "Glucose".to_string(),
            mz: 203.052_6,
            charge: 1,
            adduct: "[M+Na]+".to_string(),
            isotope: None,
            formula: "C6H12O6(Na)(H-1)".to_string(),
        };
        let json = serde_json::to_string(&rec).unwrap();
        let back: IonRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, rec);
    }
}
