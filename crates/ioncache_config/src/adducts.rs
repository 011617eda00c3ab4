//! The fixed adduct table.
//!
//! Maps each adduct label to the formula fragment it contributes. Labels in
//! parentheses, such as `(13C)`, are isotope substitutions: their fragment
//! swaps one natural atom for a heavy isotope. The table is part of the cache
//! contract (labels feed the cache key) and is not configurable per run.

/// Label and formula contribution, in enumeration order.
static ADDUCTS: &[(&str, &str)] = &[
    // Positive mode.
    ("[M+H]+", "H"),
    ("[M+Na]+", "Na"),
    ("[M+K]+", "K"),
    ("[M+Li]+", "Li"),
    ("[M+NH4]+", "NH4"),
    ("[M-H2O+H]+", "H-2O-1"),
    ("[+MeOH+H]+", "CH4O"),
    ("[+ACN+H]+", "C2H3N"),
    ("[2M+H]+", "H"),
    ("[2M+Na]+", "Na"),
    ("[2M+K]+", "K"),
    ("[2M+NH4]+", "NH4"),
    ("[M+FMP10]+", "C20H12N"),
    ("[M+2FMP10]+", "C40H26N2"),
    ("[M+2FMP10-CH3]+", "C39H23N2"),
    ("[M+AMPP]+", "C12H10N2O-1"),
    ("[M+2AMPP]+", "C24H20N4O-2"),
    ("[M+3AMPP]+", "C36H30N6O-3"),
    // Negative mode.
    ("[M-H]-", "H-1"),
    ("[M+Cl]-", "Cl"),
    ("[M-CH3]-", "C-1H-3"),
    ("[M-C3H10N]-", "C-3H-10N-1"),
    ("[M-C5H12N]-", "C-5H-12N-1"),
    ("[M+Na-2H]-", "Na"),
    ("[M+K-2H]-", "K"),
    ("[M-H2O-H]-", "H-2O-1"),
    ("[2M-H]-", "H"),
    ("[2M+Cl]-", "Cl"),
    ("[2M+Na-2H]-", "NaH-2"),
    ("[2M+K-2H]-", "KH-2"),
    // Isotope substitutions.
    ("(13C)", "C-1C{13}"),
    ("(15N)", "N-1N{15}"),
    ("(2H)", "H-1H{2}"),
    ("(18O)", "O-1O{18}"),
    ("(34S)", "S-1S{34}"),
    ("(37Cl)", "Cl-1Cl{37}"),
    ("(41K)", "K-1K{41}"),
    ("(81Br)", "Br-1Br{81}"),
];

/// Read-only view of the adduct table.
#[derive(Debug, Clone, Copy)]
pub struct AdductTable {
    entries: &'static [(&'static str, &'static str)],
}

impl AdductTable {
    /// The built-in table.
    pub fn standard() -> Self {
        Self { entries: ADDUCTS }
    }

    /// Every label, isotope labels included, in table order.
    ///
    /// This is the adduct axis of the enumeration.
    pub fn labels(&self) -> Vec<&'static str> {
        self.entries.iter().map(|(label, _)| *label).collect()
    }

    /// Labels following the parenthesized isotope naming convention.
    pub fn isotope_labels(&self) -> Vec<&'static str> {
        self.entries
            .iter()
            .map(|(label, _)| *label)
            .filter(|label| label.starts_with('('))
            .collect()
    }

    /// Formula contribution of a label.
    pub fn formula(&self, label: &str) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|(l, _)| *l == label)
            .map(|(_, formula)| *formula)
    }

    /// Number of labels.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the table has no labels.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for AdductTable {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn labels_are_unique() {
        let table = AdductTable::standard();
        let unique: HashSet<_> = table.labels().into_iter().collect();
        assert_eq!(unique.len(), table.len());
    }

    #[test]
    fn isotope_labels_are_parenthesized_subset() {
        let table = AdductTable::standard();
        let isotopes = table.isotope_labels();
        assert_eq!(isotopes.len(), 8);
        assert!(isotopes.iter().all(|l| l.starts_with('(')));
        let labels = table.labels();
        assert!(isotopes.iter().all(|l| labels.contains(l)));
    }

    #[test]
    fn formula_lookup() {
        let table = AdductTable::standard();
        assert_eq!(table.formula("[M+Na]+"), Some("Na"));
        assert_eq!(table.formula("(13C)"), Some("C-1C{13}"));
        assert_eq!(table.formula("[M+Xx]+"), None);
    }
}
