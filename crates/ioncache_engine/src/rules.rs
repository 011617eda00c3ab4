//! Adduct composition rules.
//!
//! Each adduct label belongs to a class that decides how the adduct formula
//! attaches to the base expression. Charging by protons happens later, when
//! the m/z is computed, so the composed expression carries the hydrogen
//! corrections that make the proton arithmetic land on the named ion.

/// How an adduct fragment combines with a base expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdductClass {
    /// Replaces a hydrogen: `base(X)(H-1)`.
    Substitution,
    /// Adds the fragment with a hydrogen: `base(X)(H)`.
    Attachment,
    /// Dimer replacing a hydrogen: `basebase(X)(H-1)`.
    DimerSubstitution,
    /// Dimer adding the fragment with a hydrogen: `basebase(X)(H)`.
    DimerAttachment,
    /// Adds the fragment alone: `base(X)`.
    Direct,
    /// Leaves the base unchanged.
    Bare,
}

impl AdductClass {
    /// Classifies an adduct label.
    pub fn of(label: &str) -> Self {
        match label {
            "[M+Li]+" | "[M+Na-2H]-" | "[M+K-2H]-" | "[M+Na]+" | "[M+K]+" | "[M+NH4]+" => {
                Self::Substitution
            }
            "[M+Cl]-" | "[M-CH3]-" | "[M-C3H10N]-" | "[M-C5H12N]-" => Self::Attachment,
            "[2M+Na]+" | "[2M+K]+" | "[2M+NH4]+" | "[2M+H]+" | "[2M-H]-" => {
                Self::DimerSubstitution
            }
            "[2M+Cl]-" | "[2M+Na-2H]-" | "[2M+K-2H]-" => Self::DimerAttachment,
            "[M-H2O-H]-" | "[M-H2O+H]+" | "[+MeOH+H]+" | "[+ACN+H]+" | "[M+FMP10]+"
            | "[M+2FMP10]+" | "[M+2FMP10-CH3]+" | "[M+AMPP]+" | "[M+2AMPP]+" | "[M+3AMPP]+" => {
                Self::Direct
            }
            _ => Self::Bare,
        }
    }
}

/// Composes the formula expression of `label` applied to `base`, where
/// `fragment` is the label's entry in the adduct table.
///
/// Dimer classes repeat the base textually, so `C6H12O6` becomes
/// `C6H12O6C6H12O6` before the fragment is attached.
pub fn compose(base: &str, label: &str, fragment: &str) -> String {
    match AdductClass::of(label) {
        AdductClass::Substitution => format!("{base}({fragment})(H-1)"),
        AdductClass::Attachment => format!("{base}({fragment})(H)"),
        AdductClass::DimerSubstitution => format!("{base}{base}({fragment})(H-1)"),
        AdductClass::DimerAttachment => format!("{base}{base}({fragment})(H)"),
        AdductClass::Direct => format!("{base}({fragment})"),
        AdductClass::Bare => base.to_string(),
    }
}
