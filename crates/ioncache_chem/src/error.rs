//! Error types for formula handling.

/// Errors raised while constructing a compound from a formula expression.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ChemError {
    /// The expression is not well formed.
    #[error("malformed formula '{expression}' at offset {offset}: {reason}")]
    Syntax {
        /// The offending expression.
        expression: String,
        /// Byte offset of the problem.
        offset: usize,
        /// Description of the problem.
        reason: String,
    },

    /// An element symbol is not in the element table.
    #[error("unknown element '{symbol}'")]
    UnknownElement {
        /// The unrecognized symbol.
        symbol: String,
    },

    /// An isotope selector names a mass number the element does not have.
    #[error("unknown isotope {symbol}{{{mass_number}}}")]
    UnknownIsotope {
        /// Element symbol.
        symbol: String,
        /// Requested mass number.
        mass_number: u16,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn syntax_display() {
        let err = ChemError::Syntax {
            expression: "C6(H".to_string(),
            offset: 4,
            reason: "unclosed group".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("C6(H"));
        assert!(msg.contains("offset 4"));
        assert!(msg.contains("unclosed group"));
    }

    #[test]
    fn unknown_isotope_display() {
        let err = ChemError::UnknownIsotope {
            symbol: "C".to_string(),
            mass_number: 99,
        };
        assert_eq!(err.to_string(), "unknown isotope C{99}");
    }
}
