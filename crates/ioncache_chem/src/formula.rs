//! Formula expression parsing.
//!
//! Grammar, with counts defaulting to 1:
//!
//! ```text
//! formula := item*
//! item    := element | group
//! element := Symbol ('{' mass_number '}')? count?
//! group   := '(' formula ')' count?
//! count   := '-'? digits
//! ```
//!
//! Negative counts are allowed so that adduct contributions such as `(H-1)`
//! can remove atoms; whether the summed composition is physically possible
//! is a separate validity check.

use std::collections::BTreeMap;
use std::fmt;

use crate::element::{Element, ElementTable};
use crate::error::ChemError;

/// Deepest group nesting accepted by the parser.
const MAX_GROUP_DEPTH: usize = 64;

/// An element, optionally pinned to one isotope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Atom {
    /// Element symbol.
    pub symbol: &'static str,
    /// Isotope mass number, or `None` for the natural distribution.
    pub mass_number: Option<u16>,
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.mass_number {
            Some(n) => write!(f, "{}{{{n}}}", self.symbol),
            None => write!(f, "{}", self.symbol),
        }
    }
}

/// Summed atom counts of a formula. Zero counts are dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Composition {
    counts: BTreeMap<Atom, i64>,
}

impl Composition {
    /// Parses an expression against the given element table.
    pub fn parse(expression: &str, table: &ElementTable) -> Result<Self, ChemError> {
        let mut parser = Parser {
            expression,
            bytes: expression.as_bytes(),
            pos: 0,
            table,
        };
        let composition = parser.formula(0)?;
        if parser.pos < parser.bytes.len() {
            return Err(parser.syntax("unexpected ')'"));
        }
        Ok(composition)
    }

    /// Count of one atom kind (0 when absent).
    pub fn count(&self, atom: &Atom) -> i64 {
        self.counts.get(atom).copied().unwrap_or(0)
    }

    /// Iterates over non-zero atom counts in a stable order.
    pub fn iter(&self) -> impl Iterator<Item = (&Atom, &i64)> {
        self.counts.iter()
    }

    /// Returns `true` when no atoms remain.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Returns `true` if any atom count is below zero.
    pub fn has_negative(&self) -> bool {
        self.counts.values().any(|&n| n < 0)
    }

    /// Adds `count` atoms. `None` when the total leaves the `i64` range.
    fn add(&mut self, atom: Atom, count: i64) -> Option<()> {
        let total = self.count(&atom).checked_add(count)?;
        if total == 0 {
            self.counts.remove(&atom);
        } else {
            self.counts.insert(atom, total);
        }
        Some(())
    }

    fn merge_scaled(&mut self, other: Composition, factor: i64) -> Option<()> {
        for (atom, count) in other.counts {
            self.add(atom, count.checked_mul(factor)?)?;
        }
        Some(())
    }
}

impl fmt::Display for Composition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (atom, count) in &self.counts {
            if *count == 1 {
                write!(f, "{atom}")?;
            } else {
                write!(f, "{atom}{count}")?;
            }
        }
        Ok(())
    }
}

struct Parser<'a> {
    expression: &'a str,
    bytes: &'a [u8],
    pos: usize,
    table: &'a ElementTable,
}

impl Parser<'_> {
    fn formula(&mut self, depth: usize) -> Result<Composition, ChemError> {
        let mut composition = Composition::default();
        while let Some(&b) = self.bytes.get(self.pos) {
            match b {
                b'(' => {
                    if depth >= MAX_GROUP_DEPTH {
                        return Err(self.syntax("groups nested too deeply"));
                    }
                    self.pos += 1;
                    let inner = self.formula(depth + 1)?;
                    if self.bytes.get(self.pos) != Some(&b')') {
                        return Err(self.syntax("unclosed group"));
                    }
                    self.pos += 1;
                    let factor = self.count()?;
                    composition
                        .merge_scaled(inner, factor)
                        .ok_or_else(|| self.syntax("count out of range"))?;
                }
                b')' => return Ok(composition),
                b'A'..=b'Z' => {
                    let (element, mass_number) = self.element()?;
                    let count = self.count()?;
                    let atom = Atom {
                        symbol: element.symbol,
                        mass_number,
                    };
                    composition
                        .add(atom, count)
                        .ok_or_else(|| self.syntax("count out of range"))?;
                }
                _ => return Err(self.syntax("unexpected character")),
            }
        }
        if depth > 0 {
            return Err(self.syntax("unclosed group"));
        }
        Ok(composition)
    }

    fn element(&mut self) -> Result<(&'static Element, Option<u16>), ChemError> {
        let start = self.pos;
        self.pos += 1;
        while matches!(self.bytes.get(self.pos), Some(b'a'..=b'z')) {
            self.pos += 1;
        }
        let expression = self.expression;
        let symbol = &expression[start..self.pos];
        let element = self
            .table
            .get(symbol)
            .ok_or_else(|| ChemError::UnknownElement {
                symbol: symbol.to_string(),
            })?;

        if self.bytes.get(self.pos) != Some(&b'{') {
            return Ok((element, None));
        }
        self.pos += 1;
        let digits_start = self.pos;
        while matches!(self.bytes.get(self.pos), Some(b'0'..=b'9')) {
            self.pos += 1;
        }
        let mass_number: u16 = self.expression[digits_start..self.pos]
            .parse()
            .map_err(|_| self.syntax("expected isotope mass number"))?;
        if self.bytes.get(self.pos) != Some(&b'}') {
            return Err(self.syntax("unclosed isotope selector"));
        }
        self.pos += 1;
        if element.isotope(mass_number).is_none() {
            return Err(ChemError::UnknownIsotope {
                symbol: symbol.to_string(),
                mass_number,
            });
        }
        Ok((element, Some(mass_number)))
    }

    fn count(&mut self) -> Result<i64, ChemError> {
        let start = self.pos;
        let negative = self.bytes.get(self.pos) == Some(&b'-');
        if negative {
            self.pos += 1;
        }
        let digits_start = self.pos;
        while matches!(self.bytes.get(self.pos), Some(b'0'..=b'9')) {
            self.pos += 1;
        }
        if digits_start == self.pos {
            if negative {
                self.pos = start;
                return Err(self.syntax("expected digits after '-'"));
            }
            return Ok(1);
        }
        let value: i64 = self.expression[digits_start..self.pos]
            .parse()
            .map_err(|_| self.syntax("count out of range"))?;
        Ok(if negative { -value } else { value })
    }

    fn syntax(&self, reason: &str) -> ChemError {
        ChemError::Syntax {
            expression: self.expression.to_string(),
            offset: self.pos,
            reason: reason.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(expr: &str) -> Result<Composition, ChemError> {
        Composition::parse(expr, &ElementTable::standard())
    }

    fn atom(symbol: &'static str) -> Atom {
        Atom {
            symbol,
            mass_number: None,
        }
    }

    #[test]
    fn simple_formula() {
        let c = parse("C6H12O6").unwrap();
        assert_eq!(c.count(&atom("C")), 6);
        assert_eq!(c.count(&atom("H")), 12);
        assert_eq!(c.count(&atom("O")), 6);
    }

    #[test]
    fn adduct_groups_sum() {
        let c = parse("C6H12O6(Na)(H-1)").unwrap();
        assert_eq!(c.count(&atom("Na")), 1);
        assert_eq!(c.count(&atom("H")), 11);
    }

    #[test]
    fn group_multiplier() {
        let c = parse("(CH2)3OH").unwrap();
        assert_eq!(c.count(&atom("C")), 3);
        assert_eq!(c.count(&atom("H")), 7);
    }

    #[test]
    fn negative_counts_survive_parsing() {
        let c = parse("H2(O-1)").unwrap();
        assert!(c.has_negative());
    }

    #[test]
    fn zero_counts_are_dropped() {
        let c = parse("H2(H-2)").unwrap();
        assert!(c.is_empty());
    }

    #[test]
    fn isotope_selector() {
        let c = parse("C6H12O6(C-1C{13})").unwrap();
        assert_eq!(c.count(&atom("C")), 5);
        let c13 = Atom {
            symbol: "C",
            mass_number: Some(13),
        };
        assert_eq!(c.count(&c13), 1);
        assert_eq!(c.to_string(), "C5C{13}H12O6");
    }

    #[test]
    fn two_letter_symbols() {
        let c = parse("NaCl").unwrap();
        assert_eq!(c.count(&atom("Na")), 1);
        assert_eq!(c.count(&atom("Cl")), 1);
    }

    #[test]
    fn unknown_element_errors() {
        assert!(matches!(parse("Xy2"), Err(ChemError::UnknownElement { .. })));
    }

    #[test]
    fn unknown_isotope_errors() {
        assert!(matches!(
            parse("C{99}"),
            Err(ChemError::UnknownIsotope { mass_number: 99, .. })
        ));
    }

    #[test]
    fn overflowing_counts_are_rejected() {
        for expr in [
            "C9223372036854775807C",
            "(C9223372036854775807)2",
            "C-9223372036854775807(C-2)",
        ] {
            let err = parse(expr).unwrap_err();
            assert!(
                matches!(err, ChemError::Syntax { ref reason, .. } if reason == "count out of range"),
                "{expr}: {err}"
            );
        }
    }

    #[test]
    fn deep_nesting_is_rejected() {
        let nest = |n: usize| format!("{}H{}", "(".repeat(n), ")".repeat(n));
        let shallow = nest(MAX_GROUP_DEPTH);
        assert_eq!(parse(&shallow).unwrap().count(&atom("H")), 1);

        let deep = nest(200_000);
        assert!(matches!(
            parse(&deep),
            Err(ChemError::Syntax { ref reason, .. }) if reason == "groups nested too deeply"
        ));
    }

    #[test]
    fn syntax_errors() {
        assert!(matches!(parse("C6(H"), Err(ChemError::Syntax { .. })));
        assert!(matches!(parse("C6)H"), Err(ChemError::Syntax { .. })));
        assert!(matches!(parse("c6"), Err(ChemError::Syntax { .. })));
        assert!(matches!(parse("H-"), Err(ChemError::Syntax { .. })));
    }
}
