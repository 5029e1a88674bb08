//! Diagnostic codes with category prefixes for structured identification.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The subsystem a diagnostic comes from, determining its prefix letter.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Category {
    /// Device-model construction (bels, wires, routing import), prefixed with `D`.
    Device,
    /// Packing legality and control-set assignment, prefixed with `P`.
    Packing,
    /// Routing-graph queries and reservations, prefixed with `R`.
    Routing,
    /// Configuration and constraint side tables, prefixed with `C`.
    Config,
}

impl Category {
    /// Returns the single-character prefix for this category.
    pub fn prefix(self) -> char {
        match self {
            Category::Device => 'D',
            Category::Packing => 'P',
            Category::Routing => 'R',
            Category::Config => 'C',
        }
    }
}

/// A structured diagnostic code combining a category prefix and a number.
///
/// Displayed as the category prefix followed by a zero-padded 3-digit number,
/// e.g. `D001`, `P104`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct DiagnosticCode {
    /// The category of this diagnostic.
    pub category: Category,
    /// The numeric identifier within the category.
    pub number: u16,
}

impl DiagnosticCode {
    /// Creates a new diagnostic code.
    pub const fn new(category: Category, number: u16) -> Self {
        Self { category, number }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:03}", self.category.prefix(), self.number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_prefixes() {
        assert_eq!(Category::Device.prefix(), 'D');
        assert_eq!(Category::Packing.prefix(), 'P');
        assert_eq!(Category::Routing.prefix(), 'R');
        assert_eq!(Category::Config.prefix(), 'C');
    }

    #[test]
    fn display_format() {
        let code = DiagnosticCode::new(Category::Device, 1);
        assert_eq!(format!("{code}"), "D001");

        let code = DiagnosticCode::new(Category::Packing, 104);
        assert_eq!(format!("{code}"), "P104");
    }

    #[test]
    fn serde_roundtrip() {
        let code = DiagnosticCode::new(Category::Routing, 12);
        let json = serde_json::to_string(&code).unwrap();
        let back: DiagnosticCode = serde_json::from_str(&json).unwrap();
        assert_eq!(code, back);
    }
}
