//! Interned identifiers for cheap cloning and O(1) equality comparison.

use lasso::ThreadedRodeo;
use serde::{Deserialize, Serialize};

/// A unique identifier for any named entity in the device model or netlist.
///
/// Identifiers are interned strings represented as a `u32` index into an
/// [`Interner`]. Index 0 is always the empty string, which is also the
/// default.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default, Serialize, Deserialize)]
pub struct Ident(u32);

impl Ident {
    /// The identifier of the empty string.
    pub const EMPTY: Ident = Ident(0);

    /// Creates an `Ident` from a raw `u32` index.
    ///
    /// Used for compile-time constant identifiers that are pre-interned by
    /// [`Interner::with_constants`], and for deserialization.
    pub const fn from_raw(index: u32) -> Self {
        Self(index)
    }

    /// Returns the raw `u32` index of this identifier.
    pub const fn as_raw(self) -> u32 {
        self.0
    }

    /// Returns `true` if this is the empty identifier.
    pub fn is_empty(self) -> bool {
        self == Self::EMPTY
    }
}

// SAFETY: `Ident` wraps a `u32` which is always a valid `usize` on 32-bit and
// 64-bit platforms. `try_from_usize` rejects values that don't fit in `u32`.
unsafe impl lasso::Key for Ident {
    fn into_usize(self) -> usize {
        self.0 as usize
    }

    fn try_from_usize(int: usize) -> Option<Self> {
        u32::try_from(int).ok().map(Ident)
    }
}

/// Thread-safe string interner backed by [`lasso::ThreadedRodeo`].
///
/// Every bel, wire, pin, cell and net name in a device model is interned here.
pub struct Interner {
    rodeo: ThreadedRodeo<Ident>,
}

impl Interner {
    /// Creates a new interner holding only the empty string.
    pub fn new() -> Self {
        let rodeo = ThreadedRodeo::new();
        rodeo.get_or_intern("");
        Self { rodeo }
    }

    /// Creates an interner whose first identifiers are `names`, in order.
    ///
    /// `names[i]` receives raw index `i + 1`, which lets callers declare
    /// `const` identifiers for well-known names.
    ///
    /// # Panics
    ///
    /// Panics if `names` contains a duplicate or the empty string.
    pub fn with_constants(names: &[&str]) -> Self {
        let interner = Self::new();
        for (i, name) in names.iter().enumerate() {
            let id = interner.get_or_intern(name);
            assert_eq!(
                id.as_raw() as usize,
                i + 1,
                "constant identifier {name:?} is duplicated or empty"
            );
        }
        interner
    }

    /// Interns a string, returning its [`Ident`]. If the string was already
    /// interned, returns the existing identifier without allocating.
    pub fn get_or_intern(&self, s: &str) -> Ident {
        self.rodeo.get_or_intern(s)
    }

    /// Returns the identifier of an already-interned string.
    pub fn get(&self, s: &str) -> Option<Ident> {
        self.rodeo.get(s)
    }

    /// Resolves an [`Ident`] back to its string value.
    ///
    /// # Panics
    ///
    /// Panics if the `Ident` was not created by this interner.
    pub fn resolve(&self, ident: Ident) -> &str {
        self.rodeo.resolve(&ident)
    }

    /// Returns the number of interned strings, including the empty string.
    pub fn len(&self) -> usize {
        self.rodeo.len()
    }

    /// Always `false`: the empty string is interned on construction.
    pub fn is_empty(&self) -> bool {
        self.rodeo.is_empty()
    }
}

impl Default for Interner {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Interner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Interner")
            .field("len", &self.rodeo.len())
            .finish()
    }
}

/// A hierarchical name made of interned components, such as `X.Y.ALM0_COMB1`.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
pub struct IdentList(Vec<Ident>);

impl IdentList {
    /// Creates a list from its components.
    pub fn new(ids: Vec<Ident>) -> Self {
        Self(ids)
    }

    /// Concatenates two lists.
    pub fn concat(a: &IdentList, b: &IdentList) -> Self {
        let mut ids = Vec::with_capacity(a.len() + b.len());
        ids.extend_from_slice(&a.0);
        ids.extend_from_slice(&b.0);
        Self(ids)
    }

    /// Splits a delimited string into interned components.
    pub fn parse(interner: &Interner, s: &str, delim: char) -> Self {
        if s.is_empty() {
            return Self::default();
        }
        Self(s.split(delim).map(|c| interner.get_or_intern(c)).collect())
    }

    /// Returns the number of components.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the list has no components.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the components as a slice.
    pub fn as_slice(&self) -> &[Ident] {
        &self.0
    }

    /// Joins the components with `delim`.
    pub fn display(&self, interner: &Interner, delim: char) -> String {
        let mut out = String::new();
        for (i, id) in self.0.iter().enumerate() {
            if i > 0 {
                out.push(delim);
            }
            out.push_str(interner.resolve(*id));
        }
        out
    }
}

impl std::ops::Index<usize> for IdentList {
    type Output = Ident;

    fn index(&self, index: usize) -> &Ident {
        &self.0[index]
    }
}

impl From<Vec<Ident>> for IdentList {
    fn from(ids: Vec<Ident>) -> Self {
        Self(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intern_resolve_roundtrip() {
        let interner = Interner::new();
        let id = interner.get_or_intern("ALM0_COMB0");
        assert_eq!(interner.resolve(id), "ALM0_COMB0");
    }

    #[test]
    fn empty_is_zero() {
        let interner = Interner::new();
        assert_eq!(interner.get_or_intern(""), Ident::EMPTY);
        assert!(Ident::EMPTY.is_empty());
        assert_eq!(Ident::default(), Ident::EMPTY);
    }

    #[test]
    fn same_string_same_ident() {
        let interner = Interner::new();
        let a = interner.get_or_intern("COMBOUT");
        let b = interner.get_or_intern("COMBOUT");
        assert_eq!(a, b);
        assert_ne!(a, interner.get_or_intern("Q"));
    }

    #[test]
    fn constants_get_fixed_indices() {
        let interner = Interner::with_constants(&["A", "B", "MISTRAL_FF"]);
        assert_eq!(interner.get("A"), Some(Ident::from_raw(1)));
        assert_eq!(interner.get("MISTRAL_FF"), Some(Ident::from_raw(3)));
        assert_eq!(interner.get_or_intern("new"), Ident::from_raw(4));
    }

    #[test]
    #[should_panic(expected = "duplicated")]
    fn duplicate_constant_panics() {
        let _ = Interner::with_constants(&["A", "A"]);
    }

    #[test]
    fn ident_list_parse_display() {
        let interner = Interner::new();
        let name = IdentList::parse(&interner, "3.4.ALM0_FF2", '.');
        assert_eq!(name.len(), 3);
        assert_eq!(interner.resolve(name[2]), "ALM0_FF2");
        assert_eq!(name.display(&interner, '.'), "3.4.ALM0_FF2");
    }

    #[test]
    fn ident_list_concat() {
        let interner = Interner::new();
        let a = IdentList::parse(&interner, "WIRE.1.2.CLK0", '.');
        let b = IdentList::parse(&interner, "WIRE.1.2.CLKT[0]", '.');
        let pip = IdentList::concat(&a, &b);
        assert_eq!(pip.len(), 8);
        assert_eq!(pip.display(&interner, '.'), "WIRE.1.2.CLK0.WIRE.1.2.CLKT[0]");
    }

    #[test]
    fn serde_roundtrip() {
        let id = Ident(42);
        let json = serde_json::to_string(&id).unwrap();
        let back: Ident = serde_json::from_str(&json).unwrap();
        assert_eq!(id, back);
    }
}
