//! Well-known identifiers, pre-interned so they can be used as `const`s and
//! in `match` patterns.
//!
//! [`Interner::with_constants`](cinder_common::Interner::with_constants) is
//! called with [`NAMES`] when a device model is created, which guarantees every
//! constant below resolves to its own name.

use cinder_common::Ident;

macro_rules! define_constids {
    ($($name:ident),* $(,)?) => {
        #[allow(non_camel_case_types, clippy::upper_case_acronyms, dead_code)]
        #[repr(u32)]
        enum ConstIndex {
            Empty = 0,
            $($name,)*
        }

        $(
            #[allow(missing_docs)]
            pub const $name: Ident = Ident::from_raw(ConstIndex::$name as u32);
        )*

        /// The names of all constant identifiers, in index order starting at 1.
        pub const NAMES: &[&str] = &[$(stringify!($name)),*];
    };
}

define_constids! {
    // ALM physical inputs and LUT logical inputs
    A, B, C, D, E, F, E0, E1, F0, F1,
    // outputs
    Q, COMBOUT,
    // flip-flop pins
    CLK, ENA, ACLR, SCLR, SLOAD, SDATA, DATAIN,
    // I/O pins
    PAD, I, OE, O,
    // parameters and attributes
    LUT, PIN,
    // wire name prefix for device-model created wires
    WIRE,
    // bel types
    MISTRAL_COMB, MISTRAL_FF, MISTRAL_IO, MISTRAL_CLKENA,
    // cell types
    MISTRAL_ALUT6, MISTRAL_ALUT5, MISTRAL_ALUT4, MISTRAL_ALUT3, MISTRAL_ALUT2,
    MISTRAL_NOT, MISTRAL_BUF, MISTRAL_CONST, MISTRAL_IB, MISTRAL_OB,
}
