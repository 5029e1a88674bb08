//! Cell pin styles, default pin states and the default cell-to-bel pin map.

use crate::arch::Arch;
use crate::constids as id;
use crate::error::ArchError;
use crate::ids::{CellId, PortDir};
use crate::netlist::PinState;
use cinder_common::Ident;

/// What a cell pin supports (tie low, tie high, inversion), what to drive it
/// with when left unconnected, and whether it counts as a clock.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct CellPinStyle(u32);

impl CellPinStyle {
    /// No options; the signal is used as-is.
    pub const PINOPT_NONE: Self = Self(0x0);
    /// Can be tied low.
    pub const PINOPT_LO: Self = Self(0x1);
    /// Can be tied high.
    pub const PINOPT_HI: Self = Self(0x2);
    /// Can be inverted.
    pub const PINOPT_INV: Self = Self(0x4);
    /// Can be tied low or high.
    pub const PINOPT_LOHI: Self = Self(0x3);
    /// Can be tied low or high, or inverted.
    pub const PINOPT_LOHIINV: Self = Self(0x7);
    /// Mask of the option bits.
    pub const PINOPT_MASK: u32 = 0x7;

    /// Left disconnected when unused.
    pub const PINDEF_NONE: Self = Self(0x00);
    /// Tied to 0 when unused.
    pub const PINDEF_0: Self = Self(0x10);
    /// Tied to 1 when unused.
    pub const PINDEF_1: Self = Self(0x20);
    /// Mask of the default bits.
    pub const PINDEF_MASK: u32 = 0x30;

    /// The pin is a clock for global-network purposes.
    pub const PINGLB_CLK: Self = Self(0x100);
    /// Mask of the global bits.
    pub const PINGLB_MASK: u32 = 0x100;

    /// No style.
    pub const PINSTYLE_NONE: Self = Self(0x000);
    /// Combinational input: defaults low, can be tied or inverted.
    pub const PINSTYLE_COMB: Self = Self(0x017);
    /// Clock: invertible, left disconnected when unused.
    pub const PINSTYLE_CLK: Self = Self(0x107);
    /// Clock enable: defaults enabled. Not invertible, see [`Self::can_invert`].
    pub const PINSTYLE_CE: Self = Self(0x023);
    /// Reset: defaults to not asserted. Not invertible.
    pub const PINSTYLE_RST: Self = Self(0x013);
    /// Dedicated signal, left alone.
    pub const PINSTYLE_DEDI: Self = Self(0x000);
    /// General input: no inversion or tying, defaults low.
    pub const PINSTYLE_INP: Self = Self(0x001);
    /// Floats high and defaults high.
    pub const PINSTYLE_PU: Self = Self(0x022);

    /// Returns the raw bits.
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Returns `true` if the pin may be tied to 0.
    pub fn can_tie_low(self) -> bool {
        self.0 & Self::PINOPT_LO.0 != 0
    }

    /// Returns `true` if the pin may be tied to 1.
    pub fn can_tie_high(self) -> bool {
        self.0 & Self::PINOPT_HI.0 != 0
    }

    /// Returns `true` if the cell can invert this pin in place. Holds for
    /// clocks and LUT inputs, never for enables or resets.
    pub fn can_invert(self) -> bool {
        self.0 & Self::PINOPT_INV.0 != 0
    }

    /// The constant to drive an unused pin with, if any.
    pub fn default_value(self) -> Option<bool> {
        match self.0 & Self::PINDEF_MASK {
            0x10 => Some(false),
            0x20 => Some(true),
            _ => None,
        }
    }

    /// Returns `true` if the pin is a global clock.
    pub fn is_global_clock(self) -> bool {
        self.0 & Self::PINGLB_MASK != 0
    }
}

type CellPinsData = &'static [(Ident, CellPinStyle)];

/// Pin styles per cell type. An empty port name is the wildcard entry.
const CELL_PINS_DB: &[(Ident, CellPinsData)] = &[
    (id::MISTRAL_ALUT6, &[(Ident::EMPTY, CellPinStyle::PINSTYLE_COMB)]),
    (id::MISTRAL_ALUT5, &[(Ident::EMPTY, CellPinStyle::PINSTYLE_COMB)]),
    (id::MISTRAL_ALUT4, &[(Ident::EMPTY, CellPinStyle::PINSTYLE_COMB)]),
    (id::MISTRAL_ALUT3, &[(Ident::EMPTY, CellPinStyle::PINSTYLE_COMB)]),
    (id::MISTRAL_ALUT2, &[(Ident::EMPTY, CellPinStyle::PINSTYLE_COMB)]),
    (id::MISTRAL_NOT, &[(Ident::EMPTY, CellPinStyle::PINSTYLE_COMB)]),
    (id::MISTRAL_BUF, &[(Ident::EMPTY, CellPinStyle::PINSTYLE_COMB)]),
    (
        id::MISTRAL_FF,
        &[
            (id::CLK, CellPinStyle::PINSTYLE_CLK),
            (id::ENA, CellPinStyle::PINSTYLE_CE),
            (id::ACLR, CellPinStyle::PINSTYLE_RST),
            (id::SCLR, CellPinStyle::PINSTYLE_RST),
            (id::SLOAD, CellPinStyle::PINSTYLE_RST),
            (id::SDATA, CellPinStyle::PINSTYLE_DEDI),
            (id::DATAIN, CellPinStyle::PINSTYLE_INP),
        ],
    ),
];

/// Looks up the style of `port` on a cell of type `cell_type`: the exact port
/// first, then the cell type's wildcard entry, else [`CellPinStyle::PINSTYLE_NONE`].
pub fn cell_pin_style(cell_type: Ident, port: Ident) -> CellPinStyle {
    let Some((_, pins)) = CELL_PINS_DB.iter().find(|(t, _)| *t == cell_type) else {
        return CellPinStyle::PINSTYLE_NONE;
    };
    pins.iter()
        .find(|(p, _)| *p == port)
        .or_else(|| pins.iter().find(|(p, _)| p.is_empty()))
        .map(|&(_, style)| style)
        .unwrap_or(CellPinStyle::PINSTYLE_NONE)
}

/// Default bel pins of each combinational cell port. `E` and `F` drive both
/// ALM halves' copies.
fn comb_default_bel_pins(port: Ident) -> Option<Vec<Ident>> {
    Some(match port {
        id::A => vec![id::A],
        id::B => vec![id::B],
        id::C => vec![id::C],
        id::D => vec![id::D],
        id::E => vec![id::E0, id::E1],
        id::F => vec![id::F0, id::F1],
        id::Q => vec![id::COMBOUT],
        _ => return None,
    })
}

impl Arch {
    /// Returns the style of a pin of a netlist cell.
    pub fn get_cell_pin_style(&self, cell: CellId, port: Ident) -> CellPinStyle {
        cell_pin_style(self.netlist.cell(cell).cell_type, port)
    }

    /// Ties unused optional inputs to their default constant and folds
    /// constant-net connections into tied pin states where the pin allows it.
    /// A pin already tied is left as it is. The cell's LUT or flip-flop info
    /// is recomputed when anything changed.
    ///
    /// Returns the number of pins changed.
    pub fn apply_pin_defaults(&mut self, cell: CellId) -> Result<usize, ArchError> {
        let ports: Vec<(Ident, Option<_>)> = self
            .netlist
            .cell(cell)
            .ports
            .values()
            .filter(|p| p.dir == PortDir::In)
            .map(|p| (p.name, p.net))
            .collect();
        let mut changed = 0;
        for (port, net) in ports {
            let style = self.get_cell_pin_style(cell, port);
            let state = match net {
                None if matches!(
                    self.netlist.cell(cell).pin_state(port),
                    PinState::Tied0 | PinState::Tied1
                ) =>
                {
                    continue
                }
                None => match style.default_value() {
                    Some(false) => PinState::Tied0,
                    Some(true) => PinState::Tied1,
                    None => continue,
                },
                Some(net) => match self.netlist.const_value(&self.interner, net) {
                    Some(false) if style.can_tie_low() => PinState::Tied0,
                    Some(true) if style.can_tie_high() => PinState::Tied1,
                    _ => continue,
                },
            };
            self.netlist.disconnect_port(cell, port);
            self.netlist
                .cell_mut(cell)
                .pin_data
                .entry(port)
                .or_default()
                .state = state;
            changed += 1;
        }
        if changed > 0 {
            self.assign_cell_info(cell)?;
        }
        Ok(changed)
    }

    /// Fills in the bel pins of every port that has none yet.
    ///
    /// Combinational cells use the fused-mode ALM mapping until the ALM's
    /// inputs are planned; other cells map each port to the same-named bel pin.
    pub fn assign_default_pinmap(&mut self, cell: CellId) {
        let is_comb = self.is_comb_cell(self.netlist.cell(cell).cell_type);
        let info = self.netlist.cell_mut(cell);
        let ports: Vec<Ident> = info.ports.keys().copied().collect();
        for port in ports {
            let data = info.pin_data.entry(port).or_default();
            if !data.bel_pins.is_empty() {
                continue;
            }
            data.bel_pins = if is_comb {
                comb_default_bel_pins(port).unwrap_or_default()
            } else {
                vec![port]
            };
        }
    }
}
