//! Site descriptors stored in the per-tile bel catalog.

use crate::ids::{CellId, PortDir, WireId};
use cinder_common::Ident;
use indexmap::IndexMap;

/// The wire and direction of a bel pin.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct PinInfo {
    /// The attached wire.
    pub wire: WireId,
    /// The pin direction.
    pub dir: PortDir,
}

/// Position of a logic bel inside the LAB model.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct LabData {
    /// Index into the device's LAB list.
    pub lab: u32,
    /// ALM index inside the LAB.
    pub alm: u8,
    /// LUT or flip-flop index inside the ALM.
    pub idx: u8,
}

/// Kind-specific payload of a bel.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum BelKind {
    /// A LUT or flip-flop of an ALM.
    Lab(LabData),
    /// Any other bel.
    #[default]
    Other,
}

/// A site in the bel catalog.
#[derive(Clone, Debug)]
pub struct BelInfo {
    /// The bel name within its tile, e.g. `ALM3_FF2`.
    pub name: Ident,
    /// The bel type.
    pub bel_type: Ident,
    /// Placement compatibility group.
    pub bucket: Ident,
    /// Block index in the chip database. Several blocks can share a tile, so
    /// this differs from the bel's position in the tile list.
    pub block_index: i32,
    /// Pins, in creation order.
    pub pins: IndexMap<Ident, PinInfo>,
    /// Kind-specific data.
    pub kind: BelKind,
    /// The cell currently placed here.
    pub bound_cell: Option<CellId>,
}

impl BelInfo {
    /// Creates a bel with no pins.
    pub fn new(name: Ident, bel_type: Ident) -> Self {
        Self {
            name,
            bel_type,
            bucket: bel_type,
            block_index: 0,
            pins: IndexMap::new(),
            kind: BelKind::Other,
            bound_cell: None,
        }
    }

    /// Returns the LAB position of a logic bel.
    pub fn lab_data(&self) -> Option<LabData> {
        match self.kind {
            BelKind::Lab(data) => Some(data),
            BelKind::Other => None,
        }
    }
}
