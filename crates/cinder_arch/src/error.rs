//! Error type for device-model queries and packing operations.

use crate::ids::{BelId, WireId};
use crate::ctrlset::CtrlKind;
use cinder_common::InternalError;

/// Errors raised by the device model.
///
/// Legality checks never produce these: an illegal packing is a `false`
/// result. Errors are reserved for unknown resources and for mutating calls
/// made on a state that violates their precondition.
#[derive(Debug, thiserror::Error)]
pub enum ArchError {
    /// The requested part is not in the chip database.
    #[error("unknown device '{0}'")]
    UnknownDevice(String),

    /// A synthetic grid size outside the supported range.
    #[error("grid {sx}x{sy} is outside 3x2..128x128")]
    InvalidGrid {
        /// Requested width.
        sx: u32,
        /// Requested height.
        sy: u32,
    },

    /// A wire handle does not exist in the routing graph.
    #[error("wire {0} not found")]
    WireNotFound(WireId),

    /// A bel handle does not address an existing bel.
    #[error("bel {0:?} not found")]
    BelNotFound(BelId),

    /// Two wires are not joined by a pip.
    #[error("no pip from {src} to {dst}")]
    PipNotFound {
        /// The would-be driving wire.
        src: WireId,
        /// The would-be driven wire.
        dst: WireId,
    },

    /// A LAB demands more distinct control signals than it has shared wires.
    #[error("LAB {lab} needs more than {limit} distinct {kind} signals")]
    ControlSetOverflow {
        /// The LAB index.
        lab: u32,
        /// The control-signal category.
        kind: CtrlKind,
        /// The number of shared wires for that category.
        limit: usize,
    },

    /// An ALM's occupants cannot be mapped onto its physical inputs.
    #[error("ALM {alm} of LAB {lab} has no legal input assignment")]
    IllegalAlm {
        /// The LAB index.
        lab: u32,
        /// The ALM index inside the LAB.
        alm: u8,
    },

    /// A cell placed on a combinational bel is not a LUT-like cell.
    #[error("cell '{cell}' has unexpected combinational type '{cell_type}'")]
    UnexpectedCombCell {
        /// The cell name.
        cell: String,
        /// The cell type.
        cell_type: String,
    },

    /// An internal invariant was broken.
    #[error(transparent)]
    Internal(#[from] InternalError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::RNode;

    #[test]
    fn display_overflow() {
        let err = ArchError::ControlSetOverflow {
            lab: 4,
            kind: CtrlKind::Clk,
            limit: 3,
        };
        assert_eq!(format!("{err}"), "LAB 4 needs more than 3 distinct CLK signals");
    }

    #[test]
    fn display_invalid_grid() {
        let err = ArchError::InvalidGrid { sx: 2, sy: 9 };
        assert_eq!(format!("{err}"), "grid 2x9 is outside 3x2..128x128");
    }

    #[test]
    fn display_wire_not_found() {
        let err = ArchError::WireNotFound(WireId(RNode::new(1, 2, 3, 4)));
        assert_eq!(format!("{err}"), "wire rnode(1, 2, 3, 4) not found");
    }

    #[test]
    fn internal_is_transparent() {
        let err: ArchError = InternalError::new("LAB index out of range").into();
        assert_eq!(format!("{err}"), "internal error: LAB index out of range");
    }
}
