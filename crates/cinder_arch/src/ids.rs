//! Compact handle types for device resources and netlist objects.
//!
//! Device handles are derived from the chip database's packed encodings:
//! a [`Pos`] packs a tile coordinate, an [`RNode`] packs a routing-node type,
//! tile and in-tile index. [`BelId`], [`WireId`] and [`PipId`] are built on
//! top of those and are all `Copy`, `Hash` and `Serialize`/`Deserialize`.
//!
//! Lookups that may find nothing return `Option<_>`; there is no null handle.

use cinder_common::Ident;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of bits used for each tile coordinate.
pub const POS_BITS: u32 = 7;

/// A packed tile position, `(x << 7) | y`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub struct Pos(u32);

impl Pos {
    /// Packs a tile coordinate.
    pub const fn new(x: u32, y: u32) -> Self {
        Self((x << POS_BITS) | y)
    }

    /// Returns the tile column.
    pub const fn x(self) -> u32 {
        self.0 >> POS_BITS
    }

    /// Returns the tile row.
    pub const fn y(self) -> u32 {
        self.0 & ((1 << POS_BITS) - 1)
    }

    /// Creates a position from its raw packed value.
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw packed value.
    pub const fn as_raw(self) -> u32 {
        self.0
    }
}

/// A packed routing-node id: `(type << 24) | (x << 17) | (y << 10) | z`.
///
/// Types below [`RNode::SYNTHETIC_TYPE_BASE`] belong to the chip database;
/// the upper half of the type space is reserved for wires created by the
/// device model itself.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub struct RNode(u32);

impl RNode {
    /// First routing-node type used for device-model created wires.
    pub const SYNTHETIC_TYPE_BASE: u8 = 128;
    /// Largest in-tile index.
    pub const MAX_Z: u32 = 0x3ff;

    /// Packs a routing-node id.
    pub const fn new(node_type: u8, x: u32, y: u32, z: u32) -> Self {
        Self(((node_type as u32) << 24) | (x << 17) | (y << 10) | (z & Self::MAX_Z))
    }

    /// Returns the node type.
    pub const fn node_type(self) -> u8 {
        (self.0 >> 24) as u8
    }

    /// Returns the tile column.
    pub const fn x(self) -> u32 {
        (self.0 >> 17) & 0x7f
    }

    /// Returns the tile row.
    pub const fn y(self) -> u32 {
        (self.0 >> 10) & 0x7f
    }

    /// Returns the in-tile index.
    pub const fn z(self) -> u32 {
        self.0 & Self::MAX_Z
    }

    /// Returns the tile position of this node.
    pub const fn pos(self) -> Pos {
        Pos::new(self.x(), self.y())
    }

    /// Returns `true` if this node was created by the device model.
    pub const fn is_synthetic(self) -> bool {
        self.node_type() >= Self::SYNTHETIC_TYPE_BASE
    }

    /// Returns the raw packed value.
    pub const fn as_raw(self) -> u32 {
        self.0
    }
}

/// A placeable site: tile position plus index into that tile's bel list.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub struct BelId {
    /// The tile holding the bel.
    pub pos: Pos,
    /// Index into the tile's bel list.
    pub z: u16,
}

impl BelId {
    /// Creates a bel handle.
    pub const fn new(pos: Pos, z: u16) -> Self {
        Self { pos, z }
    }
}

/// A routing wire, identified by its routing node.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub struct WireId(pub RNode);

impl WireId {
    /// Returns the underlying routing node.
    pub const fn node(self) -> RNode {
        self.0
    }
}

impl fmt::Display for WireId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let n = self.0;
        write!(f, "rnode({}, {}, {}, {})", n.node_type(), n.x(), n.y(), n.z())
    }
}

/// A directed switchable connection. Never stored; derived from wire adjacency.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub struct PipId {
    /// The driving wire.
    pub src: RNode,
    /// The driven wire.
    pub dst: RNode,
}

impl PipId {
    /// Creates a pip handle from its two wires.
    pub const fn new(src: WireId, dst: WireId) -> Self {
        Self {
            src: src.0,
            dst: dst.0,
        }
    }
}

/// A grid location. Signed so that out-of-grid queries are representable.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
pub struct Loc {
    /// Tile column.
    pub x: i32,
    /// Tile row.
    pub y: i32,
    /// Index within the tile.
    pub z: i32,
}

impl Loc {
    /// Creates a location.
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }
}

/// Signal direction of a bel pin or cell port.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum PortDir {
    /// Input.
    In,
    /// Output.
    Out,
    /// Bidirectional.
    InOut,
}

/// A pin of a bel, as attached to a wire.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct BelPin {
    /// The bel.
    pub bel: BelId,
    /// The pin name.
    pub pin: Ident,
}

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
        pub struct $name(u32);

        impl $name {
            /// Creates an ID from a raw `u32` index.
            pub fn from_raw(index: u32) -> Self {
                Self(index)
            }

            /// Returns the raw `u32` index.
            pub fn as_raw(self) -> u32 {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

define_id!(
    /// Opaque, copyable ID for a cell in the netlist.
    CellId
);

define_id!(
    /// Opaque, copyable ID for a net in the netlist.
    NetId
);
