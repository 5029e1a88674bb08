//! The chip-database contract and a built-in synthetic Cyclone V database.
//!
//! The device model never hard-codes device geometry. It asks a [`ChipDb`]
//! for the tile grid, the blocks present in each tile, the routing node behind
//! each block port, and the list of routing muxes, then builds its own wire
//! graph from those answers.
//!
//! [`SyntheticChip`] implements the contract for a small table of named parts
//! and for arbitrary grid sizes. Its floorplan is regular: GPIO columns on the
//! left and right edges, LABs everywhere else except a single clock-mux block
//! in the middle of the bottom row, joined by per-tile `H4`/`V4` tracks and
//! four global clock networks.

use crate::ids::{Pos, RNode, POS_BITS};
use std::collections::BTreeMap;
use std::fmt;

/// A kind of hardware block the device model knows how to instantiate.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum BlockType {
    /// A logic array block of ten ALMs.
    Lab,
    /// A general-purpose I/O block of four pads.
    Gpio,
    /// A horizontal global clock multiplexer.
    CmuxHg,
}

/// A block port, as named by the chip database.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum ChipPort {
    /// ALM input A.
    A,
    /// ALM input B.
    B,
    /// ALM input C.
    C,
    /// ALM input D.
    D,
    /// ALM input E0.
    E0,
    /// ALM input E1.
    E1,
    /// ALM input F0.
    F0,
    /// ALM input F1.
    F1,
    /// Top-half output 0.
    Fft0,
    /// Top-half output 1.
    Fft1,
    /// Bottom-half output 0.
    Ffb0,
    /// Bottom-half output 1.
    Ffb1,
    /// Top-half local output.
    Fft1l,
    /// Bottom-half local output.
    Ffb1l,
    /// Clock input.
    ClkIn,
    /// Data input.
    DataIn,
    /// Asynchronous clear input.
    Aclr,
    /// Output-enable input.
    OeIn,
    /// Data output.
    DataOut,
    /// Clock output.
    ClkOut,
}

impl ChipPort {
    /// The eight ALM inputs, in physical order.
    pub const ALM_INPUTS: [ChipPort; 8] = [
        ChipPort::A,
        ChipPort::B,
        ChipPort::C,
        ChipPort::D,
        ChipPort::E0,
        ChipPort::E1,
        ChipPort::F0,
        ChipPort::F1,
    ];

    /// The six ALM outputs, in physical order.
    pub const ALM_OUTPUTS: [ChipPort; 6] = [
        ChipPort::Fft0,
        ChipPort::Fft1,
        ChipPort::Ffb0,
        ChipPort::Ffb1,
        ChipPort::Fft1l,
        ChipPort::Ffb1l,
    ];
}

/// A physical node descriptor: a port of a block at a tile.
///
/// `bi` is the block index inside the tile and `pi` the port index, either
/// of which may be `-1` when the port is not indexed that way.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct PNode {
    /// The block type.
    pub block: BlockType,
    /// The tile.
    pub pos: Pos,
    /// The port.
    pub port: ChipPort,
    /// Block index, or -1.
    pub bi: i32,
    /// Port index, or -1.
    pub pi: i32,
}

impl PNode {
    /// Creates a physical node descriptor.
    pub fn new(block: BlockType, x: u32, y: u32, port: ChipPort, bi: i32, pi: i32) -> Self {
        Self {
            block,
            pos: Pos::new(x, y),
            port,
            bi,
            pi,
        }
    }
}

/// A routing multiplexer: one destination node selectable from several sources.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct RMux {
    /// The driven node.
    pub dst: RNode,
    /// The selectable sources.
    pub sources: Vec<RNode>,
}

/// A package pin's pad, packed as `pos | (block_index << 14)`.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct PadInfo {
    /// The packed pad value.
    pub pad: u32,
}

impl PadInfo {
    /// Returns the tile of the pad.
    pub fn pos(self) -> Pos {
        Pos::from_raw(self.pad & 0x3fff)
    }

    /// Returns the I/O block index inside the tile.
    pub fn block_index(self) -> u32 {
        self.pad >> 14
    }
}

/// Raw device enumeration and lookup services the device model is built on.
pub trait ChipDb: fmt::Debug + Send + Sync {
    /// The part name of the modelled device.
    fn part_name(&self) -> &str;
    /// Grid width in tiles.
    fn tile_sx(&self) -> u32;
    /// Grid height in tiles.
    fn tile_sy(&self) -> u32;
    /// The blocks present in a tile.
    fn pos_get_bels(&self, pos: Pos) -> Vec<BlockType>;
    /// The routing node behind a block port, if the port exists.
    fn pnode_to_rnode(&self, pnode: PNode) -> Option<RNode>;
    /// Every routing mux of the device.
    fn rmuxes(&self) -> &[RMux];
    /// Number of chip routing-node types.
    fn rnode_type_count(&self) -> u8;
    /// Name of a routing-node type.
    fn rnode_type_name(&self, node_type: u8) -> Option<&str>;
    /// Looks up a routing-node type by name.
    fn rnode_type_by_name(&self, name: &str) -> Option<u8> {
        (0..self.rnode_type_count()).find(|&t| self.rnode_type_name(t) == Some(name))
    }
    /// Looks up a package pin by name.
    fn package_pin(&self, name: &str) -> Option<PadInfo>;
}

const RNODE_TYPE_NAMES: &[&str] = &["NONE", "GIN", "GOUT", "H4", "V4", "GCLK"];
const GIN: u8 = 1;
const GOUT: u8 = 2;
const H4: u8 = 3;
const V4: u8 = 4;
const GCLK: u8 = 5;

const TRACKS: u32 = 8;
const GCLK_COUNT: u32 = 4;
const ALMS_PER_LAB: u32 = 10;
const IOS_PER_GPIO: u32 = 4;

const LAB_CLKIN_BASE: u32 = ALMS_PER_LAB * 8;
const LAB_DATAIN_BASE: u32 = LAB_CLKIN_BASE + 3;
const LAB_ACLR_BASE: u32 = LAB_DATAIN_BASE + 4;

/// Named parts: (name, width, height).
const DEVICES: &[(&str, u32, u32)] = &[
    ("5CEBA2F17C8", 34, 22),
    ("5CEBA4F23C7", 34, 30),
    ("5CSEBA6U23I7", 68, 45),
    ("5CSEMA5F31C6", 68, 45),
    ("5CEFA9F23I7", 90, 62),
];

/// A synthetic Cyclone V style chip database.
pub struct SyntheticChip {
    part: String,
    sx: u32,
    sy: u32,
    rmuxes: Vec<RMux>,
}

impl SyntheticChip {
    /// Smallest supported grid width.
    pub const MIN_SX: u32 = 3;
    /// Smallest supported grid height.
    pub const MIN_SY: u32 = 2;
    /// Largest supported grid dimension.
    pub const MAX_DIM: u32 = 1 << POS_BITS;

    /// Looks up a named part.
    pub fn by_name(part: &str) -> Option<Self> {
        DEVICES
            .iter()
            .find(|(name, _, _)| name.eq_ignore_ascii_case(part))
            .map(|&(name, sx, sy)| Self::build(name.to_string(), sx, sy))
    }

    /// Returns the names of all known parts.
    pub fn part_names() -> impl Iterator<Item = &'static str> {
        DEVICES.iter().map(|(name, _, _)| *name)
    }

    /// Creates a chip of `sx` by `sy` tiles.
    ///
    /// # Panics
    ///
    /// Panics if the grid is smaller than 3x2 or larger than 128 on a side.
    pub fn with_grid(sx: u32, sy: u32) -> Self {
        assert!(
            (Self::MIN_SX..=Self::MAX_DIM).contains(&sx) && (Self::MIN_SY..=Self::MAX_DIM).contains(&sy),
            "grid {sx}x{sy} out of range"
        );
        Self::build(format!("synthetic-{sx}x{sy}"), sx, sy)
    }

    fn build(part: String, sx: u32, sy: u32) -> Self {
        let mut chip = Self {
            part,
            sx,
            sy,
            rmuxes: Vec::new(),
        };
        chip.rmuxes = chip.build_rmuxes();
        chip
    }

    fn block_at(&self, x: u32, y: u32) -> Option<BlockType> {
        if x >= self.sx || y >= self.sy {
            None
        } else if x == 0 || x == self.sx - 1 {
            Some(BlockType::Gpio)
        } else if y == 0 && x == self.sx / 2 {
            Some(BlockType::CmuxHg)
        } else {
            Some(BlockType::Lab)
        }
    }

    fn gclk(index: u32) -> RNode {
        RNode::new(GCLK, 0, 0, index)
    }

    fn build_rmuxes(&self) -> Vec<RMux> {
        let mut muxes: BTreeMap<RNode, Vec<RNode>> = BTreeMap::new();
        let mut drive = |dst: RNode, src: RNode| muxes.entry(dst).or_default().push(src);

        for x in 0..self.sx {
            for y in 0..self.sy {
                let h = |t: u32| RNode::new(H4, x, y, t % TRACKS);
                let v = |t: u32| RNode::new(V4, x, y, t % TRACKS);
                let gin = |z: u32| RNode::new(GIN, x, y, z);
                let gout = |z: u32| RNode::new(GOUT, x, y, z);

                match self.block_at(x, y) {
                    Some(BlockType::Lab) => {
                        for alm in 0..ALMS_PER_LAB {
                            for p in 0..8 {
                                let dst = gin(alm * 8 + p);
                                drive(dst, h(alm + p));
                                drive(dst, v(alm * 3 + p));
                            }
                        }
                        for i in 0..3 {
                            for g in 0..GCLK_COUNT {
                                drive(gin(LAB_CLKIN_BASE + i), Self::gclk(g));
                            }
                        }
                        for i in 0..4 {
                            drive(gin(LAB_DATAIN_BASE + i), h(i));
                            drive(gin(LAB_DATAIN_BASE + i), v(i + 4));
                        }
                        for i in 0..2 {
                            drive(gin(LAB_ACLR_BASE + i), Self::gclk(2 + i));
                            drive(gin(LAB_ACLR_BASE + i), h(4 + i));
                        }
                        for k in 0..ALMS_PER_LAB * 6 {
                            drive(h(k), gout(k));
                            drive(v(k + 1), gout(k));
                        }
                    }
                    Some(BlockType::Gpio) => {
                        for z in 0..IOS_PER_GPIO {
                            drive(gin(z * 2), h(z));
                            drive(gin(z * 2 + 1), v(z + 4));
                            drive(h(z), gout(z));
                            drive(v(z), gout(z));
                        }
                    }
                    Some(BlockType::CmuxHg) => {
                        for i in 0..GCLK_COUNT {
                            drive(gin(i), h(i));
                        }
                    }
                    None => {}
                }

                for t in 0..TRACKS {
                    if x > 0 {
                        drive(h(t), RNode::new(H4, x - 1, y, t));
                    }
                    if x + 1 < self.sx {
                        drive(h(t), RNode::new(H4, x + 1, y, t));
                    }
                    if y > 0 {
                        drive(v(t), RNode::new(V4, x, y - 1, t));
                    }
                    if y + 1 < self.sy {
                        drive(v(t), RNode::new(V4, x, y + 1, t));
                    }
                    drive(h(t), v(t));
                    drive(v(t), h(t));
                }
            }
        }

        muxes
            .into_iter()
            .map(|(dst, sources)| RMux { dst, sources })
            .collect()
    }
}

impl fmt::Debug for SyntheticChip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyntheticChip")
            .field("part", &self.part)
            .field("sx", &self.sx)
            .field("sy", &self.sy)
            .field("rmuxes", &self.rmuxes.len())
            .finish()
    }
}

fn index(value: i32, limit: u32) -> Option<u32> {
    u32::try_from(value).ok().filter(|&v| v < limit)
}

impl ChipDb for SyntheticChip {
    fn part_name(&self) -> &str {
        &self.part
    }

    fn tile_sx(&self) -> u32 {
        self.sx
    }

    fn tile_sy(&self) -> u32 {
        self.sy
    }

    fn pos_get_bels(&self, pos: Pos) -> Vec<BlockType> {
        self.block_at(pos.x(), pos.y()).into_iter().collect()
    }

    fn pnode_to_rnode(&self, pn: PNode) -> Option<RNode> {
        let (x, y) = (pn.pos.x(), pn.pos.y());
        if self.block_at(x, y) != Some(pn.block) {
            return None;
        }
        let gin = |z: u32| Some(RNode::new(GIN, x, y, z));
        let gout = |z: u32| Some(RNode::new(GOUT, x, y, z));
        match (pn.block, pn.port) {
            (BlockType::Lab, port) if ChipPort::ALM_INPUTS.contains(&port) => {
                let alm = index(pn.bi, ALMS_PER_LAB)?;
                let p = ChipPort::ALM_INPUTS.iter().position(|&q| q == port)? as u32;
                gin(alm * 8 + p)
            }
            (BlockType::Lab, port) if ChipPort::ALM_OUTPUTS.contains(&port) => {
                let alm = index(pn.bi, ALMS_PER_LAB)?;
                let k = ChipPort::ALM_OUTPUTS.iter().position(|&q| q == port)? as u32;
                gout(alm * 6 + k)
            }
            (BlockType::Lab, ChipPort::ClkIn) => gin(LAB_CLKIN_BASE + index(pn.pi, 3)?),
            (BlockType::Lab, ChipPort::DataIn) => gin(LAB_DATAIN_BASE + index(pn.pi, 4)?),
            (BlockType::Lab, ChipPort::Aclr) => gin(LAB_ACLR_BASE + index(pn.bi, 2)?),
            (BlockType::Gpio, ChipPort::DataIn) => gin(index(pn.bi, IOS_PER_GPIO)? * 2),
            (BlockType::Gpio, ChipPort::OeIn) => gin(index(pn.bi, IOS_PER_GPIO)? * 2 + 1),
            (BlockType::Gpio, ChipPort::DataOut) => gout(index(pn.bi, IOS_PER_GPIO)?),
            (BlockType::CmuxHg, ChipPort::ClkIn) => gin(index(pn.pi, GCLK_COUNT)?),
            (BlockType::CmuxHg, ChipPort::ClkOut) => Some(Self::gclk(index(pn.bi, GCLK_COUNT)?)),
            _ => None,
        }
    }

    fn rmuxes(&self) -> &[RMux] {
        &self.rmuxes
    }

    fn rnode_type_count(&self) -> u8 {
        RNODE_TYPE_NAMES.len() as u8
    }

    fn rnode_type_name(&self, node_type: u8) -> Option<&str> {
        RNODE_TYPE_NAMES.get(node_type as usize).copied()
    }

    fn package_pin(&self, name: &str) -> Option<PadInfo> {
        let rest = name.strip_prefix("PIN_")?;
        let x = match rest.chars().next()? {
            'L' => 0,
            'R' => self.sx - 1,
            _ => return None,
        };
        let n: u32 = rest[1..].parse().ok()?;
        let (y, z) = (n / IOS_PER_GPIO, n % IOS_PER_GPIO);
        if y >= self.sy {
            return None;
        }
        Some(PadInfo {
            pad: Pos::new(x, y).as_raw() | (z << 14),
        })
    }
}
