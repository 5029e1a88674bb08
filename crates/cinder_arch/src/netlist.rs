//! The planner's netlist, modelled as far as packing legality needs it.
//!
//! Cells and nets live in arenas indexed by [`CellId`] and [`NetId`]. Each
//! cell also carries the per-pin bel mapping used by the router and the
//! derived LUT and flip-flop summaries that the legality checks read.

use crate::ids::{BelId, CellId, NetId, PortDir};
use cinder_common::{CinderResult, Ident, InternalError, Interner};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Name of the constant-zero net.
pub const GND_NET_NAME: &str = "$PACKER_GND";
/// Name of the constant-one net.
pub const VCC_NET_NAME: &str = "$PACKER_VCC";

/// A cell parameter value.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum Property {
    /// An integer value.
    Int(u64),
    /// A string value. Strings of `0`/`1` characters are bit vectors, MSB first.
    Str(String),
}

impl Property {
    /// Returns the value as an integer, parsing bit-vector strings.
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Property::Int(v) => Some(*v),
            Property::Str(s) if !s.is_empty() && s.len() <= 64 => u64::from_str_radix(s, 2).ok(),
            Property::Str(_) => None,
        }
    }
}

/// How a cell pin is driven once mapped onto a bel.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub enum PinState {
    /// Driven by its net, or floating if unconnected.
    #[default]
    Signal,
    /// Driven by the inverse of its net.
    Inverted,
    /// Tied to constant zero.
    Tied0,
    /// Tied to constant one.
    Tied1,
}

/// Bel mapping of one cell pin.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct PinData {
    /// The bel pins this cell pin drives or is driven by.
    pub bel_pins: Vec<Ident>,
    /// How the pin is driven.
    pub state: PinState,
}

/// A port of a cell.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct PortInfo {
    /// The port name.
    pub name: Ident,
    /// The port direction.
    pub dir: PortDir,
    /// The connected net.
    pub net: Option<NetId>,
}

/// A reference to a cell port.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct PortRef {
    /// The cell.
    pub cell: CellId,
    /// The port name.
    pub port: Ident,
}

/// One control signal of a flip-flop: a net and its polarity.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct ControlSig {
    /// The net, if the pin is connected.
    pub net: Option<NetId>,
    /// Whether the flip-flop inverts it.
    pub inverted: bool,
}

impl ControlSig {
    /// Creates a control signal.
    pub fn new(net: Option<NetId>, inverted: bool) -> Self {
        Self { net, inverted }
    }
}

/// The control signals of a flip-flop.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct FfControlSet {
    /// Clock.
    pub clk: ControlSig,
    /// Clock enable.
    pub ena: ControlSig,
    /// Asynchronous clear.
    pub aclr: ControlSig,
    /// Synchronous clear.
    pub sclr: ControlSig,
    /// Synchronous load.
    pub sload: ControlSig,
}

/// Derived flip-flop data.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct FfInfo {
    /// Control signals.
    pub ctrlset: FfControlSet,
    /// Synchronous load data.
    pub sdata: Option<NetId>,
    /// Data input.
    pub datain: Option<NetId>,
}

/// Derived LUT data.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct CombInfo {
    /// Number of logical inputs of the cell type.
    pub lut_input_count: u8,
    /// Number of distinct connected input nets.
    pub used_lut_input_count: u8,
    /// Size of the truth table in bits.
    pub lut_bits_count: u32,
    /// Input nets by logical input index.
    pub lut_inputs: [Option<NetId>; 6],
    /// Output net.
    pub comb_out: Option<NetId>,
    /// Truth table, indexed by the logical inputs with `A` as bit 0.
    pub init: u64,
}

/// A cell of the netlist.
#[derive(Clone, Debug)]
pub struct CellInfo {
    /// The cell name.
    pub name: Ident,
    /// The cell type.
    pub cell_type: Ident,
    /// Ports, in creation order.
    pub ports: IndexMap<Ident, PortInfo>,
    /// Parameters.
    pub params: BTreeMap<Ident, Property>,
    /// Bel mapping of each port.
    pub pin_data: HashMap<Ident, PinData>,
    /// The bel the cell is placed on.
    pub bel: Option<BelId>,
    /// Derived LUT data, valid for combinational cells.
    pub comb_info: CombInfo,
    /// Derived flip-flop data, valid for flip-flop cells.
    pub ff_info: FfInfo,
}

impl CellInfo {
    fn new(name: Ident, cell_type: Ident) -> Self {
        Self {
            name,
            cell_type,
            ports: IndexMap::new(),
            params: BTreeMap::new(),
            pin_data: HashMap::new(),
            bel: None,
            comb_info: CombInfo::default(),
            ff_info: FfInfo::default(),
        }
    }

    /// Returns the net on `port`, or `None` if the port is missing or unconnected.
    pub fn get_net(&self, port: Ident) -> Option<NetId> {
        self.ports.get(&port).and_then(|p| p.net)
    }

    /// Returns the drive state of `port`.
    pub fn pin_state(&self, port: Ident) -> PinState {
        self.pin_data.get(&port).map(|d| d.state).unwrap_or_default()
    }
}

/// A net of the netlist.
#[derive(Clone, Debug)]
pub struct NetInfo {
    /// The net name.
    pub name: Ident,
    /// The driving port.
    pub driver: Option<PortRef>,
    /// The sink ports.
    pub users: Vec<PortRef>,
    /// Whether the net is routed on a global clock network.
    pub is_global: bool,
}

/// Cell and net arenas.
#[derive(Clone, Debug, Default)]
pub struct Netlist {
    cells: Vec<CellInfo>,
    nets: Vec<NetInfo>,
    cell_by_name: HashMap<Ident, CellId>,
    net_by_name: HashMap<Ident, NetId>,
}

impl Netlist {
    /// Creates an empty netlist.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a cell and returns its ID.
    pub fn add_cell(&mut self, name: Ident, cell_type: Ident) -> CellId {
        let id = CellId::from_raw(self.cells.len() as u32);
        self.cells.push(CellInfo::new(name, cell_type));
        self.cell_by_name.insert(name, id);
        id
    }

    /// Adds an unconnected port to a cell.
    pub fn add_port(&mut self, cell: CellId, port: Ident, dir: PortDir) {
        self.cell_mut(cell).ports.insert(
            port,
            PortInfo {
                name: port,
                dir,
                net: None,
            },
        );
    }

    /// Adds a net and returns its ID.
    pub fn add_net(&mut self, name: Ident) -> NetId {
        let id = NetId::from_raw(self.nets.len() as u32);
        self.nets.push(NetInfo {
            name,
            driver: None,
            users: Vec::new(),
            is_global: false,
        });
        self.net_by_name.insert(name, id);
        id
    }

    /// Connects an existing, unconnected port to a net.
    ///
    /// Output ports become the net's driver, other ports its users.
    pub fn connect_port(&mut self, cell: CellId, port: Ident, net: NetId) -> CinderResult<()> {
        let info = self
            .cell(cell)
            .ports
            .get(&port)
            .ok_or_else(|| InternalError::new(format!("cell {cell} has no port {}", port.as_raw())))?;
        if info.net.is_some() {
            return Err(InternalError::new(format!(
                "port {} of cell {cell} is already connected",
                port.as_raw()
            )));
        }
        let dir = info.dir;
        let port_ref = PortRef { cell, port };
        let net_info = self.net_mut(net);
        if dir == PortDir::Out {
            if net_info.driver.is_some() {
                return Err(InternalError::new(format!("net {net} has two drivers")));
            }
            net_info.driver = Some(port_ref);
        } else {
            net_info.users.push(port_ref);
        }
        if let Some(info) = self.cell_mut(cell).ports.get_mut(&port) {
            info.net = Some(net);
        }
        Ok(())
    }

    /// Disconnects a port from its net, if connected.
    pub fn disconnect_port(&mut self, cell: CellId, port: Ident) {
        let Some(info) = self.cell_mut(cell).ports.get_mut(&port) else {
            return;
        };
        let Some(net) = info.net.take() else {
            return;
        };
        let port_ref = PortRef { cell, port };
        let net_info = self.net_mut(net);
        if net_info.driver == Some(port_ref) {
            net_info.driver = None;
        }
        net_info.users.retain(|u| *u != port_ref);
    }

    /// Returns the constant net for `value`, creating it on first use.
    pub fn const_net(&mut self, interner: &Interner, value: bool) -> NetId {
        let name = interner.get_or_intern(if value { VCC_NET_NAME } else { GND_NET_NAME });
        match self.net_by_name.get(&name) {
            Some(&net) => net,
            None => self.add_net(name),
        }
    }

    /// Returns `Some(value)` if `net` is one of the constant nets.
    pub fn const_value(&self, interner: &Interner, net: NetId) -> Option<bool> {
        match interner.resolve(self.net(net).name) {
            GND_NET_NAME => Some(false),
            VCC_NET_NAME => Some(true),
            _ => None,
        }
    }

    /// Returns the cell with the given ID.
    pub fn cell(&self, id: CellId) -> &CellInfo {
        &self.cells[id.as_raw() as usize]
    }

    /// Returns a mutable reference to the cell with the given ID.
    pub fn cell_mut(&mut self, id: CellId) -> &mut CellInfo {
        &mut self.cells[id.as_raw() as usize]
    }

    /// Returns the net with the given ID.
    pub fn net(&self, id: NetId) -> &NetInfo {
        &self.nets[id.as_raw() as usize]
    }

    /// Returns a mutable reference to the net with the given ID.
    pub fn net_mut(&mut self, id: NetId) -> &mut NetInfo {
        &mut self.nets[id.as_raw() as usize]
    }

    /// Looks up a cell by name.
    pub fn cell_by_name(&self, name: Ident) -> Option<CellId> {
        self.cell_by_name.get(&name).copied()
    }

    /// Looks up a net by name.
    pub fn net_by_name(&self, name: Ident) -> Option<NetId> {
        self.net_by_name.get(&name).copied()
    }

    /// Iterates over all cell IDs.
    pub fn cell_ids(&self) -> impl Iterator<Item = CellId> {
        (0..self.cells.len() as u32).map(CellId::from_raw)
    }

    /// Returns the number of cells.
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Returns the number of nets.
    pub fn net_count(&self) -> usize {
        self.nets.len()
    }
}
