//! The device model: bel catalog, wire graph, LAB list and netlist in one
//! explicitly constructed context object.
//!
//! An [`Arch`] is built once from a chip database and then queried by the
//! planner. Mutation after construction is limited to binding cells to bels,
//! adding device-model wires and pips, and the packing calls in
//! [`crate::lab`], [`crate::ctrlset`] and [`crate::lut`]. All of it goes
//! through `&mut self`, so a single writer is enforced by the borrow checker;
//! a multi-threaded planner must serialize mutating calls, for example with
//! one lock per LAB.

use crate::bel::{BelInfo, BelKind};
use crate::chipdb::{BlockType, ChipDb, ChipPort, PNode, SyntheticChip};
use crate::constids as id;
use crate::error::ArchError;
use crate::ids::{BelId, BelPin, CellId, Loc, NetId, PipId, PortDir, Pos, RNode, WireId};
use crate::lab::LabInfo;
use crate::netlist::{Netlist, PortRef};
use crate::pip::{AllPips, UpDownhillPips};
use crate::wire::{WireGraph, WireInfo};
use cinder_common::{Ident, IdentList, InternalError, Interner};
use cinder_config::{AttrValue, CinderConfig};
use cinder_diagnostics::{Category, Diagnostic, DiagnosticCode, DiagnosticSink};
use std::collections::{BTreeMap, HashMap};

/// A delay in picoseconds.
pub type Delay = i32;

/// Number of integers pre-interned for fast name construction.
const INT_IDS: u32 = 1024;

pub(crate) const CODE_BELS: DiagnosticCode = DiagnosticCode::new(Category::Device, 1);
pub(crate) const CODE_ROUTING: DiagnosticCode = DiagnosticCode::new(Category::Device, 2);
pub(crate) const CODE_CTRL_SLOT: DiagnosticCode = DiagnosticCode::new(Category::Packing, 1);
pub(crate) const CODE_PRE_ROUTE: DiagnosticCode = DiagnosticCode::new(Category::Packing, 2);
pub(crate) const CODE_RESERVE: DiagnosticCode = DiagnosticCode::new(Category::Routing, 1);
pub(crate) const CODE_IO_PIN: DiagnosticCode = DiagnosticCode::new(Category::Config, 1);

/// Arguments selecting and configuring the device.
#[derive(Clone, Debug, Default)]
pub struct ArchArgs {
    /// Part name, used when `grid` is `None`.
    pub device: String,
    /// Synthetic grid size.
    pub grid: Option<(u32, u32)>,
    /// Keep debug log records.
    pub debug: bool,
    /// I/O attribute side table, keyed by port name.
    pub io_attr: BTreeMap<String, BTreeMap<String, AttrValue>>,
}

impl ArchArgs {
    /// Arguments for a named part.
    pub fn for_part(device: impl Into<String>) -> Self {
        Self {
            device: device.into(),
            ..Self::default()
        }
    }

    /// Arguments for a synthetic grid.
    pub fn for_grid(sx: u32, sy: u32) -> Self {
        Self {
            grid: Some((sx, sy)),
            ..Self::default()
        }
    }

    /// Arguments from a loaded `cinder.toml`.
    pub fn from_config(config: &CinderConfig) -> Self {
        Self {
            device: config.device.part.clone().unwrap_or_default(),
            grid: config.device.grid.map(|[sx, sy]| (sx, sy)),
            debug: config.options.debug,
            io_attr: config.io.clone(),
        }
    }
}

/// The device model.
pub struct Arch {
    args: ArchArgs,
    chip: Box<dyn ChipDb>,
    /// Interned names of everything in the model.
    pub interner: Interner,
    /// The planner's netlist.
    pub netlist: Netlist,
    /// Log records emitted by the model.
    pub diagnostics: DiagnosticSink,
    wires: WireGraph,
    pub(crate) labs: Vec<LabInfo>,
    int2id: Vec<Ident>,
    id2int: HashMap<Ident, u32>,
    rn_t2id: Vec<Ident>,
    id2rn_t: HashMap<Ident, u8>,
    npnr_wirebyname: HashMap<IdentList, WireId>,
    bels_by_tile: Vec<Vec<BelInfo>>,
    all_bels: Vec<BelId>,
    io_attr: BTreeMap<Ident, BTreeMap<Ident, AttrValue>>,
}

impl std::fmt::Debug for Arch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Arch")
            .field("chip", &self.chip)
            .field("bels", &self.all_bels.len())
            .field("wires", &self.wires.len())
            .field("labs", &self.labs.len())
            .finish()
    }
}

impl Arch {
    /// Builds the model for the device selected by `args`, using the built-in
    /// synthetic chip database.
    pub fn new(args: ArchArgs) -> Result<Self, ArchError> {
        let chip = match args.grid {
            Some((sx, sy)) => {
                let dims = SyntheticChip::MIN_SX..=SyntheticChip::MAX_DIM;
                if !dims.contains(&sx) || !(SyntheticChip::MIN_SY..=SyntheticChip::MAX_DIM).contains(&sy) {
                    return Err(ArchError::InvalidGrid { sx, sy });
                }
                SyntheticChip::with_grid(sx, sy)
            }
            None => SyntheticChip::by_name(&args.device)
                .ok_or_else(|| ArchError::UnknownDevice(args.device.clone()))?,
        };
        Self::with_chip(args, Box::new(chip))
    }

    /// Builds the model on top of an arbitrary chip database.
    pub fn with_chip(args: ArchArgs, chip: Box<dyn ChipDb>) -> Result<Self, ArchError> {
        let interner = Interner::with_constants(id::NAMES);
        let mut int2id = Vec::with_capacity(INT_IDS as usize);
        let mut id2int = HashMap::new();
        for i in 0..INT_IDS {
            let int_id = interner.get_or_intern(&i.to_string());
            int2id.push(int_id);
            id2int.insert(int_id, i);
        }
        let mut rn_t2id = Vec::new();
        let mut id2rn_t = HashMap::new();
        for t in 0..chip.rnode_type_count() {
            let name = chip.rnode_type_name(t).unwrap_or("NONE");
            let rnode_id = interner.get_or_intern(name);
            rn_t2id.push(rnode_id);
            id2rn_t.insert(rnode_id, t);
        }

        let diagnostics = DiagnosticSink::new();
        diagnostics.set_verbose(args.debug);
        let tiles = (chip.tile_sx() * chip.tile_sy()) as usize;

        let mut arch = Self {
            args,
            chip,
            interner,
            netlist: Netlist::new(),
            diagnostics,
            wires: WireGraph::new(),
            labs: Vec::new(),
            int2id,
            id2int,
            rn_t2id,
            id2rn_t,
            npnr_wirebyname: HashMap::new(),
            bels_by_tile: vec![Vec::new(); tiles],
            all_bels: Vec::new(),
            io_attr: BTreeMap::new(),
        };

        for x in 0..arch.chip.tile_sx() {
            for y in 0..arch.chip.tile_sy() {
                for block in arch.chip.pos_get_bels(Pos::new(x, y)) {
                    match block {
                        BlockType::Lab => arch.create_lab(x, y)?,
                        BlockType::Gpio => arch.create_gpio(x, y)?,
                        BlockType::CmuxHg => arch.create_clkbuf(x, y)?,
                    }
                }
            }
        }
        arch.log(Diagnostic::info(
            CODE_BELS,
            format!(
                "initialised {} bels in {} LABs on {}",
                arch.all_bels.len(),
                arch.labs.len(),
                arch.chip.part_name()
            ),
        ));

        let mut pip_count = 0;
        for mux in arch.chip.rmuxes() {
            for &src in &mux.sources {
                arch.wires.add_pip(WireId(src), WireId(mux.dst));
                pip_count += 1;
            }
        }
        arch.log(Diagnostic::info(
            CODE_ROUTING,
            format!(
                "imported {} wires and {pip_count} pips",
                arch.wires.len()
            ),
        ));

        arch.apply_io_attrs();
        Ok(arch)
    }

    /// The arguments the model was built with.
    pub fn args(&self) -> &ArchArgs {
        &self.args
    }

    /// The underlying chip database.
    pub fn chip(&self) -> &dyn ChipDb {
        self.chip.as_ref()
    }

    /// The part name.
    pub fn chip_name(&self) -> &str {
        self.chip.part_name()
    }

    /// Grid width in tiles.
    pub fn grid_dim_x(&self) -> u32 {
        self.chip.tile_sx()
    }

    /// Grid height in tiles.
    pub fn grid_dim_y(&self) -> u32 {
        self.chip.tile_sy()
    }

    /// Number of bels in a tile.
    pub fn tile_bel_dim_z(&self, x: u32, y: u32) -> usize {
        self.bels_by_tile[self.pos2idx(x, y)].len()
    }

    /// Delimiter between name components.
    pub fn name_delimiter(&self) -> char {
        '.'
    }

    /// Interns a string.
    pub fn id(&self, s: &str) -> Ident {
        self.interner.get_or_intern(s)
    }

    /// Resolves an identifier.
    pub fn name_of(&self, ident: Ident) -> &str {
        self.interner.resolve(ident)
    }

    /// Renders a hierarchical name.
    pub fn name_of_list(&self, name: &IdentList) -> String {
        name.display(&self.interner, self.name_delimiter())
    }

    /// Parses a hierarchical name.
    pub fn parse_name(&self, name: &str) -> IdentList {
        IdentList::parse(&self.interner, name, self.name_delimiter())
    }

    pub(crate) fn log(&self, diag: Diagnostic) {
        self.diagnostics.emit(diag);
    }

    pub(crate) fn int_id(&self, i: u32) -> Ident {
        self.int2id[i as usize]
    }

    /// Index of a tile in the per-tile tables.
    ///
    /// # Panics
    ///
    /// Panics if the coordinate is outside the grid.
    pub(crate) fn pos2idx(&self, x: u32, y: u32) -> usize {
        assert!(x < self.chip.tile_sx(), "tile x {x} out of range");
        assert!(y < self.chip.tile_sy(), "tile y {y} out of range");
        (y * self.chip.tile_sx() + x) as usize
    }

    // -------------------------------------------------------------------
    // Construction

    /// Appends a bel to a tile.
    pub fn add_bel(&mut self, x: u32, y: u32, name: Ident, bel_type: Ident) -> BelId {
        let idx = self.pos2idx(x, y);
        let bels = &mut self.bels_by_tile[idx];
        let bel = BelId::new(Pos::new(x, y), bels.len() as u16);
        bels.push(BelInfo::new(name, bel_type));
        self.all_bels.push(bel);
        bel
    }

    /// Attaches a pin of `bel` to `wire`, creating the wire if needed.
    ///
    /// # Panics
    ///
    /// Panics if the bel already has a pin with that name.
    pub fn add_bel_pin(&mut self, bel: BelId, pin: Ident, dir: PortDir, wire: WireId) {
        let data = self.bel_data_mut(bel);
        assert!(
            !data.pins.contains_key(&pin),
            "duplicate bel pin {}",
            pin.as_raw()
        );
        data.pins.insert(pin, crate::bel::PinInfo { wire, dir });
        self.wires.entry(wire).bel_pins.push(BelPin { bel, pin });
    }

    /// Creates a device-model wire named `WIRE.x.y.name`, or returns the
    /// existing one of that name.
    pub fn add_wire(&mut self, x: u32, y: u32, name: Ident, flags: u64) -> WireId {
        let full_name = IdentList::new(vec![id::WIRE, self.int_id(x), self.int_id(y), name]);
        if let Some(&existing) = self.npnr_wirebyname.get(&full_name) {
            return existing;
        }
        let mut z = 0u32;
        let wire = loop {
            let node_type = RNode::SYNTHETIC_TYPE_BASE + (z >> 10) as u8;
            let candidate = WireId(RNode::new(node_type, x, y, z & RNode::MAX_Z));
            if !self.wires.contains(candidate) {
                break candidate;
            }
            z += 1;
        };
        let info = self.wires.entry(wire);
        info.name_override = name;
        info.flags = flags;
        self.npnr_wirebyname.insert(full_name, wire);
        wire
    }

    /// Adds a pip from `src` to `dst`.
    pub fn add_pip(&mut self, src: WireId, dst: WireId) -> PipId {
        self.wires.add_pip(src, dst)
    }

    /// The chip wire behind a block port.
    pub fn get_port(
        &self,
        block: BlockType,
        x: u32,
        y: u32,
        bi: i32,
        port: ChipPort,
        pi: i32,
    ) -> Option<WireId> {
        self.chip
            .pnode_to_rnode(PNode::new(block, x, y, port, bi, pi))
            .map(WireId)
    }

    /// Like [`Self::get_port`], for ports the chip database must provide.
    pub(crate) fn require_port(
        &self,
        block: BlockType,
        x: u32,
        y: u32,
        bi: i32,
        port: ChipPort,
        pi: i32,
    ) -> Result<WireId, ArchError> {
        self.get_port(block, x, y, bi, port, pi).ok_or_else(|| {
            InternalError::new(format!(
                "chip database has no {port:?}[{bi}, {pi}] on {block:?} at {x}.{y}"
            ))
            .into()
        })
    }

    fn apply_io_attrs(&mut self) {
        let table = std::mem::take(&mut self.args.io_attr);
        for (port, attrs) in &table {
            let port_id = self.id(port);
            let entry = self.io_attr.entry(port_id).or_default();
            for (key, value) in attrs {
                entry.insert(self.interner.get_or_intern(key), value.clone());
            }
            if let Some(AttrValue::Str(pin)) = attrs.get("PIN") {
                if self.io_pin_bel(pin).is_none() {
                    self.log(
                        Diagnostic::warning(CODE_IO_PIN, format!("unknown package pin '{pin}'"))
                            .with_subject(port.clone())
                            .with_note(format!("{} has no such pin", self.chip.part_name())),
                    );
                }
            }
        }
        self.args.io_attr = table;
    }

    /// The I/O attributes recorded for a port.
    pub fn io_attr(&self, port: Ident) -> Option<&BTreeMap<Ident, AttrValue>> {
        self.io_attr.get(&port)
    }

    // -------------------------------------------------------------------
    // Bels

    pub(crate) fn bel_data(&self, bel: BelId) -> &BelInfo {
        &self.bels_by_tile[self.pos2idx(bel.pos.x(), bel.pos.y())][bel.z as usize]
    }

    pub(crate) fn bel_data_mut(&mut self, bel: BelId) -> &mut BelInfo {
        let idx = self.pos2idx(bel.pos.x(), bel.pos.y());
        &mut self.bels_by_tile[idx][bel.z as usize]
    }

    /// Looks up a bel.
    pub fn bel_info(&self, bel: BelId) -> Result<&BelInfo, ArchError> {
        let (x, y) = (bel.pos.x(), bel.pos.y());
        if x >= self.grid_dim_x() || y >= self.grid_dim_y() {
            return Err(ArchError::BelNotFound(bel));
        }
        self.bels_by_tile[self.pos2idx(x, y)]
            .get(bel.z as usize)
            .ok_or(ArchError::BelNotFound(bel))
    }

    /// All bels, in creation order.
    pub fn bels(&self) -> &[BelId] {
        &self.all_bels
    }

    /// The bels of one tile.
    pub fn bels_by_tile(&self, x: u32, y: u32) -> Vec<BelId> {
        let count = self.tile_bel_dim_z(x, y);
        (0..count)
            .map(|z| BelId::new(Pos::new(x, y), z as u16))
            .collect()
    }

    /// Looks up a bel by its `X.Y.NAME` name.
    pub fn get_bel_by_name(&self, name: &IdentList) -> Option<BelId> {
        if name.len() != 3 {
            return None;
        }
        let x = *self.id2int.get(&name[0])?;
        let y = *self.id2int.get(&name[1])?;
        if x >= self.grid_dim_x() || y >= self.grid_dim_y() {
            return None;
        }
        self.bels_by_tile[self.pos2idx(x, y)]
            .iter()
            .position(|b| b.name == name[2])
            .map(|z| BelId::new(Pos::new(x, y), z as u16))
    }

    /// The `X.Y.NAME` name of a bel.
    pub fn get_bel_name(&self, bel: BelId) -> Result<IdentList, ArchError> {
        let info = self.bel_info(bel)?;
        Ok(IdentList::new(vec![
            self.int_id(bel.pos.x()),
            self.int_id(bel.pos.y()),
            info.name,
        ]))
    }

    /// The grid location of a bel.
    pub fn get_bel_location(&self, bel: BelId) -> Loc {
        Loc::new(bel.pos.x() as i32, bel.pos.y() as i32, bel.z as i32)
    }

    /// The bel at a location, or `None` outside the grid or past the tile's
    /// last bel.
    pub fn get_bel_by_location(&self, loc: Loc) -> Option<BelId> {
        let x = u32::try_from(loc.x).ok().filter(|&x| x < self.grid_dim_x())?;
        let y = u32::try_from(loc.y).ok().filter(|&y| y < self.grid_dim_y())?;
        let z = usize::try_from(loc.z)
            .ok()
            .filter(|&z| z < self.tile_bel_dim_z(x, y))?;
        Some(BelId::new(Pos::new(x, y), z as u16))
    }

    /// The type of a bel.
    pub fn get_bel_type(&self, bel: BelId) -> Result<Ident, ArchError> {
        Ok(self.bel_info(bel)?.bel_type)
    }

    /// The pin names of a bel.
    pub fn get_bel_pins(&self, bel: BelId) -> Result<Vec<Ident>, ArchError> {
        Ok(self.bel_info(bel)?.pins.keys().copied().collect())
    }

    /// The wire attached to a bel pin.
    pub fn get_bel_pin_wire(&self, bel: BelId, pin: Ident) -> Option<WireId> {
        self.bel_info(bel).ok()?.pins.get(&pin).map(|p| p.wire)
    }

    /// The direction of a bel pin.
    pub fn get_bel_pin_type(&self, bel: BelId, pin: Ident) -> Option<PortDir> {
        self.bel_info(bel).ok()?.pins.get(&pin).map(|p| p.dir)
    }

    /// Finds a bel by its chip-database block index.
    pub fn bel_by_block_idx(&self, x: u32, y: u32, bel_type: Ident, block_index: i32) -> Option<BelId> {
        self.bels_by_tile[self.pos2idx(x, y)]
            .iter()
            .position(|b| b.block_index == block_index && b.bel_type == bel_type)
            .map(|z| BelId::new(Pos::new(x, y), z as u16))
    }

    /// Places a cell on a bel and refreshes the cell's derived data.
    pub fn bind_bel(&mut self, bel: BelId, cell: CellId) -> Result<(), ArchError> {
        self.bel_info(bel)?;
        if let Some(other) = self.bel_data(bel).bound_cell {
            return Err(InternalError::new(format!("bel {bel:?} is already bound to cell {other}")).into());
        }
        if let Some(old) = self.netlist.cell(cell).bel {
            self.bel_data_mut(old).bound_cell = None;
        }
        self.bel_data_mut(bel).bound_cell = Some(cell);
        self.netlist.cell_mut(cell).bel = Some(bel);
        self.assign_cell_info(cell)
    }

    /// Removes the cell from a bel, returning it.
    pub fn unbind_bel(&mut self, bel: BelId) -> Result<Option<CellId>, ArchError> {
        self.bel_info(bel)?;
        let cell = self.bel_data_mut(bel).bound_cell.take();
        if let Some(cell) = cell {
            self.netlist.cell_mut(cell).bel = None;
        }
        Ok(cell)
    }

    /// The cell placed on a bel.
    pub fn bound_bel_cell(&self, bel: BelId) -> Option<CellId> {
        self.bel_info(bel).ok()?.bound_cell
    }

    /// Returns `true` if nothing is placed on the bel.
    pub fn check_bel_avail(&self, bel: BelId) -> bool {
        self.bel_info(bel).is_ok_and(|b| b.bound_cell.is_none())
    }

    /// The bel pins a cell pin is mapped to.
    pub fn get_bel_pins_for_cell_pin(&self, cell: CellId, pin: Ident) -> &[Ident] {
        self.netlist
            .cell(cell)
            .pin_data
            .get(&pin)
            .map(|d| d.bel_pins.as_slice())
            .unwrap_or(&[])
    }

    /// Whether a cell of `cell_type` may be placed on `bel`.
    pub fn is_valid_bel_for_cell_type(&self, cell_type: Ident, bel: BelId) -> bool {
        match self.get_bel_type(bel) {
            Ok(id::MISTRAL_COMB) => self.is_comb_cell(cell_type),
            Ok(id::MISTRAL_IO) => self.is_io_cell(cell_type),
            Ok(bel_type) => bel_type == cell_type,
            Err(_) => false,
        }
    }

    /// The placement bucket for a cell type.
    pub fn get_bel_bucket_for_cell_type(&self, cell_type: Ident) -> Ident {
        if self.is_comb_cell(cell_type) {
            id::MISTRAL_COMB
        } else if self.is_io_cell(cell_type) {
            id::MISTRAL_IO
        } else {
            cell_type
        }
    }

    /// Fast local validity check of a bel's current occupant.
    ///
    /// Logic bels are valid when their ALM is legal on its own; LAB-wide
    /// control sets are not considered. Other bels are always valid.
    pub fn is_bel_location_valid(&self, bel: BelId) -> bool {
        match self.bel_info(bel).map(|b| b.kind) {
            Ok(BelKind::Lab(data)) => self.is_alm_legal(data.lab, data.alm),
            Ok(BelKind::Other) => true,
            Err(_) => false,
        }
    }

    // -------------------------------------------------------------------
    // Wires

    /// Looks up a wire by name: `WIRE.X.Y.NAME` for device-model wires,
    /// `TYPE.X.Y.Z` for chip wires.
    pub fn get_wire_by_name(&self, name: &IdentList) -> Option<WireId> {
        if let Some(&wire) = self.npnr_wirebyname.get(name) {
            return Some(wire);
        }
        if name.len() != 4 {
            return None;
        }
        let node_type = *self.id2rn_t.get(&name[0])?;
        let x = *self.id2int.get(&name[1])?;
        let y = *self.id2int.get(&name[2])?;
        let z = *self.id2int.get(&name[3])?;
        if x >= self.grid_dim_x() || y >= self.grid_dim_y() {
            return None;
        }
        let wire = WireId(RNode::new(node_type, x, y, z));
        self.wires.contains(wire).then_some(wire)
    }

    /// The name of a wire.
    pub fn get_wire_name(&self, wire: WireId) -> Result<IdentList, ArchError> {
        let info = self.wires.get(wire)?;
        let n = wire.node();
        if !info.name_override.is_empty() {
            Ok(IdentList::new(vec![
                id::WIRE,
                self.int_id(n.x()),
                self.int_id(n.y()),
                info.name_override,
            ]))
        } else {
            let node_type = self
                .rn_t2id
                .get(n.node_type() as usize)
                .copied()
                .ok_or(ArchError::WireNotFound(wire))?;
            Ok(IdentList::new(vec![
                node_type,
                self.int_id(n.x()),
                self.int_id(n.y()),
                self.int_id(n.z()),
            ]))
        }
    }

    /// All wires, in creation order.
    pub fn wires(&self) -> impl Iterator<Item = WireId> + Clone + '_ {
        self.wires.keys()
    }

    /// Number of wires.
    pub fn wire_count(&self) -> usize {
        self.wires.len()
    }

    /// Looks up a wire.
    pub fn wire_info(&self, wire: WireId) -> Result<&WireInfo, ArchError> {
        self.wires.get(wire)
    }

    /// The bel pins attached to a wire.
    pub fn wire_bel_pins(&self, wire: WireId) -> Result<&[BelPin], ArchError> {
        Ok(&self.wires.get(wire)?.bel_pins)
    }

    /// Intrinsic wire delay.
    pub fn wire_delay(&self, _wire: WireId) -> Delay {
        0
    }

    /// Returns `true` if a pip drives `dst` from `src`.
    pub fn wires_connected(&self, src: WireId, dst: WireId) -> bool {
        self.wires.wires_connected(src, dst)
    }

    // -------------------------------------------------------------------
    // Pips

    /// Looks up a pip by its 8-component name.
    pub fn get_pip_by_name(&self, name: &IdentList) -> Option<PipId> {
        if name.len() != 8 {
            return None;
        }
        let parts = name.as_slice();
        let src = self.get_wire_by_name(&IdentList::new(parts[..4].to_vec()))?;
        let dst = self.get_wire_by_name(&IdentList::new(parts[4..].to_vec()))?;
        self.wires_connected(src, dst).then(|| PipId::new(src, dst))
    }

    /// The name of a pip: source wire name followed by destination wire name.
    pub fn get_pip_name(&self, pip: PipId) -> Result<IdentList, ArchError> {
        let src = self.get_wire_name(self.pip_src_wire(pip))?;
        let dst = self.get_wire_name(self.pip_dst_wire(pip))?;
        Ok(IdentList::concat(&src, &dst))
    }

    /// Every pip of the device.
    pub fn pips(&self) -> AllPips<'_> {
        AllPips::new(&self.wires)
    }

    /// Number of pips.
    pub fn pip_count(&self) -> usize {
        self.wires.pip_count()
    }

    /// Pips driven by `wire`.
    pub fn pips_downhill(&self, wire: WireId) -> Result<UpDownhillPips<'_>, ArchError> {
        Ok(UpDownhillPips::downhill(self.wires.get(wire)?, wire))
    }

    /// Pips driving `wire`.
    pub fn pips_uphill(&self, wire: WireId) -> Result<UpDownhillPips<'_>, ArchError> {
        Ok(UpDownhillPips::uphill(self.wires.get(wire)?, wire))
    }

    /// The driving wire of a pip.
    pub fn pip_src_wire(&self, pip: PipId) -> WireId {
        WireId(pip.src)
    }

    /// The driven wire of a pip.
    pub fn pip_dst_wire(&self, pip: PipId) -> WireId {
        WireId(pip.dst)
    }

    /// Fixed pip delay.
    pub fn pip_delay(&self, _pip: PipId) -> Delay {
        100
    }

    /// Restricts `dst` to be driven only from `src`.
    pub fn reserve_route(&mut self, src: WireId, dst: WireId) -> Result<(), ArchError> {
        self.wires.reserve_route(src, dst)?;
        if self.diagnostics.is_verbose() {
            let name = self.get_wire_name(dst).map(|n| self.name_of_list(&n));
            let src_name = self.get_wire_name(src).map(|n| self.name_of_list(&n));
            if let (Ok(name), Ok(src_name)) = (name, src_name) {
                self.log(Diagnostic::debug(CODE_RESERVE, format!("reserved {src_name} -> {name}")).with_subject(name));
            }
        }
        Ok(())
    }

    /// Removes a route reservation.
    pub fn clear_reservation(&mut self, dst: WireId) -> Result<(), ArchError> {
        self.wires.clear_reservation(dst)
    }

    /// The reserved driver of a wire, if any.
    pub fn reserved_uphill(&self, wire: WireId) -> Option<WireId> {
        self.wires.get(wire).ok()?.reserved_uphill()
    }

    /// Returns `false` if the pip's destination is reserved for another driver.
    pub fn check_pip_avail(&self, pip: PipId) -> bool {
        self.wires.check_pip_avail(pip)
    }

    // -------------------------------------------------------------------
    // Delays

    /// Estimated delay between two wires: 100 per tile of Manhattan distance
    /// plus 100.
    pub fn estimate_delay(&self, src: WireId, dst: WireId) -> Delay {
        let (s, d) = (src.node(), dst.node());
        let dx = (d.x() as i32 - s.x() as i32).abs();
        let dy = (d.y() as i32 - s.y() as i32).abs();
        100 * dy + 100 * dx + 100
    }

    /// Predicted delay of a net arc from the placement of its driver and sink.
    pub fn predict_delay(&self, net: NetId, sink: &PortRef) -> Delay {
        let driver_bel = self
            .netlist
            .net(net)
            .driver
            .and_then(|d| self.netlist.cell(d.cell).bel);
        let sink_bel = self.netlist.cell(sink.cell).bel;
        match (driver_bel, sink_bel) {
            (Some(src), Some(dst)) => {
                let (s, d) = (self.get_bel_location(src), self.get_bel_location(dst));
                (d.y - s.y).abs() * 100 + (d.x - s.x).abs() * 100 + 100
            }
            _ => 100,
        }
    }

    /// Smallest meaningful delay difference.
    pub fn delay_epsilon(&self) -> Delay {
        10
    }

    /// Penalty added when ripping up a route.
    pub fn ripup_delay_penalty(&self) -> Delay {
        100
    }

    /// Converts a delay to nanoseconds.
    pub fn delay_ns(&self, delay: Delay) -> f32 {
        delay as f32 / 1000.0
    }

    /// Converts nanoseconds to a delay.
    pub fn delay_from_ns(&self, ns: f32) -> Delay {
        (ns * 1000.0) as Delay
    }

    // -------------------------------------------------------------------
    // Cell data

    /// Adds a netlist cell by name.
    pub fn create_cell(&mut self, name: &str, cell_type: Ident) -> CellId {
        let name = self.id(name);
        self.netlist.add_cell(name, cell_type)
    }

    /// Adds a netlist net by name.
    pub fn create_net(&mut self, name: &str) -> NetId {
        let name = self.id(name);
        self.netlist.add_net(name)
    }

    /// Derives LUT and flip-flop data for every cell.
    pub fn assign_arch_info(&mut self) -> Result<(), ArchError> {
        let cells: Vec<CellId> = self.netlist.cell_ids().collect();
        for cell in cells {
            self.assign_cell_info(cell)?;
        }
        Ok(())
    }

    /// Derives LUT or flip-flop data for one cell, depending on its type.
    pub fn assign_cell_info(&mut self, cell: CellId) -> Result<(), ArchError> {
        let cell_type = self.netlist.cell(cell).cell_type;
        if self.is_comb_cell(cell_type) {
            self.assign_comb_info(cell)?;
        } else if cell_type == id::MISTRAL_FF {
            self.assign_ff_info(cell);
        }
        Ok(())
    }
}
