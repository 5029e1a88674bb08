//! The LAB model: ten ALMs sharing a pool of control wires.
//!
//! Each LAB tile gets, besides the chip's own input and output nodes, a set of
//! device-model wires: the shared control wires (`CLK0..2`, `ENA0..2`,
//! `ACLR0..1`, `SCLR`, `SLOAD`) and, per ALM, the two LUT outputs, the
//! per-half clock/enable/clear/E-F selectors, and the four flip-flop data
//! inputs and outputs. Bels reach their LAB through the [`LabData`] index
//! stored on them.

use crate::arch::{Arch, CODE_PRE_ROUTE};
use crate::bel::{BelKind, LabData};
use crate::chipdb::{BlockType, ChipPort};
use crate::constids as id;
use crate::ctrlset::{CtrlKind, CtrlSlots};
use crate::error::ArchError;
use crate::ids::{BelId, CellId, PortDir, Pos, WireId};
use crate::netlist::{CombInfo, ControlSig, FfControlSet, FfInfo, PinState};
use cinder_common::{Ident, InternalError};
use cinder_diagnostics::Diagnostic;

/// Number of ALMs in a LAB.
pub const ALMS_PER_LAB: usize = 10;

/// The eight physical ALM inputs with their chip ports.
pub(crate) const ALM_INPUT_PINS: [(Ident, ChipPort); 8] = [
    (id::A, ChipPort::A),
    (id::B, ChipPort::B),
    (id::C, ChipPort::C),
    (id::D, ChipPort::D),
    (id::E0, ChipPort::E0),
    (id::E1, ChipPort::E1),
    (id::F0, ChipPort::F0),
    (id::F1, ChipPort::F1),
];

/// General data lines a LAB's shared control wires can be fed from.
pub(crate) const LAB_DATA_LINES: i32 = 4;

/// Logical LUT inputs, in truth-table bit order.
pub(crate) const LUT_INPUT_PORTS: [Ident; 6] = [id::A, id::B, id::C, id::D, id::E, id::F];

/// One ALM: two LUT halves and four flip-flops.
#[derive(Clone, Debug)]
pub struct AlmInfo {
    /// LUT outputs, top then bottom half.
    pub comb_out: [WireId; 2],
    /// Per-half clock selectors.
    pub sel_clk: [WireId; 2],
    /// Per-half enable selectors.
    pub sel_ena: [WireId; 2],
    /// Per-half asynchronous clear selectors.
    pub sel_aclr: [WireId; 2],
    /// Per-half E/F selectors feeding flip-flop data and SDATA.
    pub sel_ef: [WireId; 2],
    /// Flip-flop data inputs.
    pub ff_in: [WireId; 4],
    /// Flip-flop outputs.
    pub ff_out: [WireId; 4],
    /// The LUT bels.
    pub lut_bels: [Option<BelId>; 2],
    /// The flip-flop bels.
    pub ff_bels: [Option<BelId>; 4],
    /// The two LUT halves form one 6-input function.
    pub l6_mode: bool,
}

impl AlmInfo {
    /// The per-half selectors of a control category. Synchronous clear and
    /// load have none; flip-flops use the LAB wires directly.
    pub fn selector_wires(&self, kind: CtrlKind) -> Option<&[WireId; 2]> {
        match kind {
            CtrlKind::Clk => Some(&self.sel_clk),
            CtrlKind::Ena => Some(&self.sel_ena),
            CtrlKind::Aclr => Some(&self.sel_aclr),
            CtrlKind::Sclr | CtrlKind::Sload => None,
        }
    }
}

/// One LAB.
#[derive(Clone, Debug)]
pub struct LabInfo {
    /// The LAB tile.
    pub pos: Pos,
    /// The ALMs.
    pub alms: [AlmInfo; ALMS_PER_LAB],
    /// Shared clock wires.
    pub clk_wires: [WireId; 3],
    /// Shared enable wires.
    pub ena_wires: [WireId; 3],
    /// Shared asynchronous clear wires.
    pub aclr_wires: [WireId; 2],
    /// Shared synchronous clear wire.
    pub sclr_wire: WireId,
    /// Shared synchronous load wire.
    pub sload_wire: WireId,
    /// Signals bound to the shared wires by the last control-set assignment.
    pub ctrl: CtrlSlots,
}

impl LabInfo {
    /// The shared wires of a control category.
    pub fn shared_wires(&self, kind: CtrlKind) -> &[WireId] {
        match kind {
            CtrlKind::Clk => &self.clk_wires,
            CtrlKind::Ena => &self.ena_wires,
            CtrlKind::Aclr => &self.aclr_wires,
            CtrlKind::Sclr => std::slice::from_ref(&self.sclr_wire),
            CtrlKind::Sload => std::slice::from_ref(&self.sload_wire),
        }
    }
}

/// Shared wires of a LAB under construction.
struct SharedWires {
    pos: Pos,
    clk: [WireId; 3],
    ena: [WireId; 3],
    aclr: [WireId; 2],
    sclr: WireId,
    sload: WireId,
}

fn to_array<T, const N: usize>(items: Vec<T>) -> Result<[T; N], ArchError> {
    let len = items.len();
    items
        .try_into()
        .map_err(|_| InternalError::new(format!("expected {N} items, built {len}")).into())
}

impl Arch {
    /// All LABs, indexed by [`LabData::lab`].
    pub fn labs(&self) -> &[LabInfo] {
        &self.labs
    }

    /// Looks up a LAB.
    pub fn lab(&self, lab: u32) -> Option<&LabInfo> {
        self.labs.get(lab as usize)
    }

    fn lab_wire(&mut self, x: u32, y: u32, name: &str) -> WireId {
        let name = self.id(name);
        self.add_wire(x, y, name, 0)
    }

    fn lab_port(&self, x: u32, y: u32, bi: i32, port: ChipPort, pi: i32) -> Result<WireId, ArchError> {
        self.require_port(BlockType::Lab, x, y, bi, port, pi)
    }

    /// Creates a shared LAB wire fed from its dedicated input, if any, then
    /// from every LAB data line starting at `first_line`.
    fn shared_lab_wire(
        &mut self,
        x: u32,
        y: u32,
        name: &str,
        dedicated: Option<WireId>,
        first_line: i32,
    ) -> Result<WireId, ArchError> {
        let wire = self.lab_wire(x, y, name);
        if let Some(src) = dedicated {
            self.add_pip(src, wire);
        }
        for k in 0..LAB_DATA_LINES {
            let line = self.lab_port(x, y, -1, ChipPort::DataIn, (first_line + k) % LAB_DATA_LINES)?;
            self.add_pip(line, wire);
        }
        Ok(wire)
    }

    pub(crate) fn create_lab(&mut self, x: u32, y: u32) -> Result<(), ArchError> {
        let lab = self.labs.len() as u32;

        let mut clk_wires = Vec::with_capacity(3);
        for i in 0..3 {
            let dedicated = self.lab_port(x, y, -1, ChipPort::ClkIn, i)?;
            clk_wires.push(self.shared_lab_wire(x, y, &format!("CLK{i}"), Some(dedicated), 0)?);
        }
        let mut ena_wires = Vec::with_capacity(3);
        for (i, line) in [2, 3, 0].into_iter().enumerate() {
            ena_wires.push(self.shared_lab_wire(x, y, &format!("ENA{i}"), None, line)?);
        }
        let mut aclr_wires = Vec::with_capacity(2);
        for (i, line) in [3, 2].into_iter().enumerate() {
            let dedicated = self.lab_port(x, y, i as i32, ChipPort::Aclr, -1)?;
            aclr_wires.push(self.shared_lab_wire(x, y, &format!("ACLR{i}"), Some(dedicated), line)?);
        }
        let sclr_wire = self.shared_lab_wire(x, y, "SCLR", None, 3)?;
        let sload_wire = self.shared_lab_wire(x, y, "SLOAD", None, 1)?;

        let shared = SharedWires {
            pos: Pos::new(x, y),
            clk: to_array(clk_wires)?,
            ena: to_array(ena_wires)?,
            aclr: to_array(aclr_wires)?,
            sclr: sclr_wire,
            sload: sload_wire,
        };
        let mut alms = Vec::with_capacity(ALMS_PER_LAB);
        for z in 0..ALMS_PER_LAB as u32 {
            alms.push(self.create_alm(lab, &shared, z)?);
        }
        self.labs.push(LabInfo {
            pos: shared.pos,
            alms: to_array(alms)?,
            clk_wires: shared.clk,
            ena_wires: shared.ena,
            aclr_wires: shared.aclr,
            sclr_wire: shared.sclr,
            sload_wire: shared.sload,
            ctrl: CtrlSlots::default(),
        });
        Ok(())
    }

    fn set_lab_data(&mut self, bel: BelId, lab: u32, alm: u32, idx: u32) {
        let data = self.bel_data_mut(bel);
        data.block_index = alm as i32;
        data.kind = BelKind::Lab(LabData {
            lab,
            alm: alm as u8,
            idx: idx as u8,
        });
    }

    fn create_alm(&mut self, lab: u32, info: &SharedWires, z: u32) -> Result<AlmInfo, ArchError> {
        let (x, y) = (info.pos.x(), info.pos.y());
        let bi = z as i32;
        let mut inputs = Vec::with_capacity(ALM_INPUT_PINS.len());
        for (_, port) in ALM_INPUT_PINS {
            inputs.push(self.lab_port(x, y, bi, port, -1)?);
        }

        let mut comb_out = Vec::with_capacity(2);
        let mut lut_bels = [None; 2];
        for i in 0..2 {
            let out = self.lab_wire(x, y, &format!("COMBOUT[{}]", z * 2 + i));
            let name = self.id(&format!("ALM{z}_COMB{i}"));
            let bel = self.add_bel(x, y, name, id::MISTRAL_COMB);
            for (&(pin, _), &wire) in ALM_INPUT_PINS.iter().zip(&inputs) {
                self.add_bel_pin(bel, pin, PortDir::In, wire);
            }
            self.add_bel_pin(bel, id::COMBOUT, PortDir::Out, out);
            self.set_lab_data(bel, lab, z, i);
            comb_out.push(out);
            lut_bels[i as usize] = Some(bel);
        }

        let (mut sel_clk, mut sel_ena, mut sel_aclr, mut sel_ef) =
            (Vec::new(), Vec::new(), Vec::new(), Vec::new());
        for i in 0..2 {
            let half = if i == 0 { 'T' } else { 'B' };
            let clk = self.lab_wire(x, y, &format!("CLK{half}[{z}]"));
            for &w in &info.clk {
                self.add_pip(w, clk);
            }
            let ena = self.lab_wire(x, y, &format!("ENA{half}[{z}]"));
            for &w in &info.ena {
                self.add_pip(w, ena);
            }
            let aclr = self.lab_wire(x, y, &format!("ACLR{half}[{z}]"));
            for &w in &info.aclr {
                self.add_pip(w, aclr);
            }
            // E of this half, or F of the other one
            let ef = self.lab_wire(x, y, &format!("{half}EF[{z}]"));
            self.add_pip(inputs[4 + i], ef);
            self.add_pip(inputs[7 - i], ef);
            sel_clk.push(clk);
            sel_ena.push(ena);
            sel_aclr.push(aclr);
            sel_ef.push(ef);
        }

        let outputs = [
            [ChipPort::Fft0, ChipPort::Fft1, ChipPort::Fft1l],
            [ChipPort::Ffb0, ChipPort::Ffb1, ChipPort::Ffb1l],
        ];
        let mut ff_in = Vec::with_capacity(4);
        let mut ff_out = Vec::with_capacity(4);
        let mut ff_bels = [None; 4];
        for i in 0..4usize {
            let h = i / 2;
            let data = self.lab_wire(x, y, &format!("FFIN[{}]", z as usize * 4 + i));
            self.add_pip(comb_out[h], data);
            self.add_pip(sel_ef[h], data);
            let q = self.lab_wire(x, y, &format!("FFOUT[{}]", z as usize * 4 + i));

            let name = self.id(&format!("ALM{z}_FF{i}"));
            let bel = self.add_bel(x, y, name, id::MISTRAL_FF);
            self.add_bel_pin(bel, id::CLK, PortDir::In, sel_clk[h]);
            self.add_bel_pin(bel, id::ENA, PortDir::In, sel_ena[h]);
            self.add_bel_pin(bel, id::ACLR, PortDir::In, sel_aclr[h]);
            self.add_bel_pin(bel, id::SCLR, PortDir::In, info.sclr);
            self.add_bel_pin(bel, id::SLOAD, PortDir::In, info.sload);
            self.add_bel_pin(bel, id::SDATA, PortDir::In, sel_ef[h]);
            self.add_bel_pin(bel, id::DATAIN, PortDir::In, data);
            self.add_bel_pin(bel, id::Q, PortDir::Out, q);
            self.set_lab_data(bel, lab, z, i as u32);

            let k = i % 2;
            let mut dsts = vec![self.lab_port(x, y, bi, outputs[h][k], -1)?];
            if k == 1 {
                dsts.push(self.lab_port(x, y, bi, outputs[h][2], -1)?);
            }
            for dst in dsts {
                self.add_pip(q, dst);
                self.add_pip(comb_out[h], dst);
            }
            ff_in.push(data);
            ff_out.push(q);
            ff_bels[i] = Some(bel);
        }

        Ok(AlmInfo {
            comb_out: to_array(comb_out)?,
            sel_clk: to_array(sel_clk)?,
            sel_ena: to_array(sel_ena)?,
            sel_aclr: to_array(sel_aclr)?,
            sel_ef: to_array(sel_ef)?,
            ff_in: to_array(ff_in)?,
            ff_out: to_array(ff_out)?,
            lut_bels,
            ff_bels,
            l6_mode: false,
        })
    }

    /// Returns `true` if cells of this type occupy a LUT half.
    pub fn is_comb_cell(&self, cell_type: Ident) -> bool {
        matches!(
            cell_type,
            id::MISTRAL_ALUT6
                | id::MISTRAL_ALUT5
                | id::MISTRAL_ALUT4
                | id::MISTRAL_ALUT3
                | id::MISTRAL_ALUT2
                | id::MISTRAL_NOT
                | id::MISTRAL_BUF
                | id::MISTRAL_CONST
        )
    }

    /// Derives the LUT summary of a combinational cell.
    pub fn assign_comb_info(&mut self, cell: CellId) -> Result<(), ArchError> {
        let info = self.netlist.cell(cell);
        let lut_input_count: u8 = match info.cell_type {
            id::MISTRAL_ALUT6 => 6,
            id::MISTRAL_ALUT5 => 5,
            id::MISTRAL_ALUT4 => 4,
            id::MISTRAL_ALUT3 => 3,
            id::MISTRAL_ALUT2 => 2,
            id::MISTRAL_NOT | id::MISTRAL_BUF => 1,
            id::MISTRAL_CONST => 0,
            other => {
                return Err(ArchError::UnexpectedCombCell {
                    cell: self.name_of(info.name).to_string(),
                    cell_type: self.name_of(other).to_string(),
                })
            }
        };
        let lut_bits_count = 1u32 << lut_input_count;
        let lut_param = info.params.get(&id::LUT).and_then(|p| p.as_u64());
        let init = match info.cell_type {
            id::MISTRAL_NOT => 0b01,
            id::MISTRAL_BUF => 0b10,
            id::MISTRAL_CONST => lut_param.unwrap_or(0) & 1,
            _ if lut_bits_count == 64 => lut_param.unwrap_or(0),
            _ => lut_param.unwrap_or(0) & ((1u64 << lut_bits_count) - 1),
        };

        let mut lut_inputs = [None; 6];
        for (k, port) in LUT_INPUT_PORTS.iter().take(lut_input_count as usize).enumerate() {
            lut_inputs[k] = info.get_net(*port);
        }
        let mut distinct: Vec<_> = lut_inputs.iter().flatten().collect();
        distinct.sort_by_key(|n| n.as_raw());
        distinct.dedup();

        let comb_info = CombInfo {
            lut_input_count,
            used_lut_input_count: distinct.len() as u8,
            lut_bits_count,
            lut_inputs,
            comb_out: info.get_net(id::Q),
            init,
        };
        self.netlist.cell_mut(cell).comb_info = comb_info;
        Ok(())
    }

    /// Derives the control set and data nets of a flip-flop cell.
    pub fn assign_ff_info(&mut self, cell: CellId) {
        let info = self.netlist.cell(cell);
        let sig = |port: Ident| ControlSig::new(info.get_net(port), info.pin_state(port) == PinState::Inverted);
        let mut ctrlset = FfControlSet {
            clk: sig(id::CLK),
            ena: sig(id::ENA),
            aclr: sig(id::ACLR),
            sclr: sig(id::SCLR),
            sload: sig(id::SLOAD),
        };
        let sdata = info.get_net(id::SDATA);
        let datain = info.get_net(id::DATAIN);
        // a synchronous clear is implemented as a load of constant zero
        if ctrlset.sclr.net.is_some() && ctrlset.sload.net.is_none() {
            let gnd = self.netlist.const_net(&self.interner, false);
            ctrlset.sload = ControlSig::new(Some(gnd), false);
        }
        self.netlist.cell_mut(cell).ff_info = FfInfo {
            ctrlset,
            sdata,
            datain,
        };
    }

    /// The cells bound to an ALM's LUT and flip-flop bels.
    pub fn alm_cells(&self, lab: u32, alm: u8) -> ([Option<CellId>; 2], [Option<CellId>; 4]) {
        let info = &self.labs[lab as usize].alms[alm as usize];
        let bound = |bel: Option<BelId>| bel.and_then(|b| self.bound_bel_cell(b));
        (info.lut_bels.map(bound), info.ff_bels.map(bound))
    }

    /// Checks an ALM on its own: LUT sizes and mode, flip-flops sharing a
    /// half agree on their control set, and the inputs can be mapped onto the
    /// physical pins.
    pub fn is_alm_legal(&self, lab: u32, alm: u8) -> bool {
        let (luts, ffs) = self.alm_cells(lab, alm);
        let lut_bits: u32 = luts
            .iter()
            .flatten()
            .map(|&c| self.netlist.cell(c).comb_info.lut_bits_count)
            .sum();
        if lut_bits > 64 {
            return false;
        }
        for half in ffs.chunks(2) {
            if let [Some(a), Some(b)] = half {
                let ctrl = |c: &CellId| self.netlist.cell(*c).ff_info.ctrlset;
                if ctrl(a) != ctrl(b) {
                    return false;
                }
            }
        }
        self.plan_alm_inputs(lab, alm).is_some()
    }

    /// Assigns control sets and remaps ALM inputs for every occupied LAB.
    pub fn lab_pre_route(&mut self) -> Result<(), ArchError> {
        let mut occupied = 0;
        for lab in 0..self.labs.len() as u32 {
            self.assign_control_sets(lab)?;
            let mut used = false;
            for alm in 0..ALMS_PER_LAB as u8 {
                let (luts, ffs) = self.alm_cells(lab, alm);
                if luts.iter().chain(&ffs).any(Option::is_some) {
                    self.reassign_alm_inputs(lab, alm)?;
                    used = true;
                }
            }
            if used {
                occupied += 1;
            }
        }
        self.log(Diagnostic::info(
            CODE_PRE_ROUTE,
            format!("pre-routed {occupied} of {} LABs", self.labs.len()),
        ));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arch::ArchArgs;
    use crate::netlist::Property;

    fn arch() -> Arch {
        Arch::new(ArchArgs::for_grid(4, 3)).unwrap()
    }

    #[test]
    fn one_lab_per_lab_tile() {
        let arch = arch();
        // 4x3: columns 1 and 2 are logic, except the clock mux at (2, 0)
        assert_eq!(arch.labs().len(), 5);
        for lab in arch.labs() {
            assert_eq!(lab.alms.len(), ALMS_PER_LAB);
            assert_eq!(arch.tile_bel_dim_z(lab.pos.x(), lab.pos.y()), ALMS_PER_LAB * 6);
        }
    }

    #[test]
    fn bels_point_back_to_their_lab() {
        let arch = arch();
        for (l, lab) in arch.labs().iter().enumerate() {
            for (a, alm) in lab.alms.iter().enumerate() {
                for (i, bel) in alm.lut_bels.iter().chain(&alm.ff_bels).enumerate() {
                    let data = arch.bel_info(bel.unwrap()).unwrap().lab_data().unwrap();
                    assert_eq!(data.lab as usize, l);
                    assert_eq!(data.alm as usize, a);
                    assert_eq!(data.idx as usize, if i < 2 { i } else { i - 2 });
                }
            }
        }
    }

    #[test]
    fn selectors_only_see_their_own_lab() {
        let arch = arch();
        for lab in arch.labs() {
            for alm in &lab.alms {
                for kind in [CtrlKind::Clk, CtrlKind::Ena, CtrlKind::Aclr] {
                    for &sel in alm.selector_wires(kind).unwrap() {
                        let uphill = &arch.wire_info(sel).unwrap().wires_uphill;
                        assert_eq!(uphill.as_slice(), lab.shared_wires(kind));
                    }
                }
            }
        }
    }

    #[test]
    fn shared_wires_have_dedicated_source_first() {
        let arch = arch();
        let lab = &arch.labs()[0];
        for &clk in &lab.clk_wires {
            let uphill = &arch.wire_info(clk).unwrap().wires_uphill;
            assert_eq!(uphill.len(), 1 + LAB_DATA_LINES as usize);
            assert_eq!(arch.chip().rnode_type_name(uphill[0].node().node_type()), Some("GIN"));
        }
        let sload = &arch.wire_info(lab.sload_wire).unwrap().wires_uphill;
        assert_eq!(sload.len(), LAB_DATA_LINES as usize);
        // every data line reaches every enable wire
        for &ena in &lab.ena_wires {
            let uphill = &arch.wire_info(ena).unwrap().wires_uphill;
            assert!(sload.iter().all(|line| uphill.contains(line)));
        }
    }

    #[test]
    fn ff_pins_attach_to_alm_wires() {
        let arch = arch();
        let alm = &arch.labs()[1].alms[4];
        let ff = alm.ff_bels[3].unwrap();
        assert_eq!(arch.get_bel_pin_wire(ff, id::CLK), Some(alm.sel_clk[1]));
        assert_eq!(arch.get_bel_pin_wire(ff, id::SDATA), Some(alm.sel_ef[1]));
        assert_eq!(arch.get_bel_pin_wire(ff, id::Q), Some(alm.ff_out[3]));
        assert_eq!(arch.get_bel_pin_type(ff, id::Q), Some(PortDir::Out));
        assert!(arch.wires_connected(alm.comb_out[1], alm.ff_in[3]));
        assert!(!arch.wires_connected(alm.comb_out[0], alm.ff_in[3]));
    }

    #[test]
    fn comb_info_from_lut_param() {
        let mut arch = arch();
        let cell = arch.create_cell("lut", id::MISTRAL_ALUT3);
        let a = arch.create_net("a");
        for port in [id::A, id::B, id::C] {
            arch.netlist.add_port(cell, port, PortDir::In);
            arch.netlist.connect_port(cell, port, a).unwrap();
        }
        arch.netlist
            .cell_mut(cell)
            .params
            .insert(id::LUT, Property::Str("111110000".to_string()));
        arch.assign_comb_info(cell).unwrap();
        let ci = arch.netlist.cell(cell).comb_info;
        assert_eq!(ci.lut_input_count, 3);
        assert_eq!(ci.used_lut_input_count, 1);
        assert_eq!(ci.lut_bits_count, 8);
        assert_eq!(ci.init, 0b11110000);
    }

    #[test]
    fn fixed_tables() {
        let mut arch = arch();
        let not = arch.create_cell("inv", id::MISTRAL_NOT);
        let one = arch.create_cell("one", id::MISTRAL_CONST);
        arch.netlist.cell_mut(one).params.insert(id::LUT, Property::Int(1));
        arch.assign_arch_info().unwrap();
        assert_eq!(arch.netlist.cell(not).comb_info.init, 0b01);
        assert_eq!(arch.netlist.cell(one).comb_info.init, 1);
        assert_eq!(arch.netlist.cell(one).comb_info.lut_input_count, 0);
    }

    #[test]
    fn non_lut_cell_is_rejected() {
        let mut arch = arch();
        let ff = arch.create_cell("ff", id::MISTRAL_FF);
        assert!(matches!(
            arch.assign_comb_info(ff),
            Err(ArchError::UnexpectedCombCell { .. })
        ));
    }

    #[test]
    fn sclr_implies_grounded_sload() {
        let mut arch = arch();
        let ff = arch.create_cell("ff", id::MISTRAL_FF);
        let rst = arch.create_net("rst");
        arch.netlist.add_port(ff, id::SCLR, PortDir::In);
        arch.netlist.connect_port(ff, id::SCLR, rst).unwrap();
        arch.assign_ff_info(ff);
        let sload = arch.netlist.cell(ff).ff_info.ctrlset.sload;
        let gnd = sload.net.unwrap();
        assert_eq!(arch.netlist.const_value(&arch.interner, gnd), Some(false));
        assert!(!sload.inverted);
    }

    #[test]
    fn ffs_sharing_a_half_need_one_ctrlset() {
        let mut arch = arch();
        let clk0 = arch.create_net("clk0");
        let clk1 = arch.create_net("clk1");
        let lab = &arch.labs()[0];
        let (f0, f1, f2) = (
            lab.alms[0].ff_bels[0].unwrap(),
            lab.alms[0].ff_bels[1].unwrap(),
            lab.alms[0].ff_bels[2].unwrap(),
        );
        for (name, bel, net) in [("f0", f0, clk0), ("f1", f1, clk1)] {
            let cell = arch.create_cell(name, id::MISTRAL_FF);
            arch.netlist.add_port(cell, id::CLK, PortDir::In);
            arch.netlist.connect_port(cell, id::CLK, net).unwrap();
            arch.bind_bel(bel, cell).unwrap();
        }
        assert!(!arch.is_alm_legal(0, 0));
        assert!(!arch.is_bel_location_valid(f0));

        let moved = arch.unbind_bel(f1).unwrap().unwrap();
        arch.bind_bel(f2, moved).unwrap();
        assert!(arch.is_alm_legal(0, 0));
        assert!(arch.is_bel_location_valid(f2));
    }

    #[test]
    fn pre_route_reports_occupied_labs() {
        let mut arch = arch();
        let clk = arch.create_net("clk");
        let ff = arch.create_cell("ff", id::MISTRAL_FF);
        arch.netlist.add_port(ff, id::CLK, PortDir::In);
        arch.netlist.connect_port(ff, id::CLK, clk).unwrap();
        let bel = arch.labs()[2].alms[1].ff_bels[0].unwrap();
        arch.bind_bel(bel, ff).unwrap();
        arch.lab_pre_route().unwrap();
        let records = arch.diagnostics.diagnostics();
        assert!(records
            .iter()
            .any(|d| d.code == CODE_PRE_ROUTE && d.message == "pre-routed 1 of 5 LABs"));
        assert!(arch.reserved_uphill(arch.labs()[2].alms[1].sel_clk[0]).is_some());
    }
}
