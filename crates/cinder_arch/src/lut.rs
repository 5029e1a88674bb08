//! Fracturable-LUT packing: mapping an ALM's logical LUT inputs and
//! flip-flop feeds onto its eight physical inputs, and building the 64-bit
//! truth table.
//!
//! Physical inputs are `A B C D E0 E1 F0 F1`. In fused mode one 6-input LUT
//! addresses the table with `A B C D E F`, `E` and `F` each driving both of
//! their copies. In split mode the top half (mask bits 0..31) is addressed by
//! `A B C E0 F0` and the bottom half (bits 32..63) by `A B D E1 F1`.
//!
//! Each half also has an E/F selector feeding its flip-flops' data and SDATA
//! from `E_i` or the opposite half's `F` pin, so a flip-flop input competes
//! with the LUTs for the same pins. [`Arch::plan_alm_inputs`] resolves all of
//! it at once; legality and remapping both go through it.

use crate::arch::Arch;
use crate::chipdb::BlockType;
use crate::constids as id;
use crate::error::ArchError;
use crate::ids::{CellId, NetId};
use crate::lab::{ALM_INPUT_PINS, LUT_INPUT_PORTS};
use crate::netlist::PinState;
use cinder_common::Ident;

const PIN_A: usize = 0;
const PIN_B: usize = 1;
const PIN_C: usize = 2;
const PIN_D: usize = 3;
const PIN_E0: usize = 4;
const PIN_E1: usize = 5;
const PIN_F0: usize = 6;
const PIN_F1: usize = 7;

/// Pins a split-mode half can read, in address-bit order.
const HALF_PINS: [[usize; 5]; 2] = [
    [PIN_A, PIN_B, PIN_C, PIN_E0, PIN_F0],
    [PIN_A, PIN_B, PIN_D, PIN_E1, PIN_F1],
];

/// Pins a half's E/F selector can read.
static EF_PINS: [[usize; 2]; 2] = [[PIN_E0, PIN_F1], [PIN_E1, PIN_F0]];

/// Physical pins of each logical input in fused mode.
const FUSED_PINS: [&[usize]; 6] = [
    &[PIN_A],
    &[PIN_B],
    &[PIN_C],
    &[PIN_D],
    &[PIN_E0, PIN_E1],
    &[PIN_F0, PIN_F1],
];

/// Where a flip-flop takes its data from.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum FfDataSource {
    /// Unconnected.
    #[default]
    None,
    /// The LUT output of the flip-flop's half.
    Comb,
    /// The half's E/F selector.
    Ef,
}

/// A complete input assignment for one ALM.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct AlmInputPlan {
    /// One 6-input LUT spans both halves.
    pub l6_mode: bool,
    /// Physical pin index of each logical LUT input, per LUT bel. Fused mode
    /// records the first of a pin pair.
    pub lut_pins: [[Option<usize>; 6]; 2],
    /// Physical pin feeding each half's E/F selector.
    pub ef_pins: [Option<usize>; 2],
    /// Data source of each flip-flop.
    pub ff_src: [FfDataSource; 4],
}

impl AlmInputPlan {
    /// The bel pins a logical input `k` of the LUT in `half` is mapped to.
    pub fn bel_pins(&self, half: usize, k: usize) -> Vec<Ident> {
        if self.l6_mode {
            if self.lut_pins[half][k].is_none() {
                return Vec::new();
            }
            return FUSED_PINS[k].iter().map(|&p| ALM_INPUT_PINS[p].0).collect();
        }
        self.lut_pins[half][k]
            .map(|p| vec![ALM_INPUT_PINS[p].0])
            .unwrap_or_default()
    }
}

/// Net carried by each physical pin while planning.
#[derive(Clone, Copy, Default)]
struct PinNets([Option<NetId>; 8]);

impl PinNets {
    /// Puts `net` on `pin` if the pin is free or already carries it.
    fn claim(&mut self, pin: usize, net: NetId) -> bool {
        match self.0[pin] {
            Some(n) => n == net,
            None => {
                self.0[pin] = Some(net);
                true
            }
        }
    }

    fn find(&self, pins: &[usize], net: NetId) -> Option<usize> {
        pins.iter().copied().find(|&p| self.0[p] == Some(net))
    }
}

/// The nets of one LUT as the planner needs them.
struct LutDemand {
    inputs: [Option<NetId>; 6],
    output: Option<NetId>,
    six_input: bool,
}

impl Arch {
    fn lut_demand(&self, cell: CellId) -> LutDemand {
        let info = self.netlist.cell(cell);
        let ci = &info.comb_info;
        let mut inputs = [None; 6];
        for (k, port) in LUT_INPUT_PORTS.iter().enumerate().take(ci.lut_input_count as usize) {
            // tied and unconnected inputs are folded into the table
            if matches!(info.pin_state(*port), PinState::Signal | PinState::Inverted) {
                inputs[k] = ci.lut_inputs[k];
            }
        }
        LutDemand {
            inputs,
            output: ci.comb_out,
            six_input: ci.lut_input_count == 6,
        }
    }

    /// Plans the inputs of an ALM, or returns `None` if its occupants cannot
    /// share its physical pins.
    pub fn plan_alm_inputs(&self, lab: u32, alm: u8) -> Option<AlmInputPlan> {
        let (luts, ffs) = self.alm_cells(lab, alm);
        let demands = luts.map(|c| c.map(|c| self.lut_demand(c)));
        let l6_mode = demands.iter().flatten().any(|d| d.six_input);
        if l6_mode && demands.iter().flatten().count() > 1 {
            return None;
        }

        let mut plan = AlmInputPlan {
            l6_mode,
            ..AlmInputPlan::default()
        };

        // at most one distinct E/F net per half
        let mut ef_nets = [None; 2];
        for (i, ff) in ffs.iter().enumerate() {
            let Some(ff) = *ff else { continue };
            let h = i / 2;
            let info = &self.netlist.cell(ff).ff_info;
            let comb_out = demands[h].as_ref().and_then(|d| d.output);
            let mut wants = Vec::with_capacity(2);
            match info.datain {
                Some(net) if Some(net) == comb_out => plan.ff_src[i] = FfDataSource::Comb,
                Some(net) => {
                    plan.ff_src[i] = FfDataSource::Ef;
                    wants.push(net);
                }
                None => {}
            }
            wants.extend(info.sdata);
            for net in wants {
                match ef_nets[h] {
                    Some(n) if n != net => return None,
                    _ => ef_nets[h] = Some(net),
                }
            }
        }

        let choices = |h: usize| -> &'static [usize] {
            if ef_nets[h].is_some() {
                &EF_PINS[h]
            } else {
                &[usize::MAX]
            }
        };
        for &ef0 in choices(0) {
            for &ef1 in choices(1) {
                let mut pins = PinNets::default();
                let mut ok = true;
                for (h, &pin) in [ef0, ef1].iter().enumerate() {
                    if let Some(net) = ef_nets[h] {
                        ok &= pins.claim(pin, net);
                    }
                }
                if !ok {
                    continue;
                }
                let lut_pins = if l6_mode {
                    plan_fused(&demands, &mut pins)
                } else {
                    plan_split(&demands, &mut pins)
                };
                if let Some(lut_pins) = lut_pins {
                    plan.lut_pins = lut_pins;
                    for h in 0..2 {
                        plan.ef_pins[h] = ef_nets[h].map(|_| if h == 0 { ef0 } else { ef1 });
                    }
                    return Some(plan);
                }
            }
        }
        None
    }

    /// Applies the input plan of an ALM: sets its LUT mode, maps every LUT
    /// input to its bel pins, and reserves the E/F selectors and flip-flop
    /// data inputs for their planned drivers.
    pub fn reassign_alm_inputs(&mut self, lab: u32, alm: u8) -> Result<(), ArchError> {
        let plan = self
            .plan_alm_inputs(lab, alm)
            .ok_or(ArchError::IllegalAlm { lab, alm })?;
        let (luts, _) = self.alm_cells(lab, alm);
        let info = self.labs[lab as usize].alms[alm as usize].clone();
        let pos = self.labs[lab as usize].pos;
        self.labs[lab as usize].alms[alm as usize].l6_mode = plan.l6_mode;

        for (h, cell) in luts.iter().enumerate() {
            let Some(cell) = *cell else { continue };
            let cell_info = self.netlist.cell_mut(cell);
            for (k, port) in LUT_INPUT_PORTS.iter().enumerate() {
                if !cell_info.ports.contains_key(port) {
                    continue;
                }
                cell_info.pin_data.entry(*port).or_default().bel_pins = plan.bel_pins(h, k);
            }
            if cell_info.ports.contains_key(&id::Q) {
                cell_info.pin_data.entry(id::Q).or_default().bel_pins = vec![id::COMBOUT];
            }
        }

        for h in 0..2 {
            self.clear_reservation(info.sel_ef[h])?;
            if let Some(pin) = plan.ef_pins[h] {
                let src = self.require_port(BlockType::Lab, pos.x(), pos.y(), alm as i32, ALM_INPUT_PINS[pin].1, -1)?;
                self.reserve_route(src, info.sel_ef[h])?;
            }
        }
        for (i, src) in plan.ff_src.iter().enumerate() {
            let dst = info.ff_in[i];
            self.clear_reservation(dst)?;
            match src {
                FfDataSource::Comb => self.reserve_route(info.comb_out[i / 2], dst)?,
                FfDataSource::Ef => self.reserve_route(info.sel_ef[i / 2], dst)?,
                FfDataSource::None => {}
            }
        }
        Ok(())
    }

    /// Builds the 64-bit truth table of an ALM from its LUT cells' tables and
    /// current bel-pin mapping. Call after [`Self::reassign_alm_inputs`].
    ///
    /// Tied inputs read as their constant and inverted inputs are flipped
    /// before indexing the cell's table.
    pub fn compute_lut_mask(&self, lab: u32, alm: u8) -> Result<u64, ArchError> {
        let (luts, _) = self.alm_cells(lab, alm);
        let l6_mode = self.labs[lab as usize].alms[alm as usize].l6_mode;
        let mut mask = 0u64;
        for (h, cell) in luts.iter().enumerate() {
            let Some(cell) = *cell else { continue };
            let info = self.netlist.cell(cell);
            let ci = &info.comb_info;

            let mut inputs = Vec::with_capacity(ci.lut_input_count as usize);
            for (k, port) in LUT_INPUT_PORTS.iter().enumerate().take(ci.lut_input_count as usize) {
                let state = info.pin_state(*port);
                let source = match state {
                    PinState::Tied0 => LutInput::Const(false),
                    PinState::Tied1 => LutInput::Const(true),
                    _ if ci.lut_inputs[k].is_none() => LutInput::Const(false),
                    _ => {
                        let pin = self
                            .get_bel_pins_for_cell_pin(cell, *port)
                            .first()
                            .copied()
                            .and_then(|p| address_bit(l6_mode, h, p))
                            .ok_or(ArchError::IllegalAlm { lab, alm })?;
                        LutInput::Addr(pin, state == PinState::Inverted)
                    }
                };
                inputs.push(source);
            }

            let (addresses, offset) = if l6_mode { (64u32, 0) } else { (32, 32 * h as u32) };
            for addr in 0..addresses {
                let mut index = 0u32;
                for (k, input) in inputs.iter().enumerate() {
                    let bit = match *input {
                        LutInput::Const(v) => v,
                        LutInput::Addr(b, inv) => ((addr >> b) & 1 == 1) != inv,
                    };
                    index |= (bit as u32) << k;
                }
                if (ci.init >> index) & 1 == 1 {
                    mask |= 1u64 << (addr + offset);
                }
            }
        }
        Ok(mask)
    }
}

#[derive(Clone, Copy)]
enum LutInput {
    Const(bool),
    Addr(u32, bool),
}

/// The address bit a bel pin drives, in the given mode and half.
fn address_bit(l6_mode: bool, half: usize, pin: Ident) -> Option<u32> {
    let p = ALM_INPUT_PINS.iter().position(|(name, _)| *name == pin)?;
    if l6_mode {
        FUSED_PINS.iter().position(|pins| pins.contains(&p)).map(|k| k as u32)
    } else {
        HALF_PINS[half].iter().position(|&q| q == p).map(|b| b as u32)
    }
}

fn plan_fused(demands: &[Option<LutDemand>; 2], pins: &mut PinNets) -> Option<[[Option<usize>; 6]; 2]> {
    let mut out = [[None; 6]; 2];
    for (h, demand) in demands.iter().enumerate() {
        let Some(demand) = demand else { continue };
        for (k, net) in demand.inputs.iter().enumerate() {
            let Some(net) = *net else { continue };
            for &p in FUSED_PINS[k] {
                if !pins.claim(p, net) {
                    return None;
                }
            }
            out[h][k] = Some(FUSED_PINS[k][0]);
        }
    }
    Some(out)
}

/// Split mode: nets used by both halves go on `A`/`B` while those are free,
/// then each half fills its private pins before falling back to a free
/// shared one. A common net that found no shared pin lands on a private pin
/// of each half.
fn plan_split(demands: &[Option<LutDemand>; 2], pins: &mut PinNets) -> Option<[[Option<usize>; 6]; 2]> {
    let nets = |h: usize| -> Vec<NetId> {
        demands[h]
            .as_ref()
            .map(|d| d.inputs.iter().flatten().copied().collect())
            .unwrap_or_default()
    };
    let (nets0, nets1) = (nets(0), nets(1));
    for &net in &nets0 {
        if !nets1.contains(&net) || pins.find(&[PIN_A, PIN_B], net).is_some() {
            continue;
        }
        if let Some(pin) = [PIN_A, PIN_B].into_iter().find(|&p| pins.0[p].is_none()) {
            pins.claim(pin, net);
        }
    }

    let mut out = [[None; 6]; 2];
    for (h, demand) in demands.iter().enumerate() {
        let Some(demand) = demand else { continue };
        let visible = HALF_PINS[h];
        let order = [visible[2], visible[3], visible[4], PIN_A, PIN_B];
        for (k, net) in demand.inputs.iter().enumerate() {
            let Some(net) = *net else { continue };
            let pin = match pins.find(&visible, net) {
                Some(p) => p,
                None => {
                    let p = order.into_iter().find(|&p| pins.0[p].is_none())?;
                    pins.claim(p, net);
                    p
                }
            };
            out[h][k] = Some(pin);
        }
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arch::ArchArgs;
    use crate::ids::{BelId, PortDir};
    use crate::netlist::Property;

    fn arch() -> Arch {
        Arch::new(ArchArgs::for_grid(4, 3)).unwrap()
    }

    fn lut(arch: &mut Arch, name: &str, cell_type: Ident, inputs: &[NetId], init: u64) -> CellId {
        let cell = arch.create_cell(name, cell_type);
        for (port, &net) in LUT_INPUT_PORTS.iter().zip(inputs) {
            arch.netlist.add_port(cell, *port, PortDir::In);
            arch.netlist.connect_port(cell, *port, net).unwrap();
        }
        let out = arch.create_net(&format!("{name}_q"));
        arch.netlist.add_port(cell, id::Q, PortDir::Out);
        arch.netlist.connect_port(cell, id::Q, out).unwrap();
        arch.netlist.cell_mut(cell).params.insert(id::LUT, Property::Int(init));
        cell
    }

    fn nets(arch: &mut Arch, prefix: &str, n: usize) -> Vec<NetId> {
        (0..n).map(|i| arch.create_net(&format!("{prefix}{i}"))).collect()
    }

    fn comb_bel(arch: &Arch, alm: usize, half: usize) -> BelId {
        arch.labs()[0].alms[alm].lut_bels[half].unwrap()
    }

    #[test]
    fn six_input_lut_is_fused() {
        let mut arch = arch();
        let ins = nets(&mut arch, "i", 6);
        let cell = lut(&mut arch, "l6", id::MISTRAL_ALUT6, &ins, 0x8000_0000_0000_0001);
        arch.bind_bel(comb_bel(&arch, 0, 0), cell).unwrap();
        let plan = arch.plan_alm_inputs(0, 0).unwrap();
        assert!(plan.l6_mode);
        assert_eq!(plan.bel_pins(0, 4), vec![id::E0, id::E1]);

        arch.reassign_alm_inputs(0, 0).unwrap();
        assert!(arch.labs()[0].alms[0].l6_mode);
        assert_eq!(arch.get_bel_pins_for_cell_pin(cell, id::F), &[id::F0, id::F1]);
        assert_eq!(arch.compute_lut_mask(0, 0).unwrap(), 0x8000_0000_0000_0001);
    }

    #[test]
    fn six_input_lut_cannot_share() {
        let mut arch = arch();
        let ins = nets(&mut arch, "i", 6);
        let big = lut(&mut arch, "l6", id::MISTRAL_ALUT6, &ins, 0);
        let small = lut(&mut arch, "l2", id::MISTRAL_ALUT2, &ins[..2], 0b0110);
        arch.bind_bel(comb_bel(&arch, 1, 0), big).unwrap();
        arch.bind_bel(comb_bel(&arch, 1, 1), small).unwrap();
        assert!(arch.plan_alm_inputs(0, 1).is_none());
        assert!(!arch.is_alm_legal(0, 1));
        assert!(matches!(
            arch.reassign_alm_inputs(0, 1),
            Err(ArchError::IllegalAlm { lab: 0, alm: 1 })
        ));
    }

    #[test]
    fn split_halves_fit_in_eight_pins() {
        let mut arch = arch();
        let shared = nets(&mut arch, "s", 2);
        let own = nets(&mut arch, "o", 6);
        let l0 = lut(&mut arch, "l0", id::MISTRAL_ALUT5, &[shared[0], shared[1], own[0], own[1], own[2]], 0);
        let l1 = lut(&mut arch, "l1", id::MISTRAL_ALUT5, &[shared[1], shared[0], own[3], own[4], own[5]], 0);
        arch.bind_bel(comb_bel(&arch, 2, 0), l0).unwrap();
        arch.bind_bel(comb_bel(&arch, 2, 1), l1).unwrap();
        let plan = arch.plan_alm_inputs(0, 2).unwrap();
        assert!(!plan.l6_mode);
        assert_eq!(plan.lut_pins[0], [Some(PIN_A), Some(PIN_B), Some(PIN_C), Some(PIN_E0), Some(PIN_F0), None]);
        assert_eq!(plan.lut_pins[1][..2], [Some(PIN_B), Some(PIN_A)]);
    }

    #[test]
    fn third_common_net_uses_private_pins() {
        let mut arch = arch();
        let n = nets(&mut arch, "n", 5);
        let l0 = lut(&mut arch, "l0", id::MISTRAL_ALUT4, &[n[0], n[1], n[2], n[3]], 0x1234);
        let l1 = lut(&mut arch, "l1", id::MISTRAL_ALUT4, &[n[0], n[1], n[2], n[4]], 0xbeef);
        let alm = &arch.labs()[1].alms[0];
        let (bel0, bel1) = (alm.lut_bels[0].unwrap(), alm.lut_bels[1].unwrap());
        arch.bind_bel(bel0, l0).unwrap();
        arch.bind_bel(bel1, l1).unwrap();
        assert!(arch.is_alm_legal(1, 0));

        let plan = arch.plan_alm_inputs(1, 0).unwrap();
        assert_eq!(plan.lut_pins[0][..4], [Some(PIN_A), Some(PIN_B), Some(PIN_C), Some(PIN_E0)]);
        assert_eq!(plan.lut_pins[1][..4], [Some(PIN_A), Some(PIN_B), Some(PIN_D), Some(PIN_E1)]);

        arch.reassign_alm_inputs(1, 0).unwrap();
        assert_eq!(arch.compute_lut_mask(1, 0).unwrap(), 0xbeef_beef_1234_1234);
    }

    #[test]
    fn too_many_distinct_inputs_is_illegal() {
        let mut arch = arch();
        let a = nets(&mut arch, "a", 5);
        let b = nets(&mut arch, "b", 5);
        let l0 = lut(&mut arch, "l0", id::MISTRAL_ALUT5, &a, 0);
        let l1 = lut(&mut arch, "l1", id::MISTRAL_ALUT5, &b, 0);
        arch.bind_bel(comb_bel(&arch, 3, 0), l0).unwrap();
        arch.bind_bel(comb_bel(&arch, 3, 1), l1).unwrap();
        assert!(!arch.is_alm_legal(0, 3));
    }

    #[test]
    fn ff_fed_from_its_own_lut_uses_combout() {
        let mut arch = arch();
        let ins = nets(&mut arch, "i", 4);
        let l0 = lut(&mut arch, "l0", id::MISTRAL_ALUT4, &ins, 0xfffe);
        let q = arch.netlist.cell(l0).get_net(id::Q).unwrap();
        let ff = arch.create_cell("ff", id::MISTRAL_FF);
        arch.netlist.add_port(ff, id::DATAIN, PortDir::In);
        arch.netlist.connect_port(ff, id::DATAIN, q).unwrap();
        arch.bind_bel(comb_bel(&arch, 4, 0), l0).unwrap();
        let ff_bel = arch.labs()[0].alms[4].ff_bels[1].unwrap();
        arch.bind_bel(ff_bel, ff).unwrap();

        let plan = arch.plan_alm_inputs(0, 4).unwrap();
        assert_eq!(plan.ff_src[1], FfDataSource::Comb);
        assert_eq!(plan.ef_pins, [None, None]);
        arch.reassign_alm_inputs(0, 4).unwrap();
        let alm = &arch.labs()[0].alms[4];
        assert_eq!(arch.reserved_uphill(alm.ff_in[1]), Some(alm.comb_out[0]));
    }

    #[test]
    fn external_ff_data_takes_an_ef_pin() {
        let mut arch = arch();
        let d = arch.create_net("d");
        let ff = arch.create_cell("ff", id::MISTRAL_FF);
        arch.netlist.add_port(ff, id::DATAIN, PortDir::In);
        arch.netlist.connect_port(ff, id::DATAIN, d).unwrap();
        let ff_bel = arch.labs()[0].alms[5].ff_bels[2].unwrap();
        arch.bind_bel(ff_bel, ff).unwrap();

        let plan = arch.plan_alm_inputs(0, 5).unwrap();
        assert_eq!(plan.ff_src[2], FfDataSource::Ef);
        assert_eq!(plan.ef_pins[1], Some(PIN_E1));
        arch.reassign_alm_inputs(0, 5).unwrap();
        let alm = &arch.labs()[0].alms[5];
        assert_eq!(arch.reserved_uphill(alm.ff_in[2]), Some(alm.sel_ef[1]));
        let pin_wire = arch.get_bel_pin_wire(alm.lut_bels[1].unwrap(), id::E1).unwrap();
        assert_eq!(arch.reserved_uphill(alm.sel_ef[1]), Some(pin_wire));
    }

    #[test]
    fn ef_falls_back_to_the_mirrored_f_pin() {
        let mut arch = arch();
        let ins = nets(&mut arch, "i", 5);
        // the top LUT fills C, E0 and F0 so the top FF's E/F feed must use F1
        let l0 = lut(&mut arch, "l0", id::MISTRAL_ALUT5, &ins, 0);
        let d = arch.create_net("d");
        let ff = arch.create_cell("ff", id::MISTRAL_FF);
        arch.netlist.add_port(ff, id::DATAIN, PortDir::In);
        arch.netlist.connect_port(ff, id::DATAIN, d).unwrap();
        arch.bind_bel(comb_bel(&arch, 6, 0), l0).unwrap();
        arch.bind_bel(arch.labs()[0].alms[6].ff_bels[0].unwrap(), ff).unwrap();
        let plan = arch.plan_alm_inputs(0, 6).unwrap();
        assert_eq!(plan.ef_pins[0], Some(PIN_F1));
        assert!(plan.lut_pins[0].iter().flatten().all(|&p| p != PIN_F1));
    }

    #[test]
    fn two_ef_nets_in_one_half_is_illegal() {
        let mut arch = arch();
        let (d0, d1) = (arch.create_net("d0"), arch.create_net("d1"));
        for (i, d) in [d0, d1].into_iter().enumerate() {
            let ff = arch.create_cell(&format!("ff{i}"), id::MISTRAL_FF);
            arch.netlist.add_port(ff, id::DATAIN, PortDir::In);
            arch.netlist.connect_port(ff, id::DATAIN, d).unwrap();
            arch.bind_bel(arch.labs()[0].alms[7].ff_bels[i].unwrap(), ff).unwrap();
        }
        assert!(arch.plan_alm_inputs(0, 7).is_none());
    }

    #[test]
    fn tied_and_inverted_inputs_in_mask() {
        let mut arch = arch();
        let ins = nets(&mut arch, "i", 2);
        // AND2
        let cell = lut(&mut arch, "and", id::MISTRAL_ALUT2, &ins, 0b1000);
        arch.bind_bel(comb_bel(&arch, 8, 0), cell).unwrap();
        arch.reassign_alm_inputs(0, 8).unwrap();
        // private pins are filled first: A lands on C (bit 2), B on E0 (bit 3)
        assert_eq!(arch.get_bel_pins_for_cell_pin(cell, id::A), &[id::C]);
        assert_eq!(arch.get_bel_pins_for_cell_pin(cell, id::B), &[id::E0]);
        let bit = |addr: u64, b: u64| (addr >> b) & 1 == 1;
        let and_mask = arch.compute_lut_mask(0, 8).unwrap();
        for addr in 0..32u64 {
            assert_eq!((and_mask >> addr) & 1, u64::from(bit(addr, 2) && bit(addr, 3)));
        }
        assert_eq!(and_mask >> 32, 0);

        arch.netlist.cell_mut(cell).pin_data.entry(id::B).or_default().state = PinState::Inverted;
        let mask = arch.compute_lut_mask(0, 8).unwrap();
        for addr in 0..32u64 {
            assert_eq!((mask >> addr) & 1, u64::from(bit(addr, 2) && !bit(addr, 3)));
        }

        arch.netlist.disconnect_port(cell, id::B);
        arch.netlist.cell_mut(cell).pin_data.entry(id::B).or_default().state = PinState::Tied1;
        arch.assign_comb_info(cell).unwrap();
        arch.reassign_alm_inputs(0, 8).unwrap();
        let mask = arch.compute_lut_mask(0, 8).unwrap();
        for addr in 0..32u64 {
            assert_eq!((mask >> addr) & 1, u64::from(bit(addr, 2)));
        }
    }

    #[test]
    fn unmapped_input_is_reported() {
        let mut arch = arch();
        let ins = nets(&mut arch, "i", 4);
        let cell = lut(&mut arch, "l", id::MISTRAL_ALUT4, &ins, 0);
        arch.bind_bel(comb_bel(&arch, 9, 1), cell).unwrap();
        arch.netlist.cell_mut(cell).pin_data.entry(id::C).or_default().bel_pins = vec![id::C];
        // C is only addressable from the top half
        assert!(matches!(
            arch.compute_lut_mask(0, 9),
            Err(ArchError::IllegalAlm { .. })
        ));
    }
}
