//! LAB control-set legality and assignment.
//!
//! Every flip-flop of a LAB draws its clock, enable and asynchronous clear
//! through a per-half selector in its ALM, and each selector can only pick one
//! of the LAB's shared wires: three clocks, three enables and two clears.
//! Synchronous clear and load go to one LAB-wide wire each. A LAB is legal
//! when the distinct signals its flip-flops demand fit those budgets.
//!
//! A signal and its inverse need separate shared wires unless the flip-flop
//! pin can invert in place, which [`CellPinStyle::can_invert`] only allows for
//! clocks.
//!
//! [`CellPinStyle::can_invert`]: crate::pins::CellPinStyle::can_invert

use crate::arch::{Arch, CODE_CTRL_SLOT};
use crate::constids as id;
use crate::error::ArchError;
use crate::ids::{CellId, NetId, WireId};
use crate::netlist::{ControlSig, FfControlSet};
use crate::pins::cell_pin_style;
use cinder_common::{Ident, InternalError};
use cinder_diagnostics::Diagnostic;
use std::collections::HashMap;
use std::fmt;

/// A category of flip-flop control signal.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum CtrlKind {
    /// Clock.
    Clk,
    /// Clock enable.
    Ena,
    /// Asynchronous clear.
    Aclr,
    /// Synchronous clear.
    Sclr,
    /// Synchronous load.
    Sload,
}

impl CtrlKind {
    /// All categories, in slot-assignment order.
    pub const ALL: [CtrlKind; 5] = [
        CtrlKind::Clk,
        CtrlKind::Ena,
        CtrlKind::Aclr,
        CtrlKind::Sclr,
        CtrlKind::Sload,
    ];

    /// The flip-flop port carrying this signal.
    pub fn port(self) -> Ident {
        match self {
            CtrlKind::Clk => id::CLK,
            CtrlKind::Ena => id::ENA,
            CtrlKind::Aclr => id::ACLR,
            CtrlKind::Sclr => id::SCLR,
            CtrlKind::Sload => id::SLOAD,
        }
    }

    /// Number of shared LAB wires for this category.
    pub fn limit(self) -> usize {
        match self {
            CtrlKind::Clk | CtrlKind::Ena => 3,
            CtrlKind::Aclr => 2,
            CtrlKind::Sclr | CtrlKind::Sload => 1,
        }
    }

    /// Whether the shared wires of this category have a dedicated input
    /// (global clock or clear) ahead of the general data lines.
    pub fn has_dedicated_input(self) -> bool {
        matches!(self, CtrlKind::Clk | CtrlKind::Aclr)
    }

    /// Picks this category's signal out of a control set.
    pub fn signal(self, ctrlset: &FfControlSet) -> ControlSig {
        match self {
            CtrlKind::Clk => ctrlset.clk,
            CtrlKind::Ena => ctrlset.ena,
            CtrlKind::Aclr => ctrlset.aclr,
            CtrlKind::Sclr => ctrlset.sclr,
            CtrlKind::Sload => ctrlset.sload,
        }
    }

    /// The value a signal is counted under when deduplicating shared wires.
    ///
    /// Pins that invert in place share one wire between both polarities.
    pub fn slot_key(self, sig: ControlSig) -> ControlSig {
        if cell_pin_style(id::MISTRAL_FF, self.port()).can_invert() {
            ControlSig::new(sig.net, false)
        } else {
            sig
        }
    }
}

impl fmt::Display for CtrlKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CtrlKind::Clk => "CLK",
            CtrlKind::Ena => "ENA",
            CtrlKind::Aclr => "ACLR",
            CtrlKind::Sclr => "SCLR",
            CtrlKind::Sload => "SLOAD",
        })
    }
}

/// The signal bound to each shared control wire of a LAB.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct CtrlSlots {
    clk: [Option<ControlSig>; 3],
    ena: [Option<ControlSig>; 3],
    aclr: [Option<ControlSig>; 2],
    sclr: [Option<ControlSig>; 1],
    sload: [Option<ControlSig>; 1],
}

impl CtrlSlots {
    /// The slots of one category, indexed like the LAB's shared wires.
    pub fn slots(&self, kind: CtrlKind) -> &[Option<ControlSig>] {
        match kind {
            CtrlKind::Clk => &self.clk,
            CtrlKind::Ena => &self.ena,
            CtrlKind::Aclr => &self.aclr,
            CtrlKind::Sclr => &self.sclr,
            CtrlKind::Sload => &self.sload,
        }
    }

    fn slots_mut(&mut self, kind: CtrlKind) -> &mut [Option<ControlSig>] {
        match kind {
            CtrlKind::Clk => &mut self.clk,
            CtrlKind::Ena => &mut self.ena,
            CtrlKind::Aclr => &mut self.aclr,
            CtrlKind::Sclr => &mut self.sclr,
            CtrlKind::Sload => &mut self.sload,
        }
    }

    /// The slot already holding `key`.
    pub fn find(&self, kind: CtrlKind, key: ControlSig) -> Option<usize> {
        self.slots(kind).iter().position(|s| *s == Some(key))
    }

    /// Returns the slot holding `key`, binding it to the first free slot if it
    /// has none yet. `None` when every slot holds another signal.
    pub fn bind(&mut self, kind: CtrlKind, key: ControlSig) -> Option<usize> {
        if let Some(slot) = self.find(kind, key) {
            return Some(slot);
        }
        let slots = self.slots_mut(kind);
        let slot = slots.iter().position(Option::is_none)?;
        slots[slot] = Some(key);
        Some(slot)
    }

    /// Number of bound slots in a category.
    pub fn used(&self, kind: CtrlKind) -> usize {
        self.slots(kind).iter().flatten().count()
    }
}

impl Arch {
    /// Flip-flop cells placed in a LAB, in ALM then flip-flop order.
    fn lab_ff_cells(&self, lab: u32) -> Vec<(usize, usize, CellId)> {
        let mut cells = Vec::new();
        for (a, alm) in self.labs[lab as usize].alms.iter().enumerate() {
            for (i, bel) in alm.ff_bels.iter().enumerate() {
                if let Some(cell) = bel.and_then(|b| self.bound_bel_cell(b)) {
                    cells.push((a, i, cell));
                }
            }
        }
        cells
    }

    /// Deduplicates the control signals of every flip-flop in a LAB into
    /// slots, failing with the first category that overflows.
    fn bind_lab_ctrl_slots(&self, lab: u32) -> Result<CtrlSlots, CtrlKind> {
        let mut slots = CtrlSlots::default();
        for (_, _, cell) in self.lab_ff_cells(lab) {
            let ctrlset = self.netlist.cell(cell).ff_info.ctrlset;
            for kind in CtrlKind::ALL {
                let sig = kind.signal(&ctrlset);
                if sig.net.is_none() {
                    continue;
                }
                if slots.bind(kind, kind.slot_key(sig)).is_none() {
                    return Err(kind);
                }
            }
        }
        Ok(slots)
    }

    /// Returns `true` if the distinct control signals of the LAB's flip-flops
    /// fit its shared wires.
    pub fn is_lab_ctrlset_legal(&self, lab: u32) -> bool {
        self.bind_lab_ctrl_slots(lab).is_ok()
    }

    /// Binds each distinct control signal of the LAB to a shared wire and
    /// pins every ALM selector and shared wire to its driver.
    ///
    /// Existing reservations of the LAB's control wires are cleared first, so
    /// the call can be repeated after the LAB's contents change. Slots are
    /// taken first-available in ALM order. A shared wire carrying a global net
    /// is fed from its dedicated clock or clear input. Any other reuses the LAB
    /// data line already carrying its net, or takes a free one; when all four
    /// carry other nets the wire is left unreserved and a warning is logged.
    pub fn assign_control_sets(&mut self, lab: u32) -> Result<(), ArchError> {
        let slots = self
            .bind_lab_ctrl_slots(lab)
            .map_err(|kind| ArchError::ControlSetOverflow {
                lab,
                kind,
                limit: kind.limit(),
            })?;

        let info = &self.labs[lab as usize];
        let mut to_clear: Vec<WireId> = Vec::new();
        for kind in CtrlKind::ALL {
            to_clear.extend_from_slice(info.shared_wires(kind));
        }
        for alm in &info.alms {
            to_clear.extend(alm.sel_clk.iter().chain(&alm.sel_ena).chain(&alm.sel_aclr));
        }
        for wire in to_clear {
            self.clear_reservation(wire)?;
        }

        let mut reservations: Vec<(WireId, WireId)> = Vec::new();
        let info = &self.labs[lab as usize];
        for (a, i, cell) in self.lab_ff_cells(lab) {
            let ctrlset = self.netlist.cell(cell).ff_info.ctrlset;
            let alm = &info.alms[a];
            for kind in [CtrlKind::Clk, CtrlKind::Ena, CtrlKind::Aclr] {
                let sig = kind.signal(&ctrlset);
                if sig.net.is_none() {
                    continue;
                }
                let slot = slots.find(kind, kind.slot_key(sig)).ok_or_else(|| {
                    InternalError::new(format!("{kind} signal of LAB {lab} lost its slot"))
                })?;
                if let Some(sel) = alm.selector_wires(kind) {
                    reservations.push((info.shared_wires(kind)[slot], sel[i / 2]));
                }
            }
        }
        // data line -> the net it carries
        let mut lines: HashMap<WireId, NetId> = HashMap::new();
        for kind in CtrlKind::ALL {
            for (slot, sig) in slots.slots(kind).iter().enumerate() {
                let Some(sig) = sig else { continue };
                let Some(net) = sig.net else { continue };
                let shared = info.shared_wires(kind)[slot];
                let uphill = &self.wire_info(shared)?.wires_uphill;
                let dedicated = usize::from(kind.has_dedicated_input());
                let source = if dedicated == 1 && self.netlist.net(net).is_global {
                    uphill.first().copied()
                } else {
                    let candidates = || uphill.iter().skip(dedicated).copied();
                    let line = candidates()
                        .find(|l| lines.get(l) == Some(&net))
                        .or_else(|| candidates().find(|l| !lines.contains_key(l)));
                    if let Some(line) = line {
                        lines.insert(line, net);
                    }
                    line
                };
                match source {
                    Some(source) => reservations.push((source, shared)),
                    None => self.log(
                        Diagnostic::warning(
                            CODE_CTRL_SLOT,
                            format!("no free data line for {kind}{slot} <- {}", self.ctrl_sig_label(*sig)),
                        )
                        .with_subject(format!("LAB {lab}")),
                    ),
                }
                if self.diagnostics.is_verbose() {
                    self.log(
                        Diagnostic::debug(
                            CODE_CTRL_SLOT,
                            format!("{kind}{slot} <- {}", self.ctrl_sig_label(*sig)),
                        )
                        .with_subject(format!("LAB {lab}")),
                    );
                }
            }
        }

        for (src, dst) in reservations {
            self.reserve_route(src, dst)?;
        }
        self.labs[lab as usize].ctrl = slots;
        Ok(())
    }

    fn ctrl_sig_label(&self, sig: ControlSig) -> String {
        let name = sig
            .net
            .map(|n| self.name_of(self.netlist.net(n).name).to_string())
            .unwrap_or_default();
        if sig.inverted {
            format!("!{name}")
        } else {
            name
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arch::ArchArgs;
    use crate::ids::{NetId, PortDir};

    fn sig(n: u32, inverted: bool) -> ControlSig {
        ControlSig::new(Some(NetId::from_raw(n)), inverted)
    }

    #[test]
    fn kind_display_and_limits() {
        assert_eq!(CtrlKind::Clk.to_string(), "CLK");
        assert_eq!(CtrlKind::Sload.to_string(), "SLOAD");
        let total: usize = CtrlKind::ALL.iter().map(|k| k.limit()).sum();
        assert_eq!(total, 10);
    }

    #[test]
    fn clock_polarity_shares_a_slot() {
        assert_eq!(CtrlKind::Clk.slot_key(sig(1, true)), sig(1, false));
        assert_eq!(CtrlKind::Ena.slot_key(sig(1, true)), sig(1, true));
        assert_eq!(CtrlKind::Aclr.slot_key(sig(1, true)), sig(1, true));
    }

    #[test]
    fn bind_is_first_available_and_deduplicates() {
        let mut slots = CtrlSlots::default();
        assert_eq!(slots.bind(CtrlKind::Aclr, sig(4, false)), Some(0));
        assert_eq!(slots.bind(CtrlKind::Aclr, sig(4, true)), Some(1));
        assert_eq!(slots.bind(CtrlKind::Aclr, sig(4, false)), Some(0));
        assert_eq!(slots.bind(CtrlKind::Aclr, sig(5, false)), None);
        assert_eq!(slots.used(CtrlKind::Aclr), 2);
        assert_eq!(slots.used(CtrlKind::Clk), 0);
        assert_eq!(slots.find(CtrlKind::Aclr, sig(4, true)), Some(1));
    }

    fn place_ff(arch: &mut Arch, lab_xy: (u32, u32), alm: u8, ff: u8, ports: &[(Ident, NetId)]) -> CellId {
        let cell = arch.create_cell(&format!("ff_{}_{}_{alm}_{ff}", lab_xy.0, lab_xy.1), id::MISTRAL_FF);
        for &(port, net) in ports {
            arch.netlist.add_port(cell, port, PortDir::In);
            arch.netlist.connect_port(cell, port, net).unwrap();
        }
        let bel_name = arch.parse_name(&format!("{}.{}.ALM{alm}_FF{ff}", lab_xy.0, lab_xy.1));
        let bel = arch.get_bel_by_name(&bel_name).unwrap();
        arch.bind_bel(bel, cell).unwrap();
        cell
    }

    #[test]
    fn enable_budget() {
        let mut arch = Arch::new(ArchArgs::for_grid(4, 3)).unwrap();
        let lab = arch.bel_info(arch.get_bel_by_name(&arch.parse_name("1.1.ALM0_FF0")).unwrap())
            .unwrap()
            .lab_data()
            .unwrap()
            .lab;
        let nets: Vec<NetId> = (0..4).map(|i| arch.create_net(&format!("en{i}"))).collect();
        for (alm, &net) in nets.iter().take(3).enumerate() {
            place_ff(&mut arch, (1, 1), alm as u8, 0, &[(id::ENA, net)]);
        }
        assert!(arch.is_lab_ctrlset_legal(lab));
        place_ff(&mut arch, (1, 1), 5, 2, &[(id::ENA, nets[3])]);
        assert!(!arch.is_lab_ctrlset_legal(lab));
        let err = arch.assign_control_sets(lab).unwrap_err();
        assert!(matches!(
            err,
            ArchError::ControlSetOverflow { kind: CtrlKind::Ena, limit: 3, .. }
        ));
    }

    #[test]
    fn sclr_alone_consumes_the_sload_wire() {
        let mut arch = Arch::new(ArchArgs::for_grid(4, 3)).unwrap();
        let r0 = arch.create_net("r0");
        let r1 = arch.create_net("r1");
        place_ff(&mut arch, (1, 1), 0, 0, &[(id::SCLR, r0)]);
        let bel = arch.get_bel_by_name(&arch.parse_name("1.1.ALM0_FF0")).unwrap();
        let lab = arch.bel_info(bel).unwrap().lab_data().unwrap().lab;
        assert!(arch.is_lab_ctrlset_legal(lab));
        place_ff(&mut arch, (1, 1), 1, 0, &[(id::SCLR, r1)]);
        assert!(!arch.is_lab_ctrlset_legal(lab));
    }

    #[test]
    fn assignment_reserves_selectors_and_sources() {
        let mut arch = Arch::new(ArchArgs::for_grid(4, 3)).unwrap();
        let clk = arch.create_net("clk");
        arch.netlist.net_mut(clk).is_global = true;
        let en = arch.create_net("en");
        place_ff(&mut arch, (2, 1), 3, 1, &[(id::CLK, clk), (id::ENA, en)]);
        let bel = arch.get_bel_by_name(&arch.parse_name("2.1.ALM3_FF1")).unwrap();
        let lab = arch.bel_info(bel).unwrap().lab_data().unwrap().lab;
        arch.assign_control_sets(lab).unwrap();

        let info = &arch.labs()[lab as usize];
        assert_eq!(info.ctrl.slots(CtrlKind::Clk)[0], Some(ControlSig::new(Some(clk), false)));
        let sel_clk = info.alms[3].sel_clk[0];
        assert_eq!(arch.reserved_uphill(sel_clk), Some(info.clk_wires[0]));
        let sel_ena = info.alms[3].sel_ena[0];
        assert_eq!(arch.reserved_uphill(sel_ena), Some(info.ena_wires[0]));
        // global clock comes from the dedicated input, the enable from DATAIN
        let clk_src = arch.reserved_uphill(info.clk_wires[0]).unwrap();
        assert_eq!(arch.wire_info(info.clk_wires[0]).unwrap().wires_uphill[0], clk_src);
        let ena_src = arch.reserved_uphill(info.ena_wires[0]).unwrap();
        assert!(!ena_src.node().is_synthetic());
        // the untouched half keeps a free selector
        assert_eq!(arch.reserved_uphill(info.alms[3].sel_clk[1]), None);
    }

    fn lab_at(arch: &Arch, x: u32, y: u32) -> u32 {
        let bel = arch.get_bel_by_name(&arch.parse_name(&format!("{x}.{y}.ALM0_FF0"))).unwrap();
        arch.bel_info(bel).unwrap().lab_data().unwrap().lab
    }

    #[test]
    fn local_clocks_take_distinct_data_lines() {
        let mut arch = Arch::new(ArchArgs::for_grid(4, 3)).unwrap();
        let c0 = arch.create_net("c0");
        let c1 = arch.create_net("c1");
        place_ff(&mut arch, (1, 1), 0, 0, &[(id::CLK, c0)]);
        place_ff(&mut arch, (1, 1), 1, 0, &[(id::CLK, c1), (id::ENA, c0)]);
        let lab = lab_at(&arch, 1, 1);
        arch.assign_control_sets(lab).unwrap();

        let info = &arch.labs()[lab as usize];
        let src0 = arch.reserved_uphill(info.clk_wires[0]).unwrap();
        let src1 = arch.reserved_uphill(info.clk_wires[1]).unwrap();
        assert_ne!(src0, src1);
        for src in [src0, src1] {
            assert_ne!(arch.wire_info(info.clk_wires[0]).unwrap().wires_uphill[0], src);
        }
        // c0 as an enable rides the line that already carries it
        assert_eq!(arch.reserved_uphill(info.ena_wires[0]), Some(src0));
        assert!(!arch.diagnostics.has_errors());
    }

    #[test]
    fn fifth_local_signal_is_left_unreserved() {
        let mut arch = Arch::new(ArchArgs::for_grid(4, 3)).unwrap();
        for (alm, name) in ["c0", "c1", "c2"].into_iter().enumerate() {
            let net = arch.create_net(name);
            place_ff(&mut arch, (1, 2), alm as u8, 0, &[(id::CLK, net)]);
        }
        for (alm, name) in [(3, "e0"), (4, "e1")] {
            let net = arch.create_net(name);
            place_ff(&mut arch, (1, 2), alm, 0, &[(id::ENA, net)]);
        }
        let lab = lab_at(&arch, 1, 2);
        assert!(arch.is_lab_ctrlset_legal(lab));
        arch.assign_control_sets(lab).unwrap();

        let info = &arch.labs()[lab as usize];
        let mut sources: Vec<WireId> = info
            .clk_wires
            .iter()
            .chain(&info.ena_wires[..1])
            .map(|&w| arch.reserved_uphill(w).unwrap())
            .collect();
        sources.sort();
        sources.dedup();
        assert_eq!(sources.len(), 4);
        assert_eq!(arch.reserved_uphill(info.ena_wires[1]), None);
        let warnings: Vec<_> = arch
            .diagnostics
            .diagnostics()
            .into_iter()
            .filter(|d| d.code == CODE_CTRL_SLOT)
            .collect();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].message, "no free data line for ENA1 <- e1");
    }

    #[test]
    fn debug_records_only_when_verbose() {
        let mut arch = Arch::new(ArchArgs {
            debug: true,
            ..ArchArgs::for_grid(4, 3)
        })
        .unwrap();
        let clk = arch.create_net("clk");
        place_ff(&mut arch, (1, 1), 0, 0, &[(id::CLK, clk)]);
        let bel = arch.get_bel_by_name(&arch.parse_name("1.1.ALM0_FF0")).unwrap();
        let lab = arch.bel_info(bel).unwrap().lab_data().unwrap().lab;
        arch.diagnostics.take_all();
        arch.assign_control_sets(lab).unwrap();
        let records = arch.diagnostics.take_all();
        assert!(records
            .iter()
            .any(|d| d.code == CODE_CTRL_SLOT && d.message == "CLK0 <- clk"));
    }
}
