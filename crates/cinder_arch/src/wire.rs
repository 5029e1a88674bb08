//! The wire graph: every routing wire with its adjacency and attached bel pins.
//!
//! Pips are not stored. A wire keeps the wires it drives (`wires_downhill`)
//! and the wires that drive it (`wires_uphill`); the pip views in
//! [`crate::pip`] synthesize [`PipId`]s from those lists on demand.

use crate::error::ArchError;
use crate::ids::{BelPin, PipId, WireId};
use cinder_common::Ident;
use indexmap::IndexMap;

/// Flag bit: the wire may only be driven by one reserved uphill neighbour.
pub const RESERVED_ROUTE: u64 = 0x100;
/// Mask of the flag bits holding the reserved uphill index.
pub const RESERVED_INDEX_MASK: u64 = 0xff;

/// Adjacency and metadata of one wire.
#[derive(Clone, Debug, Default)]
pub struct WireInfo {
    /// Name of a device-model created wire; empty for chip wires, whose names
    /// are derived from their routing node.
    pub name_override: Ident,
    /// Wires driven by this wire.
    pub wires_downhill: Vec<WireId>,
    /// Wires driving this wire.
    pub wires_uphill: Vec<WireId>,
    /// Bel pins attached to this wire.
    pub bel_pins: Vec<BelPin>,
    /// Flag bits, see [`RESERVED_ROUTE`].
    pub flags: u64,
}

impl WireInfo {
    /// Returns the reserved driver of this wire, if any.
    pub fn reserved_uphill(&self) -> Option<WireId> {
        if self.flags & RESERVED_ROUTE == 0 {
            return None;
        }
        self.wires_uphill
            .get((self.flags & RESERVED_INDEX_MASK) as usize)
            .copied()
    }
}

/// Owns every wire of the device, in insertion order.
#[derive(Clone, Debug, Default)]
pub struct WireGraph {
    wires: IndexMap<WireId, WireInfo>,
}

impl WireGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of wires.
    pub fn len(&self) -> usize {
        self.wires.len()
    }

    /// Returns `true` if the graph has no wires.
    pub fn is_empty(&self) -> bool {
        self.wires.is_empty()
    }

    /// Returns `true` if the wire exists.
    pub fn contains(&self, wire: WireId) -> bool {
        self.wires.contains_key(&wire)
    }

    /// Looks up a wire.
    pub fn get(&self, wire: WireId) -> Result<&WireInfo, ArchError> {
        self.wires.get(&wire).ok_or(ArchError::WireNotFound(wire))
    }

    /// Looks up a wire for modification.
    pub fn get_mut(&mut self, wire: WireId) -> Result<&mut WireInfo, ArchError> {
        self.wires.get_mut(&wire).ok_or(ArchError::WireNotFound(wire))
    }

    /// Returns the wire, creating an empty one if it does not exist yet.
    pub fn entry(&mut self, wire: WireId) -> &mut WireInfo {
        self.wires.entry(wire).or_default()
    }

    /// Iterates over all wires in insertion order.
    pub fn iter(&self) -> indexmap::map::Iter<'_, WireId, WireInfo> {
        self.wires.iter()
    }

    /// Iterates over all wire handles in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = WireId> + Clone + '_ {
        self.wires.keys().copied()
    }

    /// Adds a pip from `src` to `dst`, creating either wire if needed.
    pub fn add_pip(&mut self, src: WireId, dst: WireId) -> PipId {
        self.entry(src).wires_downhill.push(dst);
        self.entry(dst).wires_uphill.push(src);
        PipId::new(src, dst)
    }

    /// Returns `true` if `src` is an uphill neighbour of `dst`.
    pub fn wires_connected(&self, src: WireId, dst: WireId) -> bool {
        self.wires
            .get(&dst)
            .is_some_and(|info| info.wires_uphill.contains(&src))
    }

    /// Total number of pips, the sum of all uphill-list lengths.
    pub fn pip_count(&self) -> usize {
        self.wires.values().map(|w| w.wires_uphill.len()).sum()
    }

    /// Restricts `dst` so that only the pip from `src` may drive it.
    pub fn reserve_route(&mut self, src: WireId, dst: WireId) -> Result<(), ArchError> {
        let info = self.get_mut(dst)?;
        let idx = info
            .wires_uphill
            .iter()
            .position(|&w| w == src)
            .filter(|&i| i as u64 <= RESERVED_INDEX_MASK)
            .ok_or(ArchError::PipNotFound { src, dst })?;
        info.flags = (info.flags & !(RESERVED_ROUTE | RESERVED_INDEX_MASK)) | RESERVED_ROUTE | idx as u64;
        Ok(())
    }

    /// Removes any route reservation on `dst`.
    pub fn clear_reservation(&mut self, dst: WireId) -> Result<(), ArchError> {
        let info = self.get_mut(dst)?;
        info.flags &= !(RESERVED_ROUTE | RESERVED_INDEX_MASK);
        Ok(())
    }

    /// Returns `false` if the pip's destination is reserved for another driver.
    pub fn check_pip_avail(&self, pip: PipId) -> bool {
        match self.wires.get(&WireId(pip.dst)) {
            Some(info) => match info.reserved_uphill() {
                Some(src) => src == WireId(pip.src),
                None => true,
            },
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::RNode;

    fn w(z: u32) -> WireId {
        WireId(RNode::new(1, 0, 0, z))
    }

    #[test]
    fn new_wires_start_unnamed_and_unreserved() {
        let mut g = WireGraph::new();
        let info = g.entry(w(3));
        assert!(info.name_override.is_empty());
        assert_eq!(info.flags, 0);
        assert_eq!(info.reserved_uphill(), None);
    }

    #[test]
    fn add_pip_links_both_ends() {
        let mut g = WireGraph::new();
        let pip = g.add_pip(w(0), w(1));
        assert_eq!(pip, PipId::new(w(0), w(1)));
        assert_eq!(g.get(w(0)).unwrap().wires_downhill, vec![w(1)]);
        assert_eq!(g.get(w(1)).unwrap().wires_uphill, vec![w(0)]);
        assert!(g.wires_connected(w(0), w(1)));
        assert!(!g.wires_connected(w(1), w(0)));
        assert_eq!(g.pip_count(), 1);
    }

    #[test]
    fn unknown_wire_is_an_error() {
        let g = WireGraph::new();
        assert!(matches!(g.get(w(9)), Err(ArchError::WireNotFound(_))));
    }

    #[test]
    fn reservation_restricts_drivers() {
        let mut g = WireGraph::new();
        g.add_pip(w(0), w(2));
        g.add_pip(w(1), w(2));
        assert!(g.check_pip_avail(PipId::new(w(0), w(2))));
        assert!(g.check_pip_avail(PipId::new(w(1), w(2))));

        g.reserve_route(w(1), w(2)).unwrap();
        assert_eq!(g.get(w(2)).unwrap().reserved_uphill(), Some(w(1)));
        assert!(!g.check_pip_avail(PipId::new(w(0), w(2))));
        assert!(g.check_pip_avail(PipId::new(w(1), w(2))));

        g.clear_reservation(w(2)).unwrap();
        assert!(g.check_pip_avail(PipId::new(w(0), w(2))));
    }

    #[test]
    fn reserving_a_missing_pip_fails() {
        let mut g = WireGraph::new();
        g.add_pip(w(0), w(2));
        g.add_pip(w(3), w(4));
        assert!(matches!(
            g.reserve_route(w(3), w(2)),
            Err(ArchError::PipNotFound { .. })
        ));
    }

    #[test]
    fn insertion_order_is_kept() {
        let mut g = WireGraph::new();
        g.add_pip(w(5), w(3));
        g.entry(w(1));
        let order: Vec<WireId> = g.keys().collect();
        assert_eq!(order, vec![w(5), w(3), w(1)]);
    }
}
