//! Lazy pip views over the wire graph.
//!
//! Both iterators borrow the graph's adjacency lists and build each
//! [`PipId`] only when it is yielded. They are finite and `Clone`, and a fresh
//! view can be requested at any time to restart the walk. Order is stable as
//! long as the graph is not modified.

use crate::ids::{PipId, WireId};
use crate::wire::{WireGraph, WireInfo};

/// Pips entering or leaving one wire.
#[derive(Clone, Debug)]
pub struct UpDownhillPips<'a> {
    neighbours: std::slice::Iter<'a, WireId>,
    wire: WireId,
    is_uphill: bool,
}

impl<'a> UpDownhillPips<'a> {
    /// Pips driving `wire`, one per uphill neighbour.
    pub fn uphill(info: &'a WireInfo, wire: WireId) -> Self {
        Self {
            neighbours: info.wires_uphill.iter(),
            wire,
            is_uphill: true,
        }
    }

    /// Pips driven by `wire`, one per downhill neighbour.
    pub fn downhill(info: &'a WireInfo, wire: WireId) -> Self {
        Self {
            neighbours: info.wires_downhill.iter(),
            wire,
            is_uphill: false,
        }
    }
}

impl Iterator for UpDownhillPips<'_> {
    type Item = PipId;

    fn next(&mut self) -> Option<PipId> {
        let other = *self.neighbours.next()?;
        Some(if self.is_uphill {
            PipId::new(other, self.wire)
        } else {
            PipId::new(self.wire, other)
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.neighbours.size_hint()
    }
}

impl ExactSizeIterator for UpDownhillPips<'_> {}

/// Every pip of the device: for each wire in graph order, its uphill pips in
/// uphill-list order. Wires without uphill neighbours are skipped.
#[derive(Clone, Debug)]
pub struct AllPips<'a> {
    wires: indexmap::map::Iter<'a, WireId, WireInfo>,
    current: Option<(WireId, std::slice::Iter<'a, WireId>)>,
}

impl<'a> AllPips<'a> {
    /// Starts a walk over `graph`.
    pub fn new(graph: &'a WireGraph) -> Self {
        Self {
            wires: graph.iter(),
            current: None,
        }
    }
}

impl Iterator for AllPips<'_> {
    type Item = PipId;

    fn next(&mut self) -> Option<PipId> {
        loop {
            if let Some((dst, uphill)) = &mut self.current {
                if let Some(&src) = uphill.next() {
                    return Some(PipId::new(src, *dst));
                }
            }
            let (&dst, info) = self.wires.next()?;
            self.current = Some((dst, info.wires_uphill.iter()));
        }
    }
}

impl std::iter::FusedIterator for AllPips<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::RNode;
    use std::collections::HashSet;

    fn w(z: u32) -> WireId {
        WireId(RNode::new(2, 1, 1, z))
    }

    fn graph() -> WireGraph {
        let mut g = WireGraph::new();
        // w0 has no uphill pips and comes first, so the walk must skip it
        g.add_pip(w(0), w(1));
        g.add_pip(w(0), w(2));
        g.add_pip(w(1), w(2));
        g.add_pip(w(2), w(3));
        g.entry(w(4));
        g
    }

    #[test]
    fn uphill_and_downhill() {
        let g = graph();
        let up: Vec<PipId> = UpDownhillPips::uphill(g.get(w(2)).unwrap(), w(2)).collect();
        assert_eq!(up, vec![PipId::new(w(0), w(2)), PipId::new(w(1), w(2))]);
        let down = UpDownhillPips::downhill(g.get(w(0)).unwrap(), w(0));
        assert_eq!(down.len(), 2);
        assert!(down.clone().all(|p| p.src == w(0).node()));
    }

    #[test]
    fn all_pips_visits_each_once() {
        let g = graph();
        let pips: Vec<PipId> = AllPips::new(&g).collect();
        assert_eq!(pips.len(), g.pip_count());
        let unique: HashSet<PipId> = pips.iter().copied().collect();
        assert_eq!(unique.len(), pips.len());
        assert_eq!(pips[0], PipId::new(w(0), w(1)));
    }

    #[test]
    fn all_pips_is_restartable() {
        let g = graph();
        let first: Vec<PipId> = AllPips::new(&g).collect();
        let second: Vec<PipId> = AllPips::new(&g).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn empty_graph_has_no_pips() {
        let g = WireGraph::new();
        assert_eq!(AllPips::new(&g).count(), 0);
    }
}
