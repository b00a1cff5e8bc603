//! Layout-time view over the host graph.
//!
//! Resolves the terminals an edge is *drawn* between (collapsed or hidden ancestors stand in for
//! their descendants, ports stand in for nothing and resolve to their owner) and lists the edges
//! that matter for one layout pass. Results are cached for the lifetime of the pass.

use crate::identity::CellMap;
use swimlane_graph::{CellId, HostGraph};

#[derive(Debug, Clone)]
pub struct GraphView {
    parent: CellId,
    traverse_ancestors: bool,
    edges_cache: CellMap<Vec<CellId>>,
    source_term_cache: CellMap<CellId>,
    target_term_cache: CellMap<CellId>,
}

impl GraphView {
    pub fn new(parent: CellId, traverse_ancestors: bool) -> Self {
        Self {
            parent,
            traverse_ancestors,
            edges_cache: CellMap::default(),
            source_term_cache: CellMap::default(),
            target_term_cache: CellMap::default(),
        }
    }

    pub fn parent(&self) -> CellId {
        self.parent
    }

    pub fn is_port<H: HostGraph + ?Sized>(host: &H, cell: CellId) -> bool {
        host.geometry(cell).is_some_and(|g| g.relative)
    }

    pub fn visible_terminal<H: HostGraph + ?Sized>(
        &mut self,
        host: &H,
        edge: CellId,
        source: bool,
    ) -> Option<CellId> {
        let cache = if source {
            &self.source_term_cache
        } else {
            &self.target_term_cache
        };
        if let Some(&term) = cache.get(&edge) {
            return Some(term);
        }

        let terminal = host.terminal(edge, source)?;
        let root = host.root();
        let mut best = terminal;
        let mut cur = Some(terminal);
        while let Some(c) = cur {
            if c == root {
                break;
            }
            if !host.is_visible(best) || host.is_collapsed(c) {
                best = c;
            }
            cur = host.parent(c);
        }
        if best == root || host.parent(best) == Some(root) || !host.contains(best) {
            return None;
        }
        if Self::is_port(host, best) {
            best = host.parent(best)?;
        }

        let cache = if source {
            &mut self.source_term_cache
        } else {
            &mut self.target_term_cache
        };
        cache.insert(edge, best);
        Some(best)
    }

    /// Edges relevant to `cell`: its own, those of its ports, and those of hidden children or of
    /// all children when it is collapsed. Edges whose far end lies outside the layout parent are
    /// dropped.
    pub fn edges<H: HostGraph + ?Sized>(&mut self, host: &H, cell: CellId) -> Vec<CellId> {
        if let Some(cached) = self.edges_cache.get(&cell) {
            return cached.clone();
        }

        let collapsed = host.is_collapsed(cell);
        let mut candidates: Vec<CellId> = Vec::new();
        for child in host.children(cell) {
            if Self::is_port(host, child) || collapsed || !host.is_visible(child) {
                candidates.extend(host.connected_edges(child));
            }
        }
        candidates.extend(host.connected_edges(cell));

        let mut result: Vec<CellId> = Vec::new();
        for edge in candidates {
            if result.contains(&edge) {
                continue;
            }
            let source = self.visible_terminal(host, edge, true);
            let target = self.visible_terminal(host, edge, false);
            let keep = source == target
                || (target == Some(cell) && source.is_some_and(|s| self.is_valid_ancestor(host, s)))
                || (source == Some(cell) && target.is_some_and(|t| self.is_valid_ancestor(host, t)));
            if keep {
                result.push(edge);
            }
        }

        self.edges_cache.insert(cell, result.clone());
        result
    }

    /// Edges from `source` to `target`; with `directed == false` also those running back.
    pub fn edges_between<H: HostGraph + ?Sized>(
        &mut self,
        host: &H,
        source: CellId,
        target: CellId,
        directed: bool,
    ) -> Vec<CellId> {
        let mut result = Vec::new();
        for edge in self.edges(host, source) {
            let src = self.visible_terminal(host, edge, true);
            let trg = self.visible_terminal(host, edge, false);
            if (src == Some(source) && trg == Some(target))
                || (!directed && src == Some(target) && trg == Some(source))
            {
                result.push(edge);
            }
        }
        result
    }

    /// Index of the first lane that contains `cell` at any depth.
    pub fn lane_of<H: HostGraph + ?Sized>(host: &H, lanes: &[CellId], cell: CellId) -> Option<usize> {
        lanes.iter().position(|&lane| host.is_ancestor(lane, cell))
    }

    fn is_valid_ancestor<H: HostGraph + ?Sized>(&self, host: &H, cell: CellId) -> bool {
        if self.traverse_ancestors {
            host.is_ancestor(self.parent, cell)
        } else {
            // Lane members only: children of the parent's direct children.
            host.parent(cell)
                .is_some_and(|p| p == self.parent || host.parent(p) == Some(self.parent))
        }
    }
}
