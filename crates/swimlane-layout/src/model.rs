//! The internal hierarchy model a layout pass operates on.
//!
//! Built once per invocation from the host graph, mutated in place by each stage (ordering,
//! ranking, crossing reduction, placement) and dropped once coordinates are written back.

pub mod builder;
pub mod cell;
pub mod visit;

pub use cell::{CellCommon, EdgeData, HierarchyCell, NodeData};
pub use visit::Visit;

use crate::identity::{CellIx, CellMap};
use swimlane_graph::CellId;

#[derive(Debug, Clone, Default)]
pub struct SwimlaneModel {
    cells: Vec<HierarchyCell>,
    nodes: Vec<CellIx>,
    edges: Vec<CellIx>,
    /// Host vertex to internal node.
    pub vertex_mapper: CellMap<CellIx>,
    /// Host edge to the internal edge grouping it.
    pub edge_mapper: CellMap<CellIx>,
    /// Rank buckets; the order inside a bucket is the in-rank order.
    pub ranks: Vec<Vec<CellIx>>,
    pub roots: Vec<CellId>,
    pub max_rank: usize,
    /// Per lane, the longest directed chain confined to that lane.
    pub ranks_per_group: Vec<usize>,
    /// Per lane, the inclusive `(first, last)` rank band.
    pub lane_bands: Vec<(usize, usize)>,
    pub lane_count: usize,
    pub(crate) dfs_count: i32,
}

impl SwimlaneModel {
    pub fn cell(&self, ix: CellIx) -> &HierarchyCell {
        &self.cells[ix.index()]
    }

    pub fn cell_mut(&mut self, ix: CellIx) -> &mut HierarchyCell {
        &mut self.cells[ix.index()]
    }

    pub fn node(&self, ix: CellIx) -> Option<&NodeData> {
        self.cells.get(ix.index()).and_then(HierarchyCell::as_node)
    }

    pub fn node_mut(&mut self, ix: CellIx) -> Option<&mut NodeData> {
        self.cells
            .get_mut(ix.index())
            .and_then(HierarchyCell::as_node_mut)
    }

    pub fn edge(&self, ix: CellIx) -> Option<&EdgeData> {
        self.cells.get(ix.index()).and_then(HierarchyCell::as_edge)
    }

    pub fn edge_mut(&mut self, ix: CellIx) -> Option<&mut EdgeData> {
        self.cells
            .get_mut(ix.index())
            .and_then(HierarchyCell::as_edge_mut)
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Internal nodes, in host vertex order.
    pub fn nodes(&self) -> &[CellIx] {
        &self.nodes
    }

    /// Internal edges, in creation order.
    pub fn edges(&self) -> &[CellIx] {
        &self.edges
    }

    pub fn node_for(&self, vertex: CellId) -> Option<&NodeData> {
        self.vertex_mapper
            .get(&vertex)
            .and_then(|&ix| self.node(ix))
    }

    pub fn edge_for(&self, edge: CellId) -> Option<&EdgeData> {
        self.edge_mapper.get(&edge).and_then(|&ix| self.edge(ix))
    }

    /// Lane of a cell; cells without a lane count as lane 0.
    pub fn lane(&self, ix: CellIx) -> usize {
        self.cell(ix).common().swimlane_index.unwrap_or(0)
    }

    pub fn root_nodes(&self) -> Vec<CellIx> {
        self.roots
            .iter()
            .filter_map(|r| self.vertex_mapper.get(r).copied())
            .collect()
    }

    /// Cells in `rank - 1` that `ix` (occupying `rank`) connects to.
    pub fn upper_cells(&self, ix: CellIx, rank: usize) -> Vec<CellIx> {
        match self.cell(ix) {
            HierarchyCell::Node(node) => node
                .connects_as_target
                .iter()
                .filter_map(|&e| {
                    let edge = self.edge(e)?;
                    Some(if edge.has_slots() { e } else { edge.source })
                })
                .collect(),
            HierarchyCell::Edge(edge) => {
                if edge.common.min_rank.is_some_and(|min| min + 1 == rank) {
                    vec![edge.source]
                } else {
                    vec![ix]
                }
            }
        }
    }

    /// Cells in `rank + 1` that `ix` (occupying `rank`) connects to.
    pub fn lower_cells(&self, ix: CellIx, rank: usize) -> Vec<CellIx> {
        match self.cell(ix) {
            HierarchyCell::Node(node) => node
                .connects_as_source
                .iter()
                .filter_map(|&e| {
                    let edge = self.edge(e)?;
                    Some(if edge.has_slots() { e } else { edge.target })
                })
                .collect(),
            HierarchyCell::Edge(edge) => {
                if edge.common.max_rank.is_some_and(|max| max == rank + 1) {
                    vec![edge.target]
                } else {
                    vec![ix]
                }
            }
        }
    }

    pub(crate) fn push_node(&mut self, node: NodeData) -> CellIx {
        let ix = CellIx(self.cells.len());
        self.vertex_mapper.insert(node.cell, ix);
        self.cells.push(HierarchyCell::Node(node));
        self.nodes.push(ix);
        ix
    }

    pub(crate) fn push_edge(&mut self, edge: EdgeData) -> CellIx {
        let ix = CellIx(self.cells.len());
        for &real in &edge.edges {
            self.edge_mapper.insert(real, ix);
        }
        let (source, target) = (edge.source, edge.target);
        self.cells.push(HierarchyCell::Edge(edge));
        self.edges.push(ix);
        if let Some(s) = self.node_mut(source) {
            s.connects_as_source.push(ix);
        }
        if let Some(t) = self.node_mut(target) {
            t.connects_as_target.push(ix);
        }
        ix
    }
}
