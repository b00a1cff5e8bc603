//! Internal hierarchy cells.
//!
//! A node wraps one host vertex and occupies exactly one rank. An edge wraps every host edge
//! running between the same pair of nodes and, once ranked, occupies each rank strictly between
//! its endpoints as a one-slot placeholder.

use crate::identity::CellIx;
use swimlane_graph::CellId;

/// State shared by nodes and edges.
///
/// `temp`, `x` and `y` hold one slot per occupied rank: slot 0 for a node, slot
/// `rank - min_rank - 1` for an edge placeholder.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CellCommon {
    pub min_rank: Option<usize>,
    pub max_rank: Option<usize>,
    /// Per-stage scratch: rank candidates while ranking, in-rank positions afterwards.
    pub temp: Vec<i32>,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub width: f64,
    pub height: f64,
    pub swimlane_index: Option<usize>,
}

impl CellCommon {
    fn new() -> Self {
        Self {
            temp: vec![0],
            x: vec![0.0],
            y: vec![0.0],
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NodeData {
    pub common: CellCommon,
    pub cell: CellId,
    pub connects_as_source: Vec<CellIx>,
    pub connects_as_target: Vec<CellIx>,
    /// Ancestor-path fingerprint from the most recent fingerprinting traversal.
    pub hash_code: Vec<i32>,
}

impl NodeData {
    pub fn new(cell: CellId) -> Self {
        Self {
            common: CellCommon::new(),
            cell,
            connects_as_source: Vec::new(),
            connects_as_target: Vec::new(),
            hash_code: Vec::new(),
        }
    }

    /// `self` lies on the traversal path leading to `other`.
    ///
    /// Fingerprints extend their parent's by one entry, so ancestry is a strict-prefix test.
    pub fn is_ancestor_of(&self, other: &NodeData) -> bool {
        !self.hash_code.is_empty()
            && self.hash_code.len() < other.hash_code.len()
            && other.hash_code.starts_with(&self.hash_code)
    }

    pub fn rank(&self) -> Option<usize> {
        self.common.min_rank
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EdgeData {
    pub common: CellCommon,
    /// Grouped host edges, in discovery order.
    pub edges: Vec<CellId>,
    pub source: CellIx,
    pub target: CellIx,
    pub is_reversed: bool,
}

impl EdgeData {
    pub fn new(edges: Vec<CellId>, source: CellIx, target: CellIx) -> Self {
        Self {
            common: CellCommon::new(),
            edges,
            source,
            target,
            is_reversed: false,
        }
    }

    pub fn invert(&mut self) {
        std::mem::swap(&mut self.source, &mut self.target);
        self.is_reversed = !self.is_reversed;
    }

    /// Whether the edge has placeholder slots, i.e. spans more than one rank.
    pub fn has_slots(&self) -> bool {
        matches!(
            (self.common.min_rank, self.common.max_rank),
            (Some(min), Some(max)) if max > min + 1
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum HierarchyCell {
    Node(NodeData),
    Edge(EdgeData),
}

impl HierarchyCell {
    pub fn common(&self) -> &CellCommon {
        match self {
            HierarchyCell::Node(n) => &n.common,
            HierarchyCell::Edge(e) => &e.common,
        }
    }

    pub fn common_mut(&mut self) -> &mut CellCommon {
        match self {
            HierarchyCell::Node(n) => &mut n.common,
            HierarchyCell::Edge(e) => &mut e.common,
        }
    }

    pub fn is_node(&self) -> bool {
        matches!(self, HierarchyCell::Node(_))
    }

    pub fn is_edge(&self) -> bool {
        matches!(self, HierarchyCell::Edge(_))
    }

    pub fn as_node(&self) -> Option<&NodeData> {
        match self {
            HierarchyCell::Node(n) => Some(n),
            HierarchyCell::Edge(_) => None,
        }
    }

    pub fn as_edge(&self) -> Option<&EdgeData> {
        match self {
            HierarchyCell::Edge(e) => Some(e),
            HierarchyCell::Node(_) => None,
        }
    }

    pub fn as_node_mut(&mut self) -> Option<&mut NodeData> {
        match self {
            HierarchyCell::Node(n) => Some(n),
            HierarchyCell::Edge(_) => None,
        }
    }

    pub fn as_edge_mut(&mut self) -> Option<&mut EdgeData> {
        match self {
            HierarchyCell::Edge(e) => Some(e),
            HierarchyCell::Node(_) => None,
        }
    }

    /// Slot index of `rank` in the per-rank arrays, if the cell occupies that rank.
    pub fn slot(&self, rank: usize) -> Option<usize> {
        let common = self.common();
        match self {
            HierarchyCell::Node(_) => (common.min_rank == Some(rank)).then_some(0),
            HierarchyCell::Edge(_) => {
                let (min, max) = (common.min_rank?, common.max_rank?);
                (rank > min && rank < max).then(|| rank - min - 1)
            }
        }
    }

    pub fn general_purpose(&self, rank: usize) -> i32 {
        let temp = &self.common().temp;
        self.slot(rank)
            .and_then(|s| temp.get(s).copied())
            .unwrap_or(-1)
    }

    pub fn set_general_purpose(&mut self, rank: usize, value: i32) {
        if let Some(s) = self.slot(rank) {
            if let Some(t) = self.common_mut().temp.get_mut(s) {
                *t = value;
            }
        }
    }

    pub fn x_at(&self, rank: usize) -> Option<f64> {
        self.slot(rank).and_then(|s| self.common().x.get(s).copied())
    }

    pub fn y_at(&self, rank: usize) -> Option<f64> {
        self.slot(rank).and_then(|s| self.common().y.get(s).copied())
    }

    pub fn set_x(&mut self, rank: usize, value: f64) {
        if let Some(s) = self.slot(rank) {
            if let Some(x) = self.common_mut().x.get_mut(s) {
                *x = value;
            }
        }
    }

    pub fn set_y(&mut self, rank: usize, value: f64) {
        if let Some(s) = self.slot(rank) {
            if let Some(y) = self.common_mut().y.get_mut(s) {
                *y = value;
            }
        }
    }
}
