//! Identity-keyed lookups.
//!
//! Host cells are arena handles ([`CellId`]) and internal hierarchy cells are indices into the
//! model's own arena ([`CellIx`]), so every "dictionary keyed by object identity" is a plain
//! hash map or insertion-ordered set over small integers.

use indexmap::IndexSet;
use rustc_hash::{FxBuildHasher, FxHashMap};
use swimlane_graph::CellId;

pub type CellMap<V> = FxHashMap<CellId, V>;

/// Insertion-ordered cell set; iteration order is discovery order.
pub type CellSet = IndexSet<CellId, FxBuildHasher>;

/// Handle of a node or edge inside a [`crate::model::SwimlaneModel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellIx(pub usize);

impl CellIx {
    pub fn index(self) -> usize {
        self.0
    }
}
