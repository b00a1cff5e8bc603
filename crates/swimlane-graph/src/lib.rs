#![forbid(unsafe_code)]

//! Host graph model consumed by `swimlane-layout`.
//!
//! The layout engine never owns diagram cells. It reads structure and geometry through the
//! [`HostGraph`] trait and writes results back through it. [`CellGraph`] is an arena-backed
//! implementation: every cell is addressed by a small [`CellId`] handle, so lookups keyed by
//! cell identity are plain index-keyed maps.

pub mod error;
pub mod geometry;
pub mod graph;
pub mod host;

pub use error::{Error, Result};
pub use geometry::{Geometry, Point, Rect};
pub use graph::{CellGraph, CellKind};
pub use host::{EdgeStyle, HostGraph, UpdateGuard};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Stable arena handle for a cell (vertex, edge, lane or container).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct CellId(pub usize);

impl CellId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl std::fmt::Display for CellId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}
