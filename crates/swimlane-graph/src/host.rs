//! The read/write surface a layout pass needs from the diagram model.

use crate::{CellId, Geometry, Rect};
use serde::{Deserialize, Serialize};
use std::ops::{Deref, DerefMut};

/// Edge routing flags written by the layout when it takes over waypoint placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeStyle {
    /// Disables the host's own edge router for this edge.
    pub no_edge_style: bool,
    pub orthogonal: bool,
}

pub trait HostGraph {
    fn root(&self) -> CellId;
    fn contains(&self, cell: CellId) -> bool;
    fn parent(&self, cell: CellId) -> Option<CellId>;
    fn children(&self, cell: CellId) -> Vec<CellId>;

    fn is_vertex(&self, cell: CellId) -> bool;
    fn is_edge(&self, cell: CellId) -> bool;
    fn is_visible(&self, cell: CellId) -> bool;
    fn is_collapsed(&self, cell: CellId) -> bool;

    /// Reflexive: a cell is its own ancestor.
    fn is_ancestor(&self, ancestor: CellId, cell: CellId) -> bool {
        let mut cur = Some(cell);
        while let Some(c) = cur {
            if c == ancestor {
                return true;
            }
            cur = self.parent(c);
        }
        false
    }

    /// Edges whose source or target terminal is `cell`.
    fn connected_edges(&self, cell: CellId) -> Vec<CellId>;
    fn terminal(&self, edge: CellId, source: bool) -> Option<CellId>;

    fn geometry(&self, cell: CellId) -> Option<Geometry>;
    fn set_geometry(&mut self, cell: CellId, geometry: Geometry);

    fn insert_vertex(&mut self, parent: CellId, bounds: Rect) -> CellId;
    /// Removes the cells, their descendants and every edge connected to them.
    fn remove_cells(&mut self, cells: &[CellId]);
    fn move_cells(&mut self, cells: &[CellId], dx: f64, dy: f64);

    fn set_edge_style(&mut self, edge: CellId, style: EdgeStyle);

    /// Drops all waypoints of `edge`.
    fn reset_edge(&mut self, edge: CellId) {
        if let Some(mut geo) = self.geometry(edge) {
            if !geo.points.is_empty() {
                geo.points.clear();
                self.set_geometry(edge, geo);
            }
        }
    }

    fn begin_update(&mut self);
    fn end_update(&mut self);
    fn update_level(&self) -> usize;
}

/// Scoped update transaction: `begin_update` on creation, `end_update` on drop.
///
/// The bracket closes even when the guarded code returns early or panics.
pub struct UpdateGuard<'a, H: HostGraph + ?Sized> {
    host: &'a mut H,
}

impl<'a, H: HostGraph + ?Sized> UpdateGuard<'a, H> {
    pub fn new(host: &'a mut H) -> Self {
        host.begin_update();
        Self { host }
    }
}

impl<H: HostGraph + ?Sized> Deref for UpdateGuard<'_, H> {
    type Target = H;

    fn deref(&self) -> &H {
        self.host
    }
}

impl<H: HostGraph + ?Sized> DerefMut for UpdateGuard<'_, H> {
    fn deref_mut(&mut self) -> &mut H {
        self.host
    }
}

impl<H: HostGraph + ?Sized> Drop for UpdateGuard<'_, H> {
    fn drop(&mut self) {
        self.host.end_update();
    }
}
