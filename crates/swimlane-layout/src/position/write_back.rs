//! Writes placed coordinates back into the host graph.

use super::Placement;
use crate::config::Orientation;
use crate::coordinate_system::{undo_point, undo_rect};
use crate::model::SwimlaneModel;
use crate::view::GraphView;
use swimlane_graph::{CellId, HostGraph, Point, Rect};

/// Where and how a placement is written.
#[derive(Debug, Clone, Copy)]
pub struct WriteBack<'a> {
    /// The layout parent; written coordinates are relative to its children's space.
    pub parent: CellId,
    pub lanes: &'a [CellId],
    pub orientation: Orientation,
    pub intra_cell_spacing: f64,
    pub inter_rank_cell_spacing: f64,
    pub parallel_edge_spacing: f64,
}

/// Lanes first, then vertices relative to their (possibly moved) lanes, then edge waypoints.
pub fn write_back<H: HostGraph + ?Sized>(
    host: &mut H,
    view: &mut GraphView,
    model: &SwimlaneModel,
    placement: &Placement,
    target: &WriteBack<'_>,
) {
    write_lanes(host, model, placement, target);
    write_vertices(host, model, placement, target);
    write_edges(host, view, model, placement, target);
}

fn write_lanes<H: HostGraph + ?Sized>(
    host: &mut H,
    model: &SwimlaneModel,
    placement: &Placement,
    target: &WriteBack<'_>,
) {
    let half_gap = target.inter_rank_cell_spacing / 2.0;
    let width = placement.limit_x + target.intra_cell_spacing / 2.0;
    for (&lane, &(lower, upper)) in target.lanes.iter().zip(&model.lane_bands) {
        if upper >= placement.rank_centers.len() {
            continue;
        }
        let top = placement.rank_top(lower) - half_gap;
        let bottom = placement.rank_bottom(upper) + half_gap;
        let rect = undo_rect(
            target.orientation,
            Rect::new(0.0, top, width, bottom - top),
            placement.extent,
        );
        set_bounds(host, lane, rect, target.parent);
    }
}

fn write_vertices<H: HostGraph + ?Sized>(
    host: &mut H,
    model: &SwimlaneModel,
    placement: &Placement,
    target: &WriteBack<'_>,
) {
    for &ix in model.nodes() {
        let Some(node) = model.node(ix) else {
            continue;
        };
        let Some(rank) = node.rank() else {
            continue;
        };
        let cell = model.cell(ix);
        let (Some(x), Some(y)) = (cell.x_at(rank), cell.y_at(rank)) else {
            continue;
        };
        let common = cell.common();
        let rect = Rect::new(
            x - common.width / 2.0,
            y - common.height / 2.0,
            common.width,
            common.height,
        );
        let rect = undo_rect(target.orientation, rect, placement.extent);
        set_bounds(host, node.cell, rect, target.parent);
    }
}

fn write_edges<H: HostGraph + ?Sized>(
    host: &mut H,
    view: &mut GraphView,
    model: &SwimlaneModel,
    placement: &Placement,
    target: &WriteBack<'_>,
) {
    let extent = placement.extent;
    for &ix in model.edges() {
        let Some(edge) = model.edge(ix) else {
            continue;
        };
        if !edge.has_slots() {
            continue;
        }
        let (Some(min), Some(max)) = (edge.common.min_rank, edge.common.max_rank) else {
            continue;
        };
        let Some(top_cell) = model.node(edge.source).map(|n| n.cell) else {
            continue;
        };
        let cell = model.cell(ix);
        let slots: Vec<(f64, f64)> = (min + 1..max)
            .filter_map(|rank| Some((cell.x_at(rank)?, cell.y_at(rank)?)))
            .collect();

        let count = edge.edges.len();
        for (j, &real) in edge.edges.iter().enumerate() {
            let offset = (j as f64 - (count as f64 - 1.0) / 2.0) * target.parallel_edge_spacing;
            let origin = origin(&*host, real, target.parent);
            let mut points: Vec<Point> = slots
                .iter()
                .map(|&(x, y)| {
                    let p = undo_point(target.orientation, Point::new(x + offset, y), extent);
                    Point::new(p.x - origin.x, p.y - origin.y)
                })
                .collect();
            if view.visible_terminal(&*host, real, true) != Some(top_cell) {
                points.reverse();
            }
            let mut geo = host.geometry(real).unwrap_or_default();
            if geo.points != points {
                geo.points = points;
                host.set_geometry(real, geo);
            }
        }
    }
}

/// Offset of `cell`'s coordinate space inside `top`'s children space.
fn origin<H: HostGraph + ?Sized>(host: &H, cell: CellId, top: CellId) -> Point {
    let mut origin = Point::default();
    let mut cur = host.parent(cell);
    while let Some(c) = cur {
        if c == top {
            break;
        }
        if let Some(geo) = host.geometry(c) {
            if !geo.relative {
                origin.x += geo.bounds.x;
                origin.y += geo.bounds.y;
            }
        }
        cur = host.parent(c);
    }
    origin
}

fn set_bounds<H: HostGraph + ?Sized>(host: &mut H, cell: CellId, rect: Rect, top: CellId) {
    let Some(mut geo) = host.geometry(cell) else {
        tracing::warn!(%cell, "cell has no geometry; leaving it in place");
        return;
    };
    let origin = origin(&*host, cell, top);
    let bounds = Rect::new(rect.x - origin.x, rect.y - origin.y, rect.width, rect.height);
    if geo.bounds != bounds {
        geo.bounds = bounds;
        host.set_geometry(cell, geo);
    }
}
