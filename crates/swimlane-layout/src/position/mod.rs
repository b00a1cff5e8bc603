//! Coordinate assignment.
//!
//! Works top-to-bottom in layout space (see [`crate::coordinate_system`]). Cells of a rank are
//! packed left to right in bucket order and every rank is centred against the widest one; rank
//! rows are stacked with `inter_rank_cell_spacing` between the tallest cells of neighbouring
//! rows. Optional fine tuning then pulls cells towards their neighbours without changing any
//! order.

mod fine_tune;
mod write_back;

pub use write_back::{WriteBack, write_back};

use crate::config::{LayoutConfig, Orientation};
use crate::coordinate_system;
use crate::identity::CellIx;
use crate::model::SwimlaneModel;
use swimlane_graph::HostGraph;

#[derive(Debug, Clone, Copy)]
pub struct PositionOptions {
    pub orientation: Orientation,
    pub intra_cell_spacing: f64,
    pub inter_rank_cell_spacing: f64,
    pub parallel_edge_spacing: f64,
    pub fine_tuning: bool,
    pub max_placement_iterations: usize,
}

impl From<&LayoutConfig> for PositionOptions {
    fn from(config: &LayoutConfig) -> Self {
        Self {
            orientation: config.orientation,
            intra_cell_spacing: config.intra_cell_spacing,
            inter_rank_cell_spacing: config.inter_rank_cell_spacing,
            parallel_edge_spacing: config.parallel_edge_spacing,
            fine_tuning: config.fine_tuning,
            max_placement_iterations: config.max_placement_iterations,
        }
    }
}

/// Layout-space extents of a placed model.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Placement {
    /// Right edge of the rightmost cell.
    pub limit_x: f64,
    /// Centre line of each rank along the rank axis.
    pub rank_centers: Vec<f64>,
    /// Tallest cell of each rank.
    pub rank_heights: Vec<f64>,
    /// Total length along the rank axis, including half a rank gap at either end.
    pub extent: f64,
}

impl Placement {
    pub fn rank_top(&self, rank: usize) -> f64 {
        self.rank_centers[rank] - self.rank_heights[rank] / 2.0
    }

    pub fn rank_bottom(&self, rank: usize) -> f64 {
        self.rank_centers[rank] + self.rank_heights[rank] / 2.0
    }
}

/// Per-rank working state, indexed like `model.ranks`.
#[derive(Debug, Clone)]
pub(crate) struct Columns {
    pub(crate) width: Vec<Vec<f64>>,
    /// Centre x of every cell.
    pub(crate) x: Vec<Vec<f64>>,
}

impl Columns {
    /// Smallest centre distance between positions `i` and `i + 1` of `rank`.
    pub(crate) fn gap(&self, rank: usize, i: usize, spacing: f64) -> f64 {
        (self.width[rank][i] + self.width[rank][i + 1]) / 2.0 + spacing
    }
}

/// Assigns x/y to every node and edge slot and records cell sizes on the model.
pub fn assign<H: HostGraph + ?Sized>(
    model: &mut SwimlaneModel,
    host: &H,
    opts: &PositionOptions,
) -> Placement {
    measure(model, host, opts);

    let mut columns = initial_columns(model, opts);
    if opts.fine_tuning {
        fine_tune::run(model, &mut columns, opts);
    }
    normalize(&mut columns, opts.intra_cell_spacing);

    let limit_x = columns
        .x
        .iter()
        .zip(&columns.width)
        .flat_map(|(xs, ws)| xs.iter().zip(ws).map(|(x, w)| x + w / 2.0))
        .fold(0.0, f64::max);

    let rank_heights: Vec<f64> = model
        .ranks
        .iter()
        .map(|cells| {
            cells
                .iter()
                .map(|&ix| model.cell(ix).common().height)
                .fold(0.0, f64::max)
        })
        .collect();
    let inter = opts.inter_rank_cell_spacing;
    let mut rank_centers = Vec::with_capacity(rank_heights.len());
    let mut previous: Option<(f64, f64)> = None;
    for &height in &rank_heights {
        let center = match previous {
            None => inter / 2.0 + height / 2.0,
            Some((prev_center, prev_height)) => prev_center + prev_height / 2.0 + height / 2.0 + inter,
        };
        rank_centers.push(center);
        previous = Some((center, height));
    }
    let extent = previous.map_or(0.0, |(center, height)| center + height / 2.0 + inter / 2.0);

    for (rank, cells) in model.ranks.clone().into_iter().enumerate() {
        for (i, ix) in cells.into_iter().enumerate() {
            let cell = model.cell_mut(ix);
            cell.set_x(rank, columns.x[rank][i]);
            cell.set_y(rank, rank_centers[rank]);
        }
    }

    tracing::debug!(limit_x, extent, ranks = rank_centers.len(), "assigned coordinates");
    Placement {
        limit_x,
        rank_centers,
        rank_heights,
        extent,
    }
}

fn measure<H: HostGraph + ?Sized>(model: &mut SwimlaneModel, host: &H, opts: &PositionOptions) {
    for ix in model.nodes().to_vec() {
        let Some(cell) = model.node(ix).map(|n| n.cell) else {
            continue;
        };
        let (width, height) = match host.geometry(cell) {
            Some(geo) => coordinate_system::adjust_size(
                opts.orientation,
                geo.bounds.width,
                geo.bounds.height,
            ),
            None => {
                tracing::warn!(%cell, "vertex has no geometry; placing it with zero size");
                (0.0, 0.0)
            }
        };
        let common = model.cell_mut(ix).common_mut();
        common.width = width;
        common.height = height;
    }
    for ix in model.edges().to_vec() {
        let parallel = model.edge(ix).map_or(1, |e| e.edges.len().max(1));
        let common = model.cell_mut(ix).common_mut();
        common.width = (parallel - 1) as f64 * opts.parallel_edge_spacing;
        common.height = 0.0;
    }
}

fn initial_columns(model: &SwimlaneModel, opts: &PositionOptions) -> Columns {
    let spacing = opts.intra_cell_spacing;
    let width: Vec<Vec<f64>> = model
        .ranks
        .iter()
        .map(|cells| cells.iter().map(|&ix| model.cell(ix).common().width).collect())
        .collect();

    let rank_widths: Vec<f64> = width
        .iter()
        .map(|ws| ws.iter().sum::<f64>() + spacing * ws.len().saturating_sub(1) as f64)
        .collect();
    let widest = rank_widths.iter().copied().fold(0.0, f64::max);

    let x = width
        .iter()
        .zip(&rank_widths)
        .map(|(ws, rank_width)| {
            let mut cursor = spacing / 2.0 + (widest - rank_width) / 2.0;
            ws.iter()
                .map(|w| {
                    let center = cursor + w / 2.0;
                    cursor += w + spacing;
                    center
                })
                .collect()
        })
        .collect();
    Columns { width, x }
}

/// Shifts everything so the leftmost cell starts half a spacing from 0.
fn normalize(columns: &mut Columns, spacing: f64) {
    let min_left = columns
        .x
        .iter()
        .zip(&columns.width)
        .flat_map(|(xs, ws)| xs.iter().zip(ws).map(|(x, w)| x - w / 2.0))
        .fold(f64::INFINITY, f64::min);
    if !min_left.is_finite() {
        return;
    }
    let shift = spacing / 2.0 - min_left;
    for xs in &mut columns.x {
        for x in xs {
            *x += shift;
        }
    }
}

/// Neighbours of the cell at `rank` in the rank above and below, as `(rank, position)`.
pub(crate) fn neighbours(
    model: &SwimlaneModel,
    rank: usize,
    ix: CellIx,
    upper: bool,
    lower: bool,
) -> Vec<(usize, usize)> {
    let mut out = Vec::new();
    if upper && rank > 0 {
        for c in model.upper_cells(ix, rank) {
            if let Ok(pos) = usize::try_from(model.cell(c).general_purpose(rank - 1)) {
                out.push((rank - 1, pos));
            }
        }
    }
    if lower && rank + 1 < model.ranks.len() {
        for c in model.lower_cells(ix, rank) {
            if let Ok(pos) = usize::try_from(model.cell(c).general_purpose(rank + 1)) {
                out.push((rank + 1, pos));
            }
        }
    }
    out
}
