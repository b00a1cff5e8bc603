//! The swimlane layout pass.

use crate::config::LayoutConfig;
use crate::error::Result;
use crate::hierarchy;
use crate::identity::CellSet;
use crate::model::SwimlaneModel;
use crate::model::builder::BuildOptions;
use crate::order::{self, OrderOptions};
use crate::position::{self, PositionOptions, WriteBack};
use crate::view::GraphView;
use crate::{acyclic, rank};
use serde::Serialize;
use swimlane_graph::{CellId, HostGraph, Rect, UpdateGuard};

/// Pipeline stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Stage {
    Build,
    Order,
    Rank,
    Reduce,
    Assign,
}

/// Why a pass declined to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SkipReason {
    NoParent,
    NoLanes,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutSummary {
    pub skipped: Option<SkipReason>,
    pub stages: Vec<Stage>,
    /// Number of ranks, `max_rank + 1`.
    pub ranks: usize,
    pub crossings: usize,
    pub inverted_edges: usize,
    /// Vertices the rank worklist could not place.
    pub stalled_nodes: Vec<CellId>,
    pub components: usize,
    /// Cross-axis extent of the result.
    pub limit_x: f64,
    /// Where a following hierarchy would start.
    pub next_x: f64,
}

impl LayoutSummary {
    fn skipped(reason: SkipReason) -> Self {
        tracing::debug!(?reason, "swimlane layout skipped");
        Self {
            skipped: Some(reason),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SwimlaneLayout {
    config: LayoutConfig,
}

impl SwimlaneLayout {
    pub fn new(config: LayoutConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Lays out the vertices of `lanes` (children of `parent`, in the given order) inside one
    /// update transaction.
    ///
    /// Lanes without a visible vertex get a temporary placeholder so they keep a rank band.
    /// Missing inputs skip the pass instead of failing; only an invalid configuration is an
    /// error.
    pub fn execute<H: HostGraph + ?Sized>(
        &self,
        host: &mut H,
        parent: Option<CellId>,
        lanes: &[CellId],
    ) -> Result<LayoutSummary> {
        self.config.validate()?;

        let Some(parent) = parent.filter(|&p| host.contains(p)) else {
            return Ok(LayoutSummary::skipped(SkipReason::NoParent));
        };
        let lanes: Vec<CellId> = lanes
            .iter()
            .copied()
            .filter(|&lane| host.contains(lane))
            .collect();
        if lanes.is_empty() {
            return Ok(LayoutSummary::skipped(SkipReason::NoLanes));
        }

        let parent_location = if self.config.maintain_parent_location {
            host.geometry(parent).map(|g| (g.bounds.x, g.bounds.y))
        } else {
            None
        };

        let mut guard = UpdateGuard::new(host);
        let host: &mut H = &mut guard;

        let mut placeholders = Vec::new();
        for &lane in &lanes {
            let mut members = CellSet::default();
            hierarchy::filter_descendants(
                &*host,
                lane,
                self.config.traverse_ancestors,
                &mut members,
            );
            if members.is_empty() {
                let bounds = Rect::new(0.0, 0.0, self.config.dummy_vertex_width, 0.0);
                placeholders.push(host.insert_vertex(lane, bounds));
            }
        }

        let summary = self.run(host, parent, &lanes);

        if self.config.resize_parent && !host.is_collapsed(parent) {
            update_group_bounds(
                host,
                parent,
                self.config.parent_border,
                self.config.move_parent,
            );
        }

        if let Some((x, y)) = parent_location {
            if let Some(mut geo) = host.geometry(parent) {
                if geo.bounds.x != x || geo.bounds.y != y {
                    geo.bounds.x = x;
                    geo.bounds.y = y;
                    host.set_geometry(parent, geo);
                }
            }
        }

        if !placeholders.is_empty() {
            host.remove_cells(&placeholders);
        }
        Ok(summary)
    }

    fn run<H: HostGraph + ?Sized>(
        &self,
        host: &mut H,
        parent: CellId,
        lanes: &[CellId],
    ) -> LayoutSummary {
        let config = &self.config;
        let mut summary = LayoutSummary::default();
        let mut view = GraphView::new(parent, config.traverse_ancestors);

        let discovered = hierarchy::discover(&*host, &mut view, lanes, config.traverse_ancestors);
        let vertices: Vec<CellId> = discovered.vertices.iter().copied().collect();
        let mut model = SwimlaneModel::build(
            host,
            &mut view,
            &vertices,
            discovered.roots,
            lanes,
            BuildOptions {
                disable_edge_style: config.disable_edge_style,
            },
        );
        summary.components = discovered.components;
        summary.stages.push(Stage::Build);

        tracing::debug!(stage = ?Stage::Order, "running stage");
        summary.inverted_edges = acyclic::run(&mut model);
        summary.stages.push(Stage::Order);

        tracing::debug!(stage = ?Stage::Rank, "running stage");
        let stalled = rank::initial_rank(&mut model, config.tighten_to_source);
        rank::fix_ranks(&mut model);
        summary.stalled_nodes = stalled
            .into_iter()
            .filter_map(|ix| model.node(ix).map(|n| n.cell))
            .collect();
        summary.ranks = model.ranks.len();
        summary.stages.push(Stage::Rank);

        tracing::debug!(stage = ?Stage::Reduce, "running stage");
        summary.crossings = order::reduce(
            &mut model,
            OrderOptions {
                max_iterations: config.max_crossing_iterations,
                iterations_without_improvement: config.crossing_iterations_without_improvement,
            },
        );
        summary.stages.push(Stage::Reduce);

        tracing::debug!(stage = ?Stage::Assign, "running stage");
        let placement = position::assign(&mut model, &*host, &PositionOptions::from(config));
        position::write_back(
            host,
            &mut view,
            &model,
            &placement,
            &WriteBack {
                parent,
                lanes,
                orientation: config.orientation,
                intra_cell_spacing: config.intra_cell_spacing,
                inter_rank_cell_spacing: config.inter_rank_cell_spacing,
                parallel_edge_spacing: config.parallel_edge_spacing,
            },
        );
        summary.stages.push(Stage::Assign);

        summary.limit_x = placement.limit_x;
        summary.next_x = placement.limit_x + config.inter_hierarchy_spacing;
        summary
    }
}

/// Fits `parent` around its vertex children plus `border`, shifting the children so the
/// top-left child sits `border` inside. With `move_parent` the parent moves by the same amount
/// in the opposite direction, keeping children fixed on screen.
pub fn update_group_bounds<H: HostGraph + ?Sized>(
    host: &mut H,
    parent: CellId,
    border: f64,
    move_parent: bool,
) {
    let children: Vec<CellId> = host
        .children(parent)
        .into_iter()
        .filter(|&c| host.is_vertex(c))
        .collect();
    let bounds = children
        .iter()
        .filter_map(|&c| host.geometry(c))
        .filter(|g| !g.relative)
        .map(|g| g.bounds)
        .reduce(|a, b| a.union(&b));
    let (Some(bounds), Some(mut geo)) = (bounds, host.geometry(parent)) else {
        return;
    };

    if move_parent {
        geo.bounds.x += bounds.x - border;
        geo.bounds.y += bounds.y - border;
    }
    geo.bounds.width = bounds.width + 2.0 * border;
    geo.bounds.height = bounds.height + 2.0 * border;
    host.set_geometry(parent, geo);
    host.move_cells(&children, border - bounds.x, border - bounds.y);
}
