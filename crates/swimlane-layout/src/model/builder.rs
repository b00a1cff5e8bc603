//! Builds a [`SwimlaneModel`] from host vertices.

use super::{EdgeData, NodeData, SwimlaneModel};
use crate::view::GraphView;
use swimlane_graph::{CellId, EdgeStyle, HostGraph};

#[derive(Debug, Clone, Copy, Default)]
pub struct BuildOptions {
    /// Switch grouped host edges to orthogonal routing with the host router disabled.
    pub disable_edge_style: bool,
}

impl SwimlaneModel {
    /// Creates one node per vertex and one edge per connected vertex pair.
    ///
    /// All host edges between a pair collapse into a single internal edge. Its direction is the
    /// one at least half of the host edges agree with; on a tie the first vertex scanned wins.
    /// Every grouped host edge loses its waypoints.
    pub fn build<H: HostGraph + ?Sized>(
        host: &mut H,
        view: &mut GraphView,
        vertices: &[CellId],
        roots: Vec<CellId>,
        lanes: &[CellId],
        options: BuildOptions,
    ) -> Self {
        let mut model = SwimlaneModel {
            roots,
            lane_count: lanes.len(),
            ..Default::default()
        };

        for &vertex in vertices {
            let mut node = NodeData::new(vertex);
            node.common.swimlane_index = GraphView::lane_of(&*host, lanes, vertex);
            model.push_node(node);
        }

        for &vertex in vertices {
            let Some(&source) = model.vertex_mapper.get(&vertex) else {
                continue;
            };
            for conn in view.edges(&*host, vertex) {
                let Some(cell) = view.visible_terminal(&*host, conn, false) else {
                    continue;
                };
                if cell == vertex || !host.is_vertex(cell) || !host.is_visible(cell) {
                    continue;
                }
                let Some(&target) = model.vertex_mapper.get(&cell) else {
                    continue;
                };

                let undirected = view.edges_between(&*host, vertex, cell, false);
                let Some(first) = undirected.first() else {
                    continue;
                };
                if model.edge_mapper.contains_key(first) {
                    continue;
                }
                let directed = view.edges_between(&*host, vertex, cell, true);
                if directed.len() * 2 < undirected.len() {
                    continue;
                }

                for &real in &undirected {
                    host.reset_edge(real);
                    if options.disable_edge_style {
                        host.set_edge_style(
                            real,
                            EdgeStyle {
                                no_edge_style: true,
                                orthogonal: true,
                            },
                        );
                    }
                }
                model.push_edge(EdgeData::new(undirected, source, target));
            }
        }

        tracing::debug!(
            nodes = model.nodes().len(),
            edges = model.edges().len(),
            roots = model.roots.len(),
            "built swimlane model"
        );
        model
    }
}
