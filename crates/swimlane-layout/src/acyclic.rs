//! Break cycles so that edges run from lower to higher lanes and form a DAG.
//!
//! A fingerprinting depth-first traversal runs from the model roots (and then from any node the
//! roots do not reach). An edge is inverted when it closes a cycle inside one lane, or when the
//! walk reached a higher lane through it against its direction.

use crate::identity::CellIx;
use crate::model::{SwimlaneModel, Visit};

/// Returns the number of inverted edges.
pub fn run(model: &mut SwimlaneModel) -> usize {
    let mut roots = model.root_nodes();
    roots.extend(model.nodes().iter().copied());

    let mut inverted = 0usize;
    model.visit(&roots, true, &mut |model: &mut SwimlaneModel, visit: Visit| {
        if should_invert(model, &visit) {
            if let Some(edge) = visit.edge {
                reverse_edge(model, edge);
                inverted += 1;
            }
        }
    });

    tracing::debug!(inverted, "ordered swimlane model");
    inverted
}

fn should_invert(model: &SwimlaneModel, visit: &Visit) -> bool {
    let (Some(parent), Some(edge)) = (visit.parent, visit.edge) else {
        return false;
    };
    let (Some(parent_node), Some(node)) = (model.node(parent), model.node(visit.node)) else {
        return false;
    };
    let Some(edge_data) = model.edge(edge) else {
        return false;
    };
    let parent_lane = model.lane(parent);
    let node_lane = model.lane(visit.node);

    if parent_lane == node_lane && node.is_ancestor_of(parent_node) {
        tracing::trace!(edge = edge.index(), "inverting edge closing a cycle within a lane");
        return true;
    }
    if parent_lane < node_lane && edge_data.source == visit.node {
        tracing::trace!(edge = edge.index(), "inverting edge pointing to a lower lane");
        return true;
    }
    false
}

/// Swaps the edge's ends and moves it between the endpoints' adjacency lists.
pub(crate) fn reverse_edge(model: &mut SwimlaneModel, edge: CellIx) {
    let Some((source, target)) = model.edge(edge).map(|e| (e.source, e.target)) else {
        return;
    };
    if let Some(s) = model.node_mut(source) {
        s.connects_as_source.retain(|&e| e != edge);
        s.connects_as_target.push(edge);
    }
    if let Some(t) = model.node_mut(target) {
        t.connects_as_target.retain(|&e| e != edge);
        t.connects_as_source.push(edge);
    }
    if let Some(e) = model.edge_mut(edge) {
        e.invert();
    }
}
