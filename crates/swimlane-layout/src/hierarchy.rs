//! Hierarchy discovery: which vertices take part in a layout pass and where traversals start.

use crate::identity::{CellMap, CellSet};
use crate::view::GraphView;
use swimlane_graph::{CellId, HostGraph};

#[derive(Debug, Clone, Default)]
pub struct Hierarchy {
    /// Every discovered vertex, in discovery order.
    pub vertices: CellSet,
    pub roots: Vec<CellId>,
    /// Number of connected components after merging.
    pub components: usize,
}

/// Visible, non-port vertices inside `lane`. Nested vertices are included only with
/// `traverse_ancestors`.
pub fn filter_descendants<H: HostGraph + ?Sized>(
    host: &H,
    lane: CellId,
    traverse_ancestors: bool,
    out: &mut CellSet,
) {
    for child in host.children(lane) {
        collect(host, child, traverse_ancestors, out);
    }
}

fn collect<H: HostGraph + ?Sized>(host: &H, cell: CellId, deep: bool, out: &mut CellSet) {
    if !host.is_visible(cell) || GraphView::is_port(host, cell) {
        return;
    }
    if host.is_vertex(cell) {
        out.insert(cell);
    }
    if deep {
        for child in host.children(cell) {
            collect(host, child, deep, out);
        }
    }
}

/// Vertices of `candidates` without incoming and with outgoing edges inside `lane`; failing
/// that, the single vertex with the largest out-minus-in balance.
pub fn find_roots<H: HostGraph + ?Sized>(
    host: &H,
    view: &mut GraphView,
    lane: CellId,
    candidates: &CellSet,
) -> Vec<CellId> {
    let mut roots = Vec::new();
    let mut best: Option<(i64, CellId)> = None;

    for &cell in candidates {
        if !host.is_vertex(cell) || !host.is_visible(cell) {
            continue;
        }
        let mut fan_out = 0i64;
        let mut fan_in = 0i64;
        for edge in view.edges(host, cell) {
            let source = view.visible_terminal(host, edge, true);
            if source == Some(cell) {
                let target = view.visible_terminal(host, edge, false);
                if target.is_some_and(|t| host.is_ancestor(lane, t)) {
                    fan_out += 1;
                }
            } else if source.is_some_and(|s| host.is_ancestor(lane, s)) {
                fan_in += 1;
            }
        }

        if fan_in == 0 && fan_out > 0 {
            roots.push(cell);
        }
        let diff = fan_out - fan_in;
        if best.is_none_or(|(max, _)| diff > max) {
            best = Some((diff, cell));
        }
    }

    if roots.is_empty() {
        roots.extend(best.map(|(_, cell)| cell));
    }
    roots
}

struct Discovery<'a, H: HostGraph + ?Sized> {
    host: &'a H,
    view: &'a mut GraphView,
    lanes: &'a [CellId],
    visited: CellSet,
    component_of: CellMap<usize>,
    union: Vec<usize>,
}

impl<H: HostGraph + ?Sized> Discovery<'_, H> {
    fn find(&mut self, mut c: usize) -> usize {
        while self.union[c] != c {
            self.union[c] = self.union[self.union[c]];
            c = self.union[c];
        }
        c
    }

    /// Depth-first walk from `vertex`. Same-lane edges are followed from source to target
    /// only; edges into a higher lane are followed in either direction.
    fn traverse(&mut self, vertex: CellId, lane: usize, component: usize, remaining: &mut CellSet) {
        if let Some(&other) = self.component_of.get(&vertex) {
            let (a, b) = (self.find(other), self.find(component));
            if a != b {
                self.union[a] = b;
            }
            return;
        }
        self.visited.insert(vertex);
        self.component_of.insert(vertex, component);
        remaining.shift_remove(&vertex);

        for edge in self.view.edges(self.host, vertex) {
            let Some(source) = self.view.visible_terminal(self.host, edge, true) else {
                continue;
            };
            let is_source = source == vertex;
            let other = if is_source {
                self.view.visible_terminal(self.host, edge, false)
            } else {
                Some(source)
            };
            let Some(other) = other.filter(|&o| {
                o != vertex && self.host.is_vertex(o) && !self.lanes.contains(&o)
            }) else {
                continue;
            };
            let Some(other_lane) = GraphView::lane_of(self.host, self.lanes, other) else {
                continue;
            };
            if other_lane > lane || (is_source && other_lane == lane) {
                self.traverse(other, other_lane, component, remaining);
            }
        }
    }
}

/// Walks every lane in order, repeatedly picking roots among its not yet reached vertices.
pub fn discover<H: HostGraph + ?Sized>(
    host: &H,
    view: &mut GraphView,
    lanes: &[CellId],
    traverse_ancestors: bool,
) -> Hierarchy {
    let mut state = Discovery {
        host,
        view,
        lanes,
        visited: CellSet::default(),
        component_of: CellMap::default(),
        union: Vec::new(),
    };
    let mut roots = Vec::new();

    for (index, &lane) in lanes.iter().enumerate() {
        let mut remaining = CellSet::default();
        filter_descendants(host, lane, traverse_ancestors, &mut remaining);
        remaining.retain(|v| !state.visited.contains(v));

        while !remaining.is_empty() {
            let candidates = find_roots(host, state.view, lane, &remaining);
            if candidates.is_empty() {
                break;
            }
            for root in candidates {
                let component = state.union.len();
                state.union.push(component);
                state.traverse(root, index, component, &mut remaining);
                roots.push(root);
            }
        }
    }

    let mut components: Vec<usize> = (0..state.union.len()).map(|c| state.find(c)).collect();
    components.sort_unstable();
    components.dedup();

    tracing::debug!(
        vertices = state.visited.len(),
        roots = roots.len(),
        components = components.len(),
        "discovered hierarchy"
    );
    Hierarchy {
        vertices: state.visited,
        roots,
        components: components.len(),
    }
}
