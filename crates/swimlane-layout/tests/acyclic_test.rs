use swimlane_layout::acyclic;
use swimlane_layout::graph::{CellGraph, CellId, Rect};
use swimlane_layout::hierarchy;
use swimlane_layout::identity::CellIx;
use swimlane_layout::model::SwimlaneModel;
use swimlane_layout::model::builder::BuildOptions;
use swimlane_layout::view::GraphView;

fn rect() -> Rect {
    Rect::new(0.0, 0.0, 80.0, 40.0)
}

struct Fixture {
    g: CellGraph,
    pool: CellId,
    lanes: Vec<CellId>,
}

impl Fixture {
    fn new(lane_count: usize) -> Self {
        let mut g = CellGraph::new();
        let layer = g.default_parent();
        let pool = g.add_vertex(layer, "pool", Rect::new(0.0, 0.0, 400.0, 400.0)).unwrap();
        let lanes = (0..lane_count)
            .map(|i| g.add_vertex(pool, format!("lane{i}"), rect()).unwrap())
            .collect();
        Self { g, pool, lanes }
    }

    fn vertex(&mut self, lane: usize, label: &str) -> CellId {
        self.g.add_vertex(self.lanes[lane], label, rect()).unwrap()
    }

    fn edge(&mut self, source: CellId, target: CellId) -> CellId {
        self.g.add_edge(self.pool, "", source, target).unwrap()
    }

    fn model(&mut self) -> SwimlaneModel {
        let mut view = GraphView::new(self.pool, true);
        let found = hierarchy::discover(&self.g, &mut view, &self.lanes, true);
        let vertices: Vec<CellId> = found.vertices.iter().copied().collect();
        SwimlaneModel::build(
            &mut self.g,
            &mut view,
            &vertices,
            found.roots,
            &self.lanes,
            BuildOptions::default(),
        )
    }
}

/// Kahn's algorithm over the internal edges.
fn is_acyclic(model: &SwimlaneModel) -> bool {
    let mut indegree = vec![0usize; model.cell_count()];
    for &e in model.edges() {
        indegree[model.edge(e).unwrap().target.index()] += 1;
    }
    let mut ready: Vec<CellIx> = model
        .nodes()
        .iter()
        .copied()
        .filter(|n| indegree[n.index()] == 0)
        .collect();
    let mut seen = 0;
    while let Some(n) = ready.pop() {
        seen += 1;
        for &e in &model.node(n).unwrap().connects_as_source {
            let t = model.edge(e).unwrap().target;
            indegree[t.index()] -= 1;
            if indegree[t.index()] == 0 {
                ready.push(t);
            }
        }
    }
    seen == model.nodes().len()
}

fn lanes_ordered(model: &SwimlaneModel) -> bool {
    model.edges().iter().all(|&e| {
        let edge = model.edge(e).unwrap();
        model.lane(edge.source) <= model.lane(edge.target)
    })
}

fn adjacency_consistent(model: &SwimlaneModel) -> bool {
    model.edges().iter().all(|&e| {
        let edge = model.edge(e).unwrap();
        let s = model.node(edge.source).unwrap();
        let t = model.node(edge.target).unwrap();
        s.connects_as_source.contains(&e)
            && !s.connects_as_target.contains(&e)
            && t.connects_as_target.contains(&e)
            && !t.connects_as_source.contains(&e)
    })
}

#[test]
fn backward_edge_across_three_lanes_is_inverted() {
    let mut f = Fixture::new(3);
    let a = f.vertex(0, "a");
    let b = f.vertex(1, "b");
    let c = f.vertex(2, "c");
    let ab = f.edge(a, b);
    let bc = f.edge(b, c);
    let ca = f.edge(c, a);

    let mut model = f.model();
    assert_eq!(acyclic::run(&mut model), 1);

    let inverted = model.edge_for(ca).unwrap();
    assert!(inverted.is_reversed);
    assert_eq!(model.node(inverted.source).unwrap().cell, a);
    assert_eq!(model.node(inverted.target).unwrap().cell, c);
    assert!(!model.edge_for(ab).unwrap().is_reversed);
    assert!(!model.edge_for(bc).unwrap().is_reversed);
    assert!(is_acyclic(&model));
    assert!(lanes_ordered(&model));
    assert!(adjacency_consistent(&model));
}

#[test]
fn cycle_within_a_lane_is_broken() {
    let mut f = Fixture::new(1);
    let a = f.vertex(0, "a");
    let b = f.vertex(0, "b");
    let c = f.vertex(0, "c");
    let d = f.vertex(0, "d");
    f.edge(d, a);
    f.edge(a, b);
    f.edge(b, c);
    f.edge(c, a);

    let mut model = f.model();
    assert_eq!(acyclic::run(&mut model), 1);
    assert!(is_acyclic(&model));
    assert!(adjacency_consistent(&model));
}

#[test]
fn mixed_lane_cycles_end_up_ordered() {
    let mut f = Fixture::new(3);
    let v: Vec<CellId> = (0..9)
        .map(|i| f.vertex(i % 3, &format!("v{i}")))
        .collect();
    for i in 0..9 {
        f.edge(v[i], v[(i + 4) % 9]);
        f.edge(v[(i * 2) % 9], v[(i + 1) % 9]);
    }

    let mut model = f.model();
    acyclic::run(&mut model);
    assert!(is_acyclic(&model));
    assert!(lanes_ordered(&model));
    assert!(adjacency_consistent(&model));
}

#[test]
fn acyclic_input_is_left_alone() {
    let mut f = Fixture::new(2);
    let a = f.vertex(0, "a");
    let b = f.vertex(0, "b");
    let c = f.vertex(1, "c");
    f.edge(a, b);
    f.edge(a, c);
    f.edge(b, c);

    let mut model = f.model();
    assert_eq!(acyclic::run(&mut model), 0);
    assert!(model.edges().iter().all(|&e| !model.edge(e).unwrap().is_reversed));
}
