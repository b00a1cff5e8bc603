use swimlane_layout::graph::{CellGraph, CellId, EdgeStyle, HostGraph, Point, Rect};
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

fn fixture(lane_count: usize) -> Fixture {
    let mut g = CellGraph::new();
    let layer = g.default_parent();
    let pool = g.add_vertex(layer, "pool", Rect::new(0.0, 0.0, 400.0, 400.0)).unwrap();
    let lanes = (0..lane_count)
        .map(|i| g.add_vertex(pool, format!("lane{i}"), rect()).unwrap())
        .collect();
    Fixture { g, pool, lanes }
}

fn build(f: &mut Fixture, vertices: &[CellId], options: BuildOptions) -> SwimlaneModel {
    let mut view = GraphView::new(f.pool, true);
    SwimlaneModel::build(&mut f.g, &mut view, vertices, Vec::new(), &f.lanes, options)
}

fn endpoints(model: &SwimlaneModel, edge: CellId) -> (CellId, CellId) {
    let e = model.edge_for(edge).unwrap();
    (
        model.node(e.source).unwrap().cell,
        model.node(e.target).unwrap().cell,
    )
}

#[test]
fn parallel_edges_collapse_into_one() {
    let mut f = fixture(1);
    let lane = f.lanes[0];
    let a = f.g.add_vertex(lane, "a", rect()).unwrap();
    let b = f.g.add_vertex(lane, "b", rect()).unwrap();
    let edges: Vec<CellId> = (0..3)
        .map(|_| f.g.add_edge(f.pool, "", a, b).unwrap())
        .collect();

    let model = build(&mut f, &[a, b], BuildOptions::default());
    assert_eq!(model.nodes().len(), 2);
    assert_eq!(model.edges().len(), 1);
    let internal = model.edge_for(edges[0]).unwrap();
    assert_eq!(internal.edges, edges);
    for &e in &edges {
        assert_eq!(endpoints(&model, e), (a, b));
    }
}

#[test]
fn majority_direction_wins() {
    let mut f = fixture(1);
    let lane = f.lanes[0];
    let a = f.g.add_vertex(lane, "a", rect()).unwrap();
    let b = f.g.add_vertex(lane, "b", rect()).unwrap();
    let ab = f.g.add_edge(f.pool, "", a, b).unwrap();
    let ba1 = f.g.add_edge(f.pool, "", b, a).unwrap();
    let ba2 = f.g.add_edge(f.pool, "", b, a).unwrap();

    let model = build(&mut f, &[a, b], BuildOptions::default());
    assert_eq!(model.edges().len(), 1);
    assert_eq!(endpoints(&model, ab), (b, a));
    assert_eq!(model.edge_for(ba1).unwrap().edges.len(), 3);
    assert!(model.edge_for(ba2).is_some());
}

#[test]
fn tie_keeps_first_scanned_direction() {
    let mut f = fixture(1);
    let lane = f.lanes[0];
    let a = f.g.add_vertex(lane, "a", rect()).unwrap();
    let b = f.g.add_vertex(lane, "b", rect()).unwrap();
    let ab = f.g.add_edge(f.pool, "", a, b).unwrap();
    let _ba = f.g.add_edge(f.pool, "", b, a).unwrap();

    let model = build(&mut f, &[a, b], BuildOptions::default());
    assert_eq!(endpoints(&model, ab), (a, b));

    let mut f2 = fixture(1);
    let lane = f2.lanes[0];
    let a = f2.g.add_vertex(lane, "a", rect()).unwrap();
    let b = f2.g.add_vertex(lane, "b", rect()).unwrap();
    let ab = f2.g.add_edge(f2.pool, "", a, b).unwrap();
    let _ba = f2.g.add_edge(f2.pool, "", b, a).unwrap();
    let model = build(&mut f2, &[b, a], BuildOptions::default());
    assert_eq!(endpoints(&model, ab), (b, a));
}

#[test]
fn nodes_record_their_lane() {
    let mut f = fixture(2);
    let a = f.g.add_vertex(f.lanes[0], "a", rect()).unwrap();
    let group = f.g.add_vertex(f.lanes[1], "group", rect()).unwrap();
    let nested = f.g.add_vertex(group, "nested", rect()).unwrap();

    let model = build(&mut f, &[a, group, nested], BuildOptions::default());
    let lane = |v: CellId| model.node_for(v).unwrap().common.swimlane_index;
    assert_eq!(lane(a), Some(0));
    assert_eq!(lane(group), Some(1));
    assert_eq!(lane(nested), Some(1));
}

#[test]
fn port_edges_attach_to_owner() {
    let mut f = fixture(1);
    let lane = f.lanes[0];
    let a = f.g.add_vertex(lane, "a", rect()).unwrap();
    let b = f.g.add_vertex(lane, "b", rect()).unwrap();
    let port = f.g.add_port(b, "in").unwrap();
    let e = f.g.add_edge(f.pool, "", a, port).unwrap();

    let model = build(&mut f, &[a, b], BuildOptions::default());
    assert_eq!(model.edges().len(), 1);
    assert_eq!(endpoints(&model, e), (a, b));
    let a_node = model.node_for(a).unwrap();
    assert_eq!(a_node.connects_as_source.len(), 1);
    assert!(a_node.connects_as_target.is_empty());
}

#[test]
fn grouped_edges_are_reset_and_restyled() {
    let mut f = fixture(1);
    let lane = f.lanes[0];
    let a = f.g.add_vertex(lane, "a", rect()).unwrap();
    let b = f.g.add_vertex(lane, "b", rect()).unwrap();
    let e = f.g.add_edge(f.pool, "", a, b).unwrap();
    let mut geo = f.g.geometry(e).unwrap();
    geo.points = vec![Point::new(5.0, 5.0)];
    f.g.set_geometry(e, geo);

    build(
        &mut f,
        &[a, b],
        BuildOptions {
            disable_edge_style: false,
        },
    );
    assert!(f.g.edge_points(e).is_empty());
    assert_eq!(f.g.style(e), EdgeStyle::default());

    build(
        &mut f,
        &[a, b],
        BuildOptions {
            disable_edge_style: true,
        },
    );
    assert_eq!(
        f.g.style(e),
        EdgeStyle {
            no_edge_style: true,
            orthogonal: true,
        }
    );
}

#[test]
fn self_loops_and_unlisted_vertices_are_ignored() {
    let mut f = fixture(1);
    let lane = f.lanes[0];
    let a = f.g.add_vertex(lane, "a", rect()).unwrap();
    let b = f.g.add_vertex(lane, "b", rect()).unwrap();
    let _loop = f.g.add_edge(f.pool, "", a, a).unwrap();
    let _ab = f.g.add_edge(f.pool, "", a, b).unwrap();

    let model = build(&mut f, &[a], BuildOptions::default());
    assert_eq!(model.nodes().len(), 1);
    assert!(model.edges().is_empty());
}
