use swimlane_layout::graph::{CellGraph, CellId, Rect};
use swimlane_layout::model::SwimlaneModel;
use swimlane_layout::model::builder::BuildOptions;
use swimlane_layout::order::{self, OrderOptions};
use swimlane_layout::view::GraphView;
use swimlane_layout::{acyclic, hierarchy, rank};

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

    fn ranked(&mut self) -> SwimlaneModel {
        let mut view = GraphView::new(self.pool, true);
        let found = hierarchy::discover(&self.g, &mut view, &self.lanes, true);
        let vertices: Vec<CellId> = found.vertices.iter().copied().collect();
        let mut model = SwimlaneModel::build(
            &mut self.g,
            &mut view,
            &vertices,
            found.roots,
            &self.lanes,
            BuildOptions::default(),
        );
        acyclic::run(&mut model);
        rank::initial_rank(&mut model, true);
        rank::fix_ranks(&mut model);
        model
    }
}

fn cells_of(model: &SwimlaneModel, rank: usize) -> Vec<CellId> {
    model.ranks[rank]
        .iter()
        .filter_map(|&ix| model.node(ix).map(|n| n.cell))
        .collect()
}

fn sorted_contents(model: &SwimlaneModel) -> Vec<Vec<usize>> {
    model
        .ranks
        .iter()
        .map(|bucket| {
            let mut ids: Vec<usize> = bucket.iter().map(|ix| ix.index()).collect();
            ids.sort_unstable();
            ids
        })
        .collect()
}

/// A generated multi-lane graph with plenty of crossings.
fn tangled() -> Fixture {
    let mut f = Fixture::new(3);
    let v: Vec<CellId> = (0..30)
        .map(|i| f.vertex(i % 3, &format!("v{i}")))
        .collect();
    let mut seed = 5usize;
    for _ in 0..60 {
        seed = (seed * 1103515245 + 12345) % 2147483648;
        let s = seed % 30;
        seed = (seed * 1103515245 + 12345) % 2147483648;
        let t = seed % 30;
        if s != t {
            f.edge(v[s], v[t]);
        }
    }
    f
}

#[test]
fn counts_a_single_crossing() {
    let mut f = Fixture::new(1);
    let a = f.vertex(0, "a");
    let b = f.vertex(0, "b");
    let c = f.vertex(0, "c");
    let d = f.vertex(0, "d");
    f.edge(a, c);
    f.edge(a, d);
    f.edge(b, c);

    let model = f.ranked();
    assert_eq!(cells_of(&model, 0), vec![a, b]);
    assert_eq!(cells_of(&model, 1), vec![c, d]);
    assert_eq!(order::cross_count(&model), 1);
}

#[test]
fn reduce_removes_a_removable_crossing() {
    let mut f = Fixture::new(1);
    let a = f.vertex(0, "a");
    let b = f.vertex(0, "b");
    let c = f.vertex(0, "c");
    let d = f.vertex(0, "d");
    f.edge(a, c);
    f.edge(a, d);
    f.edge(b, c);

    let mut model = f.ranked();
    let before = sorted_contents(&model);
    assert_eq!(order::reduce(&mut model, OrderOptions::default()), 0);
    assert_eq!(order::cross_count(&model), 0);
    assert_eq!(sorted_contents(&model), before);
}

#[test]
fn reduce_only_permutes_within_ranks() {
    let mut f = tangled();
    let mut model = f.ranked();
    let before = sorted_contents(&model);
    let initial = order::cross_count(&model);

    let kept = order::reduce(&mut model, OrderOptions::default());
    assert!(kept <= initial);
    assert_eq!(order::cross_count(&model), kept);
    assert_eq!(sorted_contents(&model), before);

    for (rank, bucket) in model.ranks.iter().enumerate() {
        for (i, &ix) in bucket.iter().enumerate() {
            assert_eq!(model.cell(ix).general_purpose(rank), i as i32);
        }
    }
}

#[test]
fn more_sweeps_never_add_crossings() {
    let mut f = tangled();
    let base = f.ranked();

    let mut previous = order::cross_count(&base);
    for sweeps in 1..8 {
        let mut model = base.clone();
        let crossings = order::reduce(
            &mut model,
            OrderOptions {
                max_iterations: sweeps,
                iterations_without_improvement: usize::MAX,
            },
        );
        assert!(
            crossings <= previous,
            "{sweeps} sweeps gave {crossings}, fewer gave {previous}"
        );
        previous = crossings;
    }
}

#[test]
fn zero_iterations_keep_the_initial_order() {
    let mut f = tangled();
    let mut model = f.ranked();
    let before = model.ranks.clone();
    let initial = order::cross_count(&model);
    let kept = order::reduce(
        &mut model,
        OrderOptions {
            max_iterations: 0,
            iterations_without_improvement: 2,
        },
    );
    assert_eq!(kept, initial);
    assert_eq!(model.ranks, before);
}
