use criterion::{BatchSize, BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use std::time::Duration;
use swimlane_layout::SwimlaneLayout;
use swimlane_layout::graph::{CellGraph, CellId, Rect};

#[derive(Debug, Clone)]
struct PoolSpec {
    lanes: usize,
    vertices: usize,
    edges: Vec<(usize, usize)>,
}

impl PoolSpec {
    fn build(&self) -> (CellGraph, CellId, Vec<CellId>) {
        let mut g = CellGraph::new();
        let layer = g.default_parent();
        let pool = g
            .add_vertex(layer, "pool", Rect::new(0.0, 0.0, 1000.0, 1000.0))
            .unwrap();
        let lanes: Vec<CellId> = (0..self.lanes)
            .map(|i| {
                g.add_vertex(pool, format!("lane{i}"), Rect::new(0.0, 0.0, 1000.0, 200.0))
                    .unwrap()
            })
            .collect();
        let vertices: Vec<CellId> = (0..self.vertices)
            .map(|i| {
                g.add_vertex(lanes[i % self.lanes], "", Rect::new(0.0, 0.0, 80.0, 40.0))
                    .unwrap()
            })
            .collect();
        for &(from, to) in &self.edges {
            g.add_edge(pool, "", vertices[from], vertices[to]).unwrap();
        }
        (g, pool, lanes)
    }
}

fn build_pool_spec(lanes: usize, vertices: usize, fanout: usize) -> PoolSpec {
    let mut edges = Vec::new();

    // A spine to keep the pool connected.
    for i in 0..vertices.saturating_sub(1) {
        edges.push((i, i + 1));
    }

    // Forward edges across lanes for crossing pressure, plus a few running back up.
    for i in 0..vertices {
        for k in 2..=(fanout + 1) {
            let to = i + k * 3;
            if to >= vertices {
                break;
            }
            edges.push((i, to));
        }
        if i % 7 == 0 && i >= 5 {
            edges.push((i, i - 5));
        }
    }

    PoolSpec {
        lanes,
        vertices,
        edges,
    }
}

fn bench_swimlane_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("swimlane_layout");
    group.measurement_time(Duration::from_secs(10));

    let cases = [
        ("pool_3x30_f2", 3usize, 30usize, 2usize),
        ("pool_4x120_f3", 4usize, 120usize, 3usize),
        ("pool_6x300_f3", 6usize, 300usize, 3usize),
    ];

    let layout = SwimlaneLayout::default();
    for (name, lanes, vertices, fanout) in cases {
        let spec = build_pool_spec(lanes, vertices, fanout);
        group.bench_with_input(BenchmarkId::new("execute", name), &spec, |b, spec| {
            b.iter_batched(
                || spec.build(),
                |(mut g, pool, lanes)| {
                    let summary = layout
                        .execute(black_box(&mut g), Some(pool), &lanes)
                        .unwrap();
                    black_box(summary.limit_x);
                },
                BatchSize::LargeInput,
            )
        });
    }

    group.finish();
}

criterion_group!(benches, bench_swimlane_layout);
criterion_main!(benches);
