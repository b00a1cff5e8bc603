//! Rank assignment constrained to per-lane rank bands.
//!
//! Ranks count from 0 at the top. Every lane owns a contiguous band of ranks sized by the
//! longest chain of edges confined to it, and lane bands are stacked in lane order. Inside its
//! band a node sits one rank below its lowest ranked source.

use crate::identity::CellIx;
use crate::model::{SwimlaneModel, Visit};

/// Ranks every node. Returns the nodes the worklist could not rank; they receive a best-effort
/// rank inside their lane's band.
pub fn initial_rank(model: &mut SwimlaneModel, tighten_to_source: bool) -> Vec<CellIx> {
    compute_lane_bands(model);

    for ix in model.nodes().to_vec() {
        if let Some(node) = model.node_mut(ix) {
            node.common.min_rank = None;
            node.common.max_rank = None;
        }
    }

    let mut queue: std::collections::VecDeque<CellIx> = std::collections::VecDeque::new();
    let mut queued = vec![false; model.cell_count()];
    let seeds = model.root_nodes().into_iter().chain(
        model
            .nodes()
            .iter()
            .copied()
            .filter(|&ix| model.node(ix).is_some_and(|n| n.connects_as_target.is_empty()))
            .collect::<Vec<_>>(),
    );
    for ix in seeds {
        if !queued[ix.index()] {
            queued[ix.index()] = true;
            queue.push_back(ix);
        }
    }

    let mut deferred = 0usize;
    while let Some(ix) = queue.pop_front() {
        match rank_from_sources(model, ix) {
            Some(rank) => {
                deferred = 0;
                set_node_rank(model, ix, rank);
                for target in targets(model, ix) {
                    if !queued[target.index()] {
                        queued[target.index()] = true;
                        queue.push_back(target);
                    }
                }
            }
            None => {
                queue.push_back(ix);
                deferred += 1;
                // Every queued node has been deferred once without progress in between.
                if deferred >= queue.len() {
                    break;
                }
            }
        }
    }

    let mut stalled = Vec::new();
    for ix in model.nodes().to_vec() {
        if model.node(ix).is_some_and(|n| n.rank().is_some()) {
            continue;
        }
        let lane = model.lane(ix);
        let (lower, upper) = band(model, lane);
        let rank = sources(model, ix)
            .filter_map(|s| model.node(s).and_then(|n| n.rank()))
            .map(|r| r + 1)
            .fold(lower, usize::max)
            .min(upper);
        tracing::warn!(node = ix.index(), lane, rank, "rank worklist stalled; using fallback rank");
        set_node_rank(model, ix, rank);
        stalled.push(ix);
    }

    if !tighten_to_source {
        tighten_start_nodes(model);
    }

    tracing::debug!(
        max_rank = model.max_rank,
        lanes = model.lane_bands.len(),
        stalled = stalled.len(),
        "assigned initial ranks"
    );
    stalled
}

/// Fills the rank buckets: nodes in traversal order, and every edge spanning more than one rank
/// once into each rank strictly between its ends.
pub fn fix_ranks(model: &mut SwimlaneModel) {
    for ix in model.edges().to_vec() {
        let Some((source, target)) = model.edge(ix).map(|e| (e.source, e.target)) else {
            continue;
        };
        let min = model.node(source).and_then(|n| n.rank());
        let max = model.node(target).and_then(|n| n.rank());
        let Some(edge) = model.edge_mut(ix) else {
            continue;
        };
        edge.common.min_rank = min;
        edge.common.max_rank = max;
        let slots = match (min, max) {
            (Some(min), Some(max)) if max > min + 1 => max - min - 1,
            _ => 1,
        };
        edge.common.temp = vec![-1; slots];
        edge.common.x = vec![0.0; slots];
        edge.common.y = vec![0.0; slots];
    }

    model.ranks = vec![Vec::new(); model.max_rank + 1];
    let mut roots = model.root_nodes();
    roots.extend(model.nodes().iter().copied());

    model.visit(&roots, false, &mut |model: &mut SwimlaneModel, visit: Visit| {
        if !visit.seen {
            if let Some(rank) = model.node(visit.node).and_then(|n| n.rank()) {
                place(model, visit.node, rank);
            }
        }
        if let Some(edge) = visit.edge {
            let span = model
                .edge(edge)
                .filter(|e| e.has_slots())
                .and_then(|e| Some((e.common.min_rank?, e.common.max_rank?)));
            if let Some((min, max)) = span {
                for rank in min + 1..max {
                    place(model, edge, rank);
                }
            }
        }
    });

    tracing::debug!(
        ranks = model.ranks.len(),
        cells = model.ranks.iter().map(Vec::len).sum::<usize>(),
        "filled rank buckets"
    );
}

fn place(model: &mut SwimlaneModel, ix: CellIx, rank: usize) {
    if rank >= model.ranks.len() {
        model.ranks.resize_with(rank + 1, Vec::new);
    }
    let position = model.ranks[rank].len() as i32;
    model.cell_mut(ix).set_general_purpose(rank, position);
    model.ranks[rank].push(ix);
}

fn compute_lane_bands(model: &mut SwimlaneModel) {
    let lane_count = model
        .nodes()
        .iter()
        .map(|&ix| model.lane(ix) + 1)
        .max()
        .unwrap_or(0)
        .max(model.lane_count);

    let mut depth: Vec<Option<usize>> = vec![None; model.cell_count()];
    let mut on_stack = vec![false; model.cell_count()];
    let mut ranks_per_group = vec![0usize; lane_count];
    for ix in model.nodes().to_vec() {
        let d = chain_depth(model, ix, &mut depth, &mut on_stack);
        let lane = model.lane(ix);
        ranks_per_group[lane] = ranks_per_group[lane].max(d);
    }

    let mut bands = Vec::with_capacity(lane_count);
    let mut lower = 0usize;
    for &per_group in &ranks_per_group {
        let upper = lower + per_group;
        bands.push((lower, upper));
        lower = upper + 1;
    }

    model.max_rank = bands.last().map(|&(_, upper)| upper).unwrap_or(0);
    model.ranks_per_group = ranks_per_group;
    model.lane_bands = bands;
}

/// Length (in edges) of the longest same-lane chain ending at `ix`.
fn chain_depth(
    model: &SwimlaneModel,
    ix: CellIx,
    depth: &mut [Option<usize>],
    on_stack: &mut [bool],
) -> usize {
    if let Some(d) = depth[ix.index()] {
        return d;
    }
    if on_stack[ix.index()] {
        return 0;
    }
    on_stack[ix.index()] = true;
    let lane = model.lane(ix);
    let mut best = 0usize;
    for source in sources(model, ix).collect::<Vec<_>>() {
        if model.lane(source) == lane {
            best = best.max(chain_depth(model, source, depth, on_stack) + 1);
        }
    }
    on_stack[ix.index()] = false;
    depth[ix.index()] = Some(best);
    best
}

fn band(model: &SwimlaneModel, lane: usize) -> (usize, usize) {
    model.lane_bands.get(lane).copied().unwrap_or((0, model.max_rank))
}

fn rank_from_sources(model: &SwimlaneModel, ix: CellIx) -> Option<usize> {
    let (lower, _) = band(model, model.lane(ix));
    let mut rank = lower;
    for source in sources(model, ix) {
        let source_rank = model.node(source)?.rank()?;
        rank = rank.max(source_rank + 1);
    }
    Some(rank)
}

fn set_node_rank(model: &mut SwimlaneModel, ix: CellIx, rank: usize) {
    if let Some(node) = model.node_mut(ix) {
        node.common.min_rank = Some(rank);
        node.common.max_rank = Some(rank);
    }
}

fn sources(model: &SwimlaneModel, ix: CellIx) -> impl Iterator<Item = CellIx> + '_ {
    model
        .node(ix)
        .into_iter()
        .flat_map(|n| n.connects_as_target.iter())
        .filter_map(|&e| model.edge(e).map(|e| e.source))
}

fn targets(model: &SwimlaneModel, ix: CellIx) -> Vec<CellIx> {
    model
        .node(ix)
        .into_iter()
        .flat_map(|n| n.connects_as_source.iter())
        .filter_map(|&e| model.edge(e).map(|e| e.target))
        .collect()
}

/// Moves nodes without sources down to one rank above their nearest target.
fn tighten_start_nodes(model: &mut SwimlaneModel) {
    for ix in model.nodes().to_vec() {
        let Some(node) = model.node(ix) else {
            continue;
        };
        if !node.connects_as_target.is_empty() || node.connects_as_source.is_empty() {
            continue;
        }
        let Some(current) = node.rank() else {
            continue;
        };
        let (_, upper) = band(model, model.lane(ix));
        let nearest = targets(model, ix)
            .into_iter()
            .filter_map(|t| model.node(t).and_then(|n| n.rank()))
            .min();
        if let Some(nearest) = nearest {
            let rank = nearest.saturating_sub(1).min(upper).max(current);
            set_node_rank(model, ix, rank);
        }
    }
}
