//! Crossing reduction.
//!
//! Weighted-median sweeps alternate direction between iterations and are followed by an
//! adjacent-transposition pass. The ordering with the fewest crossings seen so far is kept;
//! a non-improving iteration restarts from it.

mod cross_count;
mod median;
mod transpose;

pub use cross_count::cross_count;

use crate::identity::CellIx;
use crate::model::SwimlaneModel;

#[derive(Debug, Clone, Copy)]
pub struct OrderOptions {
    pub max_iterations: usize,
    pub iterations_without_improvement: usize,
}

impl Default for OrderOptions {
    fn default() -> Self {
        Self {
            max_iterations: 24,
            iterations_without_improvement: 2,
        }
    }
}

/// Reorders every rank bucket in place. Returns the crossing count of the kept ordering.
pub fn reduce(model: &mut SwimlaneModel, opts: OrderOptions) -> usize {
    renumber_all(model);
    let mut best_crossings = cross_count(model);
    let mut best = model.ranks.clone();
    let initial = best_crossings;

    let mut without_improvement = 0usize;
    let mut iteration = 0usize;
    while iteration < opts.max_iterations
        && without_improvement < opts.iterations_without_improvement
        && best_crossings > 0
    {
        median::weighted_median(model, iteration);
        transpose::transpose(model, iteration);

        let crossings = cross_count(model);
        if crossings < best_crossings {
            best_crossings = crossings;
            best = model.ranks.clone();
            without_improvement = 0;
        } else {
            without_improvement += 1;
            restore(model, &best);
        }
        iteration += 1;
    }

    restore(model, &best);
    tracing::debug!(
        iterations = iteration,
        initial,
        crossings = best_crossings,
        "reduced crossings"
    );
    best_crossings
}

fn restore(model: &mut SwimlaneModel, ranks: &[Vec<CellIx>]) {
    model.ranks = ranks.to_vec();
    renumber_all(model);
}

/// Writes each cell's bucket index into its per-rank scratch slot.
pub(crate) fn renumber(model: &mut SwimlaneModel, rank: usize) {
    let Some(cells) = model.ranks.get(rank).cloned() else {
        return;
    };
    for (i, ix) in cells.into_iter().enumerate() {
        model.cell_mut(ix).set_general_purpose(rank, i as i32);
    }
}

pub(crate) fn renumber_all(model: &mut SwimlaneModel) {
    for rank in 0..model.ranks.len() {
        renumber(model, rank);
    }
}

/// Bucket positions of `cells` in `rank`, ascending.
pub(crate) fn positions(model: &SwimlaneModel, cells: &[CellIx], rank: usize) -> Vec<i32> {
    let mut out: Vec<i32> = cells
        .iter()
        .map(|&c| model.cell(c).general_purpose(rank))
        .filter(|&p| p >= 0)
        .collect();
    out.sort_unstable();
    out
}
