//! Local placement passes run after the initial packing.
//!
//! None of them changes an in-rank order; every move keeps cells at least
//! `intra_cell_spacing` apart.

use super::{Columns, PositionOptions, neighbours};
use crate::identity::CellIx;
use crate::model::SwimlaneModel;
use std::collections::VecDeque;

const TOLERANCE: f64 = 1.0;

pub(super) fn run(model: &SwimlaneModel, columns: &mut Columns, opts: &PositionOptions) {
    let spacing = opts.intra_cell_spacing;
    min_node(model, columns, spacing);

    let mut best = columns.x.clone();
    let mut best_deviation = total_deviation(model, columns);
    for iteration in 1..opts.max_placement_iterations {
        median_pos(model, columns, iteration, spacing);
        min_node(model, columns, spacing);

        let deviation = total_deviation(model, columns);
        if deviation < best_deviation {
            best_deviation = deviation;
            best = columns.x.clone();
        } else {
            columns.x = best.clone();
        }
    }
    columns.x = best;

    min_path(model, columns, spacing);
    tracing::debug!(deviation = total_deviation(model, columns), "fine-tuned placement");
}

/// Sum of horizontal offsets over every link between adjacent ranks.
fn total_deviation(model: &SwimlaneModel, columns: &Columns) -> f64 {
    let mut total = 0.0;
    for (rank, cells) in model.ranks.iter().enumerate() {
        for (i, &ix) in cells.iter().enumerate() {
            for (r, p) in neighbours(model, rank, ix, false, true) {
                total += (columns.x[rank][i] - columns.x[r][p]).abs();
            }
        }
    }
    total
}

fn median_x(values: &mut [f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 1 {
        Some(values[mid])
    } else {
        Some((values[mid - 1] + values[mid]) / 2.0)
    }
}

/// Moves cells towards the median of all their neighbours, as far as the free space beside them
/// allows. A moved cell requeues its neighbours.
fn min_node(model: &SwimlaneModel, columns: &mut Columns, spacing: f64) {
    let mut queue: VecDeque<(usize, usize)> = VecDeque::new();
    let mut queued: Vec<Vec<bool>> = model.ranks.iter().map(|c| vec![true; c.len()]).collect();
    for (rank, cells) in model.ranks.iter().enumerate() {
        queue.extend((0..cells.len()).map(|i| (rank, i)));
    }

    let max_tries = queue.len() * 10;
    let mut tries = 0usize;
    while let Some((rank, i)) = queue.pop_front() {
        if tries >= max_tries {
            break;
        }
        tries += 1;
        queued[rank][i] = false;

        let ix = model.ranks[rank][i];
        let adjacent = neighbours(model, rank, ix, true, true);
        let mut xs: Vec<f64> = adjacent.iter().map(|&(r, p)| columns.x[r][p]).collect();
        let Some(median) = median_x(&mut xs) else {
            continue;
        };

        let current = columns.x[rank][i];
        let mut moved = false;
        if median < current - TOLERANCE {
            let target = if i == 0 {
                median
            } else {
                median.max(columns.x[rank][i - 1] + columns.gap(rank, i - 1, spacing))
            };
            if target < current - TOLERANCE {
                columns.x[rank][i] = target;
                moved = true;
            }
        } else if median > current + TOLERANCE {
            let last = model.ranks[rank].len() - 1;
            let target = if i == last {
                median
            } else {
                median.min(columns.x[rank][i + 1] - columns.gap(rank, i, spacing))
            };
            if target > current + TOLERANCE {
                columns.x[rank][i] = target;
                moved = true;
            }
        }

        if moved {
            for (r, p) in adjacent {
                if !queued[r][p] {
                    queued[r][p] = true;
                    queue.push_back((r, p));
                }
            }
        }
    }
}

fn connection_weight(model: &SwimlaneModel, a: CellIx, b: CellIx) -> u32 {
    match (model.cell(a).is_node(), model.cell(b).is_node()) {
        (true, true) => 1,
        (false, false) => 8,
        _ => 2,
    }
}

/// One sweep placing each rank against the previous one. Cells with more (and heavier) links are
/// placed first; later cells fit around them.
fn median_pos(model: &SwimlaneModel, columns: &mut Columns, iteration: usize, spacing: f64) {
    let max_rank = model.ranks.len().saturating_sub(1);
    if iteration % 2 == 0 {
        for rank in 1..=max_rank {
            rank_median_position(model, columns, rank, true, spacing);
        }
    } else {
        for rank in (0..max_rank).rev() {
            rank_median_position(model, columns, rank, false, spacing);
        }
    }
}

fn rank_median_position(
    model: &SwimlaneModel,
    columns: &mut Columns,
    rank: usize,
    use_upper: bool,
    spacing: f64,
) {
    let cells = &model.ranks[rank];
    let links: Vec<Vec<(usize, usize)>> = cells
        .iter()
        .map(|&ix| neighbours(model, rank, ix, use_upper, !use_upper))
        .collect();

    let mut priority: Vec<(u32, usize)> = cells
        .iter()
        .zip(&links)
        .enumerate()
        .map(|(i, (&ix, adjacent))| {
            let weight: u32 = adjacent
                .iter()
                .map(|&(r, p)| connection_weight(model, ix, model.ranks[r][p]))
                .sum();
            (weight, i)
        })
        .collect();
    priority.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));

    let mut placed = vec![false; cells.len()];
    for (_, i) in priority {
        let mut xs: Vec<f64> = links[i].iter().map(|&(r, p)| columns.x[r][p]).collect();
        let median = median_x(&mut xs).unwrap_or(columns.x[rank][i]);

        let mut left_limit = f64::NEG_INFINITY;
        let mut buffer = 0.0;
        for j in (0..i).rev() {
            if placed[j] {
                left_limit = columns.x[rank][j] + columns.width[rank][j] / 2.0 + spacing + buffer
                    + columns.width[rank][i] / 2.0;
                break;
            }
            buffer += columns.width[rank][j] + spacing;
        }

        let mut right_limit = f64::INFINITY;
        let mut buffer = 0.0;
        for j in i + 1..cells.len() {
            if placed[j] {
                right_limit = columns.x[rank][j] - columns.width[rank][j] / 2.0 - spacing - buffer
                    - columns.width[rank][i] / 2.0;
                break;
            }
            buffer += columns.width[rank][j] + spacing;
        }

        columns.x[rank][i] = median.clamp(left_limit, right_limit.max(left_limit));
        placed[i] = true;
    }
}

/// Whether the cell at `(rank, i)` can move to `x` without crowding its neighbours.
fn reposition_valid(columns: &Columns, rank: usize, i: usize, x: f64, spacing: f64) -> bool {
    let current = columns.x[rank][i];
    if x == current {
        return true;
    }
    if x < current {
        i == 0 || columns.x[rank][i - 1] + columns.gap(rank, i - 1, spacing) <= x
    } else {
        i + 1 == columns.x[rank].len() || columns.x[rank][i + 1] - columns.gap(rank, i, spacing) >= x
    }
}

/// Straightens edges that occupy two or more placeholder slots by snapping runs of slots onto a
/// common x, from the top or from the bottom, whichever yields more straight segments.
fn min_path(model: &SwimlaneModel, columns: &mut Columns, spacing: f64) {
    for &e in model.edges() {
        let Some(edge) = model.edge(e) else {
            continue;
        };
        if !edge.has_slots() {
            continue;
        }
        let (Some(min), Some(max)) = (edge.common.min_rank, edge.common.max_rank) else {
            continue;
        };
        let cell = model.cell(e);
        let slots: Vec<(usize, usize)> = (min + 1..max)
            .filter_map(|rank| {
                usize::try_from(cell.general_purpose(rank))
                    .ok()
                    .map(|pos| (rank, pos))
            })
            .collect();
        if slots.len() < 2 {
            continue;
        }
        let xs: Vec<f64> = slots.iter().map(|&(r, p)| columns.x[r][p]).collect();
        let straight = xs.windows(2).filter(|w| w[0] == w[1]).count();
        if straight + 1 == xs.len() {
            continue;
        }

        let snap = |order: &mut dyn Iterator<Item = usize>| {
            let mut result = xs.clone();
            let mut count = 0usize;
            let mut current: Option<f64> = None;
            for k in order {
                let Some(value) = current else {
                    current = Some(xs[k]);
                    continue;
                };
                let (r, p) = slots[k];
                if xs[k] == value || reposition_valid(columns, r, p, value, spacing) {
                    result[k] = value;
                    count += 1;
                } else {
                    current = Some(xs[k]);
                }
            }
            (count, result)
        };
        let (up_count, up) = snap(&mut (0..xs.len()));
        let (down_count, down) = snap(&mut (0..xs.len()).rev());

        if up_count.max(down_count) > straight {
            let chosen = if down_count >= up_count { down } else { up };
            for (&(r, p), x) in slots.iter().zip(chosen) {
                columns.x[r][p] = x;
            }
        }
    }
}
