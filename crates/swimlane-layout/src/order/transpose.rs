use super::{positions, renumber};
use crate::identity::CellIx;
use crate::model::SwimlaneModel;

const MAX_ROUNDS: usize = 10;

/// Swaps adjacent cells while that lowers the crossings they take part in.
///
/// On odd iterations every other round also swaps on a tie, which lets equal-cost layouts drift
/// out of local minima.
pub(super) fn transpose(model: &mut SwimlaneModel, iteration: usize) {
    let mut improved = true;
    let mut round = 0usize;
    while improved && round < MAX_ROUNDS {
        round += 1;
        let nudge = iteration % 2 == 1 && round % 2 == 1;
        improved = false;

        for rank in 0..model.ranks.len() {
            let len = model.ranks[rank].len();
            for j in 0..len.saturating_sub(1) {
                let a = model.ranks[rank][j];
                let b = model.ranks[rank][j + 1];
                let (current, switched) = pair_crossings(model, rank, a, b);
                if switched < current || (nudge && switched == current && current > 0) {
                    model.ranks[rank].swap(j, j + 1);
                    renumber(model, rank);
                    improved = true;
                }
            }
        }
    }
}

/// Crossings among the edges of `a` and `b` (with `a` left of `b`) as they are, and with the
/// two swapped.
fn pair_crossings(model: &SwimlaneModel, rank: usize, a: CellIx, b: CellIx) -> (usize, usize) {
    let mut current = 0usize;
    let mut switched = 0usize;

    let mut count = |pa: &[i32], pb: &[i32]| {
        for &x in pa {
            for &y in pb {
                if x > y {
                    current += 1;
                }
                if x < y {
                    switched += 1;
                }
            }
        }
    };

    if rank > 0 {
        let pa = positions(model, &model.upper_cells(a, rank), rank - 1);
        let pb = positions(model, &model.upper_cells(b, rank), rank - 1);
        count(&pa, &pb);
    }
    if rank + 1 < model.ranks.len() {
        let pa = positions(model, &model.lower_cells(a, rank), rank + 1);
        let pb = positions(model, &model.lower_cells(b, rank), rank + 1);
        count(&pa, &pb);
    }
    (current, switched)
}
