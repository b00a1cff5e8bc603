use super::{positions, renumber};
use crate::identity::CellIx;
use crate::model::SwimlaneModel;

/// One median sweep. Even iterations walk down the ranks ordering each by its upper
/// neighbours; odd iterations walk up ordering by lower neighbours.
pub(super) fn weighted_median(model: &mut SwimlaneModel, iteration: usize) {
    let max_rank = model.ranks.len().saturating_sub(1);
    if iteration % 2 == 0 {
        for rank in 1..=max_rank {
            median_rank(model, rank, true);
        }
    } else {
        for rank in (0..max_rank).rev() {
            median_rank(model, rank, false);
        }
    }
}

/// Reorders one rank by neighbour medians. Cells without neighbours keep their position.
fn median_rank(model: &mut SwimlaneModel, rank: usize, use_upper: bool) {
    let cells = model.ranks[rank].clone();
    let mut reserved = vec![None; cells.len()];
    let mut sorted: Vec<(f64, CellIx)> = Vec::new();

    for (i, &ix) in cells.iter().enumerate() {
        let (neighbours, neighbour_rank) = if use_upper {
            (model.upper_cells(ix, rank), rank - 1)
        } else {
            (model.lower_cells(ix, rank), rank + 1)
        };
        let values = positions(model, &neighbours, neighbour_rank);
        match median_value(&values) {
            Some(median) => sorted.push((median, ix)),
            None => reserved[i] = Some(ix),
        }
    }

    sorted.sort_by(|a, b| a.0.total_cmp(&b.0));
    let mut movable = sorted.into_iter().map(|(_, ix)| ix);
    let reordered: Vec<CellIx> = reserved
        .into_iter()
        .filter_map(|slot| slot.or_else(|| movable.next()))
        .collect();

    model.ranks[rank] = reordered;
    renumber(model, rank);
}

/// Weighted median of sorted positions: for an even count the two middle values are weighted
/// by the spread on the opposite side.
pub(super) fn median_value(values: &[i32]) -> Option<f64> {
    let n = values.len();
    if n == 0 {
        return None;
    }
    if n % 2 == 1 {
        return Some(values[n / 2] as f64);
    }
    if n == 2 {
        return Some((values[0] + values[1]) as f64 / 2.0);
    }
    let mid = n / 2;
    let left = (values[mid - 1] - values[0]) as f64;
    let right = (values[n - 1] - values[mid]) as f64;
    if left + right == 0.0 {
        return Some((values[mid - 1] + values[mid]) as f64 / 2.0);
    }
    Some((values[mid - 1] as f64 * right + values[mid] as f64 * left) / (left + right))
}

#[cfg(test)]
mod tests {
    use super::median_value;

    #[test]
    fn median_of_positions() {
        assert_eq!(median_value(&[]), None);
        assert_eq!(median_value(&[4]), Some(4.0));
        assert_eq!(median_value(&[1, 3]), Some(2.0));
        assert_eq!(median_value(&[0, 1, 5]), Some(1.0));
        // Spread 1 on the left, 6 on the right pulls the median towards the left middle.
        assert_eq!(median_value(&[0, 1, 2, 8]), Some((1.0 * 6.0 + 2.0 * 1.0) / 7.0));
        assert_eq!(median_value(&[3, 3, 3, 3]), Some(3.0));
    }
}
