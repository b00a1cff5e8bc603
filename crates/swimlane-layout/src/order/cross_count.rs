use crate::model::SwimlaneModel;

/// Total crossings between every pair of adjacent ranks.
pub fn cross_count(model: &SwimlaneModel) -> usize {
    (1..model.ranks.len())
        .map(|rank| two_rank_cross_count(model, rank - 1))
        .sum()
}

/// Crossings between `upper` and `upper + 1`, counted with an accumulator tree over the lower
/// rank's positions.
fn two_rank_cross_count(model: &SwimlaneModel, upper: usize) -> usize {
    let lower = upper + 1;
    let south_len = model.ranks[lower].len();
    if south_len == 0 {
        return 0;
    }

    let mut south_entries: Vec<usize> = Vec::new();
    for &ix in &model.ranks[upper] {
        let mut entries: Vec<usize> = model
            .lower_cells(ix, upper)
            .into_iter()
            .filter_map(|c| usize::try_from(model.cell(c).general_purpose(lower)).ok())
            .collect();
        entries.sort_unstable();
        south_entries.extend(entries);
    }

    let mut first_index: usize = 1;
    while first_index < south_len {
        first_index <<= 1;
    }
    let tree_size = 2 * first_index - 1;
    first_index -= 1;
    let mut tree: Vec<usize> = vec![0; tree_size];

    let mut crossings = 0usize;
    for pos in south_entries {
        let mut index = pos + first_index;
        tree[index] += 1;
        let mut weight_sum = 0usize;
        while index > 0 {
            if index % 2 == 1 {
                weight_sum += tree[index + 1];
            }
            index = (index - 1) >> 1;
            tree[index] += 1;
        }
        crossings += weight_sum;
    }
    crossings
}
