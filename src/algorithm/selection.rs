use crate::{
    algorithm::bitset::TileBitset,
    algorithm::constraints::ConstraintContext,
    math::probability::{RandomSelector, cumulative_weights, sample_cumulative},
    spatial::grid::{CellPosition, CellState, GridState},
    spatial::tiles::TileCatalog,
};

/// Weighted entropy of a possibility set, `-Σ w·log10(w)` over present tiles
///
/// Weights above one contribute negatively, so the result can be zero or
/// negative; such cells are left to the random fallback.
pub fn cell_entropy(catalog: &TileCatalog, possibilities: &TileBitset) -> f64 {
    -possibilities
        .iter()
        .map(|tile| {
            let weight = catalog.weight(tile);
            weight * weight.log10()
        })
        .sum::<f64>()
}

/// Undecided cell with the lowest positive finite entropy
///
/// Cells are scanned `x`, then `z`, then `y`; the first cell reaching the
/// minimum wins ties.
pub fn find_lowest_entropy(grid: &GridState, catalog: &TileCatalog) -> Option<CellPosition> {
    let mut best: Option<(CellPosition, f64)> = None;
    for position in grid.undecided_positions() {
        let Some(possibilities) = grid.possibilities(position) else {
            continue;
        };
        let entropy = cell_entropy(catalog, possibilities);
        if !entropy.is_finite() || entropy <= 0.0 {
            continue;
        }
        if best.is_none_or(|(_, lowest)| entropy < lowest) {
            best = Some((position, entropy));
        }
    }
    best.map(|(position, _)| position)
}

/// Next cell to decide, or `None` once every cell is decided
///
/// Falls back to a uniform pick over all undecided cells when no cell has a
/// positive finite entropy.
pub fn choose_cell(
    grid: &GridState,
    catalog: &TileCatalog,
    random: &mut RandomSelector,
) -> Option<CellPosition> {
    if let Some(position) = find_lowest_entropy(grid, catalog) {
        return Some(position);
    }
    let undecided = grid.undecided_positions();
    random
        .uniform_index(undecided.len())
        .and_then(|index| undecided.get(index).copied())
}

/// Possible tiles at `position` that pass every placement filter
pub fn viable_candidates(
    context: &ConstraintContext<'_>,
    possibilities: &TileBitset,
    position: CellPosition,
) -> Vec<usize> {
    possibilities
        .iter()
        .filter(|&tile| context.is_viable(position, tile))
        .collect()
}

/// Weighted pick among `candidates` by cumulative-weight binary search
///
/// An empty candidate list decides the cell as empty.
pub fn pick_weighted(
    catalog: &TileCatalog,
    candidates: &[usize],
    random: &mut RandomSelector,
) -> CellState {
    let weights: Vec<f64> = candidates.iter().map(|&tile| catalog.weight(tile)).collect();
    let cumulative = cumulative_weights(&weights);
    let Some(total) = cumulative.last().copied() else {
        return CellState::Empty;
    };
    let draw = random.unit() * total;
    sample_cumulative(&cumulative, draw)
        .and_then(|index| candidates.get(index).copied())
        .map_or(CellState::Empty, CellState::Tile)
}

/// Filter the cell's possibilities and draw its tile
pub fn pick_tile(
    context: &ConstraintContext<'_>,
    position: CellPosition,
    random: &mut RandomSelector,
) -> CellState {
    let Some(possibilities) = context.grid().possibilities(position) else {
        return CellState::Empty;
    };
    let candidates = viable_candidates(context, possibilities, position);
    pick_weighted(context.catalog(), &candidates, random)
}
