//! Tests for entropy-driven cell choice and weighted tile picks

#[cfg(test)]
mod tests {
    use towerwfc::algorithm::bitset::TileBitset;
    use towerwfc::algorithm::constraints::{ConnectivityPolicy, ConstraintContext, ExternalFaces};
    use towerwfc::algorithm::selection::{
        cell_entropy, choose_cell, find_lowest_entropy, pick_tile, pick_weighted,
        viable_candidates,
    };
    use towerwfc::math::probability::RandomSelector;
    use towerwfc::spatial::direction::Direction;
    use towerwfc::spatial::grid::{CellState, GridState};
    use towerwfc::spatial::tiles::{TileCatalog, TileDefinition};

    fn weighted_catalog(weights: &[f64]) -> TileCatalog {
        let definitions = weights
            .iter()
            .enumerate()
            .map(|(index, &weight)| TileDefinition::new(format!("tile{index}"), weight))
            .collect();
        TileCatalog::from_definitions(definitions).unwrap_or_else(|err| panic!("{err}"))
    }

    // Tests entropy follows -Σ w·log10(w)
    // Verified by switching log10 to natural log
    #[test]
    fn test_cell_entropy() {
        let catalog = weighted_catalog(&[0.5, 0.5, 1.0]);
        let mut set = TileBitset::new(3);
        set.insert(0);
        set.insert(1);
        let expected = -2.0 * 0.5 * 0.5_f64.log10();
        assert!((cell_entropy(&catalog, &set) - expected).abs() < 1e-12);

        set.insert(2);
        assert!((cell_entropy(&catalog, &set) - expected).abs() < 1e-12);
        assert!(cell_entropy(&catalog, &TileBitset::new(3)).abs() < f64::EPSILON);
    }

    // Tests the cell with fewer options wins and ties go to scan order
    // Verified by selecting the maximum entropy instead
    #[test]
    fn test_find_lowest_entropy() {
        let catalog = weighted_catalog(&[0.5, 0.5, 0.5]);
        let mut grid = GridState::new([2, 1, 1], &TileBitset::all(3));
        assert_eq!(find_lowest_entropy(&grid, &catalog), Some([0, 0, 0]));

        if let Some(set) = grid.possibilities_mut([1, 0, 0]) {
            set.remove(2);
        }
        assert_eq!(find_lowest_entropy(&grid, &catalog), Some([1, 0, 0]));

        grid.decide([1, 0, 0], CellState::Tile(0));
        assert_eq!(find_lowest_entropy(&grid, &catalog), Some([0, 0, 0]));
    }

    // Tests non-positive entropies fall back to a random undecided cell
    // Verified by returning None when no entropy is positive
    #[test]
    fn test_choose_cell_fallback() {
        let catalog = weighted_catalog(&[1.0, 5.0]);
        let mut grid = GridState::new([2, 1, 1], &TileBitset::all(2));
        let mut random = RandomSelector::new(3);

        assert_eq!(find_lowest_entropy(&grid, &catalog), None);
        let picked = choose_cell(&grid, &catalog, &mut random);
        assert!(matches!(picked, Some([0 | 1, 0, 0])));

        grid.decide([0, 0, 0], CellState::Empty);
        assert_eq!(choose_cell(&grid, &catalog, &mut random), Some([1, 0, 0]));
        grid.decide([1, 0, 0], CellState::Empty);
        assert_eq!(choose_cell(&grid, &catalog, &mut random), None);
    }

    // Tests an empty candidate list decides the cell empty
    #[test]
    fn test_pick_weighted_empty() {
        let catalog = weighted_catalog(&[1.0]);
        let mut random = RandomSelector::new(0);
        assert_eq!(pick_weighted(&catalog, &[], &mut random), CellState::Empty);
        assert_eq!(
            pick_weighted(&catalog, &[0], &mut random),
            CellState::Tile(0)
        );
    }

    // Tests weights 1, 1, 2 give roughly 25%, 25% and 50% over many draws
    // Verified by sampling uniformly instead of by weight
    #[test]
    fn test_pick_weighted_distribution() {
        let catalog = weighted_catalog(&[1.0, 1.0, 2.0]);
        let mut random = RandomSelector::new(42);
        let mut counts = [0usize; 3];
        let draws = 10_000;
        for _ in 0..draws {
            if let CellState::Tile(tile) = pick_weighted(&catalog, &[0, 1, 2], &mut random) {
                counts[tile] += 1;
            }
        }
        let share = |tile: usize| counts[tile] as f64 / f64::from(draws);
        assert!((share(0) - 0.25).abs() < 0.03, "counts {counts:?}");
        assert!((share(1) - 0.25).abs() < 0.03, "counts {counts:?}");
        assert!((share(2) - 0.5).abs() < 0.03, "counts {counts:?}");
    }

    // Tests candidates are filtered before the draw
    // Verified by drawing from the raw possibility set
    #[test]
    fn test_pick_tile_filters_candidates() {
        let catalog = TileCatalog::from_definitions(vec![
            TileDefinition::new("hook", 100.0).with_neighbors(Direction::Up, &["hook"]),
            TileDefinition::new("stone", 0.01),
        ])
        .unwrap_or_else(|err| panic!("{err}"));
        let grid = GridState::new([1, 1, 1], &TileBitset::all(2));
        let external = ExternalFaces::new();
        let ctx = ConstraintContext::new(&catalog, &grid, &external, ConnectivityPolicy::default());

        let all = TileBitset::all(2);
        assert_eq!(viable_candidates(&ctx, &all, [0, 0, 0]), vec![1]);

        let mut random = RandomSelector::new(9);
        for _ in 0..20 {
            assert_eq!(pick_tile(&ctx, [0, 0, 0], &mut random), CellState::Tile(1));
        }
    }
}
