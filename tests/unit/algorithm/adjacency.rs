//! Tests for the flattened adjacency tables

#[cfg(test)]
mod tests {
    use towerwfc::algorithm::adjacency::AdjacencyModel;
    use towerwfc::spatial::direction::{DIRECTION_COUNT, Direction};

    // Tile 0 lists tile 1 to the East; tile 1 lists nothing; tile 2 lists 0 Up
    fn model() -> AdjacencyModel {
        let mut neighbors: Vec<[Vec<usize>; DIRECTION_COUNT]> = vec![
            Default::default(),
            Default::default(),
            Default::default(),
        ];
        neighbors[0][Direction::East.index()] = vec![1, 9];
        neighbors[2][Direction::Up.index()] = vec![0];
        AdjacencyModel::new(&neighbors)
    }

    // Tests connection flags follow non-empty neighbour rows
    // Verified by setting has_connection for every direction
    #[test]
    fn test_has_connection() {
        let adjacency = model();
        assert_eq!(adjacency.tile_count(), 3);
        assert!(adjacency.has_connection(0, Direction::East));
        assert!(!adjacency.has_connection(0, Direction::West));
        assert!(!adjacency.has_connection(1, Direction::West));
        assert!(adjacency.has_connection(2, Direction::Up));
        assert!(!adjacency.has_connection(7, Direction::Up));
    }

    // Tests lookups read only the asking tile's row
    // Verified by mirroring every entry into the opposite row
    #[test]
    fn test_is_neighbor_is_one_sided() {
        let adjacency = model();
        assert!(adjacency.is_neighbor(0, Direction::East, 1));
        assert!(!adjacency.is_neighbor(1, Direction::West, 0));
        assert!(!adjacency.is_neighbor(0, Direction::East, 2));
        assert!(!adjacency.is_neighbor(0, Direction::East, 9));
    }

    // Tests out-of-range indices are dropped from rows
    #[test]
    fn test_allowed_rows() {
        let adjacency = model();
        assert_eq!(adjacency.allowed(0, Direction::East).to_vec(), vec![1]);
        assert_eq!(adjacency.allowed(0, Direction::East).capacity(), 3);
        assert!(adjacency.allowed(1, Direction::North).is_empty());
        assert!(adjacency.allowed(5, Direction::North).is_empty());
    }

    // Tests candidate-side compatibility with a decided neighbour
    // Verified by ignoring the placed tile's socket in accepts
    #[test]
    fn test_accepts() {
        let adjacency = model();
        // Socket present: the candidate's own row decides
        assert!(adjacency.accepts(0, Direction::East, 1));
        assert!(!adjacency.accepts(0, Direction::East, 2));
        // No socket: reject a placed tile that points back
        assert!(!adjacency.accepts(1, Direction::West, 0));
        assert!(adjacency.accepts(1, Direction::North, 2));
        assert!(!adjacency.accepts(0, Direction::Down, 2));
    }
}
