//! Tests for the built-in demonstration catalog

#[cfg(test)]
mod tests {
    use towerwfc::io::catalog::{demo_catalog, demo_definitions};
    use towerwfc::spatial::direction::Direction;
    use towerwfc::world::tower::TowerPieces;

    // Tests the definitions resolve without unknown or repeated names
    #[test]
    fn test_demo_catalog_builds() {
        let catalog = demo_catalog().unwrap_or_else(|err| panic!("{err}"));
        assert_eq!(catalog.len(), demo_definitions().len());
        assert!(TowerPieces::resolve(&catalog).is_some());
    }

    // Tests every neighbour pair is listed from both sides
    // Verified by dropping bridge_end_east from the bridge_x East list
    #[test]
    fn test_demo_catalog_is_symmetric() {
        let catalog = demo_catalog().unwrap_or_else(|err| panic!("{err}"));
        let adjacency = catalog.adjacency();
        for a in 0..catalog.len() {
            for direction in Direction::ALL {
                for b in adjacency.allowed(a, direction).iter() {
                    assert!(
                        adjacency.is_neighbor(b, direction.opposite(), a),
                        "{a} lists {b} to the {direction} but not back"
                    );
                }
            }
        }
    }

    // Tests some tile can stand alone, so any chunk edge can be filled
    #[test]
    fn test_demo_catalog_has_socketless_ground() {
        let catalog = demo_catalog().unwrap_or_else(|err| panic!("{err}"));
        let adjacency = catalog.adjacency();
        let standalone = catalog.tiles().iter().any(|tile| {
            Direction::ALL
                .iter()
                .all(|&direction| !adjacency.has_connection(tile.index, direction))
        });
        assert!(standalone);
    }
}
