//! Tests for seam keys, seam geometry and seam reconciliation

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;
    use towerwfc::WorldError;
    use towerwfc::algorithm::solver::SolverConfig;
    use towerwfc::io::catalog::demo_catalog;
    use towerwfc::spatial::direction::Direction;
    use towerwfc::spatial::grid::BoundaryFaces;
    use towerwfc::spatial::tiles::TileCatalog;
    use towerwfc::world::buffer::{BufferKey, BufferZone, SeamAxis, reconcile_seam};
    use towerwfc::world::chunk::{ChunkCoord, solve_chunk};
    use towerwfc::world::tower::FloorHeights;

    const DIMS: [usize; 3] = [4, 2, 4];

    fn demo() -> Arc<TileCatalog> {
        Arc::new(demo_catalog().unwrap_or_else(|err| panic!("{err}")))
    }

    // Tests keys exist only for horizontal neighbours and are ordered
    // Verified by accepting diagonal neighbours
    #[test]
    fn test_key_between() {
        let a = ChunkCoord::new(0, 0);
        let north = ChunkCoord::new(0, 1);
        let east = ChunkCoord::new(1, 0);

        let key = BufferKey::between(north, a);
        assert_eq!(key.map(|k| (k.first, k.second)), Some((a, north)));
        assert_eq!(key.map(|k| k.axis()), Some(SeamAxis::AlongX));
        assert_eq!(
            BufferKey::between(east, a).map(|k| k.axis()),
            Some(SeamAxis::AlongZ)
        );
        assert_eq!(BufferKey::between(a, ChunkCoord::new(1, 1)), None);
        assert_eq!(BufferKey::between(a, a), None);
        assert_eq!(BufferKey::between(a, ChunkCoord::new(2, 0)), None);
    }

    // Tests the four seams around a chunk all involve it
    #[test]
    fn test_key_around() {
        let coord = ChunkCoord::new(2, -1);
        let keys = BufferKey::around(coord);
        for key in keys {
            assert!(key.involves(coord));
            assert_eq!(BufferKey::between(key.first, key.second), Some(key));
        }
        assert!(!keys[0].involves(ChunkCoord::new(9, 9)));
    }

    // Tests seam volumes are one cell thick and sit between the chunks
    // Verified by offsetting the seam origin by the chunk stride
    #[test]
    fn test_seam_geometry() {
        let along_x = BufferKey {
            first: ChunkCoord::new(0, 0),
            second: ChunkCoord::new(0, 1),
        };
        assert_eq!(along_x.dimensions(DIMS), [4, 2, 1]);
        assert_eq!(along_x.origin(DIMS), [0, 4]);

        let along_z = BufferKey {
            first: ChunkCoord::new(-1, 0),
            second: ChunkCoord::new(0, 0),
        };
        assert_eq!(along_z.dimensions(DIMS), [1, 2, 4]);
        assert_eq!(along_z.origin(DIMS), [-1, 0]);
        assert_eq!(along_z.to_string(), "(-1, 0)-(0, 0)");
    }

    // Tests each side of the seam sees the facing boundary of its chunk
    // Verified by passing the chunks' outward faces instead
    #[test]
    fn test_external_faces_mapping() {
        let mut first = BoundaryFaces::new(DIMS);
        let mut second = BoundaryFaces::new(DIMS);
        first.record([2, 1, 3], 5);
        second.record([2, 1, 0], 6);
        let key = BufferKey {
            first: ChunkCoord::new(0, 0),
            second: ChunkCoord::new(0, 1),
        };
        let external = key.external_faces(&first, &second);
        let south = external.face(Direction::South).unwrap_or_default();
        let north = external.face(Direction::North).unwrap_or_default();
        assert_eq!(south.get(2 + 4), Some(&5));
        assert_eq!(north.get(2 + 4), Some(&6));
        assert!(external.face(Direction::East).is_none());
    }

    // Tests seam tiles agree with the fixed chunk boundaries on both sides
    // Verified by solving the seam without external faces
    #[test]
    fn test_reconcile_respects_boundaries() -> Result<(), WorldError> {
        let catalog = demo();
        let adjacency = catalog.adjacency();
        let key = BufferKey {
            first: ChunkCoord::new(0, 0),
            second: ChunkCoord::new(1, 0),
        };
        for seed in 0..8 {
            let config = SolverConfig::default().with_seed(seed);
            let west = solve_chunk(Arc::clone(&catalog), DIMS, config)?;
            let east = solve_chunk(Arc::clone(&catalog), DIMS, config.with_seed(seed + 100))?;
            let seam = reconcile_seam(
                Arc::clone(&catalog),
                DIMS,
                key,
                &west.faces,
                &east.faces,
                config,
            )?;
            assert_eq!(seam.grid.dim(), (1, 2, 4));

            for ((_, y, z), &value) in seam.grid.indexed_iter() {
                assert_ne!(value, -1);
                let Ok(tile) = usize::try_from(value) else {
                    continue;
                };
                assert!(!catalog.modifiers(tile).is_tower_tile);
                let index = z + y * DIMS[2];
                let sides = [
                    (Direction::West, west.faces.face(Direction::East).get(index)),
                    (Direction::East, east.faces.face(Direction::West).get(index)),
                ];
                for (direction, fixed) in sides {
                    let Some(&fixed) = fixed else { continue };
                    let Ok(fixed) = usize::try_from(fixed) else {
                        continue;
                    };
                    if adjacency.has_connection(tile, direction) {
                        assert!(adjacency.is_neighbor(tile, direction, fixed));
                    } else {
                        assert!(!adjacency.has_connection(fixed, direction.opposite()));
                    }
                }
            }
        }
        Ok(())
    }

    // Tests the background seam solve and its world placements
    #[test]
    fn test_buffer_zone_lifecycle() -> Result<(), WorldError> {
        let catalog = demo();
        let key = BufferKey {
            first: ChunkCoord::new(0, 0),
            second: ChunkCoord::new(0, 1),
        };
        let config = SolverConfig::default();
        let south = solve_chunk(Arc::clone(&catalog), DIMS, config)?;
        let north = solve_chunk(Arc::clone(&catalog), DIMS, config.with_seed(9))?;
        let mut zone = BufferZone::spawn(
            key,
            Arc::clone(&catalog),
            DIMS,
            [Arc::clone(&south.faces), Arc::clone(&north.faces)],
            config,
        )?;

        let mut finished = false;
        for _ in 0..10_000 {
            if zone.poll() {
                finished = true;
                break;
            }
            thread::sleep(Duration::from_millis(1));
        }
        assert!(finished);
        assert!(zone.is_idle());
        assert_eq!(zone.key(), key);

        let floors = FloorHeights::from_heights(vec![0, 3]);
        let placements = zone.placements(&catalog, DIMS, &floors);
        let filled = zone
            .solution()
            .map_or(0, |solution| solution.grid.iter().filter(|&&v| v >= 0).count());
        assert_eq!(placements.len(), filled);
        assert!(placements.iter().all(|p| p.position[2] == 4));
        Ok(())
    }
}
