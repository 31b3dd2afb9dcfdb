//! Built-in demonstration tile catalog
//!
//! A small floating-ruins set: pillars carrying platforms, east-west and
//! north-south bridges with end pieces, free-standing towers and loose
//! rubble. Neighbour lists are written symmetrically so every pair can be
//! read from either side.

use crate::io::configuration::{
    TOWER_BODY_NAME, TOWER_BOTTOM_NAME, TOWER_TOP_NAME, TOWER_WINDOW_NAME,
};
use crate::io::error::Result;
use crate::spatial::direction::Direction;
use crate::spatial::tiles::{TileCatalog, TileDefinition};

/// Definitions of the demonstration tile set
pub fn demo_definitions() -> Vec<TileDefinition> {
    let tower_above = [TOWER_BODY_NAME, TOWER_WINDOW_NAME, TOWER_TOP_NAME];
    let tower_below = [TOWER_BOTTOM_NAME, TOWER_BODY_NAME, TOWER_WINDOW_NAME];

    vec![
        TileDefinition::new("rubble", 2.0).with_tags("G,NRH"),
        TileDefinition::new("pillar_base", 0.8)
            .with_tags("G")
            .with_neighbors(Direction::Up, &["pillar", "platform"]),
        TileDefinition::new("pillar", 0.7)
            .with_neighbors(Direction::Up, &["pillar", "platform"])
            .with_neighbors(Direction::Down, &["pillar", "pillar_base"]),
        TileDefinition::new("platform", 1.2)
            .with_tags("NRV")
            .with_neighbors(Direction::Down, &["pillar", "pillar_base"]),
        TileDefinition::new("bridge_x", 0.9)
            .with_neighbors(Direction::East, &["bridge_x", "bridge_end_east"])
            .with_neighbors(Direction::West, &["bridge_x", "bridge_end_west"]),
        TileDefinition::new("bridge_end_east", 0.5)
            .with_neighbors(Direction::West, &["bridge_x", "bridge_end_west"]),
        TileDefinition::new("bridge_end_west", 0.5)
            .with_rotation(2)
            .with_neighbors(Direction::East, &["bridge_x", "bridge_end_east"]),
        TileDefinition::new("bridge_z", 0.9)
            .with_rotation(1)
            .with_neighbors(Direction::North, &["bridge_z", "bridge_end_north"])
            .with_neighbors(Direction::South, &["bridge_z", "bridge_end_south"]),
        TileDefinition::new("bridge_end_north", 0.5)
            .with_rotation(3)
            .with_neighbors(Direction::South, &["bridge_z", "bridge_end_south"]),
        TileDefinition::new("bridge_end_south", 0.5)
            .with_rotation(1)
            .with_neighbors(Direction::North, &["bridge_z", "bridge_end_north"]),
        TileDefinition::new(TOWER_BOTTOM_NAME, 0.6)
            .with_tags("G,TT")
            .with_neighbors(Direction::Up, &tower_above),
        TileDefinition::new(TOWER_BODY_NAME, 0.6)
            .with_tags("TT")
            .with_neighbors(Direction::Up, &tower_above)
            .with_neighbors(Direction::Down, &tower_below),
        TileDefinition::new(TOWER_WINDOW_NAME, 0.4)
            .with_tags("TT")
            .with_neighbors(Direction::Up, &tower_above)
            .with_neighbors(Direction::Down, &tower_below),
        TileDefinition::new(TOWER_TOP_NAME, 0.6)
            .with_tags("TT")
            .with_neighbors(Direction::Down, &tower_below),
    ]
}

/// Resolve the demonstration tile set into a catalog
///
/// # Errors
///
/// Returns an error only if the built-in definitions are inconsistent.
pub fn demo_catalog() -> Result<TileCatalog> {
    TileCatalog::from_definitions(demo_definitions())
}
