//! Tile definitions and the immutable tile catalog
//!
//! Definitions arrive from an offline import step with neighbours named by
//! string. The catalog resolves those names to indices once, clamps weights,
//! and builds the flattened adjacency tables that every solve shares.

use crate::algorithm::adjacency::AdjacencyModel;
use crate::io::configuration::MIN_TILE_WEIGHT;
use crate::io::error::{Result, WorldError};
use crate::spatial::direction::{DIRECTION_COUNT, Direction};
use std::collections::HashMap;
use tracing::debug;

/// Boolean placement modifiers parsed from a constraint-tag string
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct TileModifiers {
    /// Only valid on the bottom layer of a grid
    pub grounded: bool,
    /// Needs at least one socket satisfied by a decided neighbour
    pub must_connect: bool,
    /// May not repeat along `x` or `z`
    pub no_repeat_horizontal: bool,
    /// May not repeat along `y`
    pub no_repeat_vertical: bool,
    /// Handled by tower growth rather than seam reconciliation
    pub is_tower_tile: bool,
}

impl TileModifiers {
    /// Parse a comma-separated tag list such as `"G,MC,NRH"`
    ///
    /// Recognised tags are `G`, `MC`, `NRH`, `NRV` and `TT`. Unknown tags are
    /// skipped.
    pub fn parse(tags: &str) -> Self {
        let mut modifiers = Self::default();
        for tag in tags.split(',').map(str::trim) {
            match tag {
                "G" => modifiers.grounded = true,
                "MC" => modifiers.must_connect = true,
                "NRH" => modifiers.no_repeat_horizontal = true,
                "NRV" => modifiers.no_repeat_vertical = true,
                "TT" => modifiers.is_tower_tile = true,
                "" => {}
                other => debug!(tag = other, "ignoring unknown constraint tag"),
            }
        }
        modifiers
    }
}

/// Authoring-time tile record with neighbours referenced by name
#[derive(Clone, Debug)]
pub struct TileDefinition {
    /// Unique tile name
    pub name: String,
    /// Relative sampling weight
    pub weight: f64,
    /// Rotation around the vertical axis in quarter turns
    pub rotation: u8,
    /// Allowed neighbour names per direction, in `Direction::ALL` order
    pub neighbors: [Vec<String>; DIRECTION_COUNT],
    /// Placement modifiers
    pub modifiers: TileModifiers,
}

impl TileDefinition {
    /// Create a definition with no neighbours and no modifiers
    pub fn new(name: impl Into<String>, weight: f64) -> Self {
        Self {
            name: name.into(),
            weight,
            rotation: 0,
            neighbors: Default::default(),
            modifiers: TileModifiers::default(),
        }
    }

    /// Set the rotation in quarter turns
    #[must_use]
    pub const fn with_rotation(mut self, rotation: u8) -> Self {
        self.rotation = rotation % 4;
        self
    }

    /// Add allowed neighbours in one direction
    #[must_use]
    pub fn with_neighbors(mut self, direction: Direction, names: &[&str]) -> Self {
        if let Some(list) = self.neighbors.get_mut(direction.index()) {
            list.extend(names.iter().map(|name| (*name).to_string()));
        }
        self
    }

    /// Apply a constraint-tag string
    #[must_use]
    pub fn with_tags(mut self, tags: &str) -> Self {
        self.modifiers = TileModifiers::parse(tags);
        self
    }
}

/// Runtime tile type with its catalog index
#[derive(Clone, Debug)]
pub struct TileType {
    /// Position in the catalog
    pub index: usize,
    /// Unique tile name
    pub name: String,
    /// Rotation around the vertical axis in quarter turns
    pub rotation: u8,
    /// Sampling weight, always positive
    pub weight: f64,
    /// Placement modifiers
    pub modifiers: TileModifiers,
}

/// Immutable set of tile types plus their adjacency tables
#[derive(Clone, Debug)]
pub struct TileCatalog {
    tiles: Vec<TileType>,
    names: HashMap<String, usize>,
    adjacency: AdjacencyModel,
}

impl TileCatalog {
    /// Resolve definitions into a catalog
    ///
    /// # Errors
    ///
    /// Returns an error if the list is empty, a name repeats, or a neighbour
    /// list names a tile that does not exist.
    pub fn from_definitions(definitions: Vec<TileDefinition>) -> Result<Self> {
        if definitions.is_empty() {
            return Err(WorldError::EmptyCatalog);
        }

        let mut names = HashMap::with_capacity(definitions.len());
        for (index, definition) in definitions.iter().enumerate() {
            if names.insert(definition.name.clone(), index).is_some() {
                return Err(WorldError::DuplicateTile {
                    name: definition.name.clone(),
                });
            }
        }

        let mut neighbor_indices = Vec::with_capacity(definitions.len());
        for definition in &definitions {
            let mut resolved: [Vec<usize>; DIRECTION_COUNT] = Default::default();
            for direction in Direction::ALL {
                let (Some(source), Some(target)) = (
                    definition.neighbors.get(direction.index()),
                    resolved.get_mut(direction.index()),
                ) else {
                    continue;
                };
                for neighbor in source {
                    let index = names.get(neighbor).copied().ok_or_else(|| {
                        WorldError::UnknownNeighbor {
                            tile: definition.name.clone(),
                            direction,
                            neighbor: neighbor.clone(),
                        }
                    })?;
                    target.push(index);
                }
            }
            neighbor_indices.push(resolved);
        }

        let adjacency = AdjacencyModel::new(&neighbor_indices);

        let tiles = definitions
            .into_iter()
            .enumerate()
            .map(|(index, definition)| TileType {
                index,
                name: definition.name,
                rotation: definition.rotation,
                weight: clamp_weight(definition.weight),
                modifiers: definition.modifiers,
            })
            .collect();

        Ok(Self {
            tiles,
            names,
            adjacency,
        })
    }

    /// Number of tile types
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Whether the catalog has no tiles (never true for a built catalog)
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// All tile types in index order
    pub fn tiles(&self) -> &[TileType] {
        &self.tiles
    }

    /// Tile type at `index`
    pub fn tile(&self, index: usize) -> Option<&TileType> {
        self.tiles.get(index)
    }

    /// Sampling weight of tile `index`, zero for unknown indices
    pub fn weight(&self, index: usize) -> f64 {
        self.tiles.get(index).map_or(0.0, |tile| tile.weight)
    }

    /// Modifiers of tile `index`
    pub fn modifiers(&self, index: usize) -> TileModifiers {
        self.tiles
            .get(index)
            .map(|tile| tile.modifiers)
            .unwrap_or_default()
    }

    /// Look up a tile index by name
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.names.get(name).copied()
    }

    /// Shared adjacency tables
    pub const fn adjacency(&self) -> &AdjacencyModel {
        &self.adjacency
    }
}

fn clamp_weight(weight: f64) -> f64 {
    if weight.is_finite() && weight > 0.0 {
        weight
    } else {
        MIN_TILE_WEIGHT
    }
}
