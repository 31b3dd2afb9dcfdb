use crate::algorithm::bitset::TileBitset;
use crate::spatial::direction::{DIRECTION_COUNT, Direction};
use bitvec::prelude::*;

/// Flattened compatibility tables shared read-only by every solve
///
/// `is_neighbor` stores, per tile and direction, one row of `tile_count` bits
/// naming the tiles allowed in the neighbouring cell. `has_connection` is the
/// derived "row has any bit set" flag. Rows are looked up from the asking
/// tile's side only; symmetry is not enforced.
#[derive(Clone, Debug)]
pub struct AdjacencyModel {
    tile_count: usize,
    has_connection: BitVec,
    is_neighbor: BitVec,
}

impl AdjacencyModel {
    /// Build the tables from per-tile, per-direction neighbour index lists
    ///
    /// Indices at or beyond `neighbors.len()` are ignored; callers resolve
    /// names before reaching this point.
    pub fn new(neighbors: &[[Vec<usize>; DIRECTION_COUNT]]) -> Self {
        let tile_count = neighbors.len();
        let mut has_connection = bitvec![0; tile_count * DIRECTION_COUNT];
        let mut is_neighbor = bitvec![0; tile_count * DIRECTION_COUNT * tile_count];

        for (tile, sets) in neighbors.iter().enumerate() {
            for direction in Direction::ALL {
                let Some(set) = sets.get(direction.index()) else {
                    continue;
                };
                let row_start = Self::row_start(tile_count, tile, direction);
                let mut any = false;
                for &other in set {
                    if other < tile_count {
                        is_neighbor.set(row_start + other, true);
                        any = true;
                    }
                }
                has_connection.set(tile * DIRECTION_COUNT + direction.index(), any);
            }
        }

        Self {
            tile_count,
            has_connection,
            is_neighbor,
        }
    }

    const fn row_start(tile_count: usize, tile: usize, direction: Direction) -> usize {
        (tile * DIRECTION_COUNT + direction.index()) * tile_count
    }

    /// Number of tile types the tables cover
    pub const fn tile_count(&self) -> usize {
        self.tile_count
    }

    /// Whether `tile` has a socket facing `direction`
    pub fn has_connection(&self, tile: usize, direction: Direction) -> bool {
        if tile >= self.tile_count {
            return false;
        }
        self.has_connection
            .get(tile * DIRECTION_COUNT + direction.index())
            .as_deref()
            == Some(&true)
    }

    /// Whether `tile` accepts `other` as its neighbour in `direction`
    pub fn is_neighbor(&self, tile: usize, direction: Direction, other: usize) -> bool {
        if tile >= self.tile_count || other >= self.tile_count {
            return false;
        }
        self.is_neighbor
            .get(Self::row_start(self.tile_count, tile, direction) + other)
            .as_deref()
            == Some(&true)
    }

    /// Tiles `tile` accepts in `direction`, as a possibility mask
    pub fn allowed(&self, tile: usize, direction: Direction) -> TileBitset {
        let mut allowed = TileBitset::new(self.tile_count);
        if tile >= self.tile_count {
            return allowed;
        }
        let start = Self::row_start(self.tile_count, tile, direction);
        if let Some(row) = self.is_neighbor.get(start..start + self.tile_count) {
            for other in row.iter_ones() {
                allowed.insert(other);
            }
        }
        allowed
    }

    /// Whether a decided tile `placed` can sit next to `candidate`
    ///
    /// `direction` points from the candidate towards `placed`. A candidate
    /// with a socket there must list `placed` in its own table; a candidate
    /// without one rejects any `placed` tile that has a socket facing back.
    pub fn accepts(&self, candidate: usize, direction: Direction, placed: usize) -> bool {
        if self.has_connection(candidate, direction) {
            self.is_neighbor(candidate, direction, placed)
        } else {
            !self.has_connection(placed, direction.opposite())
        }
    }
}
