use bitvec::prelude::*;
use std::fmt;

/// Fixed-size bitset tracking which tile indices are still possible at a cell
///
/// Uses 0-based tile indices matching the catalog order.
/// Provides O(1) membership testing and in-place filtering.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TileBitset {
    bits: BitVec,
    max_tiles: usize,
}

impl TileBitset {
    /// Create a bitset with no tiles present
    pub fn new(max_tiles: usize) -> Self {
        Self {
            bits: bitvec![0; max_tiles],
            max_tiles,
        }
    }

    /// Create a bitset containing all possible tiles
    pub fn all(max_tiles: usize) -> Self {
        Self {
            bits: bitvec![1; max_tiles],
            max_tiles,
        }
    }

    /// Number of tile slots in the set
    pub const fn capacity(&self) -> usize {
        self.max_tiles
    }

    /// Insert a tile index, ignoring indices past capacity
    pub fn insert(&mut self, tile: usize) {
        if tile < self.max_tiles {
            self.bits.set(tile, true);
        }
    }

    /// Remove a tile index, returning whether it was present
    pub fn remove(&mut self, tile: usize) -> bool {
        if self.contains(tile) {
            self.bits.set(tile, false);
            true
        } else {
            false
        }
    }

    /// Test tile membership
    pub fn contains(&self, tile: usize) -> bool {
        self.bits.get(tile).as_deref() == Some(&true)
    }

    /// Remove every tile
    pub fn clear(&mut self) {
        self.bits.fill(false);
    }

    /// Keep only the tiles for which `keep` returns true
    ///
    /// Returns whether any tile was removed.
    pub fn retain<F>(&mut self, mut keep: F) -> bool
    where
        F: FnMut(usize) -> bool,
    {
        let present: Vec<usize> = self.bits.iter_ones().collect();
        let mut changed = false;
        for tile in present {
            if !keep(tile) {
                self.bits.set(tile, false);
                changed = true;
            }
        }
        changed
    }

    /// Intersect this bitset with another in-place
    pub fn intersect_with(&mut self, other: &Self) {
        self.bits &= &other.bits;
    }

    /// Test if no tiles are present
    pub fn is_empty(&self) -> bool {
        self.bits.not_any()
    }

    /// Count tiles in the set
    pub fn count(&self) -> usize {
        self.bits.count_ones()
    }

    /// The only tile in the set, if exactly one is present
    pub fn single(&self) -> Option<usize> {
        let mut ones = self.bits.iter_ones();
        let first = ones.next()?;
        ones.next().is_none().then_some(first)
    }

    /// Iterate the present tile indices in ascending order
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.bits.iter_ones()
    }

    /// Extract all tile indices as a vector
    pub fn to_vec(&self) -> Vec<usize> {
        self.bits.iter_ones().collect()
    }
}

impl fmt::Display for TileBitset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TileBitset({} tiles: {:?})", self.count(), self.to_vec())
    }
}
