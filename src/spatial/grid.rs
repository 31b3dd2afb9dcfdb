//! Per-chunk solver state: decided tiles, possibility sets and boundary faces
//!
//! Each cell holds a decided value (a tile index, `UNDECIDED` or `EMPTY`) and
//! a possibility bitset. A cell is undecided exactly while its bitset is
//! non-empty; deciding a cell clears the bitset for good. Cells lying on an
//! outer face of the volume also write their decided value into that face's
//! boundary array as they are decided.

use ndarray::Array3;

use crate::algorithm::bitset::TileBitset;
use crate::io::configuration::{EMPTY, UNDECIDED};
use crate::spatial::direction::{DIRECTION_COUNT, Direction};

/// Cell coordinate `[x, y, z]` inside one grid
pub type CellPosition = [usize; 3];

/// Typed view of a cell's decided value
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellState {
    /// Still superposed over its possibility set
    Undecided,
    /// Decided to hold no tile
    Empty,
    /// Decided to hold a tile index
    Tile(usize),
}

impl CellState {
    /// Interpret a raw grid value
    pub const fn from_raw(value: i32) -> Self {
        if value >= 0 {
            Self::Tile(value as usize)
        } else if value == EMPTY {
            Self::Empty
        } else {
            Self::Undecided
        }
    }

    /// Raw grid value for this state
    pub const fn raw(self) -> i32 {
        match self {
            Self::Undecided => UNDECIDED,
            Self::Empty => EMPTY,
            Self::Tile(tile) => tile as i32,
        }
    }

    /// Whether the cell has been decided either way
    pub const fn is_decided(self) -> bool {
        !matches!(self, Self::Undecided)
    }
}

/// Number of cells on the face of a volume pointing in `direction`
pub const fn face_len(dimensions: [usize; 3], direction: Direction) -> usize {
    let [x, y, z] = dimensions;
    match direction {
        Direction::North | Direction::South => x * y,
        Direction::East | Direction::West => z * y,
        Direction::Up | Direction::Down => x * z,
    }
}

/// Index of `position` within the face pointing in `direction`
///
/// Returns `None` when the position does not lie on that face. North and
/// South faces are indexed `x + y * X`, East and West `z + y * Z`, Up and
/// Down `x + z * X`.
pub const fn face_index(
    dimensions: [usize; 3],
    direction: Direction,
    position: CellPosition,
) -> Option<usize> {
    let [dx, dy, dz] = dimensions;
    let [x, y, z] = position;
    if x >= dx || y >= dy || z >= dz {
        return None;
    }
    let on_face = match direction {
        Direction::North => z + 1 == dz,
        Direction::South => z == 0,
        Direction::East => x + 1 == dx,
        Direction::West => x == 0,
        Direction::Up => y + 1 == dy,
        Direction::Down => y == 0,
    };
    if !on_face {
        return None;
    }
    Some(match direction {
        Direction::North | Direction::South => x + y * dx,
        Direction::East | Direction::West => z + y * dz,
        Direction::Up | Direction::Down => x + z * dx,
    })
}

/// Decided values of every cell on each of the six outer faces
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BoundaryFaces {
    dimensions: [usize; 3],
    faces: [Vec<i32>; DIRECTION_COUNT],
}

impl BoundaryFaces {
    /// Create faces for a volume with every entry undecided
    pub fn new(dimensions: [usize; 3]) -> Self {
        let faces = Direction::ALL.map(|direction| vec![UNDECIDED; face_len(dimensions, direction)]);
        Self { dimensions, faces }
    }

    /// Write a decided value into every face the position lies on
    pub fn record(&mut self, position: CellPosition, value: i32) {
        for direction in Direction::ALL {
            let Some(index) = face_index(self.dimensions, direction, position) else {
                continue;
            };
            if let Some(slot) = self
                .faces
                .get_mut(direction.index())
                .and_then(|face| face.get_mut(index))
            {
                *slot = value;
            }
        }
    }

    /// Entries of the face pointing in `direction`
    pub fn face(&self, direction: Direction) -> &[i32] {
        self.faces
            .get(direction.index())
            .map_or(&[], Vec::as_slice)
    }

    /// Whether every entry on every face has been decided
    pub fn is_complete(&self) -> bool {
        self.faces
            .iter()
            .all(|face| face.iter().all(|&value| value != UNDECIDED))
    }

    /// Volume dimensions the faces were sized for
    pub const fn dimensions(&self) -> [usize; 3] {
        self.dimensions
    }
}

/// Grid state for one solve volume
#[derive(Clone, Debug)]
pub struct GridState {
    decided: Array3<i32>,
    possibilities: Vec<TileBitset>,
    faces: BoundaryFaces,
    dimensions: [usize; 3],
    tile_count: usize,
}

impl GridState {
    /// Create a grid where every cell is undecided and may hold any of `initial`
    pub fn new(dimensions: [usize; 3], initial: &TileBitset) -> Self {
        let [x, y, z] = dimensions;
        let cell_count = x * y * z;
        Self {
            decided: Array3::from_elem((x, y, z), UNDECIDED),
            possibilities: vec![initial.clone(); cell_count],
            faces: BoundaryFaces::new(dimensions),
            dimensions,
            tile_count: initial.capacity(),
        }
    }

    /// Volume dimensions `[x, y, z]`
    pub const fn dimensions(&self) -> [usize; 3] {
        self.dimensions
    }

    /// Number of tile types tracked per cell
    pub const fn tile_count(&self) -> usize {
        self.tile_count
    }

    /// Total number of cells
    pub const fn cell_count(&self) -> usize {
        self.dimensions[0] * self.dimensions[1] * self.dimensions[2]
    }

    /// Whether a position lies inside the volume
    pub const fn contains(&self, position: CellPosition) -> bool {
        position[0] < self.dimensions[0]
            && position[1] < self.dimensions[1]
            && position[2] < self.dimensions[2]
    }

    const fn flat_index(&self, position: CellPosition) -> Option<usize> {
        if !self.contains(position) {
            return None;
        }
        let [dx, dy, _] = self.dimensions;
        Some(position[0] + dx * (position[1] + dy * position[2]))
    }

    /// The in-bounds neighbour of `position` in `direction`
    pub fn neighbor(&self, position: CellPosition, direction: Direction) -> Option<CellPosition> {
        let offset = direction.offset();
        let mut next = [0usize; 3];
        for ((slot, &coordinate), &delta) in next.iter_mut().zip(position.iter()).zip(offset.iter())
        {
            *slot = coordinate.checked_add_signed(delta as isize)?;
        }
        self.contains(next).then_some(next)
    }

    /// Raw decided value at `position`
    pub fn raw(&self, position: CellPosition) -> Option<i32> {
        self.decided.get(position).copied()
    }

    /// Typed decided value at `position`
    pub fn state(&self, position: CellPosition) -> Option<CellState> {
        self.raw(position).map(CellState::from_raw)
    }

    /// Possibility set at `position`
    pub fn possibilities(&self, position: CellPosition) -> Option<&TileBitset> {
        self.flat_index(position)
            .and_then(|index| self.possibilities.get(index))
    }

    /// Mutable possibility set at `position`
    pub fn possibilities_mut(&mut self, position: CellPosition) -> Option<&mut TileBitset> {
        self.flat_index(position)
            .and_then(|index| self.possibilities.get_mut(index))
    }

    /// Decide a cell, clearing its possibilities and recording boundary faces
    pub fn decide(&mut self, position: CellPosition, state: CellState) {
        let value = state.raw();
        if let Some(slot) = self.decided.get_mut(position) {
            *slot = value;
        } else {
            return;
        }
        if let Some(set) = self.possibilities_mut(position) {
            set.clear();
        }
        if state.is_decided() {
            self.faces.record(position, value);
        }
    }

    /// Positions of all undecided cells, scanned `x`, then `z`, then `y`
    pub fn undecided_positions(&self) -> Vec<CellPosition> {
        let [dx, dy, dz] = self.dimensions;
        let mut positions = Vec::new();
        for x in 0..dx {
            for z in 0..dz {
                for y in 0..dy {
                    if self.raw([x, y, z]) == Some(UNDECIDED) {
                        positions.push([x, y, z]);
                    }
                }
            }
        }
        positions
    }

    /// Whether any cell is still undecided
    pub fn has_undecided(&self) -> bool {
        self.decided.iter().any(|&value| value == UNDECIDED)
    }

    /// Number of cells decided as empty
    pub fn empty_count(&self) -> usize {
        self.decided.iter().filter(|&&value| value == EMPTY).count()
    }

    /// Decided values indexed `[x, y, z]`
    pub const fn decided(&self) -> &Array3<i32> {
        &self.decided
    }

    /// Boundary face arrays recorded so far
    pub const fn faces(&self) -> &BoundaryFaces {
        &self.faces
    }

    /// Split into the decided grid and its boundary faces
    pub fn into_parts(self) -> (Array3<i32>, BoundaryFaces) {
        (self.decided, self.faces)
    }
}
