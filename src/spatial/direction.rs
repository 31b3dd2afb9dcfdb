//! The six axis-aligned directions a tile face can point in
//!
//! Grid axes follow the world convention: `x` grows East, `y` grows Up and
//! `z` grows North. Directions are stored in opposite pairs so that the
//! opposite of direction `i` is `i ^ 1`.

use std::fmt;

/// Axis-aligned face direction of a grid cell
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Direction {
    /// Towards `+z`
    North,
    /// Towards `-z`
    South,
    /// Towards `+x`
    East,
    /// Towards `-x`
    West,
    /// Towards `+y`
    Up,
    /// Towards `-y`
    Down,
}

/// Number of directions in a 3D grid
pub const DIRECTION_COUNT: usize = 6;

impl Direction {
    /// All directions in table order
    pub const ALL: [Self; DIRECTION_COUNT] = [
        Self::North,
        Self::South,
        Self::East,
        Self::West,
        Self::Up,
        Self::Down,
    ];

    /// The four horizontal directions
    pub const HORIZONTAL: [Self; 4] = [Self::North, Self::South, Self::East, Self::West];

    /// The two vertical directions
    pub const VERTICAL: [Self; 2] = [Self::Up, Self::Down];

    /// Position of this direction in adjacency tables
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Direction facing the other way
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::South => Self::North,
            Self::East => Self::West,
            Self::West => Self::East,
            Self::Up => Self::Down,
            Self::Down => Self::Up,
        }
    }

    /// Unit step `[dx, dy, dz]` taken when moving in this direction
    pub const fn offset(self) -> [i32; 3] {
        match self {
            Self::North => [0, 0, 1],
            Self::South => [0, 0, -1],
            Self::East => [1, 0, 0],
            Self::West => [-1, 0, 0],
            Self::Up => [0, 1, 0],
            Self::Down => [0, -1, 0],
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::North => "north",
            Self::South => "south",
            Self::East => "east",
            Self::West => "west",
            Self::Up => "up",
            Self::Down => "down",
        };
        f.write_str(name)
    }
}
