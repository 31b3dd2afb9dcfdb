//! Spatial data structures for the tile world
//!
//! This module contains:
//! - The six face directions and their offsets
//! - Per-volume grid state with boundary faces
//! - Tile definitions and the resolved tile catalog

/// Face directions of a grid cell
pub mod direction;
/// Grid state management and boundary face recording
pub mod grid;
/// Tile definitions, modifiers and the tile catalog
pub mod tiles;

pub use direction::Direction;
pub use grid::GridState;
