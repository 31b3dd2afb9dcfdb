//! Chunked 3D tile world generation with wave function collapse
//!
//! Each chunk of the world is solved independently by a constraint solver
//! that collapses the lowest-entropy cell, picks a weighted tile that fits
//! its decided neighbours and propagates the choice. Seams between
//! neighbouring chunks are reconciled afterwards, and towers are grown
//! vertically over the solved chunks.

#![forbid(unsafe_code)]

/// Constraint solver: adjacency tables, selection, propagation
pub mod algorithm;
/// Input/output operations and error handling
pub mod io;
/// Mathematical utilities for sampling and curve shaping
pub mod math;
/// Directions, grid state and tile catalog
pub mod spatial;
/// Chunk scheduling, seam reconciliation and tower growth
pub mod world;

pub use io::error::{Result, WorldError};
