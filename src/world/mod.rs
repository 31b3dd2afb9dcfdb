//! Chunked world generation on top of the solver
//!
//! This module contains:
//! - Background task handles polled once per tick
//! - Chunk coordinates, solutions and instantiation tables
//! - Seam reconciliation between neighbouring chunks
//! - Tower growth layered over solved chunks
//! - The scheduler tying them together

/// Seam reconciliation between neighbouring chunks
pub mod buffer;
/// Chunk coordinates, solve results and lifecycle
pub mod chunk;
/// Chunk activation and background job orchestration
pub mod scheduler;
/// Background task handles
pub mod task;
/// Tower growth over solved chunks
pub mod tower;

pub use chunk::ChunkCoord;
pub use scheduler::{ChunkScheduler, WorldConfig};
