//! Seam reconciliation between two solved neighbouring chunks
//!
//! Chunks are solved independently and spaced one tile apart. The gap
//! between two neighbours is a one-cell-thick volume solved with the same
//! solver, with the facing boundary faces of both chunks fixed on either
//! side. The chunks themselves are never revised.

use crate::{
    algorithm::constraints::ExternalFaces,
    algorithm::solver::{SolveReport, Solver, SolverConfig},
    io::error::Result,
    spatial::direction::Direction,
    spatial::grid::BoundaryFaces,
    spatial::tiles::TileCatalog,
    world::chunk::{ChunkCoord, TilePlacement},
    world::task::Task,
    world::tower::FloorHeights,
};
use ndarray::Array3;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// Which way a seam runs
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SeamAxis {
    /// Between chunks stacked along `z`; the seam extends along `x`
    AlongX,
    /// Between chunks side by side along `x`; the seam extends along `z`
    AlongZ,
}

/// Ordered pair of neighbouring chunks sharing a seam
///
/// `first` is always the southern or western chunk.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BufferKey {
    /// Southern or western chunk
    pub first: ChunkCoord,
    /// Northern or eastern chunk
    pub second: ChunkCoord,
}

impl BufferKey {
    /// Key for two chunks, if they are horizontal neighbours
    pub fn between(a: ChunkCoord, b: ChunkCoord) -> Option<Self> {
        let dx = (a.x - b.x).abs();
        let dz = (a.z - b.z).abs();
        if dx + dz != 1 {
            return None;
        }
        let (first, second) = if a <= b { (a, b) } else { (b, a) };
        Some(Self { first, second })
    }

    /// Keys for every seam a chunk can take part in
    pub fn around(coord: ChunkCoord) -> [Self; 4] {
        Direction::HORIZONTAL.map(|direction| {
            let other = coord.step(direction);
            let (first, second) = if coord <= other {
                (coord, other)
            } else {
                (other, coord)
            };
            Self { first, second }
        })
    }

    /// Direction of the seam
    pub const fn axis(&self) -> SeamAxis {
        if self.first.x == self.second.x {
            SeamAxis::AlongX
        } else {
            SeamAxis::AlongZ
        }
    }

    /// Whether `coord` is one of the two chunks
    pub fn involves(&self, coord: ChunkCoord) -> bool {
        self.first == coord || self.second == coord
    }

    /// Seam volume for chunks of the given dimensions
    pub const fn dimensions(&self, chunk: [usize; 3]) -> [usize; 3] {
        match self.axis() {
            SeamAxis::AlongX => [chunk[0], chunk[1], 1],
            SeamAxis::AlongZ => [1, chunk[1], chunk[2]],
        }
    }

    /// World `[x, z]` of the seam's `[0, 0, 0]` cell
    pub const fn origin(&self, chunk: [usize; 3]) -> [i32; 2] {
        let [x, z] = self.first.origin(chunk);
        match self.axis() {
            SeamAxis::AlongX => [x, z + chunk[2] as i32],
            SeamAxis::AlongZ => [x + chunk[0] as i32, z],
        }
    }

    /// Fixed faces for the seam volume from both chunks' boundaries
    pub fn external_faces(&self, first: &BoundaryFaces, second: &BoundaryFaces) -> ExternalFaces {
        let (towards_first, towards_second) = match self.axis() {
            SeamAxis::AlongX => (Direction::South, Direction::North),
            SeamAxis::AlongZ => (Direction::West, Direction::East),
        };
        ExternalFaces::new()
            .with_face(towards_first, first.face(towards_first.opposite()).to_vec())
            .with_face(towards_second, second.face(towards_second.opposite()).to_vec())
    }
}

impl fmt::Display for BufferKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.first, self.second)
    }
}

/// Decided seam volume
#[derive(Clone, Debug)]
pub struct SeamSolution {
    /// Decided values indexed `[x, y, z]`
    pub grid: Array3<i32>,
    /// Solve statistics
    pub report: SolveReport,
}

/// Solve the seam between two chunks
///
/// Tower tiles are left out of the seam's possibilities; towers only grow
/// inside chunks.
///
/// # Errors
///
/// Returns an error if the solver rejects the seam dimensions or
/// configuration.
pub fn reconcile_seam(
    catalog: Arc<TileCatalog>,
    chunk_dimensions: [usize; 3],
    key: BufferKey,
    first: &BoundaryFaces,
    second: &BoundaryFaces,
    config: SolverConfig,
) -> Result<SeamSolution> {
    let config = SolverConfig {
        exclude_tower_tiles: true,
        ..config
    };
    let external = key.external_faces(first, second);
    let mut solver =
        Solver::with_external(catalog, key.dimensions(chunk_dimensions), config, external)?;
    let report = solver.run();
    let (grid, _) = solver.into_grid().into_parts();
    Ok(SeamSolution { grid, report })
}

/// One seam and its background solve
pub struct BufferZone {
    key: BufferKey,
    task: Option<Task<Result<SeamSolution>>>,
    solution: Option<SeamSolution>,
}

impl BufferZone {
    /// Start reconciling a seam in the background
    ///
    /// # Errors
    ///
    /// Returns an error if the seam thread cannot be started.
    pub fn spawn(
        key: BufferKey,
        catalog: Arc<TileCatalog>,
        chunk_dimensions: [usize; 3],
        faces: [Arc<BoundaryFaces>; 2],
        config: SolverConfig,
    ) -> Result<Self> {
        let [first, second] = faces;
        let task = Task::spawn(format!("seam {key}"), move || {
            reconcile_seam(catalog, chunk_dimensions, key, &first, &second, config)
        })?;
        Ok(Self {
            key,
            task: Some(task),
            solution: None,
        })
    }

    /// Seam key
    pub const fn key(&self) -> BufferKey {
        self.key
    }

    /// Finished seam, once available
    pub const fn solution(&self) -> Option<&SeamSolution> {
        self.solution.as_ref()
    }

    /// Whether the seam task has stopped
    pub const fn is_idle(&self) -> bool {
        self.task.is_none()
    }

    /// Check the seam task without blocking
    ///
    /// Returns whether the seam finished on this call.
    pub fn poll(&mut self) -> bool {
        let Some(task) = self.task.as_mut() else {
            return false;
        };
        if !task.poll() {
            return false;
        }
        match task.take() {
            Some(Ok(solution)) => {
                debug!(seam = %self.key, empty = solution.report.empty_cells, "seam reconciled");
                self.solution = Some(solution);
            }
            Some(Err(err)) => warn!(seam = %self.key, error = %err, "seam solve failed"),
            None => warn!(seam = %self.key, "seam solve did not produce a result"),
        }
        self.task = None;
        true
    }

    /// Block until the seam task has stopped
    pub fn join(&mut self) {
        if let Some(task) = self.task.as_mut() {
            task.join();
        }
    }

    /// Instantiation table for the seam's non-empty cells
    pub fn placements(
        &self,
        catalog: &TileCatalog,
        chunk_dimensions: [usize; 3],
        floors: &FloorHeights,
    ) -> Vec<TilePlacement> {
        let Some(solution) = self.solution.as_ref() else {
            return Vec::new();
        };
        let [origin_x, origin_z] = self.key.origin(chunk_dimensions);
        solution
            .grid
            .indexed_iter()
            .filter_map(|((x, y, z), &value)| {
                let tile = usize::try_from(value).ok()?;
                Some(TilePlacement {
                    tile,
                    position: [origin_x + x as i32, floors.get(y)?, origin_z + z as i32],
                    rotation: catalog.tile(tile).map_or(0, |t| t.rotation),
                })
            })
            .collect()
    }
}

impl Drop for BufferZone {
    fn drop(&mut self) {
        self.join();
    }
}
