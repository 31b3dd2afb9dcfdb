//! Chunk coordinates, solve results and the per-chunk task lifecycle

use crate::{
    algorithm::solver::{SolveReport, Solver, SolverConfig},
    io::error::Result,
    spatial::direction::Direction,
    spatial::grid::BoundaryFaces,
    spatial::tiles::TileCatalog,
    world::task::Task,
    world::tower::{FloorHeights, TowerTile},
};
use ndarray::Array3;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// Position of a chunk on the horizontal chunk grid
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkCoord {
    /// Chunk column along `x`
    pub x: i32,
    /// Chunk row along `z`
    pub z: i32,
}

impl ChunkCoord {
    /// Create a coordinate
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Adjacent coordinate in a horizontal direction
    ///
    /// Vertical directions return the coordinate unchanged.
    #[must_use]
    pub const fn step(self, direction: Direction) -> Self {
        let [dx, _, dz] = direction.offset();
        Self {
            x: self.x + dx,
            z: self.z + dz,
        }
    }

    /// Chebyshev distance in chunks
    pub const fn distance(self, other: Self) -> i32 {
        let dx = (self.x - other.x).abs();
        let dz = (self.z - other.z).abs();
        if dx > dz { dx } else { dz }
    }

    /// World tile coordinate of the chunk's `[0, 0, 0]` cell along `x` and `z`
    ///
    /// Chunks are spaced one tile apart so seams fit between them.
    pub const fn origin(self, dimensions: [usize; 3]) -> [i32; 2] {
        [
            self.x * (dimensions[0] as i32 + 1),
            self.z * (dimensions[2] as i32 + 1),
        ]
    }
}

impl fmt::Display for ChunkCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.z)
    }
}

/// Decided grid and boundary faces of one finished chunk solve
#[derive(Clone, Debug)]
pub struct ChunkSolution {
    /// Decided values indexed `[x, y, z]`
    pub grid: Array3<i32>,
    /// Boundary faces, shared with seam solves
    pub faces: Arc<BoundaryFaces>,
    /// Solve statistics
    pub report: SolveReport,
}

/// One tile ready for instantiation
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TilePlacement {
    /// Tile index
    pub tile: usize,
    /// World position in tile units
    pub position: [i32; 3],
    /// Rotation around the vertical axis in quarter turns
    pub rotation: u8,
}

impl TilePlacement {
    /// The same placement with its position in world units
    #[must_use]
    pub const fn scaled(self, tile_size: i32) -> Self {
        let [x, y, z] = self.position;
        Self {
            position: [x * tile_size, y * tile_size, z * tile_size],
            ..self
        }
    }
}

/// Run a full solve for one chunk volume
///
/// # Errors
///
/// Returns an error if the solver rejects the dimensions or configuration.
pub fn solve_chunk(
    catalog: Arc<TileCatalog>,
    dimensions: [usize; 3],
    config: SolverConfig,
) -> Result<ChunkSolution> {
    let mut solver = Solver::new(catalog, dimensions, config)?;
    let report = solver.run();
    let (grid, faces) = solver.into_grid().into_parts();
    Ok(ChunkSolution {
        grid,
        faces: Arc::new(faces),
        report,
    })
}

/// Where a chunk is in its lifecycle
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChunkPhase {
    /// Main solve still running
    Solving,
    /// Solved, tower growth still running
    Growing,
    /// Solve and tower growth finished
    Ready,
    /// The solve failed; the chunk stays empty
    Failed,
}

/// One active chunk and the background work it owns
pub struct Chunk {
    coord: ChunkCoord,
    solve: Option<Task<Result<ChunkSolution>>>,
    towers_task: Option<Task<Vec<TowerTile>>>,
    solution: Option<Arc<ChunkSolution>>,
    towers: Vec<TowerTile>,
    phase: ChunkPhase,
}

impl Chunk {
    /// Start solving a chunk in the background
    ///
    /// # Errors
    ///
    /// Returns an error if the solve thread cannot be started.
    pub fn spawn(
        coord: ChunkCoord,
        catalog: Arc<TileCatalog>,
        dimensions: [usize; 3],
        config: SolverConfig,
    ) -> Result<Self> {
        let task = Task::spawn(format!("chunk {coord}"), move || {
            solve_chunk(catalog, dimensions, config)
        })?;
        Ok(Self {
            coord,
            solve: Some(task),
            towers_task: None,
            solution: None,
            towers: Vec::new(),
            phase: ChunkPhase::Solving,
        })
    }

    /// Chunk coordinate
    pub const fn coord(&self) -> ChunkCoord {
        self.coord
    }

    /// Current lifecycle phase
    pub const fn phase(&self) -> ChunkPhase {
        self.phase
    }

    /// Finished solve, once available
    pub fn solution(&self) -> Option<&Arc<ChunkSolution>> {
        self.solution.as_ref()
    }

    /// Boundary faces, once the solve has finished
    pub fn faces(&self) -> Option<Arc<BoundaryFaces>> {
        self.solution
            .as_ref()
            .map(|solution| Arc::clone(&solution.faces))
    }

    /// Tower overlay produced so far
    pub fn towers(&self) -> &[TowerTile] {
        &self.towers
    }

    /// Check the solve task without blocking
    ///
    /// Returns the solution the first time it becomes available.
    pub fn poll_solve(&mut self) -> Option<Arc<ChunkSolution>> {
        let task = self.solve.as_mut()?;
        if !task.poll() {
            return None;
        }
        let outcome = task.take();
        self.solve = None;
        match outcome {
            Some(Ok(solution)) => {
                debug!(
                    chunk = %self.coord,
                    steps = solution.report.steps,
                    empty = solution.report.empty_cells,
                    "chunk solved"
                );
                let solution = Arc::new(solution);
                self.solution = Some(Arc::clone(&solution));
                self.phase = ChunkPhase::Growing;
                Some(solution)
            }
            Some(Err(err)) => {
                warn!(chunk = %self.coord, error = %err, "chunk solve failed");
                self.phase = ChunkPhase::Failed;
                None
            }
            None => {
                warn!(chunk = %self.coord, "chunk solve did not produce a result");
                self.phase = ChunkPhase::Failed;
                None
            }
        }
    }

    /// Attach the tower growth task that depends on this chunk's solve
    pub fn attach_towers(&mut self, task: Task<Vec<TowerTile>>) {
        self.towers_task = Some(task);
    }

    /// Mark the chunk ready without tower growth
    pub fn skip_towers(&mut self) {
        if self.phase == ChunkPhase::Growing {
            self.phase = ChunkPhase::Ready;
        }
    }

    /// Check the tower task without blocking
    ///
    /// Returns whether the chunk became ready on this call.
    pub fn poll_towers(&mut self) -> bool {
        let Some(task) = self.towers_task.as_mut() else {
            return false;
        };
        if !task.poll() {
            return false;
        }
        if task.failed() {
            warn!(chunk = %self.coord, "tower growth failed, chunk kept without towers");
        }
        self.towers = task.take().unwrap_or_default();
        self.towers_task = None;
        self.phase = ChunkPhase::Ready;
        debug!(chunk = %self.coord, towers = self.towers.len(), "chunk ready");
        true
    }

    /// Block until every task owned by the chunk has stopped
    pub fn join_all(&mut self) {
        if let Some(task) = self.solve.as_mut() {
            task.join();
        }
        if let Some(task) = self.towers_task.as_mut() {
            task.join();
        }
    }

    /// Whether no task of this chunk is still running
    pub fn is_idle(&self) -> bool {
        self.solve.is_none() && self.towers_task.is_none()
    }

    /// Instantiation table: every non-empty grid cell plus the tower overlay
    ///
    /// Grid level `y` is placed at world height `floors[y]`.
    pub fn placements(
        &self,
        catalog: &TileCatalog,
        dimensions: [usize; 3],
        floors: &FloorHeights,
    ) -> Vec<TilePlacement> {
        let Some(solution) = self.solution.as_ref() else {
            return Vec::new();
        };
        let [origin_x, origin_z] = self.coord.origin(dimensions);
        let rotation = |tile: usize| catalog.tile(tile).map_or(0, |t| t.rotation);

        let mut placements: Vec<TilePlacement> = solution
            .grid
            .indexed_iter()
            .filter_map(|((x, y, z), &value)| {
                let tile = usize::try_from(value).ok()?;
                let height = floors.get(y)?;
                Some(TilePlacement {
                    tile,
                    position: [origin_x + x as i32, height, origin_z + z as i32],
                    rotation: rotation(tile),
                })
            })
            .collect();

        placements.extend(self.towers.iter().map(|tower| TilePlacement {
            tile: tower.tile,
            position: [
                origin_x + tower.position[0],
                tower.position[1],
                origin_z + tower.position[2],
            ],
            rotation: rotation(tower.tile),
        }));
        placements
    }
}

impl Drop for Chunk {
    fn drop(&mut self) {
        self.join_all();
    }
}
