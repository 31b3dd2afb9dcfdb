//! Chunk activation, background solves and their dependent jobs
//!
//! The scheduler owns every active chunk and seam keyed by coordinate. Each
//! chunk solve runs on its own thread; [`ChunkScheduler::tick`] polls them
//! without blocking. When a chunk's solve finishes, its tower growth job is
//! started, and every seam whose two chunks are both solved is reconciled.
//! Tearing a chunk down first joins its own tasks and those of the seams
//! that depend on it.

use crate::{
    algorithm::solver::SolverConfig,
    io::configuration::{
        DEFAULT_CHUNK_DIMENSIONS, DEFAULT_DESTROY_MARGIN, DEFAULT_SEED, DEFAULT_TILE_SIZE,
        MAX_CHUNK_DIMENSION, MAX_SPAWN_RADIUS,
    },
    io::error::{Result, invalid_parameter},
    math::probability::{RandomSelector, chunk_seed},
    spatial::tiles::TileCatalog,
    world::buffer::{BufferKey, BufferZone},
    world::chunk::{Chunk, ChunkCoord, ChunkPhase, TilePlacement},
    world::task::Task,
    world::tower::{FloorHeights, GrowthCurve, TowerConfig, TowerGrowth, TowerPieces},
};
use std::collections::HashMap;
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::{debug, info};

/// Pause between ticks while waiting for background work
const IDLE_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// World generation parameters
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WorldConfig {
    /// World seed; chunk, seam and tower seeds are derived from it
    pub seed: u64,
    /// Chunk volume `[x, y, z]` in cells
    pub chunk_dimensions: [usize; 3],
    /// Chunks kept alive past the activation radius
    pub destroy_margin: i32,
    /// World units per tile edge
    pub tile_size: i32,
    /// Solver parameters; the seed field is replaced per chunk
    pub solver: SolverConfig,
    /// Tower growth parameters
    pub tower: TowerConfig,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            chunk_dimensions: DEFAULT_CHUNK_DIMENSIONS,
            destroy_margin: DEFAULT_DESTROY_MARGIN,
            tile_size: DEFAULT_TILE_SIZE,
            solver: SolverConfig::default(),
            tower: TowerConfig::default(),
        }
    }
}

impl WorldConfig {
    /// Validate every parameter before any work starts
    ///
    /// # Errors
    ///
    /// Returns an error if a chunk dimension is out of range, the margin or
    /// tile size is invalid, or the solver or tower settings are invalid.
    pub fn validate(&self) -> Result<()> {
        for &size in &self.chunk_dimensions {
            if size == 0 || size > MAX_CHUNK_DIMENSION {
                return Err(invalid_parameter(
                    "chunk_dimensions",
                    &format!("{:?}", self.chunk_dimensions),
                    &format!("every axis must be between 1 and {MAX_CHUNK_DIMENSION}"),
                ));
            }
        }
        if self.destroy_margin < 0 {
            return Err(invalid_parameter(
                "destroy_margin",
                &self.destroy_margin,
                &"must not be negative",
            ));
        }
        if self.tile_size <= 0 {
            return Err(invalid_parameter(
                "tile_size",
                &self.tile_size,
                &"must be positive",
            ));
        }
        self.solver.validate()?;
        self.tower.validate()
    }
}

/// What one tick observed
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TickSummary {
    /// Chunks whose solve finished
    pub solved: Vec<ChunkCoord>,
    /// Chunks that became ready for instantiation
    pub ready: Vec<ChunkCoord>,
    /// Seams whose reconciliation finished
    pub seams: Vec<BufferKey>,
}

impl TickSummary {
    /// Whether nothing changed
    pub fn is_empty(&self) -> bool {
        self.solved.is_empty() && self.ready.is_empty() && self.seams.is_empty()
    }
}

/// Owns active chunks and seams and drives their background work
pub struct ChunkScheduler {
    catalog: Arc<TileCatalog>,
    config: WorldConfig,
    floors: Arc<FloorHeights>,
    curve: Arc<GrowthCurve>,
    pieces: Option<TowerPieces>,
    chunks: HashMap<ChunkCoord, Chunk>,
    buffers: HashMap<BufferKey, BufferZone>,
    radius: i32,
}

impl ChunkScheduler {
    /// Create a scheduler with no active chunks
    ///
    /// Floor heights are drawn once from the world seed. Tower growth is
    /// disabled if the catalog lacks any tower piece.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(catalog: Arc<TileCatalog>, config: WorldConfig) -> Result<Self> {
        config.validate()?;

        let mut random = RandomSelector::new(config.seed);
        let floors = FloorHeights::generate(config.chunk_dimensions[1], &config.tower, &mut random);
        let pieces = if config.tower.enabled {
            TowerPieces::resolve(&catalog)
        } else {
            None
        };
        debug!(heights = ?floors.as_slice(), towers = pieces.is_some(), "world configured");

        Ok(Self {
            catalog,
            config,
            floors: Arc::new(floors),
            curve: Arc::new(GrowthCurve::default()),
            pieces,
            chunks: HashMap::new(),
            buffers: HashMap::new(),
            radius: 0,
        })
    }

    /// Replace the tower height curve
    #[must_use]
    pub fn with_growth_curve(mut self, curve: GrowthCurve) -> Self {
        self.curve = Arc::new(curve);
        self
    }

    /// Move the activation area
    ///
    /// Chunks within `radius` of `center` (square distance) are spawned;
    /// chunks further than `radius + destroy_margin` are torn down.
    ///
    /// # Errors
    ///
    /// Returns an error if the radius is negative or above
    /// [`MAX_SPAWN_RADIUS`], or a solve thread cannot be started.
    pub fn update(&mut self, center: ChunkCoord, radius: i32) -> Result<()> {
        if !(0..=MAX_SPAWN_RADIUS).contains(&radius) {
            return Err(invalid_parameter(
                "radius",
                &radius,
                &format!("must be between 0 and {MAX_SPAWN_RADIUS}"),
            ));
        }
        self.radius = radius;

        let keep = radius + self.config.destroy_margin;
        let mut doomed: Vec<ChunkCoord> = self
            .chunks
            .keys()
            .copied()
            .filter(|coord| coord.distance(center) > keep)
            .collect();
        doomed.sort_unstable();
        for coord in doomed {
            self.destroy(coord);
        }

        for dx in -radius..=radius {
            for dz in -radius..=radius {
                let coord = ChunkCoord::new(center.x + dx, center.z + dz);
                if !self.chunks.contains_key(&coord) {
                    self.spawn(coord)?;
                }
            }
        }
        Ok(())
    }

    fn spawn(&mut self, coord: ChunkCoord) -> Result<()> {
        let config = self
            .config
            .solver
            .with_seed(chunk_seed(self.config.seed, coord.x, coord.z));
        let chunk = Chunk::spawn(
            coord,
            Arc::clone(&self.catalog),
            self.config.chunk_dimensions,
            config,
        )?;
        debug!(chunk = %coord, "chunk spawned");
        self.chunks.insert(coord, chunk);
        Ok(())
    }

    /// Tear a chunk down along with every seam that depends on it
    ///
    /// Blocks until their tasks have stopped.
    pub fn destroy(&mut self, coord: ChunkCoord) {
        let dependent: Vec<BufferKey> = self
            .buffers
            .keys()
            .copied()
            .filter(|key| key.involves(coord))
            .collect();
        for key in dependent {
            if let Some(mut buffer) = self.buffers.remove(&key) {
                buffer.join();
            }
        }
        if let Some(mut chunk) = self.chunks.remove(&coord) {
            chunk.join_all();
            debug!(chunk = %coord, "chunk destroyed");
        }
    }

    /// Poll every task once and start the jobs that became possible
    ///
    /// # Errors
    ///
    /// Returns an error if a dependent thread cannot be started.
    pub fn tick(&mut self) -> Result<TickSummary> {
        let mut summary = TickSummary::default();
        let mut coords: Vec<ChunkCoord> = self.chunks.keys().copied().collect();
        coords.sort_unstable();

        for &coord in &coords {
            let Some(chunk) = self.chunks.get_mut(&coord) else {
                continue;
            };
            if let Some(solution) = chunk.poll_solve() {
                summary.solved.push(coord);
                match self.pieces {
                    Some(pieces) => {
                        let floors = Arc::clone(&self.floors);
                        let curve = Arc::clone(&self.curve);
                        let tower = self.config.tower;
                        let seed = chunk_seed(!self.config.seed, coord.x, coord.z);
                        let task = Task::spawn(format!("towers {coord}"), move || {
                            let growth = TowerGrowth {
                                pieces: &pieces,
                                floors: &floors,
                                curve: &curve,
                                config: &tower,
                            };
                            growth.grow(&solution.grid, &mut RandomSelector::new(seed))
                        })?;
                        chunk.attach_towers(task);
                    }
                    None => {
                        chunk.skip_towers();
                        summary.ready.push(coord);
                    }
                }
            }
            if chunk.poll_towers() {
                summary.ready.push(coord);
            }
        }

        for key in self.pending_seams() {
            self.spawn_seam(key)?;
        }

        let mut keys: Vec<BufferKey> = self.buffers.keys().copied().collect();
        keys.sort_unstable();
        for key in keys {
            let finished = self
                .buffers
                .get_mut(&key)
                .is_some_and(BufferZone::poll);
            if finished {
                summary.seams.push(key);
            }
        }

        Ok(summary)
    }

    /// Seams whose chunks are both solved but that have not been started
    fn pending_seams(&self) -> Vec<BufferKey> {
        let mut pending: Vec<BufferKey> = self
            .chunks
            .iter()
            .filter(|(_, chunk)| chunk.solution().is_some())
            .flat_map(|(&coord, _)| BufferKey::around(coord))
            .filter(|key| !self.buffers.contains_key(key))
            .filter(|key| {
                [key.first, key.second].iter().all(|coord| {
                    self.chunks
                        .get(coord)
                        .is_some_and(|chunk| chunk.solution().is_some())
                })
            })
            .collect();
        pending.sort_unstable();
        pending.dedup();
        pending
    }

    fn spawn_seam(&mut self, key: BufferKey) -> Result<()> {
        let (Some(first), Some(second)) = (
            self.chunks.get(&key.first).and_then(Chunk::faces),
            self.chunks.get(&key.second).and_then(Chunk::faces),
        ) else {
            return Ok(());
        };
        let seed = chunk_seed(
            chunk_seed(self.config.seed, key.first.x, key.first.z),
            key.second.x,
            key.second.z,
        );
        let buffer = BufferZone::spawn(
            key,
            Arc::clone(&self.catalog),
            self.config.chunk_dimensions,
            [first, second],
            self.config.solver.with_seed(seed),
        )?;
        debug!(seam = %key, "seam scheduled");
        self.buffers.insert(key, buffer);
        Ok(())
    }

    /// Whether every chunk and seam has finished and nothing is left to start
    pub fn is_idle(&self) -> bool {
        self.chunks.values().all(|chunk| {
            chunk.is_idle() && matches!(chunk.phase(), ChunkPhase::Ready | ChunkPhase::Failed)
        }) && self.buffers.values().all(BufferZone::is_idle)
            && self.pending_seams().is_empty()
    }

    /// Tick until idle, sleeping briefly between polls
    ///
    /// # Errors
    ///
    /// Returns an error if a dependent thread cannot be started.
    pub fn run_until_idle(&mut self) -> Result<()> {
        self.run_until_idle_with(|_| {})
    }

    /// Tick until idle, handing every tick's summary to `on_tick`
    ///
    /// # Errors
    ///
    /// Returns an error if a dependent thread cannot be started.
    pub fn run_until_idle_with<F>(&mut self, mut on_tick: F) -> Result<()>
    where
        F: FnMut(&TickSummary),
    {
        loop {
            let summary = self.tick()?;
            on_tick(&summary);
            if self.is_idle() {
                break;
            }
            thread::sleep(IDLE_POLL_INTERVAL);
        }
        info!(
            chunks = self.chunks.len(),
            seams = self.buffers.len(),
            "world generation idle"
        );
        Ok(())
    }

    /// Active chunk at `coord`
    pub fn chunk(&self, coord: ChunkCoord) -> Option<&Chunk> {
        self.chunks.get(&coord)
    }

    /// Coordinates of every active chunk, sorted
    pub fn chunk_coords(&self) -> Vec<ChunkCoord> {
        let mut coords: Vec<ChunkCoord> = self.chunks.keys().copied().collect();
        coords.sort_unstable();
        coords
    }

    /// Active seam for `key`
    pub fn buffer(&self, key: BufferKey) -> Option<&BufferZone> {
        self.buffers.get(&key)
    }

    /// Keys of every active seam, sorted
    pub fn buffer_keys(&self) -> Vec<BufferKey> {
        let mut keys: Vec<BufferKey> = self.buffers.keys().copied().collect();
        keys.sort_unstable();
        keys
    }

    /// World height of every grid level
    pub fn floor_heights(&self) -> &FloorHeights {
        &self.floors
    }

    /// Tile catalog shared by every solve
    pub fn catalog(&self) -> &TileCatalog {
        &self.catalog
    }

    /// Active configuration
    pub const fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Radius passed to the last update
    pub const fn radius(&self) -> i32 {
        self.radius
    }

    /// Instantiation table for every finished chunk and seam in world units
    ///
    /// Positions are the tile positions scaled by `tile_size`.
    pub fn placements(&self) -> Vec<TilePlacement> {
        let tile_size = self.config.tile_size;
        self.tile_placements()
            .into_iter()
            .map(|placement| placement.scaled(tile_size))
            .collect()
    }

    /// Instantiation table for every finished chunk and seam in tile units
    pub fn tile_placements(&self) -> Vec<TilePlacement> {
        let dimensions = self.config.chunk_dimensions;
        let mut placements = Vec::new();
        for coord in self.chunk_coords() {
            if let Some(chunk) = self.chunks.get(&coord) {
                placements.extend(chunk.placements(&self.catalog, dimensions, &self.floors));
            }
        }
        for key in self.buffer_keys() {
            if let Some(buffer) = self.buffers.get(&key) {
                placements.extend(buffer.placements(&self.catalog, dimensions, &self.floors));
            }
        }
        placements
    }
}

impl Drop for ChunkScheduler {
    fn drop(&mut self) {
        for buffer in self.buffers.values_mut() {
            buffer.join();
        }
        for chunk in self.chunks.values_mut() {
            chunk.join_all();
        }
    }
}
