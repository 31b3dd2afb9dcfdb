use crate::{
    algorithm::bitset::TileBitset,
    algorithm::constraints::{ConnectivityPolicy, ConstraintContext, ExternalFaces},
    algorithm::propagation::{PropagationScope, Worklist, propagate, seed_external},
    algorithm::selection::{choose_cell, pick_tile},
    io::configuration::{DEFAULT_SEED, MAX_CHUNK_DIMENSION, PROPAGATION_ITERATION_CAP},
    io::error::{Result, invalid_parameter},
    math::probability::RandomSelector,
    spatial::grid::{CellState, GridState},
    spatial::tiles::TileCatalog,
};
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// Parameters controlling a single solve
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SolverConfig {
    /// Seed for cell and tile picks
    pub seed: u64,
    /// Maximum worklist pops per propagation pass
    pub propagation_cap: usize,
    /// Which neighbours can satisfy `mustConnect` tiles
    pub connectivity: ConnectivityPolicy,
    /// Remove tower tiles from every cell's starting possibilities
    pub exclude_tower_tiles: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            propagation_cap: PROPAGATION_ITERATION_CAP,
            connectivity: ConnectivityPolicy::default(),
            exclude_tower_tiles: false,
        }
    }
}

impl SolverConfig {
    /// Copy of this configuration with another seed
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Check the configuration for values a solve cannot run with
    ///
    /// # Errors
    ///
    /// Returns an error if the propagation cap is zero.
    pub fn validate(&self) -> Result<()> {
        if self.propagation_cap == 0 {
            return Err(invalid_parameter(
                "propagation_cap",
                &self.propagation_cap,
                &"must allow at least one pop per pass",
            ));
        }
        Ok(())
    }
}

/// Statistics gathered while a solve runs
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SolveReport {
    /// Main-loop steps taken
    pub steps: usize,
    /// Cells decided by propagation rather than by a pick
    pub forced: usize,
    /// Cells that ended empty
    pub empty_cells: usize,
    /// Propagation passes that stopped at the cap
    pub capped_passes: usize,
    /// Whether the step limit was reached with cells still undecided
    pub exhausted: bool,
}

/// Resumable constraint solver over one grid volume
///
/// Each call to [`Solver::step`] decides one cell and propagates the result.
/// Contradictions never fail the solve; they leave empty cells behind.
pub struct Solver {
    catalog: Arc<TileCatalog>,
    grid: GridState,
    worklist: Worklist,
    external: ExternalFaces,
    config: SolverConfig,
    random: RandomSelector,
    step_limit: usize,
    report: SolveReport,
}

impl Solver {
    /// Create a solver for an isolated volume
    ///
    /// # Errors
    ///
    /// Returns an error if a dimension is zero or exceeds the size limit, or
    /// if the configuration is invalid.
    pub fn new(
        catalog: Arc<TileCatalog>,
        dimensions: [usize; 3],
        config: SolverConfig,
    ) -> Result<Self> {
        Self::with_external(catalog, dimensions, config, ExternalFaces::new())
    }

    /// Create a solver whose outer faces border fixed external cells
    ///
    /// The external cells narrow the face cells before the first step and
    /// are consulted by every placement filter afterwards.
    ///
    /// # Errors
    ///
    /// Returns an error if a dimension is zero or exceeds the size limit, or
    /// if the configuration is invalid.
    pub fn with_external(
        catalog: Arc<TileCatalog>,
        dimensions: [usize; 3],
        config: SolverConfig,
        external: ExternalFaces,
    ) -> Result<Self> {
        validate_dimensions(dimensions)?;
        config.validate()?;

        let mut initial = TileBitset::all(catalog.len());
        if config.exclude_tower_tiles {
            initial.retain(|tile| !catalog.modifiers(tile).is_tower_tile);
        }

        let mut grid = GridState::new(dimensions, &initial);
        let step_limit = grid.cell_count();
        if initial.is_empty() {
            for position in grid.undecided_positions() {
                grid.decide(position, CellState::Empty);
            }
        }

        let mut solver = Self {
            catalog,
            grid,
            worklist: Worklist::new(),
            external,
            config,
            random: RandomSelector::new(config.seed),
            step_limit,
            report: SolveReport::default(),
        };

        if !solver.external.is_empty() {
            let scope = PropagationScope {
                catalog: &solver.catalog,
                external: &solver.external,
                policy: solver.config.connectivity,
                cap: solver.config.propagation_cap,
            };
            solver.report.forced += seed_external(&scope, &mut solver.grid, &mut solver.worklist);
            solver.run_propagation();
        }

        Ok(solver)
    }

    /// Perform one select, pick and propagate cycle
    ///
    /// Returns whether more work remains.
    pub fn step(&mut self) -> bool {
        if self.report.steps >= self.step_limit {
            return false;
        }
        if !self.worklist.is_empty() {
            self.run_propagation();
        }

        let Some(position) = choose_cell(&self.grid, &self.catalog, &mut self.random) else {
            return false;
        };
        self.report.steps += 1;

        let state = {
            let context = ConstraintContext::new(
                &self.catalog,
                &self.grid,
                &self.external,
                self.config.connectivity,
            );
            pick_tile(&context, position, &mut self.random)
        };
        trace!(?position, ?state, "decided cell");
        self.grid.decide(position, state);
        self.worklist.push(position);
        self.run_propagation();

        self.grid.has_undecided() && self.report.steps < self.step_limit
    }

    /// Step until every cell is decided or the step limit is reached
    pub fn run(&mut self) -> SolveReport {
        while self.step() {}
        self.finish()
    }

    fn finish(&mut self) -> SolveReport {
        self.report.empty_cells = self.grid.empty_count();
        self.report.exhausted = self.grid.has_undecided();
        if self.report.exhausted {
            warn!(
                steps = self.report.steps,
                limit = self.step_limit,
                "solve stopped at the step limit with undecided cells"
            );
        } else {
            debug!(
                steps = self.report.steps,
                forced = self.report.forced,
                empty = self.report.empty_cells,
                "solve finished"
            );
        }
        self.report
    }

    fn run_propagation(&mut self) {
        let scope = PropagationScope {
            catalog: &self.catalog,
            external: &self.external,
            policy: self.config.connectivity,
            cap: self.config.propagation_cap,
        };
        let outcome = propagate(&scope, &mut self.grid, &mut self.worklist);
        self.report.forced += outcome.forced;
        if outcome.capped {
            self.report.capped_passes += 1;
            debug!(
                pops = outcome.pops,
                pending = self.worklist.len(),
                "propagation pass reached its cap"
            );
        }
    }

    /// Whether every cell has been decided
    pub fn is_complete(&self) -> bool {
        !self.grid.has_undecided()
    }

    /// Statistics so far
    pub const fn report(&self) -> SolveReport {
        self.report
    }

    /// Current grid state
    pub const fn grid(&self) -> &GridState {
        &self.grid
    }

    /// Catalog the solve draws from
    pub fn catalog(&self) -> &TileCatalog {
        &self.catalog
    }

    /// Consume the solver, keeping the grid
    pub fn into_grid(self) -> GridState {
        self.grid
    }
}

fn validate_dimensions(dimensions: [usize; 3]) -> Result<()> {
    for (axis, &size) in ["x", "y", "z"].iter().zip(dimensions.iter()) {
        if size == 0 || size > MAX_CHUNK_DIMENSION {
            return Err(invalid_parameter(
                "dimensions",
                &format!("{size} along {axis}"),
                &format!("must be between 1 and {MAX_CHUNK_DIMENSION}"),
            ));
        }
    }
    Ok(())
}
