//! Command-line interface for generating a chunked tile world around the origin

use crate::algorithm::constraints::ConnectivityPolicy;
use crate::io::catalog::demo_catalog;
use crate::io::configuration::{
    DEFAULT_CHUNK_DIMENSIONS, DEFAULT_SEED, DEFAULT_SPAWN_RADIUS, MAX_SPAWN_RADIUS, OUTPUT_PREFIX,
};
use crate::io::error::Result;
use crate::io::image::export_placements_as_png;
use crate::io::progress::{ProgressManager, chunk_count, seam_count};
use crate::world::chunk::ChunkCoord;
use crate::world::scheduler::{ChunkScheduler, WorldConfig};
use crate::world::tower::GrowthCurve;
use clap::{Parser, ValueEnum};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

/// Shape of the curve that draws grown tower heights
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum GrowthProfile {
    /// Mostly short towers with an occasional tall one
    #[default]
    Skewed,
    /// Every height equally likely
    Linear,
}

impl GrowthProfile {
    /// Curve used by the tower growth pass
    pub fn curve(self) -> GrowthCurve {
        match self {
            Self::Skewed => GrowthCurve::default(),
            Self::Linear => GrowthCurve::linear(),
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "towerwfc")]
#[command(
    author,
    version,
    about = "Generate a chunked 3D tile world with wave function collapse"
)]
/// Command-line arguments for world generation
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    /// Random seed for reproducible generation
    #[arg(short, long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// Chunks generated around the origin in every direction
    #[arg(
        short,
        long,
        default_value_t = DEFAULT_SPAWN_RADIUS,
        value_parser = clap::value_parser!(i32).range(0..=i64::from(MAX_SPAWN_RADIUS))
    )]
    pub radius: i32,

    /// Chunk size along x in cells
    #[arg(short = 'w', long, default_value_t = DEFAULT_CHUNK_DIMENSIONS[0])]
    pub width: usize,

    /// Chunk size along y in cells (number of floors)
    #[arg(short = 'H', long, default_value_t = DEFAULT_CHUNK_DIMENSIONS[1])]
    pub height: usize,

    /// Chunk size along z in cells
    #[arg(short, long, default_value_t = DEFAULT_CHUNK_DIMENSIONS[2])]
    pub depth: usize,

    /// Directory for top-down PNG maps of the world and each chunk
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Only vertical neighbours satisfy must-connect tiles
    #[arg(long)]
    pub vertical_only: bool,

    /// Skip tower growth
    #[arg(long)]
    pub no_towers: bool,

    /// Height distribution of grown tower tops
    #[arg(long, value_enum, default_value_t = GrowthProfile::Skewed)]
    pub growth: GrowthProfile,
}

impl Cli {
    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }

    /// World configuration described by the flags
    pub fn world_config(&self) -> WorldConfig {
        let mut config = WorldConfig {
            seed: self.seed,
            chunk_dimensions: [self.width, self.height, self.depth],
            ..WorldConfig::default()
        };
        if self.vertical_only {
            config.solver.connectivity = ConnectivityPolicy::VerticalOnly;
        }
        config.tower.enabled = !self.no_towers;
        config
    }
}

/// Runs one generation session from parsed arguments
pub struct WorldRunner {
    cli: Cli,
}

impl WorldRunner {
    /// Create a runner for the given CLI arguments
    pub const fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Generate every chunk and seam within the radius, then export maps
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid, a worker thread
    /// cannot be started, or an image cannot be written.
    pub fn run(&self) -> Result<()> {
        let start_time = Instant::now();
        let catalog = Arc::new(demo_catalog()?);
        let mut scheduler = ChunkScheduler::new(catalog, self.cli.world_config())?
            .with_growth_curve(self.cli.growth.curve());
        scheduler.update(ChunkCoord::default(), self.cli.radius)?;

        let radius = self.cli.radius;
        let progress = self
            .cli
            .should_show_progress()
            .then(|| ProgressManager::new(chunk_count(radius), seam_count(radius)));

        scheduler.run_until_idle_with(|summary| {
            if let Some(ref pm) = progress {
                for &coord in &summary.ready {
                    pm.chunk_ready(coord);
                }
                for &key in &summary.seams {
                    pm.seam_done(key);
                }
            }
        })?;

        if let Some(ref pm) = progress {
            pm.finish();
        }

        let placements = scheduler.placements();
        info!(
            chunks = scheduler.chunk_coords().len(),
            seams = scheduler.buffer_keys().len(),
            tiles = placements.len(),
            elapsed_ms = start_time.elapsed().as_millis() as u64,
            "world generated"
        );

        if let Some(ref directory) = self.cli.output {
            Self::export(&scheduler, directory)?;
        }
        Ok(())
    }

    fn export(scheduler: &ChunkScheduler, directory: &Path) -> Result<()> {
        let dimensions = scheduler.config().chunk_dimensions;
        for coord in scheduler.chunk_coords() {
            let Some(chunk) = scheduler.chunk(coord) else {
                continue;
            };
            let placements =
                chunk.placements(scheduler.catalog(), dimensions, scheduler.floor_heights());
            if placements.is_empty() {
                continue;
            }
            let path = directory.join(format!("{OUTPUT_PREFIX}_{}_{}.png", coord.x, coord.z));
            export_placements_as_png(&placements, &path)?;
        }

        let world = scheduler.tile_placements();
        if !world.is_empty() {
            let path = directory.join("world.png");
            export_placements_as_png(&world, &path)?;
            info!(path = %path.display(), "world map exported");
        }
        Ok(())
    }
}
