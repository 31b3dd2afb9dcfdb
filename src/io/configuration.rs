//! Generation constants and runtime configuration defaults

/// Sentinel for a cell that has not been decided yet
pub const UNDECIDED: i32 = -1;
/// Sentinel for a cell that holds no tile
pub const EMPTY: i32 = -2;

// Local contradiction handling relies on this cap, not on backtracking
/// Maximum worklist pops per propagation pass
pub const PROPAGATION_ITERATION_CAP: usize = 1000;

/// Weight assigned to tiles imported with a non-positive weight
pub const MIN_TILE_WEIGHT: f64 = 0.001;

// Default values for configurable parameters
/// Fixed seed for reproducible generation
pub const DEFAULT_SEED: u64 = 42;

/// Default chunk volume `[x, y, z]` in cells
pub const DEFAULT_CHUNK_DIMENSIONS: [usize; 3] = [8, 3, 8];

/// Default activation radius in chunks
pub const DEFAULT_SPAWN_RADIUS: i32 = 1;

/// Largest activation radius; every chunk in the square gets its own thread
pub const MAX_SPAWN_RADIUS: i32 = 16;

/// Extra chunks kept alive past the activation radius before teardown
pub const DEFAULT_DESTROY_MARGIN: i32 = 1;

/// World units per tile edge
pub const DEFAULT_TILE_SIZE: i32 = 8;

// Safety limit to prevent excessive memory allocation
/// Maximum allowed chunk dimension along any axis
pub const MAX_CHUNK_DIMENSION: usize = 256;

// Tower growth
/// Smallest vertical gap between consecutive floors
pub const DEFAULT_MIN_FLOOR_GAP: i32 = 3;
/// Largest vertical gap between consecutive floors
pub const DEFAULT_MAX_FLOOR_GAP: i32 = 6;
/// Height span available to towers growing from the topmost floor
pub const TOP_FLOOR_GROWTH: i32 = 4;
/// Tower pieces added below the bottom floor
pub const DEFAULT_TILES_BELOW_BOTTOM_FLOOR: i32 = 3;

/// Name of the tower foundation piece
pub const TOWER_BOTTOM_NAME: &str = "tower_bottom";
/// Name of the plain tower body piece
pub const TOWER_BODY_NAME: &str = "tower";
/// Name of the tower cap piece
pub const TOWER_TOP_NAME: &str = "tower_top";
/// Name of the windowed tower body piece
pub const TOWER_WINDOW_NAME: &str = "tower_window";

// Logging
/// Filter used when `RUST_LOG` is not set
pub const DEFAULT_LOG_FILTER: &str = "towerwfc=info";

// Output settings
/// Prefix of exported chunk images
pub const OUTPUT_PREFIX: &str = "chunk";
