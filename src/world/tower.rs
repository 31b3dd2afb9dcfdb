//! Vertical tower growth layered on top of a solved chunk
//!
//! Grid levels sit at irregular world heights given by [`FloorHeights`]. A
//! tower piece with another tower piece directly above it has the vertical
//! gap between the two levels filled with body pieces. A piece with nothing
//! above grows a capped top whose height is drawn through a [`GrowthCurve`].
//! Bottom pieces on the lowest level also reach a few tiles below it.

use crate::{
    io::configuration::{
        DEFAULT_MAX_FLOOR_GAP, DEFAULT_MIN_FLOOR_GAP, DEFAULT_TILES_BELOW_BOTTOM_FLOOR,
        TOP_FLOOR_GROWTH, TOWER_BODY_NAME, TOWER_BOTTOM_NAME, TOWER_TOP_NAME, TOWER_WINDOW_NAME,
    },
    io::error::{Result, invalid_parameter},
    math::interpolation::Cubic,
    math::probability::RandomSelector,
    spatial::tiles::TileCatalog,
};
use ndarray::Array3;
use tracing::{debug, warn};

/// One tower piece placed outside the main grid
///
/// `position` is `[x, height, z]` with `x` and `z` local to the chunk and
/// `height` in world tile units, negative below the lowest floor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TowerTile {
    /// Chunk-local column and absolute height
    pub position: [i32; 3],
    /// Tile index of the piece
    pub tile: usize,
}

/// Catalog indices of the four tower pieces
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TowerPieces {
    /// Foundation piece
    pub bottom: usize,
    /// Plain body piece
    pub body: usize,
    /// Cap piece
    pub top: usize,
    /// Windowed body piece
    pub window: usize,
}

impl TowerPieces {
    /// Look the pieces up by their conventional names
    ///
    /// Returns `None` if any of them is missing from the catalog.
    pub fn resolve(catalog: &TileCatalog) -> Option<Self> {
        let lookup = |name: &str| {
            let index = catalog.index_of(name);
            if index.is_none() {
                warn!(piece = name, "tower piece missing from catalog, tower growth disabled");
            }
            index
        };
        Some(Self {
            bottom: lookup(TOWER_BOTTOM_NAME)?,
            body: lookup(TOWER_BODY_NAME)?,
            top: lookup(TOWER_TOP_NAME)?,
            window: lookup(TOWER_WINDOW_NAME)?,
        })
    }

    /// Whether `tile` is any tower piece
    pub const fn contains(&self, tile: usize) -> bool {
        tile == self.bottom || tile == self.body || tile == self.top || tile == self.window
    }

    /// Whether `tile` continues upwards into a gap or a grown top
    pub const fn grows(&self, tile: usize) -> bool {
        tile == self.bottom || tile == self.body || tile == self.window
    }
}

/// Tower growth parameters
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TowerConfig {
    /// Whether the pass runs at all
    pub enabled: bool,
    /// Smallest height difference between consecutive levels
    pub min_floor_gap: i32,
    /// Largest height difference between consecutive levels
    pub max_floor_gap: i32,
    /// Height span available to tops on the highest level
    pub top_floor_growth: i32,
    /// Body pieces added under bottoms on the lowest level
    pub tiles_below_bottom_floor: i32,
}

impl Default for TowerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            min_floor_gap: DEFAULT_MIN_FLOOR_GAP,
            max_floor_gap: DEFAULT_MAX_FLOOR_GAP,
            top_floor_growth: TOP_FLOOR_GROWTH,
            tiles_below_bottom_floor: DEFAULT_TILES_BELOW_BOTTOM_FLOOR,
        }
    }
}

impl TowerConfig {
    /// Validate gap and growth settings
    ///
    /// # Errors
    ///
    /// Returns an error if the minimum gap leaves no room for a top between
    /// levels, the gap range is inverted, or a count is negative.
    pub fn validate(&self) -> Result<()> {
        if self.min_floor_gap < 2 {
            return Err(invalid_parameter(
                "min_floor_gap",
                &self.min_floor_gap,
                &"must be at least 2 so a top fits between levels",
            ));
        }
        if self.max_floor_gap < self.min_floor_gap {
            return Err(invalid_parameter(
                "max_floor_gap",
                &self.max_floor_gap,
                &format!("must not be below min_floor_gap ({})", self.min_floor_gap),
            ));
        }
        if self.top_floor_growth < 2 {
            return Err(invalid_parameter(
                "top_floor_growth",
                &self.top_floor_growth,
                &"must be at least 2 so a top fits on the highest level",
            ));
        }
        if self.tiles_below_bottom_floor < 0 {
            return Err(invalid_parameter(
                "tiles_below_bottom_floor",
                &self.tiles_below_bottom_floor,
                &"must not be negative",
            ));
        }
        Ok(())
    }
}

/// World height of every grid level
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FloorHeights {
    heights: Vec<i32>,
}

impl FloorHeights {
    /// Random walk from zero with each step drawn from `[min_gap, max_gap]`
    pub fn generate(levels: usize, config: &TowerConfig, random: &mut RandomSelector) -> Self {
        let mut heights = Vec::with_capacity(levels);
        let mut height = 0;
        for level in 0..levels {
            if level > 0 {
                height += random.range_inclusive(config.min_floor_gap, config.max_floor_gap);
            }
            heights.push(height);
        }
        Self { heights }
    }

    /// Use explicit heights
    pub const fn from_heights(heights: Vec<i32>) -> Self {
        Self { heights }
    }

    /// Height of `level`
    pub fn get(&self, level: usize) -> Option<i32> {
        self.heights.get(level).copied()
    }

    /// Number of levels
    pub fn len(&self) -> usize {
        self.heights.len()
    }

    /// Whether there are no levels
    pub fn is_empty(&self) -> bool {
        self.heights.is_empty()
    }

    /// All heights, lowest level first
    pub fn as_slice(&self) -> &[i32] {
        &self.heights
    }
}

/// Monotonic mapping from a uniform draw to a fraction of the available height
#[derive(Clone, Debug)]
pub struct GrowthCurve {
    spline: Cubic,
}

impl Default for GrowthCurve {
    fn default() -> Self {
        // Favours short towers with an occasional tall one
        let knots = vec![(0.0, 0.0), (0.5, 0.3), (0.85, 0.65), (1.0, 1.0)];
        match Cubic::new(knots) {
            Ok(spline) => Self { spline },
            Err(_) => Self::linear(),
        }
    }
}

impl GrowthCurve {
    /// Fit a curve through `(draw, fraction)` knots
    ///
    /// # Errors
    ///
    /// Returns an error if the knots cannot form a spline.
    pub fn new(knots: Vec<(f64, f64)>) -> Result<Self> {
        let rendered = format!("{knots:?}");
        Cubic::new(knots)
            .map(|spline| Self { spline })
            .map_err(|err| invalid_parameter("growth_curve", &rendered, &err))
    }

    /// Identity mapping
    pub fn linear() -> Self {
        Self {
            spline: Cubic::from_line(),
        }
    }

    /// Fraction of the available height for a draw in `[0, 1]`
    pub fn sample(&self, draw: f64) -> f64 {
        self.spline.evaluate(draw.clamp(0.0, 1.0)).clamp(0.0, 1.0)
    }
}

/// Inputs shared by every column of one growth pass
#[derive(Clone, Copy, Debug)]
pub struct TowerGrowth<'a> {
    /// Indices of the tower pieces
    pub pieces: &'a TowerPieces,
    /// World height of each level
    pub floors: &'a FloorHeights,
    /// Height sampling curve
    pub curve: &'a GrowthCurve,
    /// Growth parameters
    pub config: &'a TowerConfig,
}

impl TowerGrowth<'_> {
    /// Generate the tower overlay for a solved grid
    ///
    /// Cells are visited `x`, then `z`, then `y`, so a fixed seed reproduces
    /// the same overlay.
    pub fn grow(&self, grid: &Array3<i32>, random: &mut RandomSelector) -> Vec<TowerTile> {
        let mut towers = Vec::new();
        if !self.config.enabled {
            return towers;
        }

        let (dx, dy, dz) = grid.dim();
        let mut sources = 0usize;
        for x in 0..dx {
            for z in 0..dz {
                for y in 0..dy {
                    let Some(tile) = grid.get([x, y, z]).and_then(|&v| usize::try_from(v).ok())
                    else {
                        continue;
                    };
                    if !self.pieces.grows(tile) {
                        continue;
                    }
                    sources += 1;
                    let column = [x as i32, z as i32];
                    let above = grid
                        .get([x, y + 1, z])
                        .and_then(|&v| usize::try_from(v).ok())
                        .filter(|&t| self.pieces.contains(t));

                    if above.is_some() {
                        self.fill_gap(column, y, random, &mut towers);
                    } else {
                        self.grow_top(column, y, random, &mut towers);
                    }
                    if y == 0 && tile == self.pieces.bottom {
                        self.extend_below(column, &mut towers);
                    }
                }
            }
        }

        debug!(sources, generated = towers.len(), "tower growth finished");
        towers
    }

    /// Plain or windowed body piece, equally likely
    fn body_piece(&self, random: &mut RandomSelector) -> usize {
        match random.weighted_choice(&[1.0, 1.0]) {
            Some(1) => self.pieces.window,
            _ => self.pieces.body,
        }
    }

    /// Fill the heights strictly between `level` and the level above
    fn fill_gap(
        &self,
        column: [i32; 2],
        level: usize,
        random: &mut RandomSelector,
        towers: &mut Vec<TowerTile>,
    ) {
        let (Some(base), Some(next)) = (self.floors.get(level), self.floors.get(level + 1)) else {
            return;
        };
        for height in base + 1..next {
            let tile = self.body_piece(random);
            towers.push(tile_at(column, height, tile));
        }
    }

    /// Grow body pieces and a cap to a height drawn from the curve
    ///
    /// The cap lands in `[floor + 1, next floor)`, or in
    /// `[floor + 1, floor + top_floor_growth)` on the highest level.
    fn grow_top(
        &self,
        column: [i32; 2],
        level: usize,
        random: &mut RandomSelector,
        towers: &mut Vec<TowerTile>,
    ) {
        let Some(base) = self.floors.get(level) else {
            return;
        };
        let start = base + 1;
        let end = self
            .floors
            .get(level + 1)
            .unwrap_or(base + self.config.top_floor_growth);
        let span = end - start;
        if span <= 0 {
            return;
        }

        let fraction = self.curve.sample(random.unit());
        let offset = ((fraction * f64::from(span)).floor() as i32).clamp(0, span - 1);
        let cap = start + offset;
        for height in start..cap {
            let tile = self.body_piece(random);
            towers.push(tile_at(column, height, tile));
        }
        towers.push(tile_at(column, cap, self.pieces.top));
    }

    fn extend_below(&self, column: [i32; 2], towers: &mut Vec<TowerTile>) {
        for depth in 1..=self.config.tiles_below_bottom_floor {
            towers.push(tile_at(column, -depth, self.pieces.body));
        }
    }
}

const fn tile_at(column: [i32; 2], height: i32, tile: usize) -> TowerTile {
    TowerTile {
        position: [column[0], height, column[1]],
        tile,
    }
}
