//! Placement filters applied before a tile is chosen for a cell
//!
//! A candidate must pass the border filter (every socket it has must face a
//! cell that can still answer it) and the custom modifier rules carried by
//! its tile type. Cells beyond the volume can be supplied as fixed external
//! faces, which is how seam solves see the chunks on either side.

use crate::{
    algorithm::adjacency::AdjacencyModel,
    spatial::direction::{DIRECTION_COUNT, Direction},
    spatial::grid::{CellPosition, CellState, GridState, face_index},
    spatial::tiles::TileCatalog,
};

/// Which neighbours can satisfy a `mustConnect` tile
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ConnectivityPolicy {
    /// Any of the six directions
    #[default]
    AllDirections,
    /// Only the cells directly above and below
    VerticalOnly,
}

impl ConnectivityPolicy {
    /// Directions consulted under this policy
    pub const fn directions(self) -> &'static [Direction] {
        match self {
            Self::AllDirections => &Direction::ALL,
            Self::VerticalOnly => &Direction::VERTICAL,
        }
    }
}

/// Fixed decided values lying just beyond some faces of a volume
///
/// Face arrays use the same indexing as `BoundaryFaces`, so a neighbouring
/// volume's facing boundary can be passed in unchanged. Entries that are still
/// undecided are treated as if the face were absent.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExternalFaces {
    faces: [Option<Vec<i32>>; DIRECTION_COUNT],
}

impl ExternalFaces {
    /// No external faces
    pub fn new() -> Self {
        Self::default()
    }

    /// Fix the values beyond the face pointing in `direction`
    #[must_use]
    pub fn with_face(mut self, direction: Direction, values: Vec<i32>) -> Self {
        if let Some(slot) = self.faces.get_mut(direction.index()) {
            *slot = Some(values);
        }
        self
    }

    /// Values beyond the face pointing in `direction`
    pub fn face(&self, direction: Direction) -> Option<&[i32]> {
        self.faces
            .get(direction.index())
            .and_then(|face| face.as_deref())
    }

    /// Whether no face has been fixed
    pub fn is_empty(&self) -> bool {
        self.faces.iter().all(Option::is_none)
    }

    /// Decided state of the external cell beyond `position` in `direction`
    pub fn beyond(
        &self,
        dimensions: [usize; 3],
        position: CellPosition,
        direction: Direction,
    ) -> Option<CellState> {
        let index = face_index(dimensions, direction, position)?;
        let value = self.face(direction)?.get(index).copied()?;
        let state = CellState::from_raw(value);
        state.is_decided().then_some(state)
    }

    /// Every decided external cell, as
    /// `(inner position, direction towards the external cell, state)`
    pub fn fixed_tiles(&self, dimensions: [usize; 3]) -> Vec<(CellPosition, Direction, CellState)> {
        let [dx, dy, dz] = dimensions;
        let mut fixed = Vec::new();
        for direction in Direction::ALL {
            if self.face(direction).is_none() {
                continue;
            }
            for x in 0..dx {
                for y in 0..dy {
                    for z in 0..dz {
                        if let Some(state) = self.beyond(dimensions, [x, y, z], direction) {
                            fixed.push(([x, y, z], direction, state));
                        }
                    }
                }
            }
        }
        fixed
    }
}

/// Read-only view used to judge whether a tile may be placed at a cell
#[derive(Clone, Copy, Debug)]
pub struct ConstraintContext<'a> {
    catalog: &'a TileCatalog,
    grid: &'a GridState,
    external: &'a ExternalFaces,
    policy: ConnectivityPolicy,
}

impl<'a> ConstraintContext<'a> {
    /// Bundle the state a candidate is judged against
    pub const fn new(
        catalog: &'a TileCatalog,
        grid: &'a GridState,
        external: &'a ExternalFaces,
        policy: ConnectivityPolicy,
    ) -> Self {
        Self {
            catalog,
            grid,
            external,
            policy,
        }
    }

    /// Catalog the candidates come from
    pub const fn catalog(&self) -> &'a TileCatalog {
        self.catalog
    }

    /// Grid the candidates are judged against
    pub const fn grid(&self) -> &'a GridState {
        self.grid
    }

    fn adjacency(&self) -> &'a AdjacencyModel {
        self.catalog.adjacency()
    }

    /// State of the cell next to `position`, `None` past the edge
    ///
    /// External faces stand in for cells beyond the volume.
    pub fn neighbor(&self, position: CellPosition, direction: Direction) -> Option<CellState> {
        match self.grid.neighbor(position, direction) {
            Some(next) => self.grid.state(next),
            None => self
                .external
                .beyond(self.grid.dimensions(), position, direction),
        }
    }

    /// Whether every socket of `tile` can still be answered at `position`
    ///
    /// A socket may not face the grid edge or an empty cell, and a decided
    /// neighbour must be compatible from the candidate's side.
    pub fn passes_border(&self, position: CellPosition, tile: usize) -> bool {
        let adjacency = self.adjacency();
        Direction::ALL.iter().all(|&direction| {
            let connected = adjacency.has_connection(tile, direction);
            match self.neighbor(position, direction) {
                None | Some(CellState::Empty) => !connected,
                Some(CellState::Undecided) => true,
                Some(CellState::Tile(placed)) => adjacency.accepts(tile, direction, placed),
            }
        })
    }

    /// Whether `tile` satisfies its own placement modifiers at `position`
    pub fn passes_custom(&self, position: CellPosition, tile: usize) -> bool {
        let modifiers = self.catalog.modifiers(tile);

        if modifiers.grounded && position[1] != 0 {
            return false;
        }
        if modifiers.must_connect && !self.has_supporting_neighbor(position, tile) {
            return false;
        }
        if modifiers.no_repeat_horizontal && self.repeats(position, tile, &Direction::HORIZONTAL) {
            return false;
        }
        if modifiers.no_repeat_vertical && self.repeats(position, tile, &Direction::VERTICAL) {
            return false;
        }
        true
    }

    /// Both filters together
    pub fn is_viable(&self, position: CellPosition, tile: usize) -> bool {
        self.passes_border(position, tile) && self.passes_custom(position, tile)
    }

    fn has_supporting_neighbor(&self, position: CellPosition, tile: usize) -> bool {
        let adjacency = self.adjacency();
        self.policy.directions().iter().any(|&direction| {
            adjacency.has_connection(tile, direction)
                && matches!(
                    self.neighbor(position, direction),
                    Some(CellState::Tile(placed)) if adjacency.is_neighbor(tile, direction, placed)
                )
        })
    }

    fn repeats(&self, position: CellPosition, tile: usize, directions: &[Direction]) -> bool {
        directions
            .iter()
            .any(|&direction| self.neighbor(position, direction) == Some(CellState::Tile(tile)))
    }
}
