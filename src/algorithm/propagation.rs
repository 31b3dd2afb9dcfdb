use crate::{
    algorithm::adjacency::AdjacencyModel,
    algorithm::bitset::TileBitset,
    algorithm::constraints::{ConnectivityPolicy, ConstraintContext, ExternalFaces},
    algorithm::selection::viable_candidates,
    spatial::direction::Direction,
    spatial::grid::{CellPosition, CellState, GridState},
    spatial::tiles::TileCatalog,
};

/// LIFO stack of cells whose neighbours still need constraining
///
/// A cell may be pushed several times; popping one whose state has not
/// changed simply does no work.
#[derive(Clone, Debug, Default)]
pub struct Worklist {
    stack: Vec<CellPosition>,
}

impl Worklist {
    /// Create an empty worklist
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a cell for propagation
    pub fn push(&mut self, position: CellPosition) {
        self.stack.push(position);
    }

    /// Take the most recently queued cell
    pub fn pop(&mut self) -> Option<CellPosition> {
        self.stack.pop()
    }

    /// Number of queued entries, duplicates included
    pub fn len(&self) -> usize {
        self.stack.len()
    }

    /// Whether nothing is queued
    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }
}

/// Summary of one propagation pass
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PropagationOutcome {
    /// Cells popped from the worklist
    pub pops: usize,
    /// Cells decided by propagation alone
    pub forced: usize,
    /// Whether the pass stopped at the iteration cap with work left
    pub capped: bool,
}

/// Read-only inputs shared by every propagation pass of one solve
#[derive(Clone, Copy, Debug)]
pub struct PropagationScope<'a> {
    /// Tile catalog and adjacency tables
    pub catalog: &'a TileCatalog,
    /// Fixed cells beyond the volume
    pub external: &'a ExternalFaces,
    /// Policy for `mustConnect` tiles
    pub policy: ConnectivityPolicy,
    /// Maximum pops per pass
    pub cap: usize,
}

/// Narrow a neighbour's possibilities against a decided source cell
///
/// `direction` points from the source towards the neighbour. A concrete tile
/// keeps only the tiles its own table lists there, or, when it has no socket
/// facing that way, only tiles with no socket facing back. An empty source
/// keeps only tiles with no socket facing it. Returns whether any tile was
/// removed.
pub fn prune_against(
    adjacency: &AdjacencyModel,
    source: CellState,
    direction: Direction,
    possibilities: &mut TileBitset,
) -> bool {
    let back = direction.opposite();
    match source {
        CellState::Tile(tile) if adjacency.has_connection(tile, direction) => {
            let before = possibilities.count();
            possibilities.intersect_with(&adjacency.allowed(tile, direction));
            possibilities.count() != before
        }
        CellState::Tile(_) | CellState::Empty => {
            possibilities.retain(|other| !adjacency.has_connection(other, back))
        }
        CellState::Undecided => false,
    }
}

/// Decide an undecided cell whose possibilities have collapsed
///
/// Zero remaining tiles decide the cell empty. A single remaining tile is
/// placed only if it passes the placement filters, otherwise the cell is
/// empty too. Returns whether the cell was decided.
fn settle(scope: &PropagationScope<'_>, grid: &mut GridState, position: CellPosition) -> bool {
    let Some(possibilities) = grid.possibilities(position) else {
        return false;
    };
    let state = if possibilities.is_empty() {
        CellState::Empty
    } else if let Some(tile) = possibilities.single() {
        let context = ConstraintContext::new(scope.catalog, grid, scope.external, scope.policy);
        if viable_candidates(&context, possibilities, position).contains(&tile) {
            CellState::Tile(tile)
        } else {
            CellState::Empty
        }
    } else {
        return false;
    };
    grid.decide(position, state);
    true
}

/// Narrow one undecided neighbour and queue it if anything changed
fn constrain(
    scope: &PropagationScope<'_>,
    grid: &mut GridState,
    worklist: &mut Worklist,
    target: CellPosition,
    source: CellState,
    direction: Direction,
) -> bool {
    if grid.state(target) != Some(CellState::Undecided) {
        return false;
    }
    let adjacency = scope.catalog.adjacency();
    let changed = grid
        .possibilities_mut(target)
        .is_some_and(|possibilities| prune_against(adjacency, source, direction, possibilities));
    if !changed {
        return false;
    }
    let forced = settle(scope, grid, target);
    worklist.push(target);
    forced
}

/// Drain the worklist, narrowing the neighbours of every decided cell
///
/// Stops after `scope.cap` pops; anything left stays queued for the next
/// pass.
pub fn propagate(
    scope: &PropagationScope<'_>,
    grid: &mut GridState,
    worklist: &mut Worklist,
) -> PropagationOutcome {
    let mut outcome = PropagationOutcome::default();

    while outcome.pops < scope.cap {
        let Some(position) = worklist.pop() else {
            break;
        };
        outcome.pops += 1;

        let Some(state) = grid.state(position) else {
            continue;
        };
        if !state.is_decided() {
            if settle(scope, grid, position) {
                outcome.forced += 1;
                worklist.push(position);
            }
            continue;
        }

        for direction in Direction::ALL {
            let Some(neighbor) = grid.neighbor(position, direction) else {
                continue;
            };
            if constrain(scope, grid, worklist, neighbor, state, direction) {
                outcome.forced += 1;
            }
        }
    }

    outcome.capped = !worklist.is_empty();
    outcome
}

/// Narrow cells on the outer faces against fixed external cells
///
/// Returns the number of cells this decided outright. Narrowed cells are
/// queued so the next propagation pass carries the effect inward.
pub fn seed_external(
    scope: &PropagationScope<'_>,
    grid: &mut GridState,
    worklist: &mut Worklist,
) -> usize {
    let fixed = scope.external.fixed_tiles(grid.dimensions());
    let mut forced = 0;
    for (position, direction, state) in fixed {
        if constrain(scope, grid, worklist, position, state, direction.opposite()) {
            forced += 1;
        }
    }
    forced
}
