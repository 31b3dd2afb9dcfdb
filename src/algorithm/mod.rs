/// Flattened tile adjacency tables
pub mod adjacency;
/// Possibility bitset for one cell
pub mod bitset;
/// Border and modifier filters applied before a tile is placed
pub mod constraints;
/// Worklist propagation of decided cells into their neighbours
pub mod propagation;
/// Entropy-driven cell selection and weighted tile picks
pub mod selection;
/// Resumable solver driving selection and propagation over a grid
pub mod solver;
