//! Mathematical utilities for sampling and curve shaping

/// Cubic spline interpolation for smooth sampling curves
pub mod interpolation;
/// Seeded random selection and weighted sampling
pub mod probability;
