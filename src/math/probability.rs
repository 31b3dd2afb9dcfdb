use rand::{Rng, SeedableRng, rngs::StdRng};

/// Seeded random selector for reproducible stochastic choices
///
/// Every solve owns one selector, so a fixed seed reproduces the same
/// sequence of cell and tile picks.
#[derive(Clone, Debug)]
pub struct RandomSelector {
    rng: StdRng,
}

impl RandomSelector {
    /// Create a deterministic random selector
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Uniform real in `[0, 1)`
    pub fn unit(&mut self) -> f64 {
        self.rng.random::<f64>()
    }

    /// Uniform index in `[0, len)`, or `None` when `len` is zero
    pub fn uniform_index(&mut self, len: usize) -> Option<usize> {
        (len > 0).then(|| self.rng.random_range(0..len))
    }

    /// Uniform integer in `[low, high]`
    pub fn range_inclusive(&mut self, low: i32, high: i32) -> i32 {
        if high <= low {
            return low;
        }
        self.rng.random_range(low..=high)
    }

    /// Generic weighted random selection
    ///
    /// Returns an index into `weights` with probability `w_i / Σw`, or `None`
    /// when the weights are empty or sum to zero.
    pub fn weighted_choice(&mut self, weights: &[f64]) -> Option<usize> {
        let cumulative = cumulative_weights(weights);
        let total = cumulative.last().copied()?;
        if total <= 0.0 || !total.is_finite() {
            return None;
        }
        let draw = self.unit() * total;
        sample_cumulative(&cumulative, draw)
    }
}

/// Running sums of `weights`
pub fn cumulative_weights(weights: &[f64]) -> Vec<f64> {
    weights
        .iter()
        .scan(0.0, |running, &weight| {
            *running += weight.max(0.0);
            Some(*running)
        })
        .collect()
}

/// Binary search for the first cumulative weight that reaches `draw`
///
/// With `draw` uniform in `[0, total)` this selects index `i` with
/// probability `w_i / total`. Draws past the end clamp to the last index.
pub fn sample_cumulative(cumulative: &[f64], draw: f64) -> Option<usize> {
    if cumulative.is_empty() {
        return None;
    }
    let index = cumulative.partition_point(|&sum| sum < draw);
    Some(index.min(cumulative.len() - 1))
}

/// Mix a world seed with a chunk coordinate into an independent chunk seed
///
/// Uses the splitmix64 finaliser so neighbouring coordinates land far apart.
pub const fn chunk_seed(world_seed: u64, x: i32, z: i32) -> u64 {
    let packed = ((x as u32 as u64) << 32) | (z as u32 as u64);
    splitmix64(world_seed ^ splitmix64(packed))
}

const fn splitmix64(value: u64) -> u64 {
    let mut z = value.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
