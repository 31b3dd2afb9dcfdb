//! Natural cubic spline through a handful of knots
//!
//! Second derivatives are zero at both ends. Used to shape sampling curves
//! such as the tower growth profile, where a few authored knots describe a
//! smooth monotonic mapping.

use std::error::Error;
use std::fmt;

/// Error type for spline construction and evaluation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterpolationError {
    message: String,
}

impl fmt::Display for InterpolationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Interpolation error: {}", self.message)
    }
}

impl Error for InterpolationError {}

impl InterpolationError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Cubic spline with natural boundary conditions
#[derive(Debug, Clone)]
pub struct Cubic {
    knots: Vec<(f64, f64)>,
    second_derivatives: Vec<f64>,
}

impl Cubic {
    /// Fit a spline through `(x, y)` knots
    ///
    /// # Errors
    ///
    /// Returns an error if fewer than two knots are given, or if the `x`
    /// values are not finite and strictly increasing.
    pub fn new(knots: Vec<(f64, f64)>) -> Result<Self, InterpolationError> {
        if knots.len() < 2 {
            return Err(InterpolationError::new(
                "Need at least 2 points for interpolation",
            ));
        }
        if knots
            .iter()
            .any(|&(x, y)| !x.is_finite() || !y.is_finite())
        {
            return Err(InterpolationError::new("Knots must be finite"));
        }
        if knots.windows(2).any(|pair| match pair {
            [(x0, _), (x1, _)] => x1 <= x0,
            _ => false,
        }) {
            return Err(InterpolationError::new(
                "x values must be strictly increasing",
            ));
        }

        let second_derivatives = solve_second_derivatives(&knots);
        Ok(Self {
            knots,
            second_derivatives,
        })
    }

    /// Straight line from `(0, 0)` to `(1, 1)`
    pub fn from_line() -> Self {
        Self {
            knots: vec![(0.0, 0.0), (1.0, 1.0)],
            second_derivatives: vec![0.0, 0.0],
        }
    }

    /// Evaluate the spline at `x`
    ///
    /// Points outside the knot range return the nearest end value.
    pub fn evaluate(&self, x: f64) -> f64 {
        let (Some(&(first_x, first_y)), Some(&(last_x, last_y))) =
            (self.knots.first(), self.knots.last())
        else {
            return 0.0;
        };
        if x <= first_x {
            return first_y;
        }
        if x >= last_x {
            return last_y;
        }

        // First knot strictly greater than x bounds the segment from above
        let high = self.knots.partition_point(|&(knot_x, _)| knot_x <= x);
        let low = high.saturating_sub(1);
        let (Some(&(x_low, y_low)), Some(&(x_high, y_high))) =
            (self.knots.get(low), self.knots.get(high))
        else {
            return last_y;
        };
        let sd_low = self.second_derivatives.get(low).copied().unwrap_or(0.0);
        let sd_high = self.second_derivatives.get(high).copied().unwrap_or(0.0);

        let h = x_high - x_low;
        let a = (x_high - x) / h;
        let b = (x - x_low) / h;
        a.mul_add(
            y_low,
            b.mul_add(
                y_high,
                (a.powi(3) - a).mul_add(sd_low, (b.powi(3) - b) * sd_high) * h * h / 6.0,
            ),
        )
    }
}

/// Tridiagonal sweep for the interior second derivatives
fn solve_second_derivatives(knots: &[(f64, f64)]) -> Vec<f64> {
    let n = knots.len();
    let mut second = vec![0.0; n];
    let mut carry = vec![0.0; n];

    for (i, window) in knots.windows(3).enumerate() {
        let [(x0, y0), (x1, y1), (x2, y2)] = window else {
            continue;
        };
        let index = i + 1;
        let sig = (x1 - x0) / (x2 - x0);
        let previous_second = second.get(i).copied().unwrap_or(0.0);
        let previous_carry = carry.get(i).copied().unwrap_or(0.0);
        let p = sig.mul_add(previous_second, 2.0);
        let slope_change = (y2 - y1) / (x2 - x1) - (y1 - y0) / (x1 - x0);
        if let Some(slot) = second.get_mut(index) {
            *slot = (sig - 1.0) / p;
        }
        if let Some(slot) = carry.get_mut(index) {
            *slot = sig.mul_add(-previous_carry, 6.0 * slope_change / (x2 - x0)) / p;
        }
    }

    for k in (0..n.saturating_sub(1)).rev() {
        let next = second.get(k + 1).copied().unwrap_or(0.0);
        let offset = carry.get(k).copied().unwrap_or(0.0);
        if let Some(slot) = second.get_mut(k) {
            *slot = slot.mul_add(next, offset);
        }
    }
    second
}
