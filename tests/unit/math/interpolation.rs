//! Tests for natural cubic spline construction and evaluation

#[cfg(test)]
mod tests {
    use towerwfc::math::interpolation::Cubic;

    const TOLERANCE: f64 = 1e-9;

    // Tests construction rejects too few or unordered knots
    // Verified by removing the strictly increasing check
    #[test]
    fn test_invalid_knots() {
        assert!(Cubic::new(vec![(0.0, 0.0)]).is_err());
        assert!(Cubic::new(vec![(0.0, 0.0), (0.0, 1.0)]).is_err());
        assert!(Cubic::new(vec![(1.0, 0.0), (0.5, 1.0)]).is_err());
        assert!(Cubic::new(vec![(0.0, f64::NAN), (1.0, 1.0)]).is_err());
    }

    // Tests the curve passes through every knot
    // Verified by swapping the low and high segment weights
    #[test]
    fn test_passes_through_knots() {
        let knots = vec![(0.0, 0.0), (0.5, 0.3), (0.85, 0.65), (1.0, 1.0)];
        let Ok(spline) = Cubic::new(knots.clone()) else {
            panic!("valid knots rejected");
        };
        for (x, y) in knots {
            assert!((spline.evaluate(x) - y).abs() < TOLERANCE, "at {x}");
        }
    }

    // Tests two knots give a straight line
    #[test]
    fn test_two_knots_are_linear() {
        let line = Cubic::from_line();
        assert!((line.evaluate(0.25) - 0.25).abs() < TOLERANCE);
        assert!((line.evaluate(0.8) - 0.8).abs() < TOLERANCE);

        let Ok(fitted) = Cubic::new(vec![(0.0, 2.0), (2.0, 6.0)]) else {
            panic!("valid knots rejected");
        };
        assert!((fitted.evaluate(1.0) - 4.0).abs() < TOLERANCE);
    }

    // Tests collinear knots stay on the line between them
    // Verified by dropping the curvature term sign
    #[test]
    fn test_collinear_knots() {
        let Ok(spline) = Cubic::new(vec![(0.0, 0.0), (1.0, 1.0), (2.0, 2.0), (3.0, 3.0)]) else {
            panic!("valid knots rejected");
        };
        for step in 0..30 {
            let x = f64::from(step) * 0.1;
            assert!((spline.evaluate(x) - x).abs() < TOLERANCE, "at {x}");
        }
    }

    // Tests the symmetric hump peaks at its middle knot
    #[test]
    fn test_symmetric_hump() {
        let Ok(spline) = Cubic::new(vec![(0.0, 0.0), (1.0, 1.0), (2.0, 0.0)]) else {
            panic!("valid knots rejected");
        };
        assert!((spline.evaluate(0.5) - spline.evaluate(1.5)).abs() < TOLERANCE);
        assert!(spline.evaluate(0.5) > 0.5);
        assert!(spline.evaluate(1.0) >= spline.evaluate(0.9));
    }

    // Tests points outside the knots clamp to the end values
    #[test]
    fn test_clamps_outside_range() {
        let line = Cubic::from_line();
        assert!(line.evaluate(-3.0).abs() < TOLERANCE);
        assert!((line.evaluate(7.0) - 1.0).abs() < TOLERANCE);
    }
}
