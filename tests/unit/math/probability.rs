//! Tests for seeded sampling helpers and chunk seed mixing

#[cfg(test)]
mod tests {
    use towerwfc::math::probability::{
        RandomSelector, chunk_seed, cumulative_weights, sample_cumulative,
    };

    // Tests identical seeds replay identical sequences
    // Verified by ignoring the seed in RandomSelector::new
    #[test]
    fn test_seeded_sequences_match() {
        let mut first = RandomSelector::new(77);
        let mut second = RandomSelector::new(77);
        for _ in 0..32 {
            assert_eq!(first.uniform_index(1000), second.uniform_index(1000));
            assert!((first.unit() - second.unit()).abs() < f64::EPSILON);
        }
    }

    // Tests unit draws stay in [0, 1)
    #[test]
    fn test_unit_range() {
        let mut random = RandomSelector::new(5);
        for _ in 0..1000 {
            let draw = random.unit();
            assert!((0.0..1.0).contains(&draw));
        }
    }

    // Tests empty ranges are handled without panicking
    // Verified by passing empty ranges straight to the generator
    #[test]
    fn test_degenerate_ranges() {
        let mut random = RandomSelector::new(1);
        assert_eq!(random.uniform_index(0), None);
        assert_eq!(random.range_inclusive(3, 3), 3);
    }

    // Tests inclusive ranges reach both ends
    #[test]
    fn test_range_inclusive_hits_bounds() {
        let mut random = RandomSelector::new(8);
        let mut seen = [false; 3];
        for _ in 0..500 {
            let value = random.range_inclusive(2, 4);
            assert!((2..=4).contains(&value));
            seen[(value - 2) as usize] = true;
        }
        assert_eq!(seen, [true, true, true]);
    }

    // Tests cumulative sums ignore negative weights
    #[test]
    fn test_cumulative_weights() {
        assert_eq!(cumulative_weights(&[1.0, 2.0, -5.0, 1.0]), vec![1.0, 3.0, 3.0, 4.0]);
        assert!(cumulative_weights(&[]).is_empty());
    }

    // Tests the binary search lands in the interval containing the draw
    // Verified by using <= in the partition predicate
    #[test]
    fn test_sample_cumulative() {
        let cumulative = [1.0, 2.0, 4.0];
        assert_eq!(sample_cumulative(&cumulative, 0.0), Some(0));
        assert_eq!(sample_cumulative(&cumulative, 0.5), Some(0));
        assert_eq!(sample_cumulative(&cumulative, 1.5), Some(1));
        assert_eq!(sample_cumulative(&cumulative, 3.9), Some(2));
        assert_eq!(sample_cumulative(&cumulative, 10.0), Some(2));
        assert_eq!(sample_cumulative(&[], 0.5), None);
    }

    // Tests weighted choice rejects zero totals and favours heavy entries
    #[test]
    fn test_weighted_choice() {
        let mut random = RandomSelector::new(21);
        assert_eq!(random.weighted_choice(&[]), None);
        assert_eq!(random.weighted_choice(&[0.0, 0.0]), None);
        for _ in 0..50 {
            assert_eq!(random.weighted_choice(&[0.0, 3.0, 0.0]), Some(1));
        }
    }

    // Tests chunk seeds are stable and distinct for neighbouring chunks
    // Verified by dropping the z coordinate from the packing
    #[test]
    fn test_chunk_seed() {
        assert_eq!(chunk_seed(42, 1, -1), chunk_seed(42, 1, -1));
        assert_ne!(chunk_seed(42, 0, 1), chunk_seed(42, 1, 0));
        assert_ne!(chunk_seed(42, 0, 0), chunk_seed(43, 0, 0));
        assert_ne!(chunk_seed(42, -1, 0), chunk_seed(42, 1, 0));
    }
}
