use proptest::prelude::*;
use sumo_core::RunningFilter;

fn truncated_mean(values: &[i32]) -> i32 {
    let sum: i64 = values.iter().map(|&v| i64::from(v)).sum();
    (sum / values.len() as i64) as i32
}

proptest! {
    #[test]
    fn partial_window_is_exact_mean(
        capacity in 1usize..32,
        values in prop::collection::vec(any::<i32>(), 1..32),
    ) {
        prop_assume!(values.len() <= capacity);
        let mut f = RunningFilter::<i32>::new(capacity).unwrap();
        for &v in &values {
            f.add_value(v);
        }
        prop_assert_eq!(f.count(), values.len());
        prop_assert_eq!(f.average(), truncated_mean(&values));
    }

    #[test]
    fn overfull_window_tracks_last_capacity_values(
        capacity in 1usize..16,
        values in prop::collection::vec(any::<i32>(), 17..200),
    ) {
        let mut f = RunningFilter::<i32>::new(capacity).unwrap();
        for &v in &values {
            f.add_value(v);
        }
        let tail = &values[values.len() - capacity..];
        prop_assert_eq!(f.count(), capacity);
        prop_assert_eq!(f.average(), truncated_mean(tail));
    }

    #[test]
    fn clear_resets_to_zero(
        capacity in 1usize..16,
        values in prop::collection::vec(any::<i16>(), 0..64),
    ) {
        let mut f = RunningFilter::<i16>::new(capacity).unwrap();
        for &v in &values {
            f.add_value(v);
        }
        f.clear();
        prop_assert_eq!(f.count(), 0);
        prop_assert!(f.is_empty());
        prop_assert_eq!(f.average(), 0);
    }

    #[test]
    fn fill_with_settles_on_value(
        capacity in 1usize..16,
        noise in prop::collection::vec(any::<i16>(), 0..32),
        v in any::<i16>(),
        k in 1usize..64,
    ) {
        let mut f = RunningFilter::<i16>::new(capacity).unwrap();
        for &n in &noise {
            f.add_value(n);
        }
        f.fill_with(v, k);
        prop_assert_eq!(f.average(), v);
        prop_assert_eq!(f.count(), k.min(capacity));
    }

    #[test]
    fn float_window_matches_direct_mean(
        capacity in 1usize..16,
        values in prop::collection::vec(-1.0e3f64..1.0e3, 1..100),
    ) {
        let mut f = RunningFilter::<f64>::new(capacity).unwrap();
        for &v in &values {
            f.add_value(v);
        }
        let n = values.len().min(capacity);
        let tail = &values[values.len() - n..];
        let expect = tail.iter().sum::<f64>() / n as f64;
        prop_assert!((f.average() - expect).abs() < 1e-6);
    }
}

#[test]
fn zero_capacity_is_rejected() {
    assert!(RunningFilter::<i32>::new(0).is_err());
}

#[test]
fn extreme_i16_window_does_not_overflow() {
    let mut f = RunningFilter::<i16>::new(8).unwrap();
    f.fill_with(i16::MAX, 8);
    assert_eq!(f.average(), i16::MAX);
    f.fill_with(i16::MIN, 8);
    assert_eq!(f.average(), i16::MIN);
}
