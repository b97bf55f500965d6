use super::*;

#[test]
fn endpoints_map_to_first_and_last_frame() {
    for n in [1u32, 2, 3, 10, 100, 1000] {
        assert_eq!(map_progress_to_index(0.0, n), FrameIndex(0), "n={n}");
        assert_eq!(map_progress_to_index(1.0, n), FrameIndex(n - 1), "n={n}");
    }
}

#[test]
fn single_frame_sequence_is_always_frame_zero() {
    for p in [0.0, 0.3, 0.5, 1.0, 7.0, -1.0] {
        assert_eq!(map_progress_to_index(p, 1), FrameIndex(0));
    }
    assert_eq!(map_progress_to_index(0.7, 0), FrameIndex(0));
}

#[test]
fn rounds_to_nearest_frame() {
    // 99 intervals: 0.5 * 99 = 49.5 rounds away from zero.
    assert_eq!(map_progress_to_index(0.5, 100), FrameIndex(50));
    assert_eq!(map_progress_to_index(0.004, 100), FrameIndex(0));
    assert_eq!(map_progress_to_index(0.006, 100), FrameIndex(1));
}

#[test]
fn out_of_range_and_nan_progress_is_clamped() {
    assert_eq!(map_progress_to_index(-0.25, 100), FrameIndex(0));
    assert_eq!(map_progress_to_index(1.25, 100), FrameIndex(99));
    assert_eq!(map_progress_to_index(f64::NAN, 100), FrameIndex(0));
}

#[test]
fn mapping_is_monotonic_non_decreasing() {
    for n in [2u32, 7, 100, 333] {
        let mut prev = FrameIndex(0);
        for step in 0..=10_000 {
            let p = f64::from(step) / 10_000.0;
            let idx = map_progress_to_index(p, n);
            assert!(idx >= prev, "n={n} p={p} idx={idx:?} prev={prev:?}");
            assert!(idx.0 < n);
            prev = idx;
        }
    }
}
