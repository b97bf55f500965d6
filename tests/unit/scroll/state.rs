use super::*;

#[test]
fn direction_from_sign_uses_only_the_sign() {
    assert_eq!(ScrollDirection::from_sign(1), ScrollDirection::Forward);
    assert_eq!(ScrollDirection::from_sign(42), ScrollDirection::Forward);
    assert_eq!(ScrollDirection::from_sign(-1), ScrollDirection::Backward);
    assert_eq!(ScrollDirection::from_sign(0), ScrollDirection::None);
}

#[test]
fn direction_between_positions() {
    assert_eq!(ScrollDirection::between(10.0, 20.0), ScrollDirection::Forward);
    assert_eq!(ScrollDirection::between(20.0, 10.0), ScrollDirection::Backward);
    assert_eq!(ScrollDirection::between(5.0, 5.0), ScrollDirection::None);
}

#[test]
fn state_clamps_progress() {
    let s = ScrollState::new(100.0, 1.4, ScrollDirection::Forward);
    assert_eq!(s.normalized_progress, 1.0);
    let s: ScrollState = ScrollUpdate {
        raw_position: 5.0,
        progress: -0.1,
        direction: ScrollDirection::Backward,
        total_range: 100.0,
    }
    .into();
    assert_eq!(s.normalized_progress, 0.0);
    assert_eq!(s.direction, ScrollDirection::Backward);
}

#[test]
fn pinned_range_maps_both_ways() {
    let r = PinnedRange::new(400.0, 6000.0).unwrap();
    assert_eq!(r.progress_at(0.0), 0.0);
    assert_eq!(r.progress_at(400.0), 0.0);
    assert_eq!(r.progress_at(3400.0), 0.5);
    assert_eq!(r.progress_at(99_999.0), 1.0);
    assert_eq!(r.position_at(0.5), 3400.0);
}

#[test]
fn pinned_range_rejects_degenerate_distance() {
    assert!(PinnedRange::new(0.0, 0.0).is_err());
    assert!(PinnedRange::new(0.0, -5.0).is_err());
    assert!(PinnedRange::new(f64::NAN, 5.0).is_err());
}

#[test]
fn direction_serializes_snake_case() {
    assert_eq!(
        serde_json::to_string(&ScrollDirection::Backward).unwrap(),
        "\"backward\""
    );
}
