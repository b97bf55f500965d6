use super::*;

#[test]
fn frame_position_spans_unit_interval() {
    assert_eq!(FrameIndex(0).position_in(100), 0.0);
    assert_eq!(FrameIndex(99).position_in(100), 1.0);
    assert!((FrameIndex(33).position_in(100) - 33.0 / 99.0).abs() < 1e-12);
}

#[test]
fn frame_position_single_frame_is_zero() {
    assert_eq!(FrameIndex(0).position_in(1), 0.0);
    assert_eq!(FrameIndex(0).position_in(0), 0.0);
}

#[test]
fn viewport_rejects_empty() {
    assert!(Viewport::new(0, 10).is_err());
    assert!(Viewport::new(10, 0).is_err());
    let v = Viewport::new(1280, 720).unwrap();
    assert!(!v.is_empty());
}
