use super::*;

fn source() -> ManualScrollSource {
    ManualScrollSource::new(PinnedRange::new(0.0, 6000.0).unwrap(), 9000.0)
}

#[test]
fn scroll_updates_require_a_scroll_listener() {
    let mut s = source();
    assert_eq!(s.scroll_to(100.0), None);
    assert_eq!(s.position(), 100.0);

    s.subscribe(ListenerKind::Scroll).unwrap();
    let u = s.scroll_to(3000.0).unwrap();
    assert_eq!(u.progress, 0.5);
    assert_eq!(u.direction, ScrollDirection::Forward);
    assert_eq!(u.total_range, 9000.0);

    let u = s.scroll_to(1500.0).unwrap();
    assert_eq!(u.direction, ScrollDirection::Backward);
    assert_eq!(u.progress, 0.25);

    // Past the pinned range progress saturates.
    assert_eq!(s.scroll_to(7000.0).unwrap().progress, 1.0);
}

#[test]
fn handles_are_unique_and_unsubscribe_is_idempotent() {
    let mut s = source();
    let a = s.subscribe(ListenerKind::Scroll).unwrap();
    let b = s.subscribe(ListenerKind::Resize).unwrap();
    assert_ne!(a.id(), b.id());
    assert_eq!(b.kind(), ListenerKind::Resize);
    assert_eq!(s.listener_count(), 2);

    s.unsubscribe_all(&[a, b]).unwrap();
    assert_eq!(s.listener_count(), 0);
    s.unsubscribe_all(&[a, b]).unwrap();
    assert!(!s.is_subscribed(ListenerKind::Scroll));
}

#[test]
fn rejected_kind_fails_with_lifecycle_error() {
    let mut s = source().reject_subscriptions(ListenerKind::Layout);
    s.subscribe(ListenerKind::Scroll).unwrap();
    let err = s.subscribe(ListenerKind::Layout).unwrap_err();
    assert!(matches!(err, ReelError::Lifecycle(_)), "{err}");
    assert_eq!(s.listener_count(), 1);
}
