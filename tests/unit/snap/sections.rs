use super::*;

fn three() -> Vec<Section> {
    vec![
        Section::new("a", 0.0, 1000.0).unwrap(),
        Section::new("b", 1000.0, 2000.0).unwrap(),
        Section::new("c", 2000.0, 3000.0).unwrap(),
    ]
}

#[test]
fn section_requires_bottom_above_top() {
    assert!(Section::new("x", 10.0, 10.0).is_err());
    assert!(Section::new("x", 10.0, 5.0).is_err());
    assert!(Section::new("x", f64::NAN, 5.0).is_err());
    let s = Section::from_extent("x", 100.0, 50.0).unwrap();
    assert_eq!(s.bottom, 150.0);
    assert_eq!(s.height(), 50.0);
}

#[test]
fn replace_bumps_generation_and_invalidates_old_snapshots() {
    let mut r = SectionRegistry::new();
    assert_eq!(r.generation(), 0);
    assert!(r.snapshot().is_empty());

    r.replace(three()).unwrap();
    let before = r.snapshot();
    assert_eq!(before.sections().len(), 3);
    assert!(r.is_current(&before));

    r.recompute(&vec![Section::new("only", 0.0, 5000.0).unwrap()])
        .unwrap();
    assert!(!r.is_current(&before));
    // The old snapshot is untouched.
    assert_eq!(before.sections().len(), 3);
    assert_eq!(r.snapshot().sections().len(), 1);
    assert_eq!(r.generation(), 2);
}

#[test]
fn invalid_refresh_keeps_previous_layout() {
    let mut r = SectionRegistry::with_sections(three()).unwrap();
    let bad = vec![Section {
        id: "bad".to_string(),
        top: 5.0,
        bottom: 1.0,
    }];
    assert!(r.replace(bad).is_err());
    assert_eq!(r.generation(), 1);
    assert_eq!(r.snapshot().sections(), three().as_slice());
}

#[test]
fn sections_parse_from_json() {
    let s: Vec<Section> = serde_json::from_str(
        r#"[{ "id": "hero", "top": 0, "bottom": 900 }, { "id": "map", "top": 900, "bottom": 7800 }]"#,
    )
    .unwrap();
    let r = SectionRegistry::with_sections(s).unwrap();
    assert_eq!(r.snapshot().sections()[1].id, "map");
}
