use super::*;

#[test]
fn normalize_strips_root_and_dot_segments() {
    assert_eq!(
        normalize_uri_path("/images/./seq//frame_0001.png").unwrap(),
        "images/seq/frame_0001.png"
    );
    assert_eq!(normalize_uri_path("a\\b.png").unwrap(), "a/b.png");
}

#[test]
fn normalize_rejects_traversal_and_empty() {
    assert!(normalize_uri_path("/images/../secret.png").is_err());
    assert!(normalize_uri_path("/").is_err());
    assert!(normalize_uri_path("").is_err());
}

#[test]
fn fs_source_resolves_under_root() {
    let src = FsFrameSource::new("/srv/public");
    assert_eq!(
        src.resolve("/images/frame_0000.png").unwrap(),
        PathBuf::from("/srv/public/images/frame_0000.png")
    );
}

#[test]
fn fs_source_missing_file_is_an_error() {
    let src = FsFrameSource::new(std::env::temp_dir().join("scrollreel_definitely_missing"));
    assert!(src.fetch("/frame_0000.png").is_err());
}

#[test]
fn memory_source_roundtrips_registered_bytes() {
    let mut src = MemoryFrameSource::new();
    assert!(src.is_empty());
    src.insert("a.png", vec![1, 2, 3]);
    assert_eq!(src.len(), 1);
    assert_eq!(src.fetch("a.png").unwrap(), vec![1, 2, 3]);
    assert!(matches!(src.fetch("b.png"), Err(ReelError::Asset(_))));
}
