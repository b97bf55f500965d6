use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        ReelError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(ReelError::asset("x").to_string().contains("asset error:"));
    assert!(
        ReelError::surface("x")
            .to_string()
            .contains("surface error:")
    );
    assert!(
        ReelError::lifecycle("x")
            .to_string()
            .contains("lifecycle error:")
    );
    assert!(
        ReelError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = ReelError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
