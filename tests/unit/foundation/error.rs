use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        BlendError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        BlendError::composite("x")
            .to_string()
            .contains("composite error:")
    );
    assert!(
        BlendError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = BlendError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
