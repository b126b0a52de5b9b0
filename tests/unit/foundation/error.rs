use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        NewsprintError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(NewsprintError::image("x").to_string().contains("image error:"));
    assert!(
        NewsprintError::render("x")
            .to_string()
            .contains("render error:")
    );
    assert!(
        NewsprintError::encode("x")
            .to_string()
            .contains("encode error:")
    );
    assert!(
        NewsprintError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = NewsprintError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
