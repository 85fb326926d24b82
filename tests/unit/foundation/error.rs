use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        MathvizError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(MathvizError::render("x").to_string().contains("render error:"));
    assert!(
        MathvizError::capture("x")
            .to_string()
            .contains("capture error:")
    );
    assert!(
        MathvizError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = MathvizError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
