use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        SkinMergeError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        SkinMergeError::catalog("x")
            .to_string()
            .contains("catalog error:")
    );
    assert!(
        SkinMergeError::viewer_unavailable("x")
            .to_string()
            .contains("3D viewer unavailable:")
    );
    assert!(
        SkinMergeError::decode(Slot::Overlay, "bad header")
            .to_string()
            .starts_with("overlay: failed to decode image")
    );
}

#[test]
fn size_mismatch_message_carries_both_dimension_pairs() {
    let err = SkinMergeError::SizeMismatch {
        overlay_w: 32,
        overlay_h: 16,
        base_w: 64,
        base_h: 64,
    };
    let msg = err.to_string();
    assert!(msg.contains("overlay is 32×16"));
    assert!(msg.contains("base is 64×64"));
    assert_eq!(err.slot(), Some(Slot::Overlay));
}

#[test]
fn errors_are_attributed_to_slots() {
    let read = SkinMergeError::read(Slot::Background, std::io::Error::other("gone"));
    assert_eq!(read.slot(), Some(Slot::Background));
    assert!(read.to_string().contains("gone"));

    let unsupported = SkinMergeError::UnsupportedType {
        slot: Slot::Base,
        mime: "text/plain".to_string(),
    };
    assert_eq!(unsupported.slot(), Some(Slot::Base));

    assert_eq!(SkinMergeError::validation("x").slot(), None);
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = SkinMergeError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
