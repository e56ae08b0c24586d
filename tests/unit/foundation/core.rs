use super::*;

#[test]
fn version_pair_splits_on_single_separator() {
    let pair = VersionPair::parse("v1_VS_v2").unwrap();
    assert_eq!(pair.orig, "v1");
    assert_eq!(pair.tester, "v2");
    assert_eq!(pair.joined(), "v1_VS_v2");
}

#[test]
fn version_pair_rejects_other_separator_counts() {
    for bad in ["v1", "v1_VS_v2_VS_v3", "_VS_v2", "v1_VS_", ""] {
        assert!(
            matches!(VersionPair::parse(bad), Err(TesterError::Validation(_))),
            "{bad:?} should be rejected"
        );
    }
}

#[test]
fn resolution_formats_as_w_x_h() {
    assert_eq!(Resolution::new(1920, 1080).unwrap().to_string(), "1920x1080");
    assert!(Resolution::new(0, 1080).is_err());
}

#[test]
fn frame_span_is_inclusive() {
    let span = FrameSpan::new(10, 14).unwrap();
    assert_eq!(span.len_frames(), 5);
    assert!(FrameSpan::new(5, 4).is_err());
}

#[test]
fn mirror_replaces_test_sets_segment() {
    let p = Path::new("/data/testSets/E1/S1/F1");
    assert_eq!(
        mirror_to_results(p),
        PathBuf::from("/data/testSets_results/E1/S1/F1")
    );
}

#[test]
fn pad_frame_keeps_wider_numbers() {
    assert_eq!(pad_frame(7), "0007");
    assert_eq!(pad_frame(12345), "12345");
}
