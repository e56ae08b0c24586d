use super::*;

const PATTERN: &str = "E##_##_##_##_##_##__";

#[test]
fn event_pattern_matches_digits() {
    assert!(is_event(PATTERN, "E12_34_56_78_90_12__"));
    assert!(is_event(PATTERN, "E12_34_56_78_90_12__extra_suffix"));
}

#[test]
fn event_pattern_rejects_other_names() {
    assert!(!is_event(PATTERN, "SomeOtherFolder_with_a_long_name"));
    assert!(!is_event(PATTERN, "E12"));
    assert!(!is_event(PATTERN, "E12_34_56_78_9X_12__"));
}

#[test]
fn event_needs_twenty_matched_characters() {
    // The pattern is longer than the threshold; a mismatch after 20 characters still counts.
    let pattern = "E##_##_##_##_##_##__tail";
    assert!(is_event(pattern, "E12_34_56_78_90_12__XXXX"));
    assert!(!is_event(pattern, "E12_34_56_78_90_12_XXXXX"));
}

#[test]
fn short_patterns_never_reach_the_threshold() {
    assert!(!is_event("E##", "E12_34_56_78_90_12__"));
}

#[test]
fn matched_prefix_counts_until_first_mismatch() {
    assert_eq!(matched_prefix_len("AB##", "AB12"), 4);
    assert_eq!(matched_prefix_len("AB##", "AB1x"), 3);
    assert_eq!(matched_prefix_len("AB##", "xB12"), 0);
    assert_eq!(matched_prefix_len("##", "#1"), 0);
}

#[test]
fn frame_names_split_on_f() {
    assert_eq!(parse_frame_name("F42"), Some(42));
    assert_eq!(parse_frame_name("F0001"), Some(1));
    assert_eq!(parse_frame_name("xF7"), Some(7));
    assert_eq!(parse_frame_name("F4a"), None);
    assert_eq!(parse_frame_name("F"), None);
    assert_eq!(parse_frame_name("FF1"), None);
    assert_eq!(parse_frame_name("42"), None);
}

#[test]
fn frame_split_rule_accepts_prefix_and_sign() {
    assert_eq!(parse_frame_name("xF7"), Some(7));
    assert_eq!(parse_frame_name("F-3"), Some(-3));
    assert_eq!(parse_frame_name("F+3"), Some(3));
    assert_eq!(parse_frame_name("F 3"), None);
}
