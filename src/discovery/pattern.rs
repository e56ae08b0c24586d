/// Number of leading characters that must match before a folder counts as an event.
pub const MIN_EVENT_MATCH: usize = 20;

/// Pattern character that matches any decimal digit.
pub const DIGIT_WILDCARD: char = '#';

/// Count the leading characters of `basename` matched by `pattern`.
///
/// A character matches when it equals the pattern character, or when the pattern character
/// is [`DIGIT_WILDCARD`] and the character is an ASCII digit. Counting stops at the first
/// mismatch or at the end of either string.
pub fn matched_prefix_len(pattern: &str, basename: &str) -> usize {
    pattern
        .chars()
        .zip(basename.chars())
        .take_while(|&(p, c)| p == c || (p == DIGIT_WILDCARD && c.is_ascii_digit()))
        .count()
}

/// Return `true` when `basename` names an event folder for `pattern`.
///
/// Names shorter than the pattern never match.
pub fn is_event(pattern: &str, basename: &str) -> bool {
    if basename.chars().count() < pattern.chars().count() {
        return false;
    }
    matched_prefix_len(pattern, basename) >= MIN_EVENT_MATCH
}

/// Parse a frame folder name of the form `<prefix>F<number>`.
///
/// The name must split on `F` into exactly two pieces and the second piece must parse as
/// an integer; the number is returned. The prefix is not checked and a signed number is
/// accepted, so `xF7` and `F-3` qualify as frames.
pub fn parse_frame_name(name: &str) -> Option<i64> {
    let mut pieces = name.split('F');
    let (Some(_), Some(number), None) = (pieces.next(), pieces.next(), pieces.next()) else {
        return None;
    };
    number.parse::<i64>().ok()
}

#[cfg(test)]
#[path = "../../tests/unit/discovery/pattern.rs"]
mod tests;
