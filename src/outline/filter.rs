//! Heading noise rejection.

use crate::model::Heading;

/// Characters that make up a punctuation-only candidate.
const PUNCTUATION: &str = ".,;:!?()[]{}";

/// Unicode scalar count, the length every text rule is stated in.
pub(crate) fn char_count(text: &str) -> usize {
    text.chars().count()
}

/// Non-empty and nothing but numeric characters, in any script.
pub(crate) fn is_purely_numeric(text: &str) -> bool {
    !text.is_empty() && text.chars().all(|c| c.is_numeric())
}

/// At most three characters that reduce to digits once `.` and `,`
/// separators are removed, e.g. "1.2" or "3,".
pub(crate) fn is_numeral_like(text: &str) -> bool {
    if char_count(text) > 3 {
        return false;
    }
    let digits: String = text.chars().filter(|c| *c != '.' && *c != ',').collect();
    is_purely_numeric(&digits)
}

fn is_punctuation_only(text: &str) -> bool {
    !text.is_empty() && text.chars().all(|c| PUNCTUATION.contains(c))
}

fn is_short_single_word(text: &str) -> bool {
    text.split_whitespace().count() == 1 && char_count(text) < 4
}

/// Decide whether trimmed candidate text is noise rather than a heading.
pub fn is_noise(text: &str) -> bool {
    is_purely_numeric(text)
        || is_numeral_like(text)
        || char_count(text) < 3
        || is_punctuation_only(text)
        || is_short_single_word(text)
}

/// Drop noise candidates. Judged on trimmed text; survivors pass through
/// unchanged, in order.
pub fn filter_headings(headings: Vec<Heading>) -> Vec<Heading> {
    headings
        .into_iter()
        .filter(|heading| !is_noise(heading.text.trim()))
        .collect()
}
