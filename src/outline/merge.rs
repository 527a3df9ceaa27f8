//! Fragment merging.
//!
//! Extraction often splits one visual heading into consecutive spans
//! ("Intro" / "duction"). The merger folds such runs back together.

use crate::model::Heading;

/// Greedy forward merge over an ordered heading sequence.
///
/// A heading absorbs its successors while they sit on the same page at the
/// same level, are shorter than `max_fragment_chars`, are not already
/// contained in the accumulated text (nor it in them, case-insensitive),
/// and the joined text is purely alphabetic once spaces are removed.
/// Absorbed headings are consumed; the first non-matching successor ends
/// the run.
pub fn merge_fragments(headings: Vec<Heading>, max_fragment_chars: usize) -> Vec<Heading> {
    let mut merged = Vec::with_capacity(headings.len());
    let mut i = 0;
    while i < headings.len() {
        let current = &headings[i];
        let mut text = current.text.clone();

        let mut j = i + 1;
        while j < headings.len() && headings[j].page == current.page {
            let next = &headings[j];
            if next.level == current.level
                && next.text.chars().count() < max_fragment_chars
                && !contains_ci(&text, &next.text)
                && !contains_ci(&next.text, &text)
                && joins_alphabetic(&text, &next.text)
            {
                text.push(' ');
                text.push_str(&next.text);
                j += 1;
            } else {
                break;
            }
        }

        merged.push(Heading::new(current.level, text, current.page));
        i = j;
    }
    merged
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// True when `head` and `tail` joined with a space read as one word run:
/// nothing but letters once spaces are dropped.
fn joins_alphabetic(head: &str, tail: &str) -> bool {
    let joined: String = format!("{head} {tail}")
        .to_lowercase()
        .chars()
        .filter(|c| *c != ' ')
        .collect();
    !joined.is_empty() && joined.chars().all(char::is_alphabetic)
}
