//! Removal of matched tokens from free text.
//!
//! Every extractor removes what it recognised through these helpers, so the
//! residual text of one extractor is a fixed point for the same extractor.

use std::ops::Range;

/// Remove `span` from `text`, together with the whitespace on either side.
///
/// The two remaining halves are joined by a single space (or nothing when
/// one half is empty) and the result is trimmed.
pub fn strip_span(text: &str, span: Range<usize>) -> String {
    let before = text[..span.start].trim_end();
    let after = text[span.end..].trim_start();

    let joined = if before.is_empty() || after.is_empty() {
        format!("{before}{after}")
    } else {
        format!("{before} {after}")
    };
    joined.trim().to_string()
}

/// Strip every span reported by `find` until it reports none.
///
/// `find` must only report non-empty spans.
pub fn strip_all<F>(text: &str, find: F) -> String
where
    F: Fn(&str) -> Option<Range<usize>>,
{
    let mut current = text.to_string();
    while let Some(span) = find(&current) {
        debug_assert!(!span.is_empty());
        current = strip_span(&current, span);
    }
    current
}
