//! Hour counts written as `[n]`.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::cleanup::strip_all;

static DURATION_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([0-9]+)\]").expect("valid duration regex"));

/// Extract the first `[n]` hour count and strip every `[n]` token.
///
/// Any run of digits is accepted; a count too large for `u32` saturates
/// at `u32::MAX`.
pub fn extract_duration(text: &str) -> (Option<u32>, String) {
    let Some(captures) = DURATION_TOKEN.captures(text) else {
        return (None, text.to_string());
    };
    // The token is all digits, so parsing can only fail on overflow
    let hours = captures[1].parse::<u32>().unwrap_or(u32::MAX);

    let cleaned = strip_all(text, |s| DURATION_TOKEN.find(s).map(|m| m.range()));
    (Some(hours), cleaned)
}
