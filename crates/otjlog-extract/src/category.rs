//! KSB markers: `[K]`, `[S]` and `[B]`.

use otjlog_core::Category;

use crate::cleanup::strip_all;

/// A literal marker and the category it stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryMarker {
    pub token: &'static str,
    pub category: Category,
}

/// Markers in the order they are honoured. When a text carries several,
/// only the first one present in this list is taken; the rest stay in the
/// text.
pub const CATEGORY_MARKERS: [CategoryMarker; 3] = [
    CategoryMarker {
        token: "[K]",
        category: Category::Knowledge,
    },
    CategoryMarker {
        token: "[S]",
        category: Category::Skill,
    },
    CategoryMarker {
        token: "[B]",
        category: Category::Behaviour,
    },
];

/// Find the honoured marker and strip all of its occurrences.
///
/// No default is applied here; `None` means no marker was present.
pub fn extract_category(text: &str) -> (Option<Category>, String) {
    let Some(marker) = CATEGORY_MARKERS.iter().find(|m| text.contains(m.token)) else {
        return (None, text.to_string());
    };

    let token = marker.token;
    let cleaned = strip_all(text, |s| s.find(token).map(|i| i..i + token.len()));
    (Some(marker.category), cleaned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn each_marker_maps_to_its_category() {
        assert_eq!(extract_category("a [K]").0, Some(Category::Knowledge));
        assert_eq!(extract_category("a [S]").0, Some(Category::Skill));
        assert_eq!(extract_category("a [B]").0, Some(Category::Behaviour));
    }

    #[test]
    fn marker_is_stripped_with_whitespace() {
        assert_eq!(
            extract_category("Looked into APIs [K] carefully"),
            (Some(Category::Knowledge), "Looked into APIs carefully".to_string())
        );
    }

    #[test]
    fn knowledge_beats_skill_beats_behaviour() {
        let (found, rest) = extract_category("[B] teamwork [S] and [K]");
        assert_eq!(found, Some(Category::Knowledge));
        assert_eq!(rest, "[B] teamwork [S] and");

        let (found, rest) = extract_category("[B] teamwork [S]");
        assert_eq!(found, Some(Category::Skill));
        assert_eq!(rest, "[B] teamwork");
    }

    #[test]
    fn no_marker_means_no_category() {
        assert_eq!(extract_category("plain"), (None, "plain".to_string()));
        assert_eq!(extract_category("lowercase [k]").0, None);
    }

    #[test]
    fn idempotent_on_cleaned_text() {
        let (first, cleaned) = extract_category("repeat [S] twice [S]");
        assert_eq!(first, Some(Category::Skill));
        assert_eq!(cleaned, "repeat twice");
        assert_eq!(extract_category(&cleaned), (None, cleaned.clone()));
    }

    #[test]
    fn marker_across_line_break() {
        let (found, rest) = extract_category("General prep\n[S] Looked into APIs");
        assert_eq!(found, Some(Category::Skill));
        assert_eq!(rest, "General prep Looked into APIs");
    }
}
