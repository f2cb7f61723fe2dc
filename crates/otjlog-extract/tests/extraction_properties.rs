//! Behavioural properties of the extractors over families of inputs.

use otjlog_core::{Category, DateValue};
use otjlog_extract::{extract_category, extract_duration, DateExtractor};

// =============================================================================
// Dates
// =============================================================================

#[test]
fn full_dates_are_normalised_and_removed() {
    let extractor = DateExtractor::new(24);
    let cases = [
        ("01/01/2024", 2024, 1, 1),
        ("9/7/2023", 2023, 7, 9),
        ("31/12/1999", 1999, 12, 31),
        ("29/02/2024", 2024, 2, 29),
    ];

    for (written, year, month, day) in cases {
        for text in [
            written.to_string(),
            format!("before {written}"),
            format!("{written} after"),
            format!("before {written} after [K]"),
        ] {
            let (found, rest) = extractor.extract(&text);
            assert_eq!(found, DateValue::from_ymd(year, month, day), "input: {text}");
            assert!(!rest.contains(written), "residual {rest:?} still has {written}");
            assert!(!rest.starts_with(' ') && !rest.ends_with(' '));
        }
    }
}

#[test]
fn canonical_form_is_zero_padded() {
    let (found, _) = DateExtractor::new(24).extract("3/4/2024");
    assert_eq!(found.unwrap().to_string(), "03/04/2024");
}

#[test]
fn year_less_dates_follow_the_fallback_year() {
    // 29 February only exists in leap years
    for fallback in 0..100u32 {
        let completed = 2000 + fallback as i32;
        let leap = chrono::NaiveDate::from_ymd_opt(completed, 2, 29).is_some();
        let (found, _) = DateExtractor::new(fallback).extract("retro 29/2");
        assert_eq!(found.is_some(), leap, "fallback year {fallback:02}");
    }
}

#[test]
fn invalid_calendar_values_never_produce_dates() {
    let extractor = DateExtractor::new(24);
    for text in ["32/1/2024", "0/1/2024", "1/0/2024", "10/13/24", "2024-02-30", "31-06-2024"] {
        let (found, rest) = extractor.extract(text);
        assert_eq!(found, None, "input: {text}");
        assert_eq!(rest, text);
    }
}

// =============================================================================
// Durations
// =============================================================================

#[test]
fn duration_example_sentence() {
    let (hours, rest) = extract_duration("Did research [5] today");
    assert_eq!(hours, Some(5));
    assert_eq!(rest, "Did research today");
}

// =============================================================================
// Categories
// =============================================================================

#[test]
fn category_extraction_is_idempotent() {
    for text in ["[K] read", "watched talk [S]", "helped a peer [B] twice", "x [K] y [K]"] {
        let (first, cleaned) = extract_category(text);
        assert!(first.is_some());
        let (second, again) = extract_category(&cleaned);
        assert_eq!(second, None, "input: {text}");
        assert_eq!(again, cleaned);
    }
}

#[test]
fn category_priority_is_fixed() {
    let (found, _) = extract_category("[S][B][K]");
    assert_eq!(found, Some(Category::Knowledge));
}
