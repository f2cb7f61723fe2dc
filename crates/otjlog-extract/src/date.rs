//! Date extraction.
//!
//! A comment may mention the day the activity happened in one of six
//! numeric shapes. Shapes are tried in priority order and the first shape
//! that matches anywhere in the text decides the candidate substring:
//!
//! | Priority | Shape        | Example      |
//! |----------|--------------|--------------|
//! | 1        | `D/M/YYYY`   | `10/3/2024`  |
//! | 2        | `D/M/YY`     | `10/3/24`    |
//! | 3        | `YYYY-MM-DD` | `2024-03-10` |
//! | 4        | `DD-MM-YYYY` | `10-03-2024` |
//! | 5        | `DD-MM-YY`   | `10-03-24`   |
//! | 6        | `D/M`        | `10/3`       |
//!
//! The candidate is then read with an ordered list of templates. A
//! year-less candidate gets the configured fallback year appended before a
//! second attempt. If the candidate cannot be read, extraction fails as a
//! whole; lower priority shapes are not consulted.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use otjlog_core::DateValue;
use regex::Regex;
use tracing::debug;

use crate::cleanup::strip_span;

/// A textual date shape recognised in comments
#[derive(Debug)]
pub struct DateShape {
    pub name: &'static str,
    pattern: Regex,
}

impl DateShape {
    fn new(name: &'static str, pattern: &str) -> Self {
        Self {
            name,
            pattern: Regex::new(pattern).expect("valid date shape regex"),
        }
    }

    fn find<'t>(&self, text: &'t str) -> Option<regex::Match<'t>> {
        self.pattern.find(text)
    }
}

static DATE_SHAPES: Lazy<Vec<DateShape>> = Lazy::new(|| {
    vec![
        DateShape::new("D/M/YYYY", r"\b[0-9]{1,2}/[0-9]{1,2}/[0-9]{4}\b"),
        DateShape::new("D/M/YY", r"\b[0-9]{1,2}/[0-9]{1,2}/[0-9]{2}\b"),
        DateShape::new("YYYY-MM-DD", r"\b[0-9]{4}-[0-9]{2}-[0-9]{2}\b"),
        DateShape::new("DD-MM-YYYY", r"\b[0-9]{2}-[0-9]{2}-[0-9]{4}\b"),
        DateShape::new("DD-MM-YY", r"\b[0-9]{2}-[0-9]{2}-[0-9]{2}\b"),
        DateShape::new("D/M", r"\b[0-9]{1,2}/[0-9]{1,2}\b"),
    ]
});

/// Shapes in the order they are tried
pub fn date_shapes() -> &'static [DateShape] {
    &DATE_SHAPES
}

/// A format template for a candidate date string.
///
/// `widths` bounds the digit count of each separated field, in order, so a
/// two-digit year never satisfies a four-digit-year template.
#[derive(Debug, Clone, Copy)]
struct DateTemplate {
    format: &'static str,
    separator: char,
    widths: [(usize, usize); 3],
}

const DAY_OR_MONTH: (usize, usize) = (1, 2);
const FULL_YEAR: (usize, usize) = (4, 4);
const SHORT_YEAR: (usize, usize) = (2, 2);

const SLASH_FULL: DateTemplate = DateTemplate {
    format: "%d/%m/%Y",
    separator: '/',
    widths: [DAY_OR_MONTH, DAY_OR_MONTH, FULL_YEAR],
};
const SLASH_SHORT: DateTemplate = DateTemplate {
    format: "%d/%m/%y",
    separator: '/',
    widths: [DAY_OR_MONTH, DAY_OR_MONTH, SHORT_YEAR],
};
const DASH_FULL: DateTemplate = DateTemplate {
    format: "%d-%m-%Y",
    separator: '-',
    widths: [DAY_OR_MONTH, DAY_OR_MONTH, FULL_YEAR],
};
const DASH_SHORT: DateTemplate = DateTemplate {
    format: "%d-%m-%y",
    separator: '-',
    widths: [DAY_OR_MONTH, DAY_OR_MONTH, SHORT_YEAR],
};
const ISO: DateTemplate = DateTemplate {
    format: "%Y-%m-%d",
    separator: '-',
    widths: [FULL_YEAR, DAY_OR_MONTH, DAY_OR_MONTH],
};

const TEMPLATES: [DateTemplate; 5] = [SLASH_FULL, SLASH_SHORT, DASH_FULL, DASH_SHORT, ISO];
const FALLBACK_TEMPLATES: [DateTemplate; 2] = [SLASH_SHORT, DASH_SHORT];

impl DateTemplate {
    fn parse(&self, candidate: &str) -> Option<NaiveDate> {
        let fields: Vec<&str> = candidate.split(self.separator).collect();
        if fields.len() != self.widths.len() {
            return None;
        }
        let shaped = fields.iter().zip(self.widths).all(|(field, (min, max))| {
            (min..=max).contains(&field.len()) && field.bytes().all(|b| b.is_ascii_digit())
        });
        if !shaped {
            return None;
        }
        NaiveDate::parse_from_str(candidate, self.format).ok()
    }
}

/// Finds and removes the first date mentioned in a piece of text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateExtractor {
    fallback_year: u32,
}

impl DateExtractor {
    /// `fallback_year` is the two-digit year given to year-less dates
    pub fn new(fallback_year: u32) -> Self {
        Self {
            fallback_year: fallback_year % 100,
        }
    }

    /// Use the last two digits of `year` as the fallback year
    pub fn for_year(year: i32) -> Self {
        Self::new(year.rem_euclid(100).unsigned_abs())
    }

    pub fn fallback_year(&self) -> u32 {
        self.fallback_year
    }

    /// Returns the date and the text with the date removed, or `None` and
    /// the text unchanged.
    pub fn extract(&self, text: &str) -> (Option<DateValue>, String) {
        let Some((shape, found)) = DATE_SHAPES
            .iter()
            .find_map(|shape| shape.find(text).map(|m| (shape, m)))
        else {
            return (None, text.to_string());
        };

        match self.parse_candidate(found.as_str()) {
            Some(date) => (Some(DateValue::from(date)), strip_span(text, found.range())),
            None => {
                debug!(
                    shape = shape.name,
                    candidate = found.as_str(),
                    "date-like text is not a calendar date"
                );
                (None, text.to_string())
            }
        }
    }

    fn parse_candidate(&self, candidate: &str) -> Option<NaiveDate> {
        TEMPLATES
            .iter()
            .find_map(|template| template.parse(candidate))
            .or_else(|| self.parse_with_fallback_year(candidate))
    }

    fn parse_with_fallback_year(&self, candidate: &str) -> Option<NaiveDate> {
        let separator = if candidate.contains('/') { '/' } else { '-' };
        if candidate.split(separator).count() != 2 {
            return None;
        }
        let completed = format!("{candidate}{separator}{:02}", self.fallback_year);
        FALLBACK_TEMPLATES
            .iter()
            .find_map(|template| template.parse(&completed))
    }
}
