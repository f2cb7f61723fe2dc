//! # otjlog-extract
//!
//! Pulls structured facts out of loosely written comments:
//! - a date in one of six numeric shapes ([`date`])
//! - an hour count written as `[n]` ([`duration`])
//! - a KSB marker `[K]`, `[S]` or `[B]` ([`category`])
//!
//! Each extractor returns what it found together with the text that is
//! left once the matched token is removed. A miss is not an error: the
//! value is `None` and the text comes back unchanged.
//!
//! ## Example
//!
//! ```rust
//! use otjlog_core::Category;
//! use otjlog_extract::Extractor;
//!
//! let result = Extractor::new(24).extract("Looked into APIs [K] 10/3/2024 [3]");
//! assert_eq!(result.date.unwrap().to_string(), "10/03/2024");
//! assert_eq!(result.duration, Some(3));
//! assert_eq!(result.category, Some(Category::Knowledge));
//! assert_eq!(result.residual_text, "Looked into APIs");
//! ```

pub mod category;
pub mod cleanup;
pub mod date;
pub mod duration;

pub use category::{extract_category, CategoryMarker, CATEGORY_MARKERS};
pub use date::DateExtractor;
pub use duration::extract_duration;

use otjlog_core::{Category, DateValue};
use serde::Serialize;

/// Everything extracted from one string
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ExtractionResult {
    pub date: Option<DateValue>,
    pub duration: Option<u32>,
    pub category: Option<Category>,
    pub residual_text: String,
}

/// Runs the date, duration and category extractors in sequence
#[derive(Clone, Copy, Debug)]
pub struct Extractor {
    date: DateExtractor,
}

impl Extractor {
    pub fn new(fallback_year: u32) -> Self {
        Self {
            date: DateExtractor::new(fallback_year),
        }
    }

    pub fn with_date_extractor(date: DateExtractor) -> Self {
        Self { date }
    }

    pub fn extract(&self, text: &str) -> ExtractionResult {
        let (date, text) = self.date.extract(text);
        let (duration, text) = extract_duration(&text);
        let (category, residual_text) = extract_category(&text);
        ExtractionResult {
            date,
            duration,
            category,
            residual_text,
        }
    }
}
