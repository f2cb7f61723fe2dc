//! # otjlog-core
//!
//! Core domain model and collaborator traits for the otjlog evidence log.
//!
//! This crate provides:
//! - Domain types: `BoardTask`, `RawComment`, `DateValue`, `Category`,
//!   `LearningActivity`, `LogRecord`, `ReportPeriod`, `Report`
//! - Collaborator traits: `TaskSource`, `CommentSource`, `Renderer`
//! - Error types shared by the other crates
//!
//! ## Example
//!
//! ```rust
//! use otjlog_core::{Category, DateValue, LogRecord, ReportPeriod};
//!
//! let period = ReportPeriod::new(3, 2024).unwrap();
//! let record = LogRecord::new("Research Session", "Looked into APIs")
//!     .date(DateValue::from_ymd(2024, 3, 10).unwrap())
//!     .hours(3)
//!     .category(Category::Skill);
//!
//! assert!(record.date.is_some_and(|d| period.contains(d)));
//! assert_eq!(period.month_name(), "March");
//! ```

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// ============================================================================
// Type Aliases
// ============================================================================

/// Opaque identifier of a task (card) on the board
pub type TaskId = String;

// ============================================================================
// Board Data
// ============================================================================

/// A task (card) as delivered by the task source
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardTask {
    pub id: TaskId,
    pub title: String,
    /// Base description; may carry a task-level `[hours]` token
    pub description: String,
    /// Short link to the card, logged when its comments are skipped
    pub url: Option<String>,
}

impl BoardTask {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            url: None,
        }
    }

    /// Set the base description
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the card link
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }
}

/// A raw comment attached to a task
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawComment {
    pub text: String,
    pub task_id: TaskId,
}

impl RawComment {
    pub fn new(task_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            task_id: task_id.into(),
        }
    }

    /// Whether the comment carries a void marker, `(X)` or `[X]`
    pub fn is_excluded(&self) -> bool {
        self.text.contains("(X)") || self.text.contains("[X]")
    }
}

// ============================================================================
// Dates and Periods
// ============================================================================

/// A calendar date in canonical `DD/MM/YYYY` form.
///
/// Construction only succeeds for real calendar dates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct DateValue(NaiveDate);

impl DateValue {
    /// Canonical format string
    pub const FORMAT: &'static str = "%d/%m/%Y";

    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    pub fn as_naive(&self) -> NaiveDate {
        self.0
    }

    pub fn day(&self) -> u32 {
        self.0.day()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }
}

impl From<NaiveDate> for DateValue {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl fmt::Display for DateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(Self::FORMAT))
    }
}

impl From<DateValue> for String {
    fn from(date: DateValue) -> Self {
        date.to_string()
    }
}

impl TryFrom<String> for DateValue {
    type Error = chrono::ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        NaiveDate::parse_from_str(&value, Self::FORMAT).map(Self)
    }
}

/// The month/year window a report covers
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportPeriod {
    month: u32,
    year: i32,
}

impl ReportPeriod {
    pub fn new(month: u32, year: i32) -> Result<Self, PeriodError> {
        if !(1..=12).contains(&month) {
            return Err(PeriodError::InvalidMonth(month));
        }
        Ok(Self { month, year })
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// True when the date falls in this month of this year
    pub fn contains(&self, date: DateValue) -> bool {
        date.month() == self.month && date.year() == self.year
    }

    /// English month name, e.g. "March"
    pub fn month_name(&self) -> String {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .map(|d| d.format("%B").to_string())
            .unwrap_or_default()
    }
}

impl fmt::Display for ReportPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.month_name(), self.year)
    }
}

// ============================================================================
// Classification
// ============================================================================

/// Knowledge, Skill or Behaviour classification of an activity
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[default]
    Knowledge,
    Skill,
    Behaviour,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Knowledge, Category::Skill, Category::Behaviour];

    pub fn label(self) -> &'static str {
        match self {
            Category::Knowledge => "Knowledge",
            Category::Skill => "Skill",
            Category::Behaviour => "Behaviour",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Type of learning activity, as offered by the evidence template
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LearningActivity {
    #[default]
    #[serde(rename = "Online Learning")]
    OnlineLearning,
    #[serde(rename = "TCG Set Tasks")]
    SetTasks,
    #[serde(rename = "Portfolio Work (non-admin)")]
    PortfolioWork,
    #[serde(rename = "Coaching / Mentoring")]
    Coaching,
    #[serde(rename = "Event / Meetup / Conference")]
    Event,
    Shadowing,
    #[serde(rename = "CPD")]
    Cpd,
    #[serde(rename = "Workplace Training")]
    WorkplaceTraining,
    Research,
    #[serde(rename = "Peer to Peer Support")]
    PeerSupport,
    #[serde(rename = "Workplace Reviews")]
    WorkplaceReviews,
}

impl LearningActivity {
    pub const ALL: [LearningActivity; 11] = [
        LearningActivity::OnlineLearning,
        LearningActivity::SetTasks,
        LearningActivity::PortfolioWork,
        LearningActivity::Coaching,
        LearningActivity::Event,
        LearningActivity::Shadowing,
        LearningActivity::Cpd,
        LearningActivity::WorkplaceTraining,
        LearningActivity::Research,
        LearningActivity::PeerSupport,
        LearningActivity::WorkplaceReviews,
    ];

    pub fn label(self) -> &'static str {
        match self {
            LearningActivity::OnlineLearning => "Online Learning",
            LearningActivity::SetTasks => "TCG Set Tasks",
            LearningActivity::PortfolioWork => "Portfolio Work (non-admin)",
            LearningActivity::Coaching => "Coaching / Mentoring",
            LearningActivity::Event => "Event / Meetup / Conference",
            LearningActivity::Shadowing => "Shadowing",
            LearningActivity::Cpd => "CPD",
            LearningActivity::WorkplaceTraining => "Workplace Training",
            LearningActivity::Research => "Research",
            LearningActivity::PeerSupport => "Peer to Peer Support",
            LearningActivity::WorkplaceReviews => "Workplace Reviews",
        }
    }
}

impl fmt::Display for LearningActivity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// Records
// ============================================================================

/// One row of the evidence log
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRecord {
    /// Date the activity took place; `None` when the comment carried no date
    pub date: Option<DateValue>,
    pub activity: LearningActivity,
    /// Task title, verbatim
    pub title: String,
    /// What was learnt, cleaned of date/duration/category tokens
    pub description: String,
    pub contributes_to_ksb: bool,
    pub hours: Option<u32>,
    pub category: Category,
}

impl LogRecord {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            date: None,
            activity: LearningActivity::default(),
            title: title.into(),
            description: description.into(),
            contributes_to_ksb: true,
            hours: None,
            category: Category::default(),
        }
    }

    pub fn date(mut self, date: DateValue) -> Self {
        self.date = Some(date);
        self
    }

    pub fn hours(mut self, hours: u32) -> Self {
        self.hours = Some(hours);
        self
    }

    pub fn category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    pub fn activity(mut self, activity: LearningActivity) -> Self {
        self.activity = activity;
        self
    }
}

/// A complete evidence report, ready for a renderer
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Report {
    pub apprentice: String,
    pub period: ReportPeriod,
    pub records: Vec<LogRecord>,
}

impl Report {
    /// Records must be dated and inside `period`; run them through the
    /// ledger's period filter first.
    pub fn new(apprentice: impl Into<String>, period: ReportPeriod, records: Vec<LogRecord>) -> Self {
        debug_assert!(
            records.iter().all(|r| r.date.is_some_and(|d| period.contains(d))),
            "report records must be dated within {period}"
        );
        Self {
            apprentice: apprentice.into(),
            period,
            records,
        }
    }

    /// Total off-the-job hours; records without hours count as zero
    pub fn total_hours(&self) -> u64 {
        self.records
            .iter()
            .map(|r| u64::from(r.hours.unwrap_or(0)))
            .sum()
    }

    /// Conventional file name without extension
    pub fn file_stem(&self) -> String {
        format!(
            "{} OTJ Log {} {}",
            self.apprentice,
            self.period.month_name(),
            self.period.year()
        )
    }
}

// ============================================================================
// Traits
// ============================================================================

/// Yields the tasks on the board, in source order
pub trait TaskSource {
    fn tasks(&self) -> Result<Vec<BoardTask>, SourceError>;
}

/// Yields the comments of one task, in source order
pub trait CommentSource {
    fn comments(&self, task_id: &str) -> Result<Vec<RawComment>, SourceError>;
}

/// Output rendering
pub trait Renderer {
    type Output;

    /// Render a report to the output format
    fn render(&self, report: &Report) -> Result<Self::Output, RenderError>;
}

// ============================================================================
// Errors
// ============================================================================

/// The board service could not deliver data. Fatal to a run.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Request to {url} failed with status {status}")]
    Status { status: u16, url: String },

    #[error("Could not decode response: {0}")]
    Decode(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

/// Rendering error
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Format error: {0}")]
    Format(String),
}

/// Invalid reporting period
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PeriodError {
    #[error("Month must be between 1 and 12, got {0}")]
    InvalidMonth(u32),
}

// ============================================================================
// Tests
// ============================================================================
