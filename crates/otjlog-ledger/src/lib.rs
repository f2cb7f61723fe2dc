//! # otjlog-ledger
//!
//! Builds the ordered list of log records for one reporting period.
//!
//! This crate provides:
//! - [`RecordAssembler`]: one (task, comment) pair to one [`LogRecord`]
//! - [`PeriodFilter`]: keeps records dated inside the reporting month
//! - [`collect_ledger`]: walks a board source and applies both
//!
//! ## Example
//!
//! ```rust,ignore
//! use otjlog_core::ReportPeriod;
//! use otjlog_extract::DateExtractor;
//! use otjlog_ledger::{collect_ledger, PeriodFilter, RecordAssembler};
//!
//! let period = ReportPeriod::new(3, 2024)?;
//! let assembler = RecordAssembler::new(DateExtractor::for_year(2024));
//! let records = collect_ledger(&board, &assembler, &PeriodFilter::new(period))?;
//! ```

pub mod assemble;
pub mod period;

pub use assemble::RecordAssembler;
pub use period::PeriodFilter;

use otjlog_core::{CommentSource, LogRecord, SourceError, TaskSource};
use tracing::{debug, info};

/// Fetch every task and its comments, assemble records and keep those in
/// the filter's period.
///
/// Output follows source order: tasks as listed, then comments as listed
/// for each task. Any source failure aborts the whole collection.
pub fn collect_ledger<S>(
    source: &S,
    assembler: &RecordAssembler,
    filter: &PeriodFilter,
) -> Result<Vec<LogRecord>, SourceError>
where
    S: TaskSource + CommentSource + ?Sized,
{
    let tasks = source.tasks()?;
    info!(tasks = tasks.len(), "fetched tasks");

    let mut assembled = Vec::new();
    for task in &tasks {
        let comments = source.comments(&task.id)?;
        if comments.is_empty() {
            debug!(
                task = %task.id,
                url = task.url.as_deref().unwrap_or("-"),
                "task has no comments"
            );
            continue;
        }
        assembled.extend(
            comments
                .iter()
                .filter_map(|comment| assembler.assemble(task, comment)),
        );
    }

    let total = assembled.len();
    let records = filter.retain(assembled);
    info!(
        assembled = total,
        kept = records.len(),
        period = %filter.period(),
        "ledger collected"
    );
    Ok(records)
}
