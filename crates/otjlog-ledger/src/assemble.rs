//! Turning one (task, comment) pair into a log record.

use otjlog_core::{BoardTask, Category, LearningActivity, LogRecord, RawComment};
use otjlog_extract::{extract_category, extract_duration, DateExtractor};
use tracing::debug;

/// Builds log records from a task and one of its comments
#[derive(Clone, Copy, Debug)]
pub struct RecordAssembler {
    dates: DateExtractor,
}

impl RecordAssembler {
    pub fn new(dates: DateExtractor) -> Self {
        Self { dates }
    }

    /// Returns `None` for void comments marked `(X)` or `[X]`.
    ///
    /// The comment's `[n]` hours override the task's. A record is built even
    /// when the comment has no date; the period filter drops it later.
    pub fn assemble(&self, task: &BoardTask, comment: &RawComment) -> Option<LogRecord> {
        if comment.is_excluded() {
            debug!(
                task = %task.id,
                url = task.url.as_deref().unwrap_or("-"),
                "skipping void comment"
            );
            return None;
        }

        let (date, comment_text) = self.dates.extract(&comment.text);

        let (task_hours, task_text) = extract_duration(&task.description);
        let (comment_hours, comment_text) = extract_duration(&comment_text);
        let hours = comment_hours.or(task_hours);

        let combined = format!("{task_text}\n{comment_text}");
        let (category, description) = extract_category(combined.trim());

        Some(LogRecord {
            date,
            activity: LearningActivity::OnlineLearning,
            title: task.title.clone(),
            description,
            contributes_to_ksb: true,
            hours,
            category: category.unwrap_or(Category::Knowledge),
        })
    }
}
