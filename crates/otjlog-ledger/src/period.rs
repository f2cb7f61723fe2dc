//! Keeping only the records of the reporting month.

use otjlog_core::{LogRecord, ReportPeriod};
use tracing::debug;

/// Retains records dated inside one reporting period
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PeriodFilter {
    period: ReportPeriod,
}

impl PeriodFilter {
    pub fn new(period: ReportPeriod) -> Self {
        Self { period }
    }

    pub fn period(&self) -> ReportPeriod {
        self.period
    }

    /// Whether a record belongs in the report. Undated records never do.
    pub fn accepts(&self, record: &LogRecord) -> bool {
        record.date.is_some_and(|date| self.period.contains(date))
    }

    /// Keep accepted records in encounter order
    pub fn retain<I>(&self, records: I) -> Vec<LogRecord>
    where
        I: IntoIterator<Item = LogRecord>,
    {
        records
            .into_iter()
            .filter(|record| {
                let keep = self.accepts(record);
                if !keep {
                    debug!(
                        title = %record.title,
                        date = ?record.date.map(|d| d.to_string()),
                        period = %self.period,
                        "record outside reporting period"
                    );
                }
                keep
            })
            .collect()
    }
}
