//! Integration tests for collecting a ledger from a board source

use std::cell::Cell;
use std::collections::HashMap;

use otjlog_core::{
    BoardTask, Category, CommentSource, DateValue, RawComment, ReportPeriod, SourceError,
    TaskSource,
};
use otjlog_extract::DateExtractor;
use otjlog_ledger::{collect_ledger, PeriodFilter, RecordAssembler};
use pretty_assertions::assert_eq;

/// In-memory board with comments in insertion order
#[derive(Default)]
struct FakeBoard {
    tasks: Vec<BoardTask>,
    comments: HashMap<String, Vec<String>>,
    fail_comments_for: Option<String>,
    comment_calls: Cell<usize>,
}

impl FakeBoard {
    fn task(mut self, task: BoardTask, comments: &[&str]) -> Self {
        self.comments.insert(
            task.id.clone(),
            comments.iter().map(|c| c.to_string()).collect(),
        );
        self.tasks.push(task);
        self
    }
}

impl TaskSource for FakeBoard {
    fn tasks(&self) -> Result<Vec<BoardTask>, SourceError> {
        Ok(self.tasks.clone())
    }
}

impl CommentSource for FakeBoard {
    fn comments(&self, task_id: &str) -> Result<Vec<RawComment>, SourceError> {
        self.comment_calls.set(self.comment_calls.get() + 1);
        if self.fail_comments_for.as_deref() == Some(task_id) {
            return Err(SourceError::Status {
                status: 503,
                url: format!("/cards/{task_id}/actions"),
            });
        }
        Ok(self
            .comments
            .get(task_id)
            .map(|texts| texts.iter().map(|t| RawComment::new(task_id, t.as_str())).collect())
            .unwrap_or_default())
    }
}

fn march_2024() -> (RecordAssembler, PeriodFilter) {
    (
        RecordAssembler::new(DateExtractor::for_year(2024)),
        PeriodFilter::new(ReportPeriod::new(3, 2024).unwrap()),
    )
}

#[test]
fn research_session_end_to_end() {
    let board = FakeBoard::default().task(
        BoardTask::new("c1", "Research Session").description("General prep [2]"),
        &["Looked into APIs [K] 10/3/2024 [3]"],
    );
    let (assembler, filter) = march_2024();

    let records = collect_ledger(&board, &assembler, &filter).unwrap();

    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.date, DateValue::from_ymd(2024, 3, 10));
    assert_eq!(record.date.unwrap().to_string(), "10/03/2024");
    assert_eq!(record.hours, Some(3));
    assert_eq!(record.category, Category::Knowledge);
    assert_eq!(record.title, "Research Session");
    assert!(record.description.contains("General prep"));
    assert!(record.description.contains("Looked into APIs"));
    assert!(record.contributes_to_ksb);
}

#[test]
fn void_undated_and_out_of_period_comments_are_dropped() {
    let board = FakeBoard::default()
        .task(
            BoardTask::new("c1", "Course"),
            &[
                "module 1 1/3/2024 [2]",
                "(X) module 2 2/3/2024 [2]",
                "module 3 no date [2]",
                "module 4 28/2/2024 [2]",
                "module 5 3/3/2024 [X]",
                "module 6 31/3/2024",
            ],
        )
        .task(BoardTask::new("c2", "Empty card"), &[]);
    let (assembler, filter) = march_2024();

    let records = collect_ledger(&board, &assembler, &filter).unwrap();
    let descriptions: Vec<_> = records.iter().map(|r| r.description.as_str()).collect();
    assert_eq!(descriptions, ["module 1", "module 6"]);
}

#[test]
fn order_follows_tasks_then_comments() {
    let board = FakeBoard::default()
        .task(BoardTask::new("b", "Second card"), &["20/3/2024 z", "2/3/2024 y"])
        .task(BoardTask::new("a", "First card"), &["1/3/2024 x"]);
    let (assembler, filter) = march_2024();

    let records = collect_ledger(&board, &assembler, &filter).unwrap();
    let pairs: Vec<_> = records
        .iter()
        .map(|r| (r.title.as_str(), r.description.as_str()))
        .collect();
    assert_eq!(
        pairs,
        [("Second card", "z"), ("Second card", "y"), ("First card", "x")]
    );
}

#[test]
fn comment_source_failure_aborts_collection() {
    let mut board = FakeBoard::default()
        .task(BoardTask::new("ok", "Fine"), &["1/3/2024 fine"])
        .task(BoardTask::new("bad", "Broken"), &["2/3/2024 never read"])
        .task(BoardTask::new("later", "Later"), &["3/3/2024 not reached"]);
    board.fail_comments_for = Some("bad".into());
    let (assembler, filter) = march_2024();

    let err = collect_ledger(&board, &assembler, &filter).unwrap_err();
    assert!(matches!(err, SourceError::Status { status: 503, .. }));
    assert_eq!(board.comment_calls.get(), 2);
}

#[test]
fn year_less_dates_use_the_report_year() {
    let board = FakeBoard::default().task(BoardTask::new("c", "Card"), &["14/3 standup [1]"]);
    let (assembler, filter) = march_2024();

    let records = collect_ledger(&board, &assembler, &filter).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].date, DateValue::from_ymd(2024, 3, 14));
}

#[test]
fn april_period_drops_march_record() {
    let board = FakeBoard::default().task(BoardTask::new("c", "Card"), &["15/03/2024 demo"]);
    let assembler = RecordAssembler::new(DateExtractor::for_year(2024));

    let march = PeriodFilter::new(ReportPeriod::new(3, 2024).unwrap());
    let april = PeriodFilter::new(ReportPeriod::new(4, 2024).unwrap());

    assert_eq!(collect_ledger(&board, &assembler, &march).unwrap().len(), 1);
    assert!(collect_ledger(&board, &assembler, &april).unwrap().is_empty());
}
