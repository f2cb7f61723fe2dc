//! Integration tests for the Excel evidence log

use otjlog_core::{
    Category, DateValue, LearningActivity, LogRecord, RenderError, Renderer, Report, ReportPeriod,
};
use otjlog_render::{ExcelRenderer, JsonRenderer, TextRenderer};

fn date(year: i32, month: u32, day: u32) -> DateValue {
    DateValue::from_ymd(year, month, day).unwrap()
}

/// A month of mixed entries, some without hours
fn march_report() -> Report {
    let records = vec![
        LogRecord::new("Research Session", "General prep\nLooked into APIs")
            .date(date(2024, 3, 10))
            .hours(3),
        LogRecord::new("Mentoring", "Paired with a junior colleague")
            .date(date(2024, 3, 12))
            .category(Category::Behaviour),
        LogRecord::new("Conference", "Talks on observability")
            .date(date(2024, 3, 20))
            .hours(7)
            .category(Category::Skill)
            .activity(LearningActivity::Event),
    ];
    Report::new("Ada Lovelace", ReportPeriod::new(3, 2024).unwrap(), records)
}

#[test]
fn render_month_to_file() {
    let report = march_report();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(format!("{}.xlsx", report.file_stem()));

    ExcelRenderer::new().save(&report, &path).unwrap();

    let written = std::fs::read(&path).unwrap();
    assert_eq!(&written[0..2], b"PK");
    assert!(path.ends_with("Ada Lovelace OTJ Log March 2024.xlsx"));
}

#[test]
fn save_into_missing_directory_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("log.xlsx");

    let err = ExcelRenderer::new().save(&march_report(), &path).unwrap_err();
    assert!(matches!(err, RenderError::Io(_)));
}

#[test]
fn render_large_month() {
    let period = ReportPeriod::new(1, 2025).unwrap();
    let records = (1..=31)
        .flat_map(|day| {
            (0..4).map(move |n| {
                LogRecord::new(format!("Card {n}"), format!("entry {day}-{n}"))
                    .date(date(2025, 1, day))
                    .hours(n)
            })
        })
        .collect();
    let report = Report::new("Grace", period, records);

    let xlsx = ExcelRenderer::new().render(&report).unwrap();
    assert!(xlsx.len() > 1000);
    assert_eq!(report.total_hours(), 31 * 6);
}

#[test]
fn custom_title_without_dropdowns() {
    let renderer = ExcelRenderer::new().title("MONTHLY LOG").no_dropdowns();
    let xlsx = renderer.render(&march_report()).unwrap();
    assert_eq!(&xlsx[0..2], b"PK");
}

#[test]
fn text_and_json_agree_on_totals() {
    let report = march_report();
    let text = TextRenderer::new().render(&report).unwrap();
    assert!(text.contains("3 entries, 10 off-the-job hours"));

    let json = JsonRenderer::new().render(&report).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    let hours: u64 = value["records"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|r| r["hours"].as_u64())
        .sum();
    assert_eq!(hours, 10);
}
