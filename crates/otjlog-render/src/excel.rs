//! Excel evidence log renderer
//!
//! Generates a single-sheet XLSX file laid out as the monthly off-the-job
//! evidence template:
//!
//! ```text
//! Row 2 | Apprentice Name: | Ada Lovelace | OFF THE JOB - MONTHLY EVIDENCE (C2:D4)
//! Row 3 | Month:           | March        |
//! Row 4 | Year:            | 2024         |
//! Row 6 | Date | Type of Learning Activity | Details | What did you learn ... | KSBs? | Time (hrs) | K/S/B
//! Row 7 | one row per log record ...
//! Total | ...                                          | TOTAL OFF-THE-JOB HOURS | =SUM(F7:F..) |
//! Declaration block merged over A..D, two rows below the total
//! ```
//!
//! The activity, KSB contribution and category columns carry dropdown
//! validation lists so the log can be corrected by hand after export.
//! Hours are a live `SUM` formula; rows without hours are left blank and
//! count as zero.

use std::path::Path;

use otjlog_core::{Category, LearningActivity, LogRecord, RenderError, Renderer, Report};
use rust_xlsxwriter::{
    DataValidation, Format, FormatAlign, FormatBorder, Workbook, Worksheet, XlsxError,
};

/// Column headers and widths, in sheet order
const COLUMNS: [(&str, u16); 7] = [
    ("Date", 22),
    ("Type of Learning Activity", 25),
    ("Details of Learning Activity", 70),
    (
        "What did you learn from this and how will you use what you have learnt?",
        100,
    ),
    ("Does it contribute to KSBs?", 25),
    ("Time (hrs)", 10),
    ("Knowledge, Skill, Behaviour", 40),
];

const COL_DATE: u16 = 0;
const COL_ACTIVITY: u16 = 1;
const COL_DETAILS: u16 = 2;
const COL_LEARNT: u16 = 3;
const COL_KSB: u16 = 4;
const COL_HOURS: u16 = 5;
const COL_CATEGORY: u16 = 6;

/// Zero-based row of the column headers (sheet row 6)
const HEADER_ROW: u32 = 5;
/// Zero-based row of the first record (sheet row 7)
const FIRST_DATA_ROW: u32 = 6;
const DECLARATION_HEIGHT: u32 = 5;

const SHEET_NAME: &str = "OTJ Log";

pub const DEFAULT_TITLE: &str = "OFF THE JOB - MONTHLY EVIDENCE";

const DECLARATION: &str = "\nDECLARATION\n\
· The training listed above has been undertaken within my normal working hours\n\
· The training is directly relevant to, and provided new knowledge, skills or behaviours required to, achieve my apprenticeship.\n";

const KSB_OPTIONS: [&str; 2] = ["Yes", "No"];

/// Zero-based row positions that depend on the number of records
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct SheetLayout {
    records: u32,
}

impl SheetLayout {
    fn new(records: u32) -> Self {
        Self { records }
    }

    fn record_row(self, index: u32) -> u32 {
        FIRST_DATA_ROW + index
    }

    /// First and last data row, if there are any records
    fn data_rows(self) -> Option<(u32, u32)> {
        (self.records > 0).then(|| (FIRST_DATA_ROW, FIRST_DATA_ROW + self.records - 1))
    }

    /// Directly below the last record (or the headers when empty)
    fn total_row(self) -> u32 {
        FIRST_DATA_ROW + self.records
    }

    /// `SUM` over the hours column; `None` for an empty month
    fn total_formula(self) -> Option<String> {
        let hours_col = ExcelRenderer::col_to_letter(COL_HOURS);
        // Excel rows are one-based
        self.data_rows()
            .map(|(first, last)| format!("=SUM({hours_col}{}:{hours_col}{})", first + 1, last + 1))
    }

    /// First and last row of the merged declaration block
    fn declaration_rows(self) -> (u32, u32) {
        let first = self.total_row() + 2;
        (first, first + DECLARATION_HEIGHT - 1)
    }
}

/// Excel evidence log renderer
#[derive(Clone, Debug)]
pub struct ExcelRenderer {
    /// Banner text in the merged C2:D4 block
    pub title: String,
    /// Whether to attach dropdown validation to the editable columns
    pub dropdowns: bool,
}

impl Default for ExcelRenderer {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.into(),
            dropdowns: true,
        }
    }
}

impl ExcelRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the banner text
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Leave the editable columns without validation lists
    pub fn no_dropdowns(mut self) -> Self {
        self.dropdowns = false;
        self
    }

    /// Generate Excel workbook bytes
    pub fn render_to_bytes(&self, report: &Report) -> Result<Vec<u8>, RenderError> {
        let mut workbook = Workbook::new();
        let formats = ExcelFormats::new();

        let sheet = workbook.add_worksheet();
        sheet.set_name(SHEET_NAME).map_err(xlsx_error)?;

        self.write_banner(sheet, report, &formats)?;
        Self::write_headers(sheet, &formats)?;

        let layout = SheetLayout::new(report.records.len() as u32);
        for (index, record) in (0u32..).zip(&report.records) {
            Self::write_record(sheet, layout.record_row(index), record, &formats)?;
        }

        if self.dropdowns {
            if let Some((first, last)) = layout.data_rows() {
                Self::add_dropdowns(sheet, first, last)?;
            }
        }

        Self::write_total(sheet, layout, &formats)?;
        Self::write_declaration(sheet, layout, &formats)?;

        workbook
            .save_to_buffer()
            .map_err(|e| RenderError::Format(format!("Failed to create Excel: {e}")))
    }

    /// Render and write the workbook to `path`
    pub fn save(&self, report: &Report, path: &Path) -> Result<(), RenderError> {
        let bytes = self.render_to_bytes(report)?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    /// Apprentice details and the merged title block
    fn write_banner(
        &self,
        sheet: &mut Worksheet,
        report: &Report,
        formats: &ExcelFormats,
    ) -> Result<(), RenderError> {
        let details = [
            ("Apprentice Name:", report.apprentice.clone()),
            ("Month:", report.period.month_name()),
            ("Year:", report.period.year().to_string()),
        ];

        for (row, (label, value)) in (1u32..).zip(details) {
            sheet
                .write_string_with_format(row, 0, label, &formats.label)
                .map_err(xlsx_error)?;
            sheet
                .write_string_with_format(row, 1, &value, &formats.label_value)
                .map_err(xlsx_error)?;
        }

        sheet
            .merge_range(1, COL_DETAILS, 3, COL_LEARNT, &self.title, &formats.title)
            .map_err(xlsx_error)?;
        Ok(())
    }

    fn write_headers(sheet: &mut Worksheet, formats: &ExcelFormats) -> Result<(), RenderError> {
        for (col, (header, width)) in (0u16..).zip(COLUMNS) {
            sheet
                .write_string_with_format(HEADER_ROW, col, header, &formats.header)
                .map_err(xlsx_error)?;
            sheet.set_column_width(col, width).map_err(xlsx_error)?;
        }
        Ok(())
    }

    fn write_record(
        sheet: &mut Worksheet,
        row: u32,
        record: &LogRecord,
        formats: &ExcelFormats,
    ) -> Result<(), RenderError> {
        let date = record.date.map(|d| d.to_string()).unwrap_or_default();
        sheet
            .write_string_with_format(row, COL_DATE, &date, &formats.text)
            .map_err(xlsx_error)?;
        sheet
            .write_string_with_format(row, COL_ACTIVITY, record.activity.label(), &formats.text)
            .map_err(xlsx_error)?;
        sheet
            .write_string_with_format(row, COL_DETAILS, &record.title, &formats.text)
            .map_err(xlsx_error)?;
        sheet
            .write_string_with_format(row, COL_LEARNT, &record.description, &formats.wrapped)
            .map_err(xlsx_error)?;
        let ksb = if record.contributes_to_ksb { "Yes" } else { "No" };
        sheet
            .write_string_with_format(row, COL_KSB, ksb, &formats.text)
            .map_err(xlsx_error)?;
        match record.hours {
            Some(hours) => sheet
                .write_number_with_format(row, COL_HOURS, f64::from(hours), &formats.hours)
                .map_err(xlsx_error)?,
            None => sheet
                .write_blank(row, COL_HOURS, &formats.hours)
                .map_err(xlsx_error)?,
        };
        sheet
            .write_string_with_format(row, COL_CATEGORY, record.category.label(), &formats.text)
            .map_err(xlsx_error)?;
        Ok(())
    }

    /// Dropdown lists over the data rows of the editable columns
    fn add_dropdowns(sheet: &mut Worksheet, first_row: u32, last_row: u32) -> Result<(), RenderError> {
        let activities: Vec<&str> = LearningActivity::ALL.iter().map(|a| a.label()).collect();
        let categories: Vec<&str> = Category::ALL.iter().map(|c| c.label()).collect();

        let lists: [(u16, &[&str]); 3] = [
            (COL_ACTIVITY, &activities),
            (COL_KSB, &KSB_OPTIONS),
            (COL_CATEGORY, &categories),
        ];

        for (col, options) in lists {
            let validation = DataValidation::new()
                .allow_list_strings(options)
                .map_err(xlsx_error)?;
            sheet
                .add_data_validation(first_row, col, last_row, col, &validation)
                .map_err(xlsx_error)?;
        }
        Ok(())
    }

    /// Total label and hours formula directly below the records
    fn write_total(
        sheet: &mut Worksheet,
        layout: SheetLayout,
        formats: &ExcelFormats,
    ) -> Result<(), RenderError> {
        let row = layout.total_row();
        sheet
            .write_string_with_format(row, COL_KSB, "TOTAL OFF-THE-JOB HOURS", &formats.total_row)
            .map_err(xlsx_error)?;

        match layout.total_formula() {
            Some(formula) => sheet
                .write_formula_with_format(row, COL_HOURS, formula.as_str(), &formats.total_row)
                .map_err(xlsx_error)?,
            None => sheet
                .write_number_with_format(row, COL_HOURS, 0.0, &formats.total_row)
                .map_err(xlsx_error)?,
        };
        Ok(())
    }

    fn write_declaration(
        sheet: &mut Worksheet,
        layout: SheetLayout,
        formats: &ExcelFormats,
    ) -> Result<(), RenderError> {
        let (first, last) = layout.declaration_rows();
        sheet
            .merge_range(first, COL_DATE, last, COL_LEARNT, DECLARATION, &formats.declaration)
            .map_err(xlsx_error)?;
        Ok(())
    }

    /// Convert column index to Excel letter (0 = A, 25 = Z, 26 = AA)
    fn col_to_letter(col: u16) -> String {
        let mut result = String::new();
        let mut n = u32::from(col);
        loop {
            result.insert(0, (b'A' + (n % 26) as u8) as char);
            if n < 26 {
                break;
            }
            n = n / 26 - 1;
        }
        result
    }
}

impl Renderer for ExcelRenderer {
    type Output = Vec<u8>;

    fn render(&self, report: &Report) -> Result<Vec<u8>, RenderError> {
        self.render_to_bytes(report)
    }
}

fn xlsx_error(e: XlsxError) -> RenderError {
    RenderError::Format(e.to_string())
}

/// Reusable Excel formats
struct ExcelFormats {
    label: Format,
    label_value: Format,
    title: Format,
    header: Format,
    text: Format,
    wrapped: Format,
    hours: Format,
    total_row: Format,
    declaration: Format,
}

impl ExcelFormats {
    fn new() -> Self {
        let label = Format::new().set_bold().set_background_color(0xA9A9A9);

        let label_value = Format::new()
            .set_background_color(0xD3D3D3)
            .set_align(FormatAlign::Left);

        let title = Format::new()
            .set_bold()
            .set_font_size(24)
            .set_align(FormatAlign::Center)
            .set_align(FormatAlign::VerticalCenter);

        let header = Format::new()
            .set_bold()
            .set_align(FormatAlign::Left)
            .set_border(FormatBorder::Thin);

        let text = Format::new()
            .set_align(FormatAlign::Left)
            .set_border(FormatBorder::Thin);

        let wrapped = Format::new()
            .set_text_wrap()
            .set_align(FormatAlign::Top)
            .set_border(FormatBorder::Thin);

        let hours = Format::new()
            .set_num_format("0")
            .set_border(FormatBorder::Thin);

        let total_row = Format::new()
            .set_bold()
            .set_align(FormatAlign::Left)
            .set_background_color(0xE2EFDA)
            .set_border(FormatBorder::Thin);

        let declaration = Format::new()
            .set_text_wrap()
            .set_align(FormatAlign::Top);

        Self {
            label,
            label_value,
            title,
            header,
            text,
            wrapped,
            hours,
            total_row,
            declaration,
        }
    }
}
