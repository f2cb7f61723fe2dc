//! Plain-text table output for previewing a report in the terminal

use std::fmt::Write as _;

use otjlog_core::{RenderError, Renderer, Report};

/// Aligned text table of the report records
#[derive(Clone, Debug)]
pub struct TextRenderer {
    /// Maximum description width before truncation (0 = unlimited)
    pub max_description: usize,
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self {
            max_description: 60,
        }
    }
}

impl TextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Limit description width; 0 disables truncation
    pub fn max_description(mut self, width: usize) -> Self {
        self.max_description = width;
        self
    }

    fn describe(&self, description: &str) -> String {
        let flat = description.replace('\n', " / ");
        if self.max_description == 0 || flat.chars().count() <= self.max_description {
            return flat;
        }
        let kept: String = flat.chars().take(self.max_description.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}

impl Renderer for TextRenderer {
    type Output = String;

    fn render(&self, report: &Report) -> Result<String, RenderError> {
        let rows: Vec<[String; 5]> = report
            .records
            .iter()
            .map(|r| {
                [
                    r.date.map(|d| d.to_string()).unwrap_or_default(),
                    r.hours.map(|h| h.to_string()).unwrap_or_default(),
                    r.category.label().to_string(),
                    r.title.clone(),
                    self.describe(&r.description),
                ]
            })
            .collect();

        let headers = ["Date", "Hours", "KSB", "Title", "Description"];
        let mut widths = headers.map(|h| h.chars().count());
        for row in &rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let mut out = String::new();
        let _ = writeln!(out, "{} - {}", report.apprentice, report.period);
        let _ = writeln!(out);
        push_row(&mut out, &headers.map(String::from), &widths);
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        let _ = writeln!(out, "{}", rule.join("-+-"));
        for row in &rows {
            push_row(&mut out, row, &widths);
        }
        let _ = writeln!(out);
        let entries = report.records.len();
        let hours = report.total_hours();
        let _ = writeln!(
            out,
            "{entries} {}, {hours} off-the-job {}",
            if entries == 1 { "entry" } else { "entries" },
            if hours == 1 { "hour" } else { "hours" },
        );
        Ok(out)
    }
}

fn push_row(out: &mut String, cells: &[String; 5], widths: &[usize; 5]) {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| {
            let pad = width.saturating_sub(cell.chars().count());
            format!("{cell}{}", " ".repeat(pad))
        })
        .collect();
    let _ = writeln!(out, "{}", padded.join(" | ").trim_end());
}
