//! # otjlog-render
//!
//! Report sinks for otjlog.
//!
//! This crate provides:
//! - Excel evidence log (the monthly off-the-job template)
//! - Plain-text table for terminal previews
//! - JSON output
//!
//! ## Example
//!
//! ```rust,ignore
//! use otjlog_core::{Renderer, Report};
//! use otjlog_render::{ExcelRenderer, TextRenderer};
//!
//! let xlsx_bytes = ExcelRenderer::new().render(&report)?;
//! std::fs::write(format!("{}.xlsx", report.file_stem()), xlsx_bytes)?;
//!
//! println!("{}", TextRenderer::new().render(&report)?);
//! ```

pub mod excel;
pub mod text;

pub use excel::ExcelRenderer;
pub use text::TextRenderer;

use otjlog_core::{RenderError, Renderer, Report};

/// Pretty-printed JSON of the whole report
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonRenderer;

impl JsonRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for JsonRenderer {
    type Output = String;

    fn render(&self, report: &Report) -> Result<String, RenderError> {
        serde_json::to_string_pretty(report).map_err(|e| RenderError::Format(e.to_string()))
    }
}
