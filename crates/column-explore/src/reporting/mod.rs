//! Report presentation module.
//!
//! An [`ExplorationReport`] is plain data. This module turns it into
//! something a person can look at:
//! - [`HtmlGridReporter`]: HTML grid fragment with embedded PNG charts
//! - [`TextReporter`]: plain text for terminals
//! - [`ReportGenerator`]: standalone HTML and JSON report files
//!
//! # Example
//!
//! ```rust,ignore
//! use column_explore::reporting::{HtmlGridReporter, PngChartRenderer, Reporter};
//!
//! let mut reporter = HtmlGridReporter::new(PngChartRenderer::default());
//! reporter.present(&report)?;
//! println!("{}", reporter.html());
//! ```

mod chart;
mod generator;
mod html;

pub use chart::{ChartRenderer, PngChartRenderer, RenderedChart};
pub use generator::{ReportDocument, ReportGenerator, ReportFiles};
pub use html::{HtmlGridReporter, TextReporter, table_html};

use crate::error::Result;
use crate::types::ExplorationReport;

/// Lays out the notes and blocks of an exploration.
pub trait Reporter {
    fn present(&mut self, report: &ExplorationReport) -> Result<()>;
}
