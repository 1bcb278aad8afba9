//! Column Exploration Library
//!
//! Quick exploratory checks for a single column of a dataset, chosen by the
//! column's semantic kind.
//!
//! # Overview
//!
//! Every exploration splits the column into valid and invalid entries and
//! summarizes both as short notes plus tables and charts:
//!
//! - **Numerical IDs**: non-numbers, safe integer casting, duplicated keys
//! - **String IDs**: non-strings, occurring string lengths, duplicated keys
//! - **Boolean attributes**: unknown encodings, representation counts, true/false share
//! - **Categorical attributes**: category frequencies as a bar chart
//! - **Numerical attributes**: number types, mean/median/standard deviation/range, box plots
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use column_explore::{Column, ColumnExplorer, HtmlGridReporter, PngChartRenderer, Reporter, Value};
//!
//! let column = Column::named("age", vec![Value::Int(31), Value::Float(28.5), Value::from("n/a")]);
//! let report = ColumnExplorer::default().explore_numerical(&column);
//!
//! for note in &report.notes {
//!     println!("- {note}");
//! }
//!
//! let mut reporter = HtmlGridReporter::new(PngChartRenderer::default());
//! reporter.present(&report)?;
//! ```
//!
//! # Loading Data
//!
//! [`loader::load_column`] reads one column of a CSV file with polars. By
//! default every cell is parsed on its own so mixed columns stay mixed.
//!
//! # Configuration
//!
//! Use [`ExploreConfig`] to change display limits, rounding, chart styling
//! and output locations:
//!
//! ```rust,ignore
//! use column_explore::ExploreConfig;
//!
//! let config = ExploreConfig::builder()
//!     .duplicate_display_limit(30)
//!     .decimal_places(2)
//!     .build()?;
//! ```

pub mod classifier;
pub mod column;
pub mod config;
pub mod error;
pub mod loader;
pub mod reporting;
pub mod types;
pub mod utils;

// Re-exports for convenient access
pub use classifier::ColumnExplorer;
pub use column::{Column, Partition, Value, ValueKey};
pub use config::{
    ChartStyle, ConfigValidationError, DEFAULT_OUTPUT_DIR, ExploreConfig, ExploreConfigBuilder,
};
pub use error::{ExploreError, Result as ExploreResult, ResultExt};
pub use loader::{LoadMode, load_column};
pub use reporting::{
    ChartRenderer, HtmlGridReporter, PngChartRenderer, RenderedChart, ReportDocument,
    ReportFiles, ReportGenerator, Reporter, TextReporter,
};
pub use types::{
    Bar, BarChart, BoxPlot, BoxPlotStats, ChartSpec, ColumnKind, ExplorationReport, PieChart,
    PieSlice, ReportBlock, SummaryStatistics, Table,
};

static_assertions::assert_impl_all!(ExplorationReport: Send, Sync);
static_assertions::assert_impl_all!(ChartSpec: Send, Sync);
static_assertions::assert_impl_all!(Column: Send, Sync);
