use crate::column::Column;
use serde::{Deserialize, Serialize};

/// Semantic kind of a column, selecting which exploration runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    /// Numeric primary or foreign keys.
    NumericalId,
    /// Textual primary or foreign keys.
    StringId,
    /// Entries encoding true/false.
    Boolean,
    /// Entries drawn from a set of categories.
    Categorical,
    /// General numeric measurements.
    Numerical,
}

impl ColumnKind {
    pub const ALL: [ColumnKind; 5] = [
        ColumnKind::NumericalId,
        ColumnKind::StringId,
        ColumnKind::Boolean,
        ColumnKind::Categorical,
        ColumnKind::Numerical,
    ];

    /// Get a human-readable display name for the kind.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::NumericalId => "Numerical ID",
            Self::StringId => "String ID",
            Self::Boolean => "Boolean Attribute",
            Self::Categorical => "Categorical Attribute",
            Self::Numerical => "Numerical Attribute",
        }
    }
}

// ============================================================================
// Report Types
// ============================================================================

/// Notes and blocks produced by one exploration, in display order.
///
/// This struct is what a [`Reporter`](crate::reporting::Reporter) lays out.
/// Chart blocks describe what to draw; rasterizing them is up to the
/// reporter's chart renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplorationReport {
    /// Exploration that produced the report.
    pub kind: ColumnKind,
    /// Name of the explored column, if it had one.
    pub column_name: Option<String>,
    /// Number of entries in the explored column.
    pub row_count: usize,
    /// Short human-readable findings.
    pub notes: Vec<String>,
    /// Tables and charts.
    pub blocks: Vec<ReportBlock>,
}

impl ExplorationReport {
    /// Create an empty report for `column`.
    pub fn new(kind: ColumnKind, column: &Column) -> Self {
        Self {
            kind,
            column_name: column.name().map(str::to_string),
            row_count: column.len(),
            notes: Vec::new(),
            blocks: Vec::new(),
        }
    }

    /// Add a note to the report.
    pub fn add_note(&mut self, note: impl Into<String>) {
        self.notes.push(note.into());
    }

    /// Add a table or chart to the report.
    pub fn add_block(&mut self, block: impl Into<ReportBlock>) {
        self.blocks.push(block.into());
    }

    /// Check whether a note with exactly this text was emitted.
    pub fn has_note(&self, note: &str) -> bool {
        self.notes.iter().any(|n| n == note)
    }

    /// All table blocks, in order.
    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.blocks.iter().filter_map(|block| match block {
            ReportBlock::Table(table) => Some(table),
            ReportBlock::Chart(_) => None,
        })
    }

    /// All chart blocks, in order.
    pub fn charts(&self) -> impl Iterator<Item = &ChartSpec> {
        self.blocks.iter().filter_map(|block| match block {
            ReportBlock::Chart(chart) => Some(chart),
            ReportBlock::Table(_) => None,
        })
    }

    /// The first table whose first header is `title`.
    pub fn table(&self, title: &str) -> Option<&Table> {
        self.tables().find(|t| t.title() == title)
    }

    /// Label used for chart axes and file names.
    pub fn variable_name(&self) -> &str {
        self.column_name.as_deref().unwrap_or("variable")
    }
}

/// A renderable unit of a report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReportBlock {
    Table(Table),
    Chart(ChartSpec),
}

impl From<Table> for ReportBlock {
    fn from(table: Table) -> Self {
        ReportBlock::Table(table)
    }
}

impl From<ChartSpec> for ReportBlock {
    fn from(chart: ChartSpec) -> Self {
        ReportBlock::Chart(chart)
    }
}

/// A small table of text cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    /// Set when rows were cut to this many entries.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub truncated_to: Option<usize>,
}

impl Table {
    /// Two-column `title | count` table.
    pub fn value_counts(title: impl Into<String>, counts: Vec<(String, usize)>) -> Self {
        Self {
            headers: vec![title.into(), "count".to_string()],
            rows: counts
                .into_iter()
                .map(|(value, count)| vec![value, count.to_string()])
                .collect(),
            truncated_to: None,
        }
    }

    /// One-column table.
    pub fn single_column(title: impl Into<String>, values: Vec<String>) -> Self {
        Self {
            headers: vec![title.into()],
            rows: values.into_iter().map(|v| vec![v]).collect(),
            truncated_to: None,
        }
    }

    /// Keep at most `limit` rows, recording the cut when rows were dropped.
    pub fn truncate(mut self, limit: usize) -> Self {
        if self.rows.len() > limit {
            self.rows.truncate(limit);
            self.truncated_to = Some(limit);
        }
        self
    }

    /// First header.
    pub fn title(&self) -> &str {
        self.headers.first().map(String::as_str).unwrap_or("")
    }

    /// Cells of the column at `index`.
    pub fn column(&self, index: usize) -> Vec<&str> {
        self.rows
            .iter()
            .filter_map(|row| row.get(index).map(String::as_str))
            .collect()
    }

    pub fn is_truncated(&self) -> bool {
        self.truncated_to.is_some()
    }
}

/// What a chart shows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "chart", rename_all = "snake_case")]
pub enum ChartSpec {
    Pie(PieChart),
    Bar(BarChart),
    BoxPlot(BoxPlot),
}

/// One slice of a pie chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PieSlice {
    pub label: String,
    pub count: usize,
    /// Share of the total in percent.
    pub percentage: f64,
}

impl PieSlice {
    /// `"50.0%"`, or empty for an empty slice.
    pub fn percent_label(&self) -> String {
        if self.count == 0 {
            String::new()
        } else {
            format!("{:.1}%", self.percentage)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PieChart {
    pub slices: Vec<PieSlice>,
}

impl PieChart {
    /// Two-slice chart: `total - second_count` observations labelled
    /// `first_label` and `second_count` labelled `second_label`.
    pub fn bicategorical(
        total: usize,
        second_count: usize,
        first_label: impl Into<String>,
        second_label: impl Into<String>,
    ) -> Self {
        let first_count = total.saturating_sub(second_count);
        let share = |count: usize| {
            if total == 0 {
                0.0
            } else {
                count as f64 / total as f64 * 100.0
            }
        };
        Self {
            slices: vec![
                PieSlice {
                    label: first_label.into(),
                    count: first_count,
                    percentage: share(first_count),
                },
                PieSlice {
                    label: second_label.into(),
                    count: second_count,
                    percentage: share(second_count),
                },
            ],
        }
    }

    pub fn total(&self) -> usize {
        self.slices.iter().map(|s| s.count).sum()
    }
}

/// One bar of a bar chart, annotated with its count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub label: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarChart {
    pub bars: Vec<Bar>,
    pub y_label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxPlot {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub stats: BoxPlotStats,
    /// Whether points beyond the whiskers are drawn.
    pub show_outliers: bool,
}

/// Five-number summary plus outliers, as drawn by a box plot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxPlotStats {
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    /// Smallest value within `q1 - 1.5 * IQR`.
    pub lower_whisker: f64,
    /// Largest value within `q3 + 1.5 * IQR`.
    pub upper_whisker: f64,
    /// Values beyond the whiskers, ascending.
    pub outliers: Vec<f64>,
}

/// Descriptive statistics of the valid numbers of a column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryStatistics {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub median: f64,
    /// Sample standard deviation; `None` with fewer than two values.
    pub std_dev: Option<f64>,
}
