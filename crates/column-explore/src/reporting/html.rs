//! Reporters that lay out an [`ExplorationReport`].
//!
//! [`HtmlGridReporter`] produces the notebook-style flex grid: a bordered
//! "Notes" cell followed by one bordered cell per table or chart.
//! [`TextReporter`] writes a plain-text rendition for terminals.

use super::Reporter;
use super::chart::{ChartRenderer, PngChartRenderer};
use crate::error::Result;
use crate::types::{ChartSpec, ExplorationReport, ReportBlock, Table};
use crate::utils::{escape_html, format_rounded};
use std::fmt::Write as _;
use std::io::Write;

const GRID_OPEN: &str = "<div style='display: flex; flex-wrap: wrap;'>";
const CELL_OPEN: &str = "<div style='margin: 10px; padding: 10px; border: 1px solid #ccc;'>";
const NOTES_CELL_OPEN: &str =
    "<div style='margin: 10px; padding: 10px; border: 1px solid #ccc; text-align: left;'>";
const TABLE_OPEN: &str =
    "<table border=\"0\" class=\"dataframe\">\n  <thead>\n    <tr style=\"text-align: right;\">\n";
const NOTES_LIST_OPEN: &str =
    "<ul style='list-style-type: none; padding: 0; margin: 0; text-align: left;'>";

/// Renders reports as HTML fragments with charts embedded as data URIs.
///
/// Every presented report is appended to an internal buffer; call
/// [`HtmlGridReporter::html`] or [`HtmlGridReporter::into_html`] to obtain
/// the markup.
#[derive(Debug, Default)]
pub struct HtmlGridReporter<R = PngChartRenderer> {
    renderer: R,
    html: String,
}

impl<R: ChartRenderer> HtmlGridReporter<R> {
    pub fn new(renderer: R) -> Self {
        Self {
            renderer,
            html: String::new(),
        }
    }

    /// Markup of every report presented so far.
    pub fn html(&self) -> &str {
        &self.html
    }

    pub fn into_html(self) -> String {
        self.html
    }

    /// Render a single report to a standalone grid fragment.
    pub fn render(&self, report: &ExplorationReport) -> Result<String> {
        let mut html = String::from(GRID_OPEN);

        if !report.notes.is_empty() {
            html.push_str(NOTES_CELL_OPEN);
            html.push_str("<h4>Notes</h4>");
            html.push_str(NOTES_LIST_OPEN);
            for note in &report.notes {
                let _ = write!(html, "<li style='margin: 5px 0;'>- {}</li>", escape_html(note));
            }
            html.push_str("</ul></div>");
        }

        for block in &report.blocks {
            html.push_str(CELL_OPEN);
            match block {
                ReportBlock::Table(table) => html.push_str(&table_html(table)),
                ReportBlock::Chart(chart) => html.push_str(&self.chart_html(chart)?),
            }
            html.push_str("</div>");
        }

        html.push_str("</div>");
        Ok(html)
    }

    fn chart_html(&self, chart: &ChartSpec) -> Result<String> {
        let rendered = self.renderer.render(chart)?;
        let mut html = format!(
            "<figure style='margin: 0;'><img src='{}' alt='{}' {}>",
            rendered.to_data_uri(),
            escape_html(&chart_caption(chart)),
            "style='display: block; margin: 0 auto;'",
        );
        if let Some(legend) = chart_legend(chart) {
            html.push_str(&legend);
        }
        html.push_str("</figure>");
        Ok(html)
    }
}

impl<R: ChartRenderer> Reporter for HtmlGridReporter<R> {
    fn present(&mut self, report: &ExplorationReport) -> Result<()> {
        let fragment = self.render(report)?;
        self.html.push_str(&fragment);
        Ok(())
    }
}

/// Borderless table without an index column. A grey marker follows
/// truncated tables.
pub fn table_html(table: &Table) -> String {
    let mut html = String::from(TABLE_OPEN);
    for header in &table.headers {
        let _ = writeln!(html, "      <th>{}</th>", escape_html(header));
    }
    html.push_str("    </tr>\n  </thead>\n  <tbody>\n");
    for row in &table.rows {
        html.push_str("    <tr>\n");
        for cell in row {
            let _ = writeln!(html, "      <td>{}</td>", escape_html(cell));
        }
        html.push_str("    </tr>\n");
    }
    html.push_str("  </tbody>\n</table>");
    if let Some(limit) = table.truncated_to {
        let _ = write!(html, "<p style='color: grey;'>(truncated to {limit} rows)</p>");
    }
    html
}

/// Short description used as image alt text.
fn chart_caption(chart: &ChartSpec) -> String {
    match chart {
        ChartSpec::Pie(pie) => pie
            .slices
            .iter()
            .map(|s| s.label.as_str())
            .collect::<Vec<_>>()
            .join(" vs "),
        ChartSpec::Bar(bar) => format!("{} per category", bar.y_label),
        ChartSpec::BoxPlot(plot) => {
            format!("{} of {} ({})", plot.y_label, plot.x_label, plot.title)
        }
    }
}

/// Labels the canvas cannot carry: the pie legend, bar categories and box
/// plot titles.
fn chart_legend(chart: &ChartSpec) -> Option<String> {
    let mut html = String::from("<figcaption style='font-size: small;'>");
    match chart {
        ChartSpec::Pie(pie) => {
            for slice in &pie.slices {
                let _ = write!(html, "<div>{}</div>", escape_html(&slice.label));
            }
        }
        ChartSpec::Bar(bar) => {
            if bar.bars.is_empty() {
                return None;
            }
            let labels: Vec<String> = bar.bars.iter().map(|b| escape_html(&b.label)).collect();
            let _ = write!(html, "{}: {}", escape_html(&bar.y_label), labels.join(", "));
        }
        ChartSpec::BoxPlot(plot) => {
            let _ = write!(
                html,
                "<b>{}</b><br>{} / {}",
                escape_html(&plot.title),
                escape_html(&plot.x_label),
                escape_html(&plot.y_label)
            );
        }
    }
    html.push_str("</figcaption>");
    Some(html)
}

/// Decimal places of box plot figures in text output.
const TEXT_DECIMAL_PLACES: u32 = 3;

/// Writes notes and tables as plain text; charts are summarized by their
/// data instead of being rasterized.
pub struct TextReporter<W> {
    out: W,
}

impl<W: Write> TextReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Reporter for TextReporter<W> {
    fn present(&mut self, report: &ExplorationReport) -> Result<()> {
        writeln!(
            self.out,
            "{} ({}, {} entries)",
            report.variable_name(),
            report.kind.display_name(),
            report.row_count
        )?;
        writeln!(self.out, "Notes")?;
        for note in &report.notes {
            writeln!(self.out, "- {note}")?;
        }

        for block in &report.blocks {
            writeln!(self.out)?;
            match block {
                ReportBlock::Table(table) => {
                    writeln!(self.out, "{}", table.headers.join(" | "))?;
                    for row in &table.rows {
                        writeln!(self.out, "{}", row.join(" | "))?;
                    }
                    if let Some(limit) = table.truncated_to {
                        writeln!(self.out, "(truncated to {limit} rows)")?;
                    }
                }
                ReportBlock::Chart(ChartSpec::Pie(pie)) => {
                    for slice in &pie.slices {
                        writeln!(
                            self.out,
                            "{}: {} {}",
                            slice.label,
                            slice.count,
                            slice.percent_label()
                        )?;
                    }
                }
                ReportBlock::Chart(ChartSpec::Bar(bar)) => {
                    writeln!(self.out, "category | {}", bar.y_label)?;
                    for b in &bar.bars {
                        writeln!(self.out, "{} | {}", b.label, b.count)?;
                    }
                }
                ReportBlock::Chart(ChartSpec::BoxPlot(plot)) => {
                    let s = &plot.stats;
                    let fmt = |v: f64| format_rounded(v, TEXT_DECIMAL_PLACES);
                    writeln!(
                        self.out,
                        "box plot {}: whiskers [{}, {}], quartiles [{}, {}], median {}, {} outliers",
                        plot.title,
                        fmt(s.lower_whisker),
                        fmt(s.upper_whisker),
                        fmt(s.q1),
                        fmt(s.q3),
                        fmt(s.median),
                        s.outliers.len()
                    )?;
                }
            }
        }
        self.out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::ColumnExplorer;
    use crate::column::{Column, Value};

    fn boolean_report() -> ExplorationReport {
        ColumnExplorer::default().explore_boolean(&Column::new(vec![
            Value::Bool(true),
            Value::from("<b>"),
            Value::Int(0),
        ]))
    }

    #[test]
    fn test_grid_layout() {
        let reporter = HtmlGridReporter::new(PngChartRenderer::default());
        let html = reporter.render(&boolean_report()).unwrap();

        assert!(html.starts_with(GRID_OPEN));
        assert!(html.ends_with("</div>"));
        assert_eq!(html.matches("<table border=\"0\"").count(), 2);
        assert_eq!(html.matches("<img src='data:image/png;base64,").count(), 1);
        assert!(html.contains("&lt;b&gt; (str)"));
        assert!(!html.contains("<h4>Notes</h4>"));
    }

    #[test]
    fn test_notes_cell() {
        let report =
            ColumnExplorer::default().explore_string_id(&Column::new(vec![Value::from("a")]));
        let html = HtmlGridReporter::<PngChartRenderer>::default()
            .render(&report)
            .unwrap();
        assert!(html.contains("<h4>Notes</h4>"));
        assert!(html.contains("<li style='margin: 5px 0;'>- contains only valid strings</li>"));
    }

    #[test]
    fn test_truncation_marker() {
        let table =
            Table::single_column("dups", (0..20).map(|i| i.to_string()).collect()).truncate(15);
        let html = table_html(&table);
        assert_eq!(html.matches("<td>").count(), 15);
        assert!(html.ends_with("<p style='color: grey;'>(truncated to 15 rows)</p>"));
    }

    #[test]
    fn test_present_accumulates() {
        let mut reporter = HtmlGridReporter::new(PngChartRenderer::default());
        reporter.present(&boolean_report()).unwrap();
        reporter.present(&boolean_report()).unwrap();
        assert_eq!(reporter.html().matches(GRID_OPEN).count(), 2);
    }

    #[test]
    fn test_text_reporter() {
        let mut reporter = TextReporter::new(Vec::new());
        reporter.present(&boolean_report()).unwrap();
        let text = String::from_utf8(reporter.into_inner()).unwrap();

        assert!(text.starts_with("variable (Boolean Attribute, 3 entries)\nNotes\n"));
        assert!(text.contains("faulty/unknown entries | count\n<b> (str) | 1\n"));
        assert!(text.contains("values repres. True: 1 50.0%"));
    }

    #[test]
    fn test_text_reporter_rounds_box_plot_figures() {
        let report = ColumnExplorer::default()
            .explore_numerical(&Column::new(vec![Value::Float(0.1 + 0.2), Value::Float(1.0)]));
        let mut reporter = TextReporter::new(Vec::new());
        reporter.present(&report).unwrap();
        let text = String::from_utf8(reporter.into_inner()).unwrap();

        assert!(text.contains("box plot with outliers: whiskers [0.3, 1.0]"));
        assert!(!text.contains("0.30000000000000004"));
    }
}
