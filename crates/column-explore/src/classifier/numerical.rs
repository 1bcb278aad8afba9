//! Exploration of numeric measurement columns.

use super::statistics::{box_plot_stats, summarize};
use super::{notes, titles};
use crate::column::{Column, Value};
use crate::config::ExploreConfig;
use crate::types::{BoxPlot, ChartSpec, ExplorationReport, PieChart, SummaryStatistics, Table};
use crate::utils::{format_rounded, tagged_counts};
use tracing::debug;

pub(crate) const VALID_LABEL: &str = "valid entries";
pub(crate) const INVALID_LABEL: &str = "non-valid entries";

/// Reports number types, descriptive statistics and box plots of the valid
/// numbers, followed by the share and counts of non-numbers.
pub(super) fn explore(column: &Column, config: &ExploreConfig, report: &mut ExplorationReport) {
    let partition = column.partition(Value::is_valid_number);

    if !partition.has_invalid() {
        report.add_note(notes::ONLY_VALID_NUMBERS);
    }

    if let Some(note) = type_note(column, &partition.valid) {
        report.add_note(note);
    }

    let numbers: Vec<f64> = partition.valid.iter().filter_map(|v| v.as_f64()).collect();
    match summarize(&numbers) {
        Some(stats) => {
            let int_range = integer_range(&partition.valid);
            for note in statistics_notes(&stats, int_range, config.decimal_places) {
                report.add_note(note);
            }
            add_box_plots(report, &numbers);
        }
        None => {
            debug!("No valid numbers, skipping statistics");
            report.add_note(notes::NO_VALID_NUMBERS);
        }
    }

    if partition.has_invalid() {
        report.add_block(ChartSpec::Pie(PieChart::bicategorical(
            column.len(),
            partition.invalid.len(),
            VALID_LABEL,
            INVALID_LABEL,
        )));
        report.add_block(Table::value_counts(
            titles::NON_NUMBERS,
            tagged_counts(&partition.invalid),
        ));
    }
}

/// Number-type note; the first matching rule wins.
fn type_note(column: &Column, valid: &[&Value]) -> Option<&'static str> {
    let integral_float = |v: &&Value| matches!(v, Value::Float(_)) && v.is_integral();
    let fractional_float = |v: &&Value| matches!(v, Value::Float(_)) && !v.is_integral();

    if column.values().iter().all(|v| matches!(v, Value::Int(_))) {
        Some(notes::ONLY_INTS)
    } else if valid.is_empty() {
        None
    } else if valid.iter().all(integral_float) {
        Some(notes::VALID_ONLY_INTS)
    } else if valid.iter().all(fractional_float) {
        Some(notes::VALID_ONLY_FLOATS)
    } else {
        Some(notes::VALID_INTS_AND_FLOATS)
    }
}

/// Exact bounds when every valid entry is an `Int`.
fn integer_range(valid: &[&Value]) -> Option<(i64, i64)> {
    let ints = valid
        .iter()
        .map(|v| match v {
            Value::Int(i) => Some(*i),
            _ => None,
        })
        .collect::<Option<Vec<i64>>>()?;
    Some((*ints.iter().min()?, *ints.iter().max()?))
}

fn statistics_notes(
    stats: &SummaryStatistics,
    int_range: Option<(i64, i64)>,
    places: u32,
) -> Vec<String> {
    let fmt = |v: f64| format_rounded(v, places);
    let std_dev = stats.std_dev.map_or_else(|| "undefined".to_string(), |v| fmt(v));
    // integer columns keep integer bounds
    let range = match int_range {
        Some((min, max)) => format!("[{min},{max}]"),
        None => format!("[{},{}]", fmt(stats.min), fmt(stats.max)),
    };

    vec![
        format!("mean: {}", fmt(stats.mean)),
        format!("median: {}", fmt(stats.median)),
        format!("standard deviation: {std_dev}"),
        format!("range: {range}"),
    ]
}

fn add_box_plots(report: &mut ExplorationReport, numbers: &[f64]) {
    let Some(stats) = box_plot_stats(numbers) else {
        return;
    };
    let x_label = report.variable_name().to_string();

    for (title, show_outliers) in [("with outliers", true), ("without outliers", false)] {
        report.add_block(ChartSpec::BoxPlot(BoxPlot {
            title: title.to_string(),
            x_label: x_label.clone(),
            y_label: "Values".to_string(),
            stats: stats.clone(),
            show_outliers,
        }));
    }
}
