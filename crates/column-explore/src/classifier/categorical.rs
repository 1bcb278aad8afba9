//! Exploration of categorical columns.

use crate::column::{Column, Value};
use crate::config::ExploreConfig;
use crate::types::{Bar, BarChart, ChartSpec, ExplorationReport};
use crate::utils::counts_by_value;
use tracing::debug;

/// Counts every category, missing entries included, and charts the counts.
pub(super) fn explore(column: &Column, _config: &ExploreConfig, report: &mut ExplorationReport) {
    let values: Vec<&Value> = column.values().iter().collect();
    let bars: Vec<Bar> = counts_by_value(&values)
        .into_iter()
        .map(|(label, count)| Bar { label, count })
        .collect();
    debug!("{} distinct categories", bars.len());

    report.add_block(ChartSpec::Bar(BarChart {
        bars,
        y_label: "Count".to_string(),
    }));
}
