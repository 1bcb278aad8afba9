//! Exploration of numeric primary/foreign key columns.

use super::{duplicates_table, notes, titles};
use crate::column::{Column, Value};
use crate::config::ExploreConfig;
use crate::types::{ExplorationReport, Table};
use crate::utils::tagged_counts;
use tracing::debug;

/// Checks for non-numbers, whether the numbers can be cast to integers and
/// whether any number occurs more than once.
pub(super) fn explore(column: &Column, config: &ExploreConfig, report: &mut ExplorationReport) {
    let partition = column.partition(Value::is_valid_number);
    debug!(
        "{} valid numbers, {} non-numbers",
        partition.valid.len(),
        partition.invalid.len()
    );

    if partition.has_invalid() {
        report.add_block(Table::value_counts(
            titles::NON_NUMBERS,
            tagged_counts(&partition.invalid),
        ));
    } else {
        report.add_note(notes::ONLY_VALID_NUMBERS);
    }

    if partition.valid.iter().all(|v| v.is_integral()) {
        report.add_note(notes::SAFE_INT_CAST);
    }

    match duplicates_table(
        titles::NUMERIC_DUPLICATES,
        &partition.valid,
        config.duplicate_display_limit,
    ) {
        Some(table) => report.add_block(table),
        None => report.add_note(notes::NO_NUMERIC_DUPLICATES),
    }
}
