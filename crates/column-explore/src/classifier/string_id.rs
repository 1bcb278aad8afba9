//! Exploration of textual primary/foreign key columns.

use super::{duplicates_table, notes, titles};
use crate::column::{Column, Value};
use crate::config::ExploreConfig;
use crate::types::{ExplorationReport, Table};
use crate::utils::{counts_by_value, unique_in_order};
use tracing::debug;

/// Checks for non-strings, lists the occurring string lengths and looks for
/// duplicated strings.
pub(super) fn explore(column: &Column, config: &ExploreConfig, report: &mut ExplorationReport) {
    let partition = column.partition(Value::is_text);
    debug!(
        "{} strings, {} non-strings",
        partition.valid.len(),
        partition.invalid.len()
    );

    if partition.has_invalid() {
        report.add_block(Table::value_counts(
            titles::NON_STRINGS,
            counts_by_value(&partition.invalid),
        ));
    } else {
        report.add_note(notes::ONLY_VALID_STRINGS);
    }

    let lengths = unique_in_order(partition.valid.iter().filter_map(|v| match v {
        Value::Text(s) => Some(s.chars().count()),
        _ => None,
    }));
    report.add_block(Table::single_column(
        titles::STRING_LENGTHS,
        lengths.into_iter().map(|len| len.to_string()).collect(),
    ));

    match duplicates_table(
        titles::STRING_DUPLICATES,
        &partition.valid,
        config.duplicate_display_limit,
    ) {
        Some(table) => report.add_block(table),
        None => report.add_note(notes::NO_STRING_DUPLICATES),
    }
}
