//! Column classification module.
//!
//! This module provides one exploration flow per [`ColumnKind`]:
//! - Numerical identifiers: non-numbers, integer safety, duplicates
//! - String identifiers: non-strings, occurring lengths, duplicates
//! - Boolean attributes: unknown encodings, representation counts, true/false share
//! - Categorical attributes: category frequencies
//! - Numerical attributes: number types, descriptive statistics, box plots
//!
//! Every flow partitions the column into a valid and an invalid subset and
//! records its findings as notes and blocks of an [`ExplorationReport`].

mod boolean;
mod categorical;
mod numerical;
mod numerical_id;
pub mod statistics;
mod string_id;

use crate::column::{Column, Value};
use crate::config::ExploreConfig;
use crate::types::{ColumnKind, ExplorationReport, Table};
use crate::utils::{distinct_count, duplicated_values};
use tracing::debug;

/// Note texts emitted by the explorations.
pub mod notes {
    pub const EMPTY_COLUMN: &str = "column is empty";
    pub const ONLY_VALID_NUMBERS: &str = "contains only valid numbers";
    pub const SAFE_INT_CAST: &str = "number entries can be savely casted to int";
    pub const NO_NUMERIC_DUPLICATES: &str = "numerical entries contain no duplicates";
    pub const ONLY_VALID_STRINGS: &str = "contains only valid strings";
    pub const NO_STRING_DUPLICATES: &str = "valid entries contain no duplicates";
    pub const ONLY_BOOLEANS: &str = "contains only boolean representations";
    pub const ONLY_INTS: &str = "column contains only ints";
    pub const VALID_ONLY_INTS: &str = "valid number entries contain only ints";
    pub const VALID_ONLY_FLOATS: &str = "valid number entries contain only floats";
    pub const VALID_INTS_AND_FLOATS: &str = "valid number entries contain ints and floats";
    pub const NO_VALID_NUMBERS: &str = "no valid numbers, statistics are undefined";
}

/// Table titles used by the explorations.
pub mod titles {
    pub const NON_NUMBERS: &str = "contained non-numbers";
    pub const NUMERIC_DUPLICATES: &str = "contained duplicates";
    pub const NON_STRINGS: &str = "contained non-strings";
    pub const STRING_LENGTHS: &str = "occurring string lengths";
    pub const STRING_DUPLICATES: &str = "entries with duplicates";
    pub const FAULTY_BOOLEANS: &str = "faulty/unknown entries";
    pub const BOOLEAN_REPRESENTATIONS: &str = "contained boolean representations";
}

/// Runs explorations of single columns.
///
/// # Example
///
/// ```rust,ignore
/// use column_explore::{Column, ColumnExplorer, Value};
///
/// let column = Column::new(vec![Value::Int(1), Value::Int(2), Value::Int(2)]);
/// let report = ColumnExplorer::default().explore_numerical_id(&column);
/// assert!(report.has_note("contains only valid numbers"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ColumnExplorer {
    config: ExploreConfig,
}

static_assertions::assert_impl_all!(ColumnExplorer: Send, Sync);

impl ColumnExplorer {
    /// Create an explorer with the given configuration.
    pub fn new(config: ExploreConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExploreConfig {
        &self.config
    }

    /// Run the exploration matching `kind`.
    pub fn explore(&self, kind: ColumnKind, column: &Column) -> ExplorationReport {
        match kind {
            ColumnKind::NumericalId => self.explore_numerical_id(column),
            ColumnKind::StringId => self.explore_string_id(column),
            ColumnKind::Boolean => self.explore_boolean(column),
            ColumnKind::Categorical => self.explore_categorical(column),
            ColumnKind::Numerical => self.explore_numerical(column),
        }
    }

    /// Explore a column of numeric primary or foreign keys.
    pub fn explore_numerical_id(&self, column: &Column) -> ExplorationReport {
        self.run(ColumnKind::NumericalId, column, numerical_id::explore)
    }

    /// Explore a column of textual primary or foreign keys.
    pub fn explore_string_id(&self, column: &Column) -> ExplorationReport {
        self.run(ColumnKind::StringId, column, string_id::explore)
    }

    /// Explore a column whose entries encode booleans.
    pub fn explore_boolean(&self, column: &Column) -> ExplorationReport {
        self.run(ColumnKind::Boolean, column, boolean::explore)
    }

    /// Explore a column of categories.
    pub fn explore_categorical(&self, column: &Column) -> ExplorationReport {
        self.run(ColumnKind::Categorical, column, categorical::explore)
    }

    /// Explore a column of numeric measurements.
    pub fn explore_numerical(&self, column: &Column) -> ExplorationReport {
        self.run(ColumnKind::Numerical, column, numerical::explore)
    }

    fn run(
        &self,
        kind: ColumnKind,
        column: &Column,
        flow: fn(&Column, &ExploreConfig, &mut ExplorationReport),
    ) -> ExplorationReport {
        let mut report = ExplorationReport::new(kind, column);
        debug!(
            "Exploring {} column '{}' with {} entries",
            kind.display_name(),
            report.variable_name(),
            column.len()
        );

        if column.is_empty() {
            report.add_note(notes::EMPTY_COLUMN);
            return report;
        }

        flow(column, &self.config, &mut report);

        debug!(
            "Exploration produced {} notes and {} blocks",
            report.notes.len(),
            report.blocks.len()
        );
        report
    }
}

/// Duplicated values of `valid` as a one-column table, or `None` when all
/// valid values are distinct.
fn duplicates_table(title: &str, valid: &[&Value], limit: usize) -> Option<Table> {
    if distinct_count(valid) == valid.len() {
        return None;
    }
    let duplicates = duplicated_values(valid)
        .into_iter()
        .map(ToString::to_string)
        .collect();
    Some(Table::single_column(title, duplicates).truncate(limit))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(values: &[&str]) -> Vec<Value> {
        values.iter().map(|v| Value::from(*v)).collect()
    }

    #[test]
    fn test_empty_column_short_circuits_every_kind() {
        let explorer = ColumnExplorer::default();
        for kind in ColumnKind::ALL {
            let report = explorer.explore(kind, &Column::default());
            assert_eq!(report.notes, vec![notes::EMPTY_COLUMN.to_string()]);
            assert!(report.blocks.is_empty());
            assert_eq!(report.kind, kind);
        }
    }

    #[test]
    fn test_duplicates_table_none_when_distinct() {
        let values = texts(&["a", "b", "c"]);
        let refs: Vec<&Value> = values.iter().collect();
        assert!(duplicates_table("dups", &refs, 15).is_none());
    }

    #[test]
    fn test_duplicates_table_truncates() {
        let values: Vec<Value> = (0..40).map(|i| Value::Int(i % 20)).collect();
        let refs: Vec<&Value> = values.iter().collect();
        let table = duplicates_table("dups", &refs, 15).unwrap();
        assert_eq!(table.rows.len(), 15);
        assert_eq!(table.truncated_to, Some(15));
        assert_eq!(table.column(0)[..3], ["0", "1", "2"]);
    }

    #[test]
    fn test_duplicates_table_exactly_at_limit_is_not_truncated() {
        let values: Vec<Value> = (0..30).map(|i| Value::Int(i % 15)).collect();
        let refs: Vec<&Value> = values.iter().collect();
        let table = duplicates_table("dups", &refs, 15).unwrap();
        assert_eq!(table.rows.len(), 15);
        assert!(!table.is_truncated());
    }

    #[test]
    fn test_configured_display_limit() {
        let config = ExploreConfig::builder()
            .duplicate_display_limit(2)
            .build()
            .unwrap();
        let column = Column::new(texts(&["a", "a", "b", "b", "c", "c"]));
        let report = ColumnExplorer::new(config).explore_string_id(&column);
        let table = report.table(titles::STRING_DUPLICATES).unwrap();
        assert_eq!(table.column(0), vec!["a", "b"]);
        assert_eq!(table.truncated_to, Some(2));
    }
}
