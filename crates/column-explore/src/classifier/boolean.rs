//! Exploration of columns encoding booleans.

use super::{notes, titles};
use crate::column::Column;
use crate::config::ExploreConfig;
use crate::types::{ChartSpec, ExplorationReport, PieChart, Table};
use crate::utils::{is_boolean_encoding, is_positive_encoding, tagged_counts};
use tracing::debug;

pub(crate) const FALSE_LABEL: &str = "values repres. False";
pub(crate) const TRUE_LABEL: &str = "values repres. True";

/// Reports unknown encodings, counts every recognized representation and
/// shows the share of entries meaning true and false.
pub(super) fn explore(column: &Column, _config: &ExploreConfig, report: &mut ExplorationReport) {
    let partition = column.partition(is_boolean_encoding);

    if partition.has_invalid() {
        report.add_block(Table::value_counts(
            titles::FAULTY_BOOLEANS,
            tagged_counts(&partition.invalid),
        ));
    } else {
        report.add_note(notes::ONLY_BOOLEANS);
    }

    report.add_block(Table::value_counts(
        titles::BOOLEAN_REPRESENTATIONS,
        tagged_counts(&partition.valid),
    ));

    let positives = partition
        .valid
        .iter()
        .filter(|v| is_positive_encoding(v))
        .count();
    debug!(
        "{} true and {} false representations, {} unknown entries",
        positives,
        partition.valid.len() - positives,
        partition.invalid.len()
    );

    report.add_block(ChartSpec::Pie(PieChart::bicategorical(
        partition.valid.len(),
        positives,
        FALSE_LABEL,
        TRUE_LABEL,
    )));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::ColumnExplorer;
    use crate::column::Value;
    use pretty_assertions::assert_eq;

    fn explore_values(values: Vec<Value>) -> ExplorationReport {
        ColumnExplorer::default().explore_boolean(&Column::new(values))
    }

    fn pie(report: &ExplorationReport) -> &PieChart {
        report
            .charts()
            .find_map(|chart| match chart {
                ChartSpec::Pie(pie) => Some(pie),
                _ => None,
            })
            .expect("boolean report has a pie chart")
    }

    #[test]
    fn test_mixed_boolean_column() {
        let report = explore_values(vec![
            Value::Bool(true),
            Value::from("yes"),
            Value::Int(0),
            Value::Missing,
            Value::from("bogus"),
        ]);

        let faulty = report.table(titles::FAULTY_BOOLEANS).unwrap();
        assert_eq!(
            faulty.rows,
            vec![vec!["bogus (str)".to_string(), "1".to_string()]]
        );

        let representations = report.table(titles::BOOLEAN_REPRESENTATIONS).unwrap();
        assert_eq!(
            representations.column(0),
            vec!["True (bool)", "yes (str)", "0 (int)", "None (NoneType)"]
        );

        let pie = pie(&report);
        assert_eq!(pie.slices[0].label, FALSE_LABEL);
        assert_eq!(pie.slices[0].count, 2);
        assert_eq!(pie.slices[1].count, 2);
        assert_eq!(pie.slices[0].percent_label(), "50.0%");
        assert_eq!(pie.slices[1].percent_label(), "50.0%");
        assert!(report.notes.is_empty());
    }

    #[test]
    fn test_only_boolean_representations() {
        let report = explore_values(vec![
            Value::from("Y"),
            Value::from("n"),
            Value::from("Y"),
            Value::Float(1.0),
        ]);

        assert_eq!(report.notes, vec![notes::ONLY_BOOLEANS.to_string()]);
        assert!(report.table(titles::FAULTY_BOOLEANS).is_none());

        let representations = report.table(titles::BOOLEAN_REPRESENTATIONS).unwrap();
        assert_eq!(representations.rows[0], vec!["Y (str)".to_string(), "2".to_string()]);

        let pie = pie(&report);
        assert_eq!(pie.slices[1].count, 3);
        assert_eq!(pie.slices[0].percent_label(), "25.0%");
        assert_eq!(pie.slices[1].percent_label(), "75.0%");
    }

    #[test]
    fn test_matching_is_case_sensitive() {
        let report = explore_values(vec![Value::from("YES"), Value::from("True")]);
        let faulty = report.table(titles::FAULTY_BOOLEANS).unwrap();
        assert_eq!(faulty.rows.len(), 2);
    }

    #[test]
    fn test_percentages_sum_to_hundred() {
        let report = explore_values(vec![
            Value::Bool(true),
            Value::Bool(false),
            Value::Bool(false),
        ]);
        let total: f64 = pie(&report).slices.iter().map(|s| s.percentage).sum();
        assert!((total - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_no_valid_entries_yields_empty_pie() {
        let report = explore_values(vec![Value::from("maybe")]);
        let pie = pie(&report);
        assert_eq!(pie.total(), 0);
        assert!(pie.slices.iter().all(|s| s.percent_label().is_empty()));
    }
}
