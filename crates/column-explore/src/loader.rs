//! CSV loading.
//!
//! Files are read with polars, trying progressively more lenient strategies.
//! In [`LoadMode::Raw`] every cell is read as text and parsed per cell with
//! [`Value::parse_cell`](crate::column::Value::parse_cell), so a column can
//! keep a mix of numbers, booleans and strings. [`LoadMode::Typed`] lets
//! polars infer one dtype per column.

use crate::column::Column;
use crate::error::{ExploreError, Result, ResultExt};
use polars::io::csv::read::{CsvParseOptions, CsvReadOptions};
use polars::prelude::*;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// How cell types are determined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoadMode {
    /// Read all cells as text and parse each one individually.
    #[default]
    Raw,
    /// Let polars infer a dtype per column from the first 100 rows.
    Typed,
}

impl LoadMode {
    fn infer_schema_length(self) -> Option<usize> {
        match self {
            LoadMode::Raw => Some(0),
            LoadMode::Typed => Some(100),
        }
    }
}

/// Load a CSV file, falling back to less strict parsing when needed.
pub fn load_csv(path: &Path, mode: LoadMode) -> Result<DataFrame> {
    // Strategy 1: Standard loading with quote handling
    match CsvReadOptions::default()
        .with_infer_schema_length(mode.infer_schema_length())
        .with_has_header(true)
        .with_parse_options(CsvParseOptions::default().with_quote_char(Some(b'"')))
        .try_into_reader_with_file_path(Some(PathBuf::from(path)))
        .context(format!("Failed to open {}", path.display()))?
        .finish()
    {
        Ok(df) => return Ok(df),
        Err(e) => {
            debug!("Standard loading failed: {}", e);
        }
    }

    // Strategy 2: Without quote handling
    match CsvReadOptions::default()
        .with_infer_schema_length(mode.infer_schema_length())
        .with_has_header(true)
        .with_parse_options(CsvParseOptions::default().with_quote_char(None))
        .try_into_reader_with_file_path(Some(PathBuf::from(path)))?
        .finish()
    {
        Ok(df) => return Ok(df),
        Err(e) => {
            debug!("Loading without quotes failed: {}", e);
        }
    }

    // Strategy 3: Pre-clean content
    warn!("Retrying {} with cleaned content", path.display());
    let content =
        std::fs::read_to_string(path).context(format!("Could not read {}", path.display()))?;
    let cleaned = clean_csv_content(&content);
    CsvReadOptions::default()
        .with_infer_schema_length(mode.infer_schema_length())
        .with_has_header(true)
        .into_reader_with_file_handle(Cursor::new(cleaned))
        .finish()
        .context(format!("Failed to parse {}", path.display()))
}

/// Collapse doubled quotes and drop blank lines.
fn clean_csv_content(content: &str) -> String {
    content
        .replace("\"\"\"", "\"")
        .replace("\"\"", "\"")
        .lines()
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Extract the column `name` from a frame.
pub fn column_from_frame(df: &DataFrame, name: &str, mode: LoadMode) -> Result<Column> {
    if df.get_column_index(name).is_none() {
        let available = df
            .get_column_names()
            .iter()
            .map(|n| n.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        return Err(ExploreError::ColumnNotFound {
            name: name.to_string(),
            available,
        });
    }

    let series = df.column(name)?.as_materialized_series();
    let column = match mode {
        LoadMode::Raw => Column::from_text_series(series)?,
        LoadMode::Typed => Column::from_series(series)?,
    };
    Ok(column)
}

/// Load one column of a CSV file.
pub fn load_column(path: &Path, name: &str, mode: LoadMode) -> Result<Column> {
    info!("Loading column '{}' from: {}", name, path.display());
    let df = load_csv(path, mode)?;
    debug!("Dataset loaded: {:?}", df.shape());
    column_from_frame(&df, name, mode)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::Value;
    use pretty_assertions::assert_eq;

    fn frame(csv: &str, mode: LoadMode) -> DataFrame {
        CsvReadOptions::default()
            .with_infer_schema_length(mode.infer_schema_length())
            .with_has_header(true)
            .into_reader_with_file_handle(Cursor::new(csv.to_string()))
            .finish()
            .unwrap()
    }

    #[test]
    fn test_raw_mode_parses_each_cell() {
        let df = frame("id,value\n1,3\n2,2.5\n3,\n4,abc\n5,True\n6,nan\n", LoadMode::Raw);
        let column = column_from_frame(&df, "value", LoadMode::Raw).unwrap();

        assert_eq!(column.name(), Some("value"));
        assert_eq!(
            &column.values()[..5],
            &[
                Value::Int(3),
                Value::Float(2.5),
                Value::Missing,
                Value::from("abc"),
                Value::Bool(true),
            ]
        );
        assert!(matches!(column.values()[5], Value::Float(v) if v.is_nan()));
    }

    #[test]
    fn test_typed_mode_keeps_dtype() {
        let df = frame("value\n1\n2\n", LoadMode::Typed);
        let column = column_from_frame(&df, "value", LoadMode::Typed).unwrap();
        assert_eq!(column.values()[0], Value::Int(1));
    }

    #[test]
    fn test_missing_column_lists_available() {
        let df = frame("a,b\n1,2\n", LoadMode::Raw);
        let err = column_from_frame(&df, "c", LoadMode::Raw).unwrap_err();
        assert_eq!(err.error_code(), "COLUMN_NOT_FOUND");
        assert!(err.to_string().contains("available: a, b"));
        assert!(err.is_user_error());
    }

    #[test]
    fn test_clean_csv_content() {
        assert_eq!(clean_csv_content("a,b\n\n\"\"x\"\",1\n"), "a,b\n\"x\",1");
    }
}
