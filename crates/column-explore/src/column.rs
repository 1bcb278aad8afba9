//! Column data model.
//!
//! A [`Column`] is an ordered sequence of loosely typed [`Value`]s. Each slot
//! carries its own runtime type, so a single column can mix integers, floats,
//! text, booleans and missing entries the way raw data usually does.

use crate::utils::format_float;
use polars::prelude::{AnyValue, PolarsResult, Series};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One observed cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Value {
    Int(i64),
    Float(f64),
    Text(String),
    Bool(bool),
    /// Missing/null entry.
    Missing,
    /// Anything else (dates, nested values) kept with its type name.
    Other { type_name: String, text: String },
}

impl Value {
    /// Runtime type tag shown next to values in report tables.
    pub fn type_name(&self) -> &str {
        match self {
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Text(_) => "str",
            Value::Bool(_) => "bool",
            Value::Missing => "NoneType",
            Value::Other { type_name, .. } => type_name,
        }
    }

    /// `"{value} ({type})"`, e.g. `"1.0 (float)"`.
    pub fn tagged(&self) -> String {
        format!("{} ({})", self, self.type_name())
    }

    /// True for integers and for floats that are neither NaN nor infinite.
    pub fn is_valid_number(&self) -> bool {
        match self {
            Value::Int(_) => true,
            Value::Float(v) => v.is_finite(),
            _ => false,
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Value::Text(_))
    }

    /// Numeric value of integers and floats.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(v) => Some(*v as f64),
            Value::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// True for integers and for finite floats without a fractional part.
    pub fn is_integral(&self) -> bool {
        match self {
            Value::Int(_) => true,
            Value::Float(v) => v.is_finite() && v.fract() == 0.0,
            _ => false,
        }
    }

    /// Equality key used for distinct-value detection.
    pub fn key(&self) -> ValueKey {
        match self {
            Value::Int(v) => ValueKey::Integral(*v),
            Value::Float(v) if v.is_nan() => ValueKey::NaN,
            Value::Float(v) if self.is_integral() && v.abs() < 9.2e18 => {
                ValueKey::Integral(*v as i64)
            }
            Value::Float(v) => ValueKey::Float(v.to_bits()),
            Value::Text(s) => ValueKey::Text(s.clone()),
            Value::Bool(b) => ValueKey::Bool(*b),
            Value::Missing => ValueKey::Missing,
            Value::Other { type_name, text } => ValueKey::Other(type_name.clone(), text.clone()),
        }
    }

    /// Interpret a raw text cell the way a loosely typed CSV reader would.
    ///
    /// Empty cells are missing, integer and float literals (including `nan`
    /// and `inf`) become numbers, `True`/`False` become booleans and
    /// everything else stays text. Surrounding whitespace is kept for text.
    pub fn parse_cell(raw: &str) -> Value {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Value::Missing;
        }
        if let Ok(v) = trimmed.parse::<i64>() {
            return Value::Int(v);
        }
        if let Ok(v) = trimmed.parse::<f64>() {
            return Value::Float(v);
        }
        match trimmed {
            "True" | "TRUE" | "true" => Value::Bool(true),
            "False" | "FALSE" | "false" => Value::Bool(false),
            _ => Value::Text(raw.to_string()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{v}"),
            Value::Float(v) => f.write_str(&format_float(*v)),
            Value::Text(s) => f.write_str(s),
            Value::Bool(true) => f.write_str("True"),
            Value::Bool(false) => f.write_str("False"),
            Value::Missing => f.write_str("None"),
            Value::Other { text, .. } => f.write_str(text),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Missing, Into::into)
    }
}

impl From<AnyValue<'_>> for Value {
    fn from(value: AnyValue<'_>) -> Self {
        match value {
            AnyValue::Null => Value::Missing,
            AnyValue::Boolean(v) => Value::Bool(v),
            AnyValue::String(s) => Value::Text(s.to_string()),
            AnyValue::StringOwned(s) => Value::Text(s.to_string()),
            AnyValue::Int8(v) => Value::Int(v.into()),
            AnyValue::Int16(v) => Value::Int(v.into()),
            AnyValue::Int32(v) => Value::Int(v.into()),
            AnyValue::Int64(v) => Value::Int(v),
            AnyValue::UInt8(v) => Value::Int(v.into()),
            AnyValue::UInt16(v) => Value::Int(v.into()),
            AnyValue::UInt32(v) => Value::Int(v.into()),
            AnyValue::UInt64(v) => i64::try_from(v)
                .map(Value::Int)
                .unwrap_or(Value::Float(v as f64)),
            AnyValue::Float32(v) => Value::Float(v.into()),
            AnyValue::Float64(v) => Value::Float(v),
            other => Value::Other {
                type_name: other.dtype().to_string(),
                text: other.to_string(),
            },
        }
    }
}

/// Hashable identity of a [`Value`].
///
/// Integral numbers share a key across `Int` and `Float` (`1 == 1.0`), all
/// NaNs share one key and booleans stay distinct from numbers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ValueKey {
    Missing,
    Bool(bool),
    Integral(i64),
    Float(u64),
    NaN,
    Text(String),
    Other(String, String),
}

/// An ordered, immutable sequence of values with an optional name.
///
/// Positions are always contiguous `0..len`; row labels of the source are
/// never carried over.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Column {
    name: Option<String>,
    values: Vec<Value>,
}

impl Column {
    /// Create an unnamed column.
    pub fn new(values: Vec<Value>) -> Self {
        Self { name: None, values }
    }

    /// Create a named column. The name is only used for chart labels.
    pub fn named(name: impl Into<String>, values: Vec<Value>) -> Self {
        Self {
            name: Some(name.into()),
            values,
        }
    }

    /// Convert a polars Series, keeping each cell's native type.
    pub fn from_series(series: &Series) -> PolarsResult<Self> {
        let mut values = Vec::with_capacity(series.len());
        for idx in 0..series.len() {
            values.push(Value::from(series.get(idx)?));
        }
        Ok(Self::named(series.name().as_str(), values))
    }

    /// Convert a polars Series of raw text cells, parsing each with
    /// [`Value::parse_cell`].
    pub fn from_text_series(series: &Series) -> PolarsResult<Self> {
        let mut values = Vec::with_capacity(series.len());
        for idx in 0..series.len() {
            let value = match series.get(idx)? {
                AnyValue::String(s) => Value::parse_cell(s),
                AnyValue::StringOwned(s) => Value::parse_cell(s.as_str()),
                other => Value::from(other),
            };
            values.push(value);
        }
        Ok(Self::named(series.name().as_str(), values))
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Split the column into values accepted and rejected by `predicate`,
    /// both in column order.
    pub fn partition<F>(&self, predicate: F) -> Partition<'_>
    where
        F: Fn(&Value) -> bool,
    {
        let (valid, invalid): (Vec<&Value>, Vec<&Value>) =
            self.values.iter().partition(|v| predicate(v));
        Partition { valid, invalid }
    }
}

impl FromIterator<Value> for Column {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Valid and invalid subsets of a column. Together they hold every value of
/// the column exactly once.
#[derive(Debug, Clone)]
pub struct Partition<'a> {
    pub valid: Vec<&'a Value>,
    pub invalid: Vec<&'a Value>,
}

impl Partition<'_> {
    pub fn has_invalid(&self) -> bool {
        !self.invalid.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::NamedFrom;

    fn mixed() -> Column {
        Column::new(vec![
            Value::Int(1),
            Value::Float(2.5),
            Value::Float(f64::NAN),
            Value::Float(f64::INFINITY),
            Value::Text("x".to_string()),
            Value::Bool(true),
            Value::Missing,
        ])
    }

    #[test]
    fn test_display_and_type_tags() {
        assert_eq!(Value::Int(3).tagged(), "3 (int)");
        assert_eq!(Value::Float(2.0).tagged(), "2.0 (float)");
        assert_eq!(Value::Float(f64::NAN).tagged(), "nan (float)");
        assert_eq!(Value::Bool(false).tagged(), "False (bool)");
        assert_eq!(Value::Missing.tagged(), "None (NoneType)");
        assert_eq!(Value::from("abc").tagged(), "abc (str)");
    }

    #[test]
    fn test_valid_number() {
        let valid: Vec<bool> = mixed().values().iter().map(Value::is_valid_number).collect();
        assert_eq!(valid, vec![true, true, false, false, false, false, false]);
    }

    #[test]
    fn test_partition_covers_column() {
        let column = mixed();
        let partition = column.partition(Value::is_valid_number);
        assert_eq!(partition.valid.len() + partition.invalid.len(), column.len());
        assert_eq!(partition.valid, vec![&Value::Int(1), &Value::Float(2.5)]);
        assert!(partition.has_invalid());
    }

    #[test]
    fn test_integral_keys_collapse() {
        assert_eq!(Value::Int(1).key(), Value::Float(1.0).key());
        assert_eq!(Value::Float(-0.0).key(), Value::Int(0).key());
        assert_ne!(Value::Int(1).key(), Value::Bool(true).key());
        assert_eq!(Value::Float(f64::NAN).key(), Value::Float(-f64::NAN).key());
        assert_ne!(Value::Float(1.5).key(), Value::Float(2.5).key());
    }

    #[test]
    fn test_parse_cell() {
        assert_eq!(Value::parse_cell(""), Value::Missing);
        assert_eq!(Value::parse_cell("  "), Value::Missing);
        assert_eq!(Value::parse_cell("42"), Value::Int(42));
        assert_eq!(Value::parse_cell("-1.5"), Value::Float(-1.5));
        assert!(matches!(Value::parse_cell("NaN"), Value::Float(v) if v.is_nan()));
        assert_eq!(Value::parse_cell("inf"), Value::Float(f64::INFINITY));
        assert_eq!(Value::parse_cell("True"), Value::Bool(true));
        assert_eq!(Value::parse_cell("yes"), Value::from("yes"));
    }

    #[test]
    fn test_option_conversion() {
        assert_eq!(Value::from(None::<i64>), Value::Missing);
        assert_eq!(Value::from(Some("a")), Value::from("a"));
    }

    #[test]
    fn test_from_series_keeps_types() {
        let series = Series::new("score".into(), &[Some(1i64), None, Some(3)]);
        let column = Column::from_series(&series).unwrap();
        assert_eq!(column.name(), Some("score"));
        assert_eq!(
            column.values(),
            &[Value::Int(1), Value::Missing, Value::Int(3)]
        );
    }

    #[test]
    fn test_from_text_series_parses_cells() {
        let series = Series::new("raw".into(), &[Some("1"), Some("2.5"), None, Some("abc")]);
        let column = Column::from_text_series(&series).unwrap();
        assert_eq!(
            column.values(),
            &[
                Value::Int(1),
                Value::Float(2.5),
                Value::Missing,
                Value::from("abc")
            ]
        );
    }
}
