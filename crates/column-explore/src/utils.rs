//! Shared utilities for column exploration.
//!
//! This module contains number formatting, value counting and the
//! boolean encoding tables used across multiple classifiers.

use crate::column::Value;
use once_cell::sync::Lazy;
use std::collections::{HashMap, HashSet};
use std::hash::Hash;

// =============================================================================
// Number Formatting Utilities
// =============================================================================

/// Format a float the way report readers expect: integral values keep one
/// decimal (`2.0`), very large or small magnitudes use an exponent
/// (`1.5e+306`, `2e-05`), non-finite values read `nan`, `inf` and `-inf`.
pub fn format_float(value: f64) -> String {
    let magnitude = value.abs();
    if value.is_nan() {
        "nan".to_string()
    } else if value.is_infinite() {
        (if value > 0.0 { "inf" } else { "-inf" }).to_string()
    } else if magnitude >= 1e16 || (magnitude != 0.0 && magnitude < 1e-4) {
        format_exponent(value)
    } else if value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}

/// Shortest exponent form with a signed, two-digit exponent.
fn format_exponent(value: f64) -> String {
    let formatted = format!("{value:e}");
    match formatted.split_once('e') {
        Some((mantissa, exponent)) => {
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exponent),
            };
            format!("{mantissa}e{sign}{digits:0>2}")
        }
        None => formatted,
    }
}

/// Round to `places` decimals. Ties go to the even digit and are judged on
/// the exact binary value, so `2.675` (stored just below) becomes `2.67`.
///
/// Non-finite values and magnitudes without fractional digits at this
/// precision are returned unchanged.
pub fn round_to(value: f64, places: u32) -> f64 {
    let factor = 10f64.powi(places as i32);
    if !(value * factor).is_finite() || value.abs() >= 2f64.powi(52) / factor {
        return value;
    }
    format!("{value:.*}", places as usize)
        .parse()
        .unwrap_or(value)
}

/// [`round_to`] followed by [`format_float`].
pub fn format_rounded(value: f64, places: u32) -> String {
    format_float(round_to(value, places))
}

/// Escape text for inclusion in HTML element content or quoted attributes.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

// =============================================================================
// Counting Utilities
// =============================================================================

/// Count occurrences of each distinct item.
///
/// Rows are ordered by descending count; equal counts keep the order in
/// which the items were first seen.
pub fn value_counts<K, I>(items: I) -> Vec<(K, usize)>
where
    K: Eq + Hash + Clone,
    I: IntoIterator<Item = K>,
{
    let mut positions: HashMap<K, usize> = HashMap::new();
    let mut counts: Vec<(K, usize)> = Vec::new();

    for item in items {
        match positions.get(&item) {
            Some(&pos) => counts[pos].1 += 1,
            None => {
                positions.insert(item.clone(), counts.len());
                counts.push((item, 1));
            }
        }
    }

    // stable: ties stay in first-seen order
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

/// Like [`value_counts`] but keyed by [`Value::key`], labelled with the
/// first-seen representation of each distinct value.
pub fn counts_by_value(values: &[&Value]) -> Vec<(String, usize)> {
    let mut first_seen: HashMap<_, &Value> = HashMap::new();
    for value in values {
        first_seen.entry(value.key()).or_insert(*value);
    }
    value_counts(values.iter().map(|v| v.key()))
        .into_iter()
        .map(|(key, count)| (first_seen[&key].to_string(), count))
        .collect()
}

/// [`value_counts`] over `"{value} ({type})"` labels.
pub fn tagged_counts(values: &[&Value]) -> Vec<(String, usize)> {
    value_counts(values.iter().map(|v| v.tagged()))
}

/// Number of distinct values (by [`Value::key`]).
pub fn distinct_count(values: &[&Value]) -> usize {
    values.iter().map(|v| v.key()).collect::<HashSet<_>>().len()
}

/// Distinct values that occur more than once, in first-seen order.
pub fn duplicated_values<'a>(values: &[&'a Value]) -> Vec<&'a Value> {
    let mut occurrences: HashMap<_, usize> = HashMap::new();
    for value in values {
        *occurrences.entry(value.key()).or_insert(0) += 1;
    }

    let mut emitted = HashSet::new();
    values
        .iter()
        .filter(|v| {
            let key = v.key();
            occurrences[&key] > 1 && emitted.insert(key)
        })
        .copied()
        .collect()
}

/// Distinct items in first-seen order.
pub fn unique_in_order<K, I>(items: I) -> Vec<K>
where
    K: Eq + Hash + Clone,
    I: IntoIterator<Item = K>,
{
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}

// =============================================================================
// Boolean Encoding Utilities
// =============================================================================

/// Text encodings recognized as true. Matching is exact (case sensitive).
pub const BOOLEAN_TRUE_TEXT: [&str; 8] = ["Yes", "yes", "Positive", "positive", "Y", "y", "T", "t"];

/// Text encodings recognized as false. Matching is exact (case sensitive).
pub const BOOLEAN_FALSE_TEXT: [&str; 8] = ["No", "no", "Negative", "negative", "N", "n", "F", "f"];

static TRUE_TEXT: Lazy<HashSet<&'static str>> =
    Lazy::new(|| BOOLEAN_TRUE_TEXT.iter().copied().collect());

static FALSE_TEXT: Lazy<HashSet<&'static str>> =
    Lazy::new(|| BOOLEAN_FALSE_TEXT.iter().copied().collect());

/// `True`, `1`, `1.0` or one of [`BOOLEAN_TRUE_TEXT`].
pub fn is_positive_encoding(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Int(v) => *v == 1,
        Value::Float(v) => *v == 1.0,
        Value::Text(s) => TRUE_TEXT.contains(s.as_str()),
        _ => false,
    }
}

/// `False`, `0`, `0.0`, a missing entry or one of [`BOOLEAN_FALSE_TEXT`].
pub fn is_negative_encoding(value: &Value) -> bool {
    match value {
        Value::Bool(b) => !*b,
        Value::Int(v) => *v == 0,
        Value::Float(v) => *v == 0.0,
        Value::Text(s) => FALSE_TEXT.contains(s.as_str()),
        Value::Missing => true,
        Value::Other { .. } => false,
    }
}

/// Check if a value is any recognized boolean encoding.
pub fn is_boolean_encoding(value: &Value) -> bool {
    is_positive_encoding(value) || is_negative_encoding(value)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_float() {
        assert_eq!(format_float(2.0), "2.0");
        assert_eq!(format_float(2.167), "2.167");
        assert_eq!(format_float(-0.5), "-0.5");
        assert_eq!(format_float(f64::NAN), "nan");
        assert_eq!(format_float(f64::NEG_INFINITY), "-inf");
        assert_eq!(format_float(1e16), "1e+16");
        assert_eq!(format_float(-1.5e306), "-1.5e+306");
        assert_eq!(format_float(0.00002), "2e-05");
        assert_eq!(format_float(0.0), "0.0");
    }

    #[test]
    fn test_round_to() {
        assert_eq!(format_rounded(6.5 / 3.0, 3), "2.167");
        assert_eq!(format_rounded(1.23456, 3), "1.235");
        assert_eq!(format_rounded(10.0, 3), "10.0");
    }

    #[test]
    fn test_round_to_ties_to_even() {
        assert_eq!(round_to(2.0625, 3), 2.062);
        assert_eq!(round_to(0.125, 2), 0.12);
        assert_eq!(round_to(0.375, 2), 0.38);
        assert_eq!(round_to(2.675, 2), 2.67);
        assert_eq!(round_to(-2.5, 0), -2.0);
    }

    #[test]
    fn test_round_to_keeps_huge_values_finite() {
        assert_eq!(round_to(1.5e306, 3), 1.5e306);
        assert_eq!(round_to(f64::MAX, 10), f64::MAX);
        assert_eq!(round_to(1e300, 0), 1e300);
        assert_eq!(format_rounded(2.5e306, 3), "2.5e+306");
        assert!(round_to(f64::NAN, 3).is_nan());
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("<a href='x'>&</a>"), "&lt;a href=&#39;x&#39;&gt;&amp;&lt;/a&gt;");
    }

    #[test]
    fn test_value_counts_orders_by_count_then_first_seen() {
        let counts = value_counts(["b", "a", "c", "a", "c", "d"]);
        assert_eq!(counts, vec![("a", 2), ("c", 2), ("b", 1), ("d", 1)]);
    }

    #[test]
    fn test_counts_by_value_collapses_integral_numbers() {
        let values = [Value::Int(1), Value::Float(1.0), Value::Float(2.5)];
        let refs: Vec<&Value> = values.iter().collect();
        assert_eq!(
            counts_by_value(&refs),
            vec![("1".to_string(), 2), ("2.5".to_string(), 1)]
        );
    }

    #[test]
    fn test_duplicated_values_first_seen_order() {
        let values = [
            Value::from("c"),
            Value::from("a"),
            Value::from("c"),
            Value::from("b"),
            Value::from("a"),
            Value::from("a"),
        ];
        let refs: Vec<&Value> = values.iter().collect();
        let dups = duplicated_values(&refs);
        assert_eq!(dups, vec![&Value::from("c"), &Value::from("a")]);
        assert_eq!(distinct_count(&refs), 3);
    }

    #[test]
    fn test_unique_in_order() {
        assert_eq!(unique_in_order([2, 1, 2, 3, 1]), vec![2, 1, 3]);
    }

    #[test]
    fn test_boolean_encodings() {
        assert!(is_positive_encoding(&Value::Bool(true)));
        assert!(is_positive_encoding(&Value::Float(1.0)));
        assert!(is_positive_encoding(&Value::from("T")));
        assert!(is_negative_encoding(&Value::Missing));
        assert!(is_negative_encoding(&Value::Int(0)));
        assert!(!is_boolean_encoding(&Value::from("YES")));
        assert!(!is_boolean_encoding(&Value::Int(2)));
        assert!(!is_boolean_encoding(&Value::Float(f64::NAN)));
    }

    #[test]
    fn test_encodings_are_disjoint() {
        for text in BOOLEAN_TRUE_TEXT {
            assert!(!is_negative_encoding(&Value::from(text)));
        }
        for text in BOOLEAN_FALSE_TEXT {
            assert!(!is_positive_encoding(&Value::from(text)));
        }
    }
}
