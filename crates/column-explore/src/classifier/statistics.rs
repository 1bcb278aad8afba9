//! Statistical helpers for the numerical explorations.
//!
//! Inputs are finite values; callers filter NaN and infinities first.

use crate::types::{BoxPlotStats, SummaryStatistics};

/// Sort a copy of `values` ascending. NaNs must already be filtered out.
fn sorted(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    sorted
}

/// Arithmetic mean, `None` for an empty slice.
pub fn calculate_mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let n = values.len() as f64;
    let sum = values.iter().sum::<f64>();
    if sum.is_finite() {
        Some(sum / n)
    } else {
        // the sum overflowed; average pre-divided terms instead
        Some(values.iter().map(|v| v / n).sum())
    }
}

/// Sample standard deviation (divides by `n - 1`); `None` below two values.
pub fn calculate_std(values: &[f64]) -> Option<f64> {
    let n = values.len();
    if n < 2 {
        return None;
    }
    let mean = calculate_mean(values)?;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
    if variance.is_finite() {
        return Some(variance.sqrt());
    }

    // squares overflowed; scale deviations by the largest one
    let scale = values.iter().map(|v| (v - mean).abs()).fold(0.0, f64::max);
    let scaled = values
        .iter()
        .map(|v| ((v - mean) / scale).powi(2))
        .sum::<f64>()
        / (n - 1) as f64;
    Some(scale * scaled.sqrt())
}

/// Quantile `q` (0..=1) of ascending `sorted` data with linear interpolation
/// between closest ranks.
pub fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let weight = pos - lower as f64;
    let (a, b) = (sorted[lower], sorted[upper]);
    let interpolated = a + (b - a) * weight;
    if interpolated.is_finite() {
        Some(interpolated)
    } else {
        Some(a * (1.0 - weight) + b * weight)
    }
}

/// Summary statistics of finite values, `None` when there are none.
pub fn summarize(values: &[f64]) -> Option<SummaryStatistics> {
    let sorted = sorted(values);
    let min = *sorted.first()?;
    let max = *sorted.last()?;
    Some(SummaryStatistics {
        count: sorted.len(),
        min,
        max,
        mean: calculate_mean(&sorted)?,
        median: quantile(&sorted, 0.5)?,
        std_dev: calculate_std(&sorted),
    })
}

/// Box plot geometry using the IQR rule: whiskers reach the most extreme
/// values within 1.5 * IQR of the box, anything further is an outlier.
pub fn box_plot_stats(values: &[f64]) -> Option<BoxPlotStats> {
    let sorted = sorted(values);
    let q1 = quantile(&sorted, 0.25)?;
    let median = quantile(&sorted, 0.5)?;
    let q3 = quantile(&sorted, 0.75)?;
    let iqr = q3 - q1;

    let lower_bound = q1 - 1.5 * iqr;
    let upper_bound = q3 + 1.5 * iqr;

    let inside = || sorted.iter().copied().filter(|v| (lower_bound..=upper_bound).contains(v));
    let lower_whisker = inside().next().unwrap_or(q1);
    let upper_whisker = inside().last().unwrap_or(q3);

    let outliers = sorted
        .iter()
        .copied()
        .filter(|v| *v < lower_bound || *v > upper_bound)
        .collect();

    Some(BoxPlotStats {
        q1,
        median,
        q3,
        lower_whisker,
        upper_whisker,
        outliers,
    })
}
