//! Configuration types for column exploration.
//!
//! This module provides the exploration settings and the chart style using
//! the builder pattern. The style is passed explicitly to every chart
//! renderer instead of living in process-wide state.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Directory report files go to unless configured otherwise.
pub const DEFAULT_OUTPUT_DIR: &str = "./outputs";

/// An RGB color.
pub type Rgb = [u8; 3];

/// Visual styling shared by all charts produced by one explorer.
///
/// Sizes are in pixels. The defaults follow a ggplot-like look: a light
/// grey panel with a muted color cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartStyle {
    /// Edge length of the square pie chart canvas.
    pub pie_size: u32,
    /// Width of the bar chart canvas.
    pub bar_width: u32,
    /// Height of the bar chart canvas.
    pub bar_height: u32,
    /// Width of each box plot canvas.
    pub box_width: u32,
    /// Height of each box plot canvas.
    pub box_height: u32,
    /// Color cycle for slices and bars.
    pub palette: Vec<Rgb>,
    /// Plot panel background.
    pub background: Rgb,
    /// Axes, outlines and annotation text.
    pub foreground: Rgb,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            pie_size: 350,
            bar_width: 800,
            bar_height: 600,
            box_width: 275,
            box_height: 350,
            palette: vec![
                [0xE2, 0x4A, 0x33],
                [0x34, 0x8A, 0xBD],
                [0x98, 0x8E, 0xD5],
                [0x77, 0x77, 0x77],
                [0xFB, 0xC1, 0x5E],
                [0x8E, 0xBA, 0x42],
                [0xFF, 0xB5, 0xB8],
            ],
            background: [0xE5, 0xE5, 0xE5],
            foreground: [0x33, 0x33, 0x33],
        }
    }
}

impl ChartStyle {
    /// Palette color for the `index`-th series, cycling.
    pub fn color(&self, index: usize) -> Rgb {
        if self.palette.is_empty() {
            return self.foreground;
        }
        self.palette[index % self.palette.len()]
    }
}

/// Configuration for column exploration.
///
/// Use [`ExploreConfig::builder()`] to create a new configuration
/// with fluent API.
///
/// # Example
///
/// ```rust,ignore
/// use column_explore::config::ExploreConfig;
///
/// let config = ExploreConfig::builder()
///     .duplicate_display_limit(20)
///     .output_dir("reports")
///     .build()?;
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExploreConfig {
    /// Maximum number of duplicated values listed in a duplicates table.
    /// Default: 15
    pub duplicate_display_limit: usize,

    /// Decimal places used when statistics are rendered into notes.
    /// Default: 3
    pub decimal_places: u32,

    /// Styling applied to every chart.
    pub chart_style: ChartStyle,

    /// Output directory for generated report files.
    /// Default: "./outputs"
    pub output_dir: PathBuf,

    /// Custom report file name (without extension).
    /// If None, the column name is used.
    /// Default: None
    pub output_name: Option<String>,
}

impl Default for ExploreConfig {
    fn default() -> Self {
        Self {
            duplicate_display_limit: 15,
            decimal_places: 3,
            chart_style: ChartStyle::default(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            output_name: None,
        }
    }
}

impl ExploreConfig {
    /// Create a new configuration builder.
    pub fn builder() -> ExploreConfigBuilder {
        ExploreConfigBuilder::default()
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.duplicate_display_limit == 0 {
            return Err(ConfigValidationError::InvalidDisplayLimit(
                self.duplicate_display_limit,
            ));
        }

        if self.decimal_places > 10 {
            return Err(ConfigValidationError::InvalidDecimalPlaces(
                self.decimal_places,
            ));
        }

        let style = &self.chart_style;
        let dimensions = [
            ("pie_size", style.pie_size),
            ("bar_width", style.bar_width),
            ("bar_height", style.bar_height),
            ("box_width", style.box_width),
            ("box_height", style.box_height),
        ];
        if let Some((field, _)) = dimensions.iter().find(|(_, value)| *value == 0) {
            return Err(ConfigValidationError::ZeroDimension(field.to_string()));
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid duplicate display limit: {0} (must be at least 1)")]
    InvalidDisplayLimit(usize),

    #[error("Invalid decimal places: {0} (must be at most 10)")]
    InvalidDecimalPlaces(u32),

    #[error("Chart dimension '{0}' must be greater than zero")]
    ZeroDimension(String),
}

/// Builder for [`ExploreConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct ExploreConfigBuilder {
    duplicate_display_limit: Option<usize>,
    decimal_places: Option<u32>,
    chart_style: Option<ChartStyle>,
    output_dir: Option<PathBuf>,
    output_name: Option<String>,
}

impl ExploreConfigBuilder {
    /// Set how many duplicated values are listed before the table is truncated.
    pub fn duplicate_display_limit(mut self, limit: usize) -> Self {
        self.duplicate_display_limit = Some(limit);
        self
    }

    /// Set the rounding applied to statistics notes.
    pub fn decimal_places(mut self, places: u32) -> Self {
        self.decimal_places = Some(places);
        self
    }

    /// Set the chart style.
    pub fn chart_style(mut self, style: ChartStyle) -> Self {
        self.chart_style = Some(style);
        self
    }

    /// Set the output directory for report files.
    pub fn output_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(path.into());
        self
    }

    /// Set a custom report file name (without extension).
    pub fn output_name(mut self, name: impl Into<String>) -> Self {
        self.output_name = Some(name.into());
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `ExploreConfig` or an error if validation fails.
    pub fn build(self) -> Result<ExploreConfig, ConfigValidationError> {
        let config = ExploreConfig {
            duplicate_display_limit: self.duplicate_display_limit.unwrap_or(15),
            decimal_places: self.decimal_places.unwrap_or(3),
            chart_style: self.chart_style.unwrap_or_default(),
            output_dir: self.output_dir.unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR)),
            output_name: self.output_name,
        };

        config.validate()?;
        Ok(config)
    }
}
