//! Chart rasterization.
//!
//! [`ChartSpec`]s are pure data. A [`ChartRenderer`] turns them into encoded
//! images that a reporter can embed. [`PngChartRenderer`] draws onto an RGB
//! pixel buffer that lives only for the duration of one `render` call.
//!
//! Titles and axis labels are rendered by the reporter as captions; the
//! canvas only carries numeric annotations (counts and percentages), drawn
//! with a small built-in bitmap font.

use crate::config::{ChartStyle, Rgb};
use crate::error::{ExploreError, Result};
use crate::types::{BarChart, BoxPlot, ChartSpec, PieChart};
use crate::utils::format_rounded;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::codecs::png::PngEncoder;
use image::{ColorType, ImageEncoder};
use tracing::debug;

const WHITE: Rgb = [0xFF, 0xFF, 0xFF];

/// Turns chart descriptions into embeddable images.
pub trait ChartRenderer {
    fn render(&self, chart: &ChartSpec) -> Result<RenderedChart>;
}

/// An encoded chart image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedChart {
    pub mime_type: &'static str,
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl RenderedChart {
    /// `data:<mime>;base64,<payload>` for use as an `<img>` source.
    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, STANDARD.encode(&self.data))
    }
}

/// Rasterizes charts to PNG using a [`ChartStyle`].
#[derive(Debug, Clone, Default)]
pub struct PngChartRenderer {
    style: ChartStyle,
}

impl PngChartRenderer {
    pub fn new(style: ChartStyle) -> Self {
        Self { style }
    }

    pub fn style(&self) -> &ChartStyle {
        &self.style
    }

    /// Slices start at 9 o'clock and run counterclockwise. Each non-empty
    /// slice is annotated with its percentage.
    fn draw_pie(&self, chart: &PieChart) -> Result<Canvas> {
        let size = self.style.pie_size;
        let mut canvas = Canvas::new(size, size, WHITE)?;
        let center = f64::from(size) / 2.0;
        let radius = f64::from(size) * 0.4;

        let total = chart.total();
        if total == 0 {
            canvas.circle_outline(
                center as i64,
                center as i64,
                radius as i64,
                self.style.foreground,
            );
            return Ok(canvas);
        }

        // cumulative share at the end of each slice
        let mut bounds = Vec::with_capacity(chart.slices.len());
        let mut acc = 0.0;
        for slice in &chart.slices {
            acc += slice.count as f64 / total as f64;
            bounds.push(acc);
        }

        for y in 0..size {
            for x in 0..size {
                let dx = f64::from(x) + 0.5 - center;
                let dy = center - (f64::from(y) + 0.5);
                if dx * dx + dy * dy > radius * radius {
                    continue;
                }
                let angle = dy.atan2(dx).to_degrees();
                let share = (angle - 180.0).rem_euclid(360.0) / 360.0;
                let index = bounds.iter().position(|b| share < *b).unwrap_or(bounds.len() - 1);
                canvas.put(i64::from(x), i64::from(y), self.style.color(index));
            }
        }

        let scale = text_scale(size, 100);
        let mut start = 0.0;
        for (slice, end) in chart.slices.iter().zip(&bounds) {
            let label = slice.percent_label();
            if !label.is_empty() {
                let mid = (180.0 + (start + end) / 2.0 * 360.0_f64).to_radians();
                let x = center + 0.6 * radius * mid.cos();
                let y = center - 0.6 * radius * mid.sin();
                canvas.text_centered(x as i64, y as i64, &label, scale, self.style.foreground);
            }
            start = *end;
        }
        Ok(canvas)
    }

    /// One bar per category in a single color, each annotated with its count.
    fn draw_bar(&self, chart: &BarChart) -> Result<Canvas> {
        let (width, height) = (self.style.bar_width, self.style.bar_height);
        let mut canvas = Canvas::new(width, height, WHITE)?;
        let area = PlotArea::inset(width, height, 50, 20, 30, 30)?;
        canvas.fill_rect(area.left, area.top, area.right, area.bottom, self.style.background);

        let max_count = chart.bars.iter().map(|b| b.count).max().unwrap_or(0).max(1);
        let y_max = max_count as f64 * 1.1;
        let scale = text_scale(width, 300);

        if !chart.bars.is_empty() {
            let slot = area.width() as f64 / chart.bars.len() as f64;
            let color = self.style.color(0);
            for (i, bar) in chart.bars.iter().enumerate() {
                let center = area.left as f64 + slot * (i as f64 + 0.5);
                let half = (slot * 0.25).max(1.0);
                let top = area.y_for(bar.count as f64, 0.0, y_max);
                canvas.fill_rect(
                    (center - half) as i64,
                    top,
                    (center + half) as i64,
                    area.bottom,
                    color,
                );
                let label = bar.count.to_string();
                let label_y = top - 4 - GLYPH_HEIGHT * scale / 2;
                canvas.text_centered(center as i64, label_y, &label, scale, self.style.foreground);
            }
        }

        canvas.axes(&area, self.style.foreground);
        Ok(canvas)
    }

    /// Box from Q1 to Q3 with a median line, whiskers with caps and,
    /// when requested, outlier markers. The y axis is labelled at both ends.
    fn draw_box_plot(&self, plot: &BoxPlot) -> Result<Canvas> {
        let (width, height) = (self.style.box_width, self.style.box_height);
        let mut canvas = Canvas::new(width, height, WHITE)?;
        let area = PlotArea::inset(width, height, 45, 10, 15, 15)?;
        canvas.fill_rect(area.left, area.top, area.right, area.bottom, self.style.background);

        let stats = &plot.stats;
        let shown_outliers: &[f64] = if plot.show_outliers { &stats.outliers } else { &[] };
        let mut lo = shown_outliers.iter().copied().fold(stats.lower_whisker, f64::min);
        let mut hi = shown_outliers.iter().copied().fold(stats.upper_whisker, f64::max);
        if hi - lo < f64::EPSILON {
            lo -= 1.0;
            hi += 1.0;
        }
        let pad = (hi - lo) * 0.05;
        let (lo, hi) = (lo - pad, hi + pad);

        let fg = self.style.foreground;
        let center = (area.left + area.right) / 2;
        let half = (area.width() / 4).max(1);
        let y = |v: f64| area.y_for(v, lo, hi);

        canvas.rect_outline(center - half, y(stats.q3), center + half, y(stats.q1), fg);
        let median = y(stats.median);
        canvas.fill_rect(
            center - half,
            median - 1,
            center + half + 1,
            median + 1,
            self.style.color(0),
        );

        canvas.vline(center, y(stats.upper_whisker), y(stats.q3), fg);
        canvas.vline(center, y(stats.q1), y(stats.lower_whisker), fg);
        canvas.hline(center - half / 2, center + half / 2, y(stats.upper_whisker), fg);
        canvas.hline(center - half / 2, center + half / 2, y(stats.lower_whisker), fg);

        for outlier in shown_outliers {
            canvas.circle_outline(center, y(*outlier), 3, fg);
        }

        canvas.axes(&area, fg);
        for value in [stats.lower_whisker, stats.median, stats.upper_whisker] {
            let label = format_rounded(value, 2);
            let x = area.left - 3 - Canvas::text_width(&label, 1);
            canvas.text(x, y(value) - GLYPH_HEIGHT / 2, &label, 1, fg);
        }
        Ok(canvas)
    }
}

impl ChartRenderer for PngChartRenderer {
    fn render(&self, chart: &ChartSpec) -> Result<RenderedChart> {
        let canvas = match chart {
            ChartSpec::Pie(pie) => self.draw_pie(pie)?,
            ChartSpec::Bar(bar) => self.draw_bar(bar)?,
            ChartSpec::BoxPlot(plot) => self.draw_box_plot(plot)?,
        };
        debug!("Rasterized {}x{} chart", canvas.width, canvas.height);
        canvas.encode_png()
    }
}

fn text_scale(extent: u32, per_unit: u32) -> i64 {
    i64::from((extent / per_unit).max(1))
}

// ============================================================================
// Plot geometry
// ============================================================================

/// Pixel bounds of the data panel inside a canvas.
#[derive(Debug, Clone, Copy)]
struct PlotArea {
    left: i64,
    top: i64,
    right: i64,
    bottom: i64,
}

impl PlotArea {
    fn inset(
        width: u32,
        height: u32,
        left: u32,
        right: u32,
        top: u32,
        bottom: u32,
    ) -> Result<Self> {
        if width <= left + right || height <= top + bottom {
            return Err(ExploreError::ChartRenderingFailed(format!(
                "canvas {width}x{height} is too small for a plot panel"
            )));
        }
        Ok(Self {
            left: i64::from(left),
            top: i64::from(top),
            right: i64::from(width - right),
            bottom: i64::from(height - bottom),
        })
    }

    fn width(&self) -> i64 {
        self.right - self.left
    }

    fn height(&self) -> i64 {
        self.bottom - self.top
    }

    /// Row for `value` on a linear axis from `lo` (bottom) to `hi` (top).
    fn y_for(&self, value: f64, lo: f64, hi: f64) -> i64 {
        let t = ((value - lo) / (hi - lo)).clamp(0.0, 1.0);
        self.bottom - (t * self.height() as f64).round() as i64
    }
}

// ============================================================================
// Canvas
// ============================================================================

const GLYPH_WIDTH: i64 = 3;
const GLYPH_HEIGHT: i64 = 5;

/// 3x5 bitmap glyphs; bit 2 is the leftmost pixel of a row.
fn glyph(c: char) -> Option<[u8; 5]> {
    let rows = match c {
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b111, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b010, 0b010, 0b010],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
        '.' => [0b000, 0b000, 0b000, 0b000, 0b010],
        '%' => [0b101, 0b001, 0b010, 0b100, 0b101],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        _ => return None,
    };
    Some(rows)
}

/// RGB pixel buffer. Drawing outside the bounds is clipped.
struct Canvas {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Canvas {
    fn new(width: u32, height: u32, fill: Rgb) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(ExploreError::ChartRenderingFailed(format!(
                "canvas size {width}x{height} has a zero dimension"
            )));
        }
        let len = width as usize * height as usize * 3;
        let pixels = fill.iter().copied().cycle().take(len).collect();
        Ok(Self { width, height, pixels })
    }

    fn put(&mut self, x: i64, y: i64, color: Rgb) {
        if x < 0 || y < 0 || x >= i64::from(self.width) || y >= i64::from(self.height) {
            return;
        }
        let idx = (y as usize * self.width as usize + x as usize) * 3;
        self.pixels[idx..idx + 3].copy_from_slice(&color);
    }

    /// Fill the half-open rectangle `[x0, x1) x [y0, y1)`.
    fn fill_rect(&mut self, x0: i64, y0: i64, x1: i64, y1: i64, color: Rgb) {
        for y in y0.min(y1)..y0.max(y1) {
            for x in x0.min(x1)..x0.max(x1) {
                self.put(x, y, color);
            }
        }
    }

    fn hline(&mut self, x0: i64, x1: i64, y: i64, color: Rgb) {
        self.fill_rect(x0.min(x1), y, x0.max(x1) + 1, y + 1, color);
    }

    fn vline(&mut self, x: i64, y0: i64, y1: i64, color: Rgb) {
        self.fill_rect(x, y0.min(y1), x + 1, y0.max(y1) + 1, color);
    }

    fn rect_outline(&mut self, x0: i64, y0: i64, x1: i64, y1: i64, color: Rgb) {
        self.hline(x0, x1, y0, color);
        self.hline(x0, x1, y1, color);
        self.vline(x0, y0, y1, color);
        self.vline(x1, y0, y1, color);
    }

    fn circle_outline(&mut self, cx: i64, cy: i64, r: i64, color: Rgb) {
        let (inner, outer) = ((r - 1).pow(2), r.pow(2));
        for dy in -r..=r {
            for dx in -r..=r {
                let d = dx * dx + dy * dy;
                if d >= inner && d <= outer {
                    self.put(cx + dx, cy + dy, color);
                }
            }
        }
    }

    fn axes(&mut self, area: &PlotArea, color: Rgb) {
        self.vline(area.left, area.top, area.bottom, color);
        self.hline(area.left, area.right, area.bottom, color);
    }

    fn text_width(text: &str, scale: i64) -> i64 {
        let chars = text.chars().count() as i64;
        ((GLYPH_WIDTH + 1) * chars - 1).max(0) * scale
    }

    /// Draw `text` with its top-left corner at `(x, y)`. Characters without
    /// a glyph leave a blank cell.
    fn text(&mut self, x: i64, y: i64, text: &str, scale: i64, color: Rgb) {
        for (i, c) in text.chars().enumerate() {
            let Some(rows) = glyph(c) else { continue };
            let origin = x + i as i64 * (GLYPH_WIDTH + 1) * scale;
            for (row, bits) in rows.iter().enumerate() {
                for col in 0..GLYPH_WIDTH {
                    if bits & (0b100 >> col) != 0 {
                        let px = origin + col * scale;
                        let py = y + row as i64 * scale;
                        self.fill_rect(px, py, px + scale, py + scale, color);
                    }
                }
            }
        }
    }

    fn text_centered(&mut self, cx: i64, cy: i64, text: &str, scale: i64, color: Rgb) {
        let x = cx - Self::text_width(text, scale) / 2;
        let y = cy - GLYPH_HEIGHT * scale / 2;
        self.text(x, y, text, scale, color);
    }

    fn encode_png(self) -> Result<RenderedChart> {
        let mut data = Vec::new();
        PngEncoder::new(&mut data).write_image(
            &self.pixels,
            self.width,
            self.height,
            ColorType::Rgb8,
        )?;
        Ok(RenderedChart {
            mime_type: "image/png",
            width: self.width,
            height: self.height,
            data,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::statistics::box_plot_stats;
    use crate::types::Bar;

    fn decode(chart: &RenderedChart) -> image::RgbImage {
        image::load_from_memory(&chart.data).unwrap().to_rgb8()
    }

    fn box_plot(values: &[f64], show_outliers: bool) -> ChartSpec {
        ChartSpec::BoxPlot(BoxPlot {
            title: "with outliers".to_string(),
            x_label: "variable".to_string(),
            y_label: "Values".to_string(),
            stats: box_plot_stats(values).unwrap(),
            show_outliers,
        })
    }

    #[test]
    fn test_data_uri_has_png_payload() {
        let renderer = PngChartRenderer::default();
        let chart = renderer
            .render(&ChartSpec::Pie(PieChart::bicategorical(4, 1, "a", "b")))
            .unwrap();
        assert_eq!(chart.mime_type, "image/png");
        assert!(chart.to_data_uri().starts_with("data:image/png;base64,iVBORw0KGgo"));
    }

    #[test]
    fn test_pie_slices_start_at_nine_o_clock() {
        let renderer = PngChartRenderer::default();
        let chart = renderer
            .render(&ChartSpec::Pie(PieChart::bicategorical(4, 1, "a", "b")))
            .unwrap();
        let img = decode(&chart);
        assert_eq!(img.dimensions(), (350, 350));

        let style = renderer.style();
        // 75% runs from 9 o'clock through 6 and 3 up to 12 o'clock
        assert_eq!(img.get_pixel(175, 287).0, style.color(0));
        // remaining 25% fills the upper left quadrant
        assert_eq!(img.get_pixel(133, 56).0, style.color(1));
        assert_eq!(img.get_pixel(2, 2).0, WHITE);
    }

    #[test]
    fn test_empty_pie_renders_outline_only() {
        let renderer = PngChartRenderer::default();
        let chart = renderer
            .render(&ChartSpec::Pie(PieChart::bicategorical(0, 0, "a", "b")))
            .unwrap();
        let img = decode(&chart);
        assert_eq!(img.get_pixel(175, 175).0, WHITE);
    }

    #[test]
    fn test_bar_chart_size_follows_style() {
        let style = ChartStyle {
            bar_width: 400,
            bar_height: 300,
            ..ChartStyle::default()
        };
        let renderer = PngChartRenderer::new(style);
        let chart = renderer
            .render(&ChartSpec::Bar(BarChart {
                bars: vec![
                    Bar { label: "a".to_string(), count: 3 },
                    Bar { label: "b".to_string(), count: 1 },
                ],
                y_label: "Count".to_string(),
            }))
            .unwrap();
        assert_eq!((chart.width, chart.height), (400, 300));
        assert_eq!(decode(&chart).dimensions(), (400, 300));
    }

    #[test]
    fn test_box_plots_render() {
        let renderer = PngChartRenderer::default();
        let values = [1.0, 2.0, 3.0, 4.0, 100.0];
        for show_outliers in [true, false] {
            let chart = renderer.render(&box_plot(&values, show_outliers)).unwrap();
            assert_eq!((chart.width, chart.height), (275, 350));
        }
        // constant data must not divide by zero
        assert!(renderer.render(&box_plot(&[5.0], true)).is_ok());
    }

    #[test]
    fn test_zero_dimension_is_an_error() {
        let style = ChartStyle {
            pie_size: 0,
            ..ChartStyle::default()
        };
        let err = PngChartRenderer::new(style)
            .render(&ChartSpec::Pie(PieChart::bicategorical(2, 1, "a", "b")))
            .unwrap_err();
        assert_eq!(err.error_code(), "CHART_RENDERING_FAILED");
    }

    #[test]
    fn test_text_width() {
        assert_eq!(Canvas::text_width("50.0%", 1), 19);
        assert_eq!(Canvas::text_width("50.0%", 3), 57);
        assert_eq!(Canvas::text_width("", 2), 0);
    }
}
