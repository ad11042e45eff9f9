//! Line Chart Layout and Text Rendering
//!
//! `ChartLayout` maps a series onto a unit square: points are spaced evenly
//! along X in received order (a category axis, no sorting) and Y is scaled to
//! the value range with 10% padding. `TextChart` draws that layout on a
//! character grid; the SVG renderer draws the same layout as vector graphics.

use chrono::{DateTime, Utc};

use super::format::TimeFormatter;
use crate::model::HistoricalSeries;

/// Minimum columns left of the plot for Y labels and the axis bar
const Y_LABEL_WIDTH: usize = 10;

const MIN_PLOT_WIDTH: usize = 10;

/// Number of Y tick intervals
pub const Y_TICKS: usize = 4;

const POINT_CHAR: char = '*';
const LINE_CHAR: char = '.';

/// A series point placed on the unit square
#[derive(Debug, Clone, PartialEq)]
pub struct ChartPoint {
    pub timestamp: DateTime<Utc>,
    pub value: f64,
    /// 0.0 = left edge, 1.0 = right edge
    pub x: f64,
    /// 0.0 = top (y_max), 1.0 = bottom (y_min)
    pub y: f64,
}

/// Scaled chart geometry, independent of output medium
#[derive(Debug, Clone)]
pub struct ChartLayout {
    pub y_min: f64,
    pub y_max: f64,
    pub points: Vec<ChartPoint>,
}

impl ChartLayout {
    pub fn new(series: &HistoricalSeries) -> Self {
        let (mut y_min, mut y_max) = series.value_range().unwrap_or((0.0, 1.0));

        // Add padding to y range
        let range = y_max - y_min;
        let padding = if range > 0.0 { range * 0.1 } else { 1.0 };
        y_min -= padding;
        y_max += padding;

        let count = series.len();
        let points = series
            .iter()
            .enumerate()
            .map(|(idx, point)| ChartPoint {
                timestamp: point.timestamp,
                value: point.value,
                x: if count > 1 {
                    idx as f64 / (count - 1) as f64
                } else {
                    0.5
                },
                y: (y_max - point.value) / (y_max - y_min),
            })
            .collect();

        Self {
            y_min,
            y_max,
            points,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Tick values from top to bottom, `intervals + 1` of them
    pub fn y_ticks(&self, intervals: usize) -> Vec<f64> {
        let intervals = intervals.max(1);
        (0..=intervals)
            .map(|i| self.y_max - (i as f64 / intervals as f64) * (self.y_max - self.y_min))
            .collect()
    }

    /// Indices of points that get an X axis label, at most `max_labels`
    pub fn x_tick_indices(&self, max_labels: usize) -> Vec<usize> {
        let count = self.points.len();
        if count == 0 || max_labels == 0 {
            return Vec::new();
        }
        if count <= max_labels {
            return (0..count).collect();
        }
        if max_labels == 1 {
            return vec![0];
        }

        let mut indices: Vec<usize> = (0..max_labels)
            .map(|k| k * (count - 1) / (max_labels - 1))
            .collect();
        indices.dedup();
        indices
    }
}

/// Line chart drawn with characters
#[derive(Debug, Clone)]
pub struct TextChart {
    width: usize,
    height: usize,
}

/// Horizontal split of one rendered chart
#[derive(Debug, Clone, Copy)]
struct Frame {
    /// Columns left of the plot: Y labels, a space and the axis bar
    gutter: usize,
    plot_width: usize,
}

impl Frame {
    fn width(&self) -> usize {
        self.gutter + self.plot_width
    }
}

impl TextChart {
    /// `width` includes the Y label gutter; `height` is plot rows
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width: width.max(Y_LABEL_WIDTH + MIN_PLOT_WIDTH),
            height: height.max(4),
        }
    }

    /// Gutter wide enough for the widest label; the plot gets the rest
    fn frame(&self, labels: &[Option<String>]) -> Frame {
        let widest = labels
            .iter()
            .flatten()
            .map(|label| label.chars().count())
            .max()
            .unwrap_or(0);
        let gutter = (widest + 2).max(Y_LABEL_WIDTH);
        Frame {
            gutter,
            plot_width: self.width.saturating_sub(gutter).max(MIN_PLOT_WIDTH),
        }
    }

    /// Grid cell (column, row) of a layout point
    fn cell(&self, frame: Frame, point: &ChartPoint) -> (usize, usize) {
        let col = (point.x * (frame.plot_width - 1) as f64).round() as usize;
        let row = (point.y * (self.height - 1) as f64).round() as usize;
        (col.min(frame.plot_width - 1), row.min(self.height - 1))
    }

    pub fn render(&self, series: &HistoricalSeries, formatter: &TimeFormatter) -> String {
        let layout = ChartLayout::new(series);
        if layout.is_empty() {
            return "  (no historical data)\n".to_string();
        }

        let mut labels: Vec<Option<String>> = vec![None; self.height];
        for (i, value) in layout.y_ticks(Y_TICKS).into_iter().enumerate() {
            let row = ((i as f64 / Y_TICKS as f64) * (self.height - 1) as f64).round() as usize;
            labels[row] = Some(format!("{:.1}", value));
        }

        let frame = self.frame(&labels);
        let label_width = frame.gutter - 2;
        let mut grid = vec![vec![' '; frame.plot_width]; self.height];

        let cells: Vec<(usize, usize)> = layout.points.iter().map(|p| self.cell(frame, p)).collect();

        // Connecting segments first so points draw over them
        for pair in cells.windows(2) {
            for (col, row) in line_cells(pair[0], pair[1]) {
                if grid[row][col] == ' ' {
                    grid[row][col] = LINE_CHAR;
                }
            }
        }
        for &(col, row) in &cells {
            grid[row][col] = POINT_CHAR;
        }

        let mut out = String::new();
        for (row, chars) in grid.iter().enumerate() {
            let label = labels[row].as_deref().unwrap_or("");
            let line: String = chars.iter().collect();
            out.push_str(format!("{:>w$} |{}", label, line, w = label_width).trim_end());
            out.push('\n');
        }

        out.push_str(&format!(
            "{:>w$} +{}\n",
            "",
            "-".repeat(frame.plot_width),
            w = label_width
        ));
        out.push_str(self.x_labels(frame, &layout, &cells, formatter).trim_end());
        out.push('\n');
        out.push_str(&format!(
            "{:>w$}  AQI: {} points\n",
            "",
            layout.points.len(),
            w = label_width
        ));

        out
    }

    /// Date labels under the axis, skipping any that would overlap
    fn x_labels(
        &self,
        frame: Frame,
        layout: &ChartLayout,
        cells: &[(usize, usize)],
        formatter: &TimeFormatter,
    ) -> String {
        let width = frame.width();
        let mut line = vec![' '; width];
        let mut next_free = frame.gutter;

        let sample = formatter.date(&layout.points[0].timestamp);
        let max_labels = (frame.plot_width / (sample.chars().count() + 2)).max(1);

        for idx in layout.x_tick_indices(max_labels) {
            let label: Vec<char> = formatter.date(&layout.points[idx].timestamp).chars().collect();
            let center = frame.gutter + cells[idx].0;
            let start = center
                .saturating_sub(label.len() / 2)
                .max(frame.gutter)
                .min(width.saturating_sub(label.len()));

            if start < next_free || start + label.len() > width {
                continue;
            }
            line[start..start + label.len()].copy_from_slice(&label);
            next_free = start + label.len() + 1;
        }

        line.into_iter().collect()
    }
}

/// Cells strictly between two grid cells along a Bresenham line
fn line_cells(from: (usize, usize), to: (usize, usize)) -> Vec<(usize, usize)> {
    let (mut x0, mut y0) = (from.0 as i64, from.1 as i64);
    let (x1, y1) = (to.0 as i64, to.1 as i64);
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    let mut cells = Vec::new();
    while (x0, y0) != (x1, y1) {
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
        if (x0, y0) != (x1, y1) {
            cells.push((x0 as usize, y0 as usize));
        }
    }
    cells
}
