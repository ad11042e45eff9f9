//! SVG line chart export

use std::fmt::Write as _;

use super::chart::{ChartLayout, Y_TICKS};
use super::format::{format_value, TimeFormatter};
use crate::model::HistoricalSeries;

const MARGIN_LEFT: f64 = 60.0;
const MARGIN_RIGHT: f64 = 20.0;
const MARGIN_TOP: f64 = 40.0;
const MARGIN_BOTTOM: f64 = 50.0;

const LINE_COLOR: &str = "#8884d8";
const GRID_COLOR: &str = "#cccccc";
const TEXT_COLOR: &str = "#666666";

/// Historical series as a standalone SVG document
#[derive(Debug, Clone)]
pub struct SvgChart {
    width: f64,
    height: f64,
}

impl Default for SvgChart {
    fn default() -> Self {
        Self::new(800.0, 400.0)
    }
}

impl SvgChart {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width: width.max(MARGIN_LEFT + MARGIN_RIGHT + 100.0),
            height: height.max(MARGIN_TOP + MARGIN_BOTTOM + 100.0),
        }
    }

    pub fn render(&self, series: &HistoricalSeries, formatter: &TimeFormatter) -> String {
        let layout = ChartLayout::new(series);
        let plot_w = self.width - MARGIN_LEFT - MARGIN_RIGHT;
        let plot_h = self.height - MARGIN_TOP - MARGIN_BOTTOM;
        let px = |x: f64| MARGIN_LEFT + x * plot_w;
        let py = |y: f64| MARGIN_TOP + y * plot_h;

        let mut svg = String::new();
        let _ = writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="sans-serif" font-size="12">"#,
            w = self.width,
            h = self.height
        );
        let _ = writeln!(
            svg,
            r##"  <rect x="0" y="0" width="{}" height="{}" fill="#ffffff"/>"##,
            self.width, self.height
        );
        let _ = writeln!(
            svg,
            r#"  <text x="{:.1}" y="24" text-anchor="middle" font-size="16">Historical AQI Data</text>"#,
            self.width / 2.0
        );

        if layout.is_empty() {
            let _ = writeln!(
                svg,
                r#"  <text x="{:.1}" y="{:.1}" text-anchor="middle" fill="{}">No historical data</text>"#,
                self.width / 2.0,
                self.height / 2.0,
                TEXT_COLOR
            );
            svg.push_str("</svg>\n");
            return svg;
        }

        // Grid and Y labels
        for (i, value) in layout.y_ticks(Y_TICKS).into_iter().enumerate() {
            let y = py(i as f64 / Y_TICKS as f64);
            let _ = writeln!(
                svg,
                r#"  <line x1="{:.1}" y1="{y:.1}" x2="{:.1}" y2="{y:.1}" stroke="{}" stroke-dasharray="3 3"/>"#,
                MARGIN_LEFT,
                self.width - MARGIN_RIGHT,
                GRID_COLOR,
                y = y
            );
            let _ = writeln!(
                svg,
                r#"  <text x="{:.1}" y="{:.1}" text-anchor="end" fill="{}">{:.1}</text>"#,
                MARGIN_LEFT - 8.0,
                y + 4.0,
                TEXT_COLOR,
                value
            );
        }

        // X labels
        let max_labels = (plot_w / 90.0).floor().max(1.0) as usize;
        for idx in layout.x_tick_indices(max_labels) {
            let point = &layout.points[idx];
            let _ = writeln!(
                svg,
                r#"  <text x="{:.1}" y="{:.1}" text-anchor="middle" fill="{}">{}</text>"#,
                px(point.x),
                self.height - MARGIN_BOTTOM + 18.0,
                TEXT_COLOR,
                escape(&formatter.date(&point.timestamp))
            );
        }

        // Axis titles
        let _ = writeln!(
            svg,
            r#"  <text x="{:.1}" y="{:.1}" text-anchor="middle" fill="{}">Date</text>"#,
            MARGIN_LEFT + plot_w / 2.0,
            self.height - 10.0,
            TEXT_COLOR
        );
        let _ = writeln!(
            svg,
            r#"  <text x="16" y="{y:.1}" text-anchor="middle" fill="{}" transform="rotate(-90 16 {y:.1})">AQI</text>"#,
            TEXT_COLOR,
            y = MARGIN_TOP + plot_h / 2.0
        );

        let coords: Vec<String> = layout
            .points
            .iter()
            .map(|p| format!("{:.1},{:.1}", px(p.x), py(p.y)))
            .collect();
        let _ = writeln!(
            svg,
            r#"  <polyline fill="none" stroke="{}" stroke-width="2" points="{}"/>"#,
            LINE_COLOR,
            coords.join(" ")
        );

        for point in &layout.points {
            let _ = writeln!(
                svg,
                r#"  <circle cx="{:.1}" cy="{:.1}" r="3" fill="{}"><title>{}: {}</title></circle>"#,
                px(point.x),
                py(point.y),
                LINE_COLOR,
                escape(&formatter.datetime(&point.timestamp)),
                format_value(point.value)
            );
        }

        svg.push_str("</svg>\n");
        svg
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
