//! Dashboard Rendering
//!
//! - **format**: value and timestamp formatting
//! - **chart**: medium-independent chart layout and the text line chart
//! - **svg**: the same chart as an SVG document
//! - **view**: the full text dashboard
//! - **export**: JSON snapshot and CSV series output

pub mod chart;
pub mod error;
pub mod export;
pub mod format;
pub mod svg;
pub mod view;

pub use chart::{ChartLayout, ChartPoint, TextChart};
pub use error::{RenderError, RenderResult};
pub use export::{loaded_series, write_csv, write_json};
pub use format::{format_value, TimeFormatter};
pub use svg::SvgChart;
pub use view::DashboardView;
