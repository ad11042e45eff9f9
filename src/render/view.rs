//! Text dashboard view
//!
//! Renders a `DashboardSnapshot` as three sections. A slot's value line only
//! appears once that slot is loaded; otherwise the section shows a loading or
//! unavailable marker.

use super::chart::TextChart;
use super::error::RenderResult;
use super::format::{format_value, TimeFormatter};
use crate::config::DisplayConfig;
use crate::model::{HistoricalSeries, Reading};
use crate::state::{DashboardSnapshot, Slot};

const TITLE: &str = "Air Quality Dashboard";

/// Renders snapshots as plain text
#[derive(Debug, Clone)]
pub struct DashboardView {
    formatter: TimeFormatter,
    chart: TextChart,
    show_points: bool,
}

impl DashboardView {
    pub fn new(display: &DisplayConfig) -> RenderResult<Self> {
        Ok(Self {
            formatter: TimeFormatter::new(display)?,
            chart: TextChart::new(display.chart_width, display.chart_height),
            show_points: false,
        })
    }

    /// Also list every historical point with its timestamp and value
    pub fn with_points(mut self, show_points: bool) -> Self {
        self.show_points = show_points;
        self
    }

    pub fn formatter(&self) -> &TimeFormatter {
        &self.formatter
    }

    pub fn render(&self, snapshot: &DashboardSnapshot) -> String {
        let mut out = String::new();

        out.push_str(TITLE);
        out.push('\n');
        out.push_str(&"=".repeat(TITLE.len()));
        out.push_str("\n\n");

        section(&mut out, "Current AQI");
        out.push_str(&slot_line(&snapshot.current, |r| self.current_line(r)));
        out.push_str("\n\n");

        section(&mut out, "AQI Prediction");
        out.push_str(&slot_line(&snapshot.prediction, |r| self.prediction_line(r)));
        out.push_str("\n\n");

        section(&mut out, "Historical AQI Data");
        match &snapshot.historical {
            Slot::Loaded(series) | Slot::Stale { value: series, .. } => {
                out.push_str(&self.chart.render(series, &self.formatter));
                if self.show_points {
                    out.push('\n');
                    out.push_str(&self.points_table(series));
                }
                if let Some(reason) = snapshot.historical.error() {
                    out.push_str(&stale_note(reason));
                    out.push('\n');
                }
            }
            other => {
                out.push_str(&slot_line(other, |_| String::new()));
                out.push('\n');
            }
        }

        if let Some(updated_at) = snapshot.updated_at {
            out.push('\n');
            out.push_str(&format!(
                "Updated {} (revision {})\n",
                self.formatter.datetime(&updated_at),
                snapshot.revision
            ));
        }

        out
    }

    fn current_line(&self, reading: &Reading) -> String {
        format!(
            "Current AQI: {} (as of {})",
            format_value(reading.value),
            self.formatter.datetime(&reading.timestamp)
        )
    }

    fn prediction_line(&self, reading: &Reading) -> String {
        format!(
            "Predicted AQI: {} (for {})",
            format_value(reading.value),
            self.formatter.datetime(&reading.timestamp)
        )
    }

    /// One line per point, in received order
    fn points_table(&self, series: &HistoricalSeries) -> String {
        let mut out = String::new();
        for point in series.iter() {
            out.push_str(&format!(
                "  {}  {:>10}\n",
                self.formatter.datetime(&point.timestamp),
                format_value(point.value)
            ));
        }
        out
    }
}

fn section(out: &mut String, heading: &str) {
    out.push_str(heading);
    out.push('\n');
    out.push_str(&"-".repeat(heading.len()));
    out.push('\n');
}

fn slot_line<T>(slot: &Slot<T>, loaded: impl Fn(&T) -> String) -> String {
    match slot {
        Slot::Loading => "Loading...".to_string(),
        Slot::Error(reason) => format!("Unavailable: {}", reason),
        Slot::Loaded(value) => loaded(value),
        Slot::Stale { value, error } => format!("{}\n{}", loaded(value), stale_note(error)),
    }
}

fn stale_note(reason: &str) -> String {
    format!("Unavailable: {} (showing last value)", reason)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{HistoricalPoint, Zone};
    use chrono::DateTime;

    fn view() -> DashboardView {
        DashboardView::new(&DisplayConfig {
            timezone: Zone::Utc,
            ..Default::default()
        })
        .unwrap()
    }

    fn reading(value: f64, ms: i64) -> Reading {
        Reading::new(value, DateTime::from_timestamp_millis(ms).unwrap())
    }

    fn series() -> HistoricalSeries {
        HistoricalSeries::new(vec![
            HistoricalPoint::new(DateTime::from_timestamp_millis(1_700_000_000_000).unwrap(), 40.0),
            HistoricalPoint::new(DateTime::from_timestamp_millis(1_700_003_600_000).unwrap(), 45.5),
        ])
    }

    #[test]
    fn test_initial_snapshot_shows_loading() {
        let text = view().render(&DashboardSnapshot::default());

        assert!(text.starts_with("Air Quality Dashboard\n"));
        assert_eq!(text.matches("Loading...").count(), 3);
        assert!(!text.contains("Current AQI:"));
        assert!(!text.contains("Predicted AQI:"));
        assert!(!text.contains("Updated"));
    }

    #[test]
    fn test_loaded_snapshot() {
        let snapshot = DashboardSnapshot {
            revision: 3,
            updated_at: DateTime::from_timestamp_millis(1_700_000_100_000),
            current: Slot::Loaded(reading(42.567, 1_700_000_000_000)),
            historical: Slot::Loaded(series()),
            prediction: Slot::Loaded(reading(50.0, 1_700_003_600_000)),
        };

        let text = view().render(&snapshot);

        assert!(text.contains("Current AQI: 42.57 (as of 2023-11-14 22:13:20)"));
        assert!(text.contains("Predicted AQI: 50.00 (for 2023-11-14 23:13:20)"));
        assert!(text.contains("AQI: 2 points"));
        assert!(text.contains("Updated 2023-11-14 22:15:00 (revision 3)"));
        assert!(!text.contains("Loading..."));
    }

    #[test]
    fn test_pending_current_does_not_hide_prediction() {
        let snapshot = DashboardSnapshot {
            prediction: Slot::Loaded(reading(50.0, 1_700_003_600_000)),
            ..Default::default()
        };

        let text = view().render(&snapshot);

        assert!(!text.contains("Current AQI:"));
        assert!(text.contains("Predicted AQI: 50.00"));
    }

    #[test]
    fn test_error_slot() {
        let snapshot = DashboardSnapshot {
            historical: Slot::Error("HTTP 500: boom".to_string()),
            ..Default::default()
        };

        let text = view().render(&snapshot);
        assert!(text.contains("Unavailable: HTTP 500: boom"));
    }

    #[test]
    fn test_stale_slots_keep_last_value() {
        let snapshot = DashboardSnapshot {
            current: Slot::Stale {
                value: reading(42.567, 1_700_000_000_000),
                error: "Request timed out".to_string(),
            },
            historical: Slot::Stale {
                value: series(),
                error: "HTTP 502: bad gateway".to_string(),
            },
            ..Default::default()
        };

        let text = view().render(&snapshot);

        assert!(text.contains(
            "Current AQI: 42.57 (as of 2023-11-14 22:13:20)\n\
             Unavailable: Request timed out (showing last value)"
        ));
        assert!(text.contains("AQI: 2 points"));
        assert!(text.contains("Unavailable: HTTP 502: bad gateway (showing last value)"));
    }

    #[test]
    fn test_points_table_in_received_order() {
        let snapshot = DashboardSnapshot {
            historical: Slot::Loaded(series()),
            ..Default::default()
        };

        let text = view().with_points(true).render(&snapshot);

        let first = text.find("2023-11-14 22:13:20       40.00").unwrap();
        let second = text.find("2023-11-14 23:13:20       45.50").unwrap();
        assert!(first < second);
    }
}
