//! Machine-readable output of the dashboard state

use std::io::Write;

use super::error::{RenderError, RenderResult};
use crate::model::HistoricalSeries;
use crate::state::{DashboardSnapshot, Slot};

/// Write the whole snapshot as pretty JSON
pub fn write_json<W: Write>(snapshot: &DashboardSnapshot, mut writer: W) -> RenderResult<()> {
    serde_json::to_writer_pretty(&mut writer, snapshot)?;
    writeln!(writer)?;
    Ok(())
}

/// Write a series as `timestamp,value` rows, timestamps in RFC 3339 UTC
pub fn write_csv<W: Write>(series: &HistoricalSeries, writer: W) -> RenderResult<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(["timestamp", "value"])?;
    for point in series.iter() {
        csv.write_record([point.timestamp.to_rfc3339(), point.value.to_string()])?;
    }
    csv.flush()?;
    Ok(())
}

/// The loaded historical series, or why there is none
pub fn loaded_series(snapshot: &DashboardSnapshot) -> RenderResult<&HistoricalSeries> {
    match &snapshot.historical {
        Slot::Loaded(series) | Slot::Stale { value: series, .. } => Ok(series),
        Slot::Loading => Err(RenderError::NotLoaded("historical data still loading".to_string())),
        Slot::Error(reason) => Err(RenderError::NotLoaded(format!(
            "historical data unavailable: {}",
            reason
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{HistoricalPoint, Reading};
    use chrono::DateTime;

    fn series() -> HistoricalSeries {
        HistoricalSeries::new(vec![
            HistoricalPoint::new(DateTime::from_timestamp_millis(1_700_003_600_000).unwrap(), 45.5),
            HistoricalPoint::new(DateTime::from_timestamp_millis(1_700_000_000_000).unwrap(), 40.0),
        ])
    }

    #[test]
    fn test_csv_keeps_order_and_raw_values() {
        let mut out = Vec::new();
        write_csv(&series(), &mut out).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "timestamp,value\n\
             2023-11-14T23:13:20+00:00,45.5\n\
             2023-11-14T22:13:20+00:00,40\n"
        );
    }

    #[test]
    fn test_json_snapshot() {
        let snapshot = DashboardSnapshot {
            revision: 1,
            current: Slot::Loaded(Reading::new(
                42.5,
                DateTime::from_timestamp_millis(1_700_000_000_000).unwrap(),
            )),
            prediction: Slot::Error("HTTP 500: boom".to_string()),
            ..Default::default()
        };

        let mut out = Vec::new();
        write_json(&snapshot, &mut out).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();

        assert_eq!(value["revision"], 1);
        assert_eq!(value["current"]["status"], "loaded");
        assert_eq!(value["current"]["data"]["value"], 42.5);
        assert_eq!(value["historical"]["status"], "loading");
        assert_eq!(value["prediction"]["status"], "error");
        assert_eq!(value["prediction"]["data"], "HTTP 500: boom");
    }

    #[test]
    fn test_loaded_series() {
        let mut snapshot = DashboardSnapshot::default();
        assert!(matches!(loaded_series(&snapshot), Err(RenderError::NotLoaded(_))));

        snapshot.historical = Slot::Error("timeout".to_string());
        let err = loaded_series(&snapshot).unwrap_err();
        assert!(err.to_string().contains("timeout"));

        snapshot.historical = Slot::Loaded(series());
        assert_eq!(loaded_series(&snapshot).unwrap().len(), 2);

        snapshot.historical = Slot::Stale {
            value: series(),
            error: "timeout".to_string(),
        };
        assert_eq!(loaded_series(&snapshot).unwrap().len(), 2);
    }
}
