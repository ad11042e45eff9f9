//! Core data types for the dashboard
//!
//! - `Reading`: a single AQI value at an instant (observation or forecast)
//! - `HistoricalPoint`: one entry of the historical series
//! - `HistoricalSeries`: the series in the order the backend returned it

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A single AQI value at an instant
///
/// Used for both the current observation and the prediction; the slot it
/// lives in decides which one it is.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Reading {
    /// Air quality index value
    pub value: f64,
    /// Instant the value refers to
    pub timestamp: DateTime<Utc>,
}

impl Reading {
    pub fn new(value: f64, timestamp: DateTime<Utc>) -> Self {
        Self { value, timestamp }
    }
}

/// One point of the historical series
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct HistoricalPoint {
    pub timestamp: DateTime<Utc>,
    pub value: f64,
}

impl HistoricalPoint {
    pub fn new(timestamp: DateTime<Utc>, value: f64) -> Self {
        Self { timestamp, value }
    }
}

/// Historical AQI series
///
/// Points keep the order they were received in. Nothing here sorts,
/// deduplicates or validates them.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(transparent)]
pub struct HistoricalSeries {
    points: Vec<HistoricalPoint>,
}

impl HistoricalSeries {
    pub fn new(points: Vec<HistoricalPoint>) -> Self {
        Self { points }
    }

    pub fn iter(&self) -> impl Iterator<Item = &HistoricalPoint> {
        self.points.iter()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Minimum and maximum value, or `None` for an empty series
    pub fn value_range(&self) -> Option<(f64, f64)> {
        if self.points.is_empty() {
            return None;
        }
        let min = self.points.iter().map(|p| p.value).fold(f64::INFINITY, f64::min);
        let max = self
            .points
            .iter()
            .map(|p| p.value)
            .fold(f64::NEG_INFINITY, f64::max);
        Some((min, max))
    }
}

impl From<Vec<HistoricalPoint>> for HistoricalSeries {
    fn from(points: Vec<HistoricalPoint>) -> Self {
        Self::new(points)
    }
}
