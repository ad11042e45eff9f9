//! Wire payloads
//!
//! JSON shapes returned by the backend and their conversion into model types.
//!
//! - `/api/current`, `/api/predict`: `{ "value": number, "timestamp": number | string }`
//! - `/api/historical`: array of the same object

use serde::Deserialize;

use crate::model::{
    HistoricalPoint, HistoricalSeries, RawTimestamp, Reading, TimestampError, Zone,
};

/// `{ value, timestamp }` as sent by the backend
#[derive(Debug, Clone, Deserialize)]
pub struct ReadingPayload {
    pub value: f64,
    pub timestamp: RawTimestamp,
}

impl ReadingPayload {
    pub fn into_reading(self, zone: Zone) -> Result<Reading, TimestampError> {
        Ok(Reading::new(self.value, self.timestamp.resolve(zone)?))
    }

    pub fn into_point(self, zone: Zone) -> Result<HistoricalPoint, TimestampError> {
        Ok(HistoricalPoint::new(self.timestamp.resolve(zone)?, self.value))
    }
}

/// Convert the historical payload, keeping element order
///
/// One undecodable timestamp fails the whole series.
pub fn series_from_payload(
    payload: Vec<ReadingPayload>,
    zone: Zone,
) -> Result<HistoricalSeries, TimestampError> {
    payload
        .into_iter()
        .map(|entry| entry.into_point(zone))
        .collect::<Result<Vec<_>, _>>()
        .map(HistoricalSeries::new)
}
