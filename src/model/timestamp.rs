//! Wire timestamp decoding
//!
//! The backend sends timestamps either as epoch milliseconds or as strings.
//! Strings may carry an offset (RFC 3339), be a naive ISO date-time, or be a
//! bare date. Naive date-times are read in the display zone; bare dates are
//! UTC midnight.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Naive date-time layouts accepted after RFC 3339 fails
const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Time zone used to interpret naive timestamps and to display instants
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Zone {
    /// The host's local zone
    #[default]
    Local,
    Utc,
}

impl Zone {
    fn resolve_naive(&self, naive: &NaiveDateTime) -> Option<DateTime<Utc>> {
        match self {
            Zone::Utc => Some(Utc.from_utc_datetime(naive)),
            Zone::Local => Local
                .from_local_datetime(naive)
                .earliest()
                .map(|dt| dt.with_timezone(&Utc)),
        }
    }
}

impl std::str::FromStr for Zone {
    type Err = TimestampError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "local" => Ok(Zone::Local),
            "utc" => Ok(Zone::Utc),
            other => Err(TimestampError::UnknownZone(other.to_string())),
        }
    }
}

impl std::fmt::Display for Zone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Zone::Local => write!(f, "local"),
            Zone::Utc => write!(f, "utc"),
        }
    }
}

/// Timestamp exactly as it appeared in a payload
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawTimestamp {
    /// Milliseconds since the Unix epoch
    Millis(f64),
    Text(String),
}

impl RawTimestamp {
    /// Resolve to an instant, reading naive date-times in `zone`
    pub fn resolve(&self, zone: Zone) -> Result<DateTime<Utc>, TimestampError> {
        match self {
            RawTimestamp::Millis(ms) => {
                if !ms.is_finite() {
                    return Err(TimestampError::Invalid(ms.to_string()));
                }
                DateTime::from_timestamp_millis(ms.trunc() as i64)
                    .ok_or_else(|| TimestampError::OutOfRange(ms.to_string()))
            }
            RawTimestamp::Text(text) => parse_text(text.trim(), zone),
        }
    }
}

fn parse_text(text: &str, zone: Zone) -> Result<DateTime<Utc>, TimestampError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Ok(dt.with_timezone(&Utc));
    }

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return zone
                .resolve_naive(&naive)
                .ok_or_else(|| TimestampError::NonexistentLocalTime(text.to_string()));
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        if let Some(naive) = date.and_hms_opt(0, 0, 0) {
            return Ok(Utc.from_utc_datetime(&naive));
        }
    }

    Err(TimestampError::Invalid(text.to_string()))
}

/// Errors decoding a wire timestamp
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TimestampError {
    #[error("Invalid timestamp: {0:?}")]
    Invalid(String),

    #[error("Timestamp out of range: {0}")]
    OutOfRange(String),

    /// Naive time falls in a DST gap of the local zone
    #[error("Timestamp does not exist in the local time zone: {0}")]
    NonexistentLocalTime(String),

    #[error("Unknown time zone {0:?} (expected \"local\" or \"utc\")")]
    UnknownZone(String),
}
