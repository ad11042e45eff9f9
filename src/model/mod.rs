//! Dashboard Data Model
//!
//! Transient entities held in memory for the lifetime of a dashboard run:
//!
//! - **types**: `Reading` (current value or prediction) and `HistoricalSeries`
//! - **timestamp**: decoding of `number | string` wire timestamps into instants

mod timestamp;
mod types;

pub use timestamp::{RawTimestamp, TimestampError, Zone};
pub use types::{HistoricalPoint, HistoricalSeries, Reading};
