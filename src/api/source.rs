//! Data source abstraction
//!
//! The controller only talks to a `DataSource`. The HTTP client is the real
//! implementation; tests substitute in-memory ones.

use async_trait::async_trait;

use super::error::FetchError;
use crate::model::{HistoricalSeries, Reading};

/// The three backend endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Current,
    Historical,
    Predict,
}

impl Endpoint {
    pub fn all() -> &'static [Endpoint] {
        &[Endpoint::Current, Endpoint::Historical, Endpoint::Predict]
    }

    /// Request path relative to the base URL
    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::Current => "/api/current",
            Endpoint::Historical => "/api/historical",
            Endpoint::Predict => "/api/predict",
        }
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path())
    }
}

/// Provider of the three dashboard resources
///
/// Calls are independent: implementations must not make one request wait on
/// another.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Latest observed AQI
    async fn current(&self) -> Result<Reading, FetchError>;

    /// Historical series, in backend order
    async fn historical(&self) -> Result<HistoricalSeries, FetchError>;

    /// Forecast AQI
    async fn prediction(&self) -> Result<Reading, FetchError>;
}
