//! AQI Backend HTTP Client
//!
//! HTTP client for the three read-only endpoints of the air-quality backend.

use async_trait::async_trait;
use reqwest::{header::ACCEPT, Client, Response};
use serde::de::DeserializeOwned;
use std::time::{Duration, Instant};

use super::dto::{series_from_payload, ReadingPayload};
use super::error::FetchError;
use super::source::{DataSource, Endpoint};
use crate::model::{HistoricalSeries, Reading, Zone};

/// Configuration for the backend client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the backend (e.g., "http://127.0.0.1:5000")
    pub base_url: String,
    /// Whole-request timeout, body included
    pub request_timeout: Duration,
    /// Zone used to read naive wire timestamps
    pub zone: Zone,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            request_timeout: Duration::from_secs(10),
            zone: Zone::Local,
        }
    }
}

/// HTTP client for the AQI backend
pub struct AqiClient {
    client: Client,
    config: ClientConfig,
}

/// Result of probing one endpoint
#[derive(Debug, Clone)]
pub struct ProbeReport {
    pub endpoint: Endpoint,
    /// HTTP status, if a response arrived at all
    pub status: Option<u16>,
    pub latency: Duration,
    /// Short summary of the decoded payload, or the failure reason
    pub outcome: Result<String, String>,
}

impl ProbeReport {
    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }
}

impl AqiClient {
    /// Create a new client with the given configuration
    pub fn new(config: ClientConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(FetchError::Request)?;

        Ok(Self { client, config })
    }

    /// Absolute URL of an endpoint
    pub fn url(&self, endpoint: Endpoint) -> String {
        format!(
            "{}{}",
            self.config.base_url.trim_end_matches('/'),
            endpoint.path()
        )
    }

    /// Fetch `/api/current` or `/api/predict`
    pub async fn fetch_reading(&self, endpoint: Endpoint) -> Result<Reading, FetchError> {
        let response = self.send(endpoint).await?;
        let payload: ReadingPayload = read_json(response).await?;
        Ok(payload.into_reading(self.config.zone)?)
    }

    /// Fetch `/api/historical`
    pub async fn fetch_series(&self) -> Result<HistoricalSeries, FetchError> {
        let response = self.send(Endpoint::Historical).await?;
        let payload: Vec<ReadingPayload> = read_json(response).await?;
        Ok(series_from_payload(payload, self.config.zone)?)
    }

    /// Request an endpoint once and report status, latency and decode outcome
    pub async fn probe(&self, endpoint: Endpoint) -> ProbeReport {
        let started = Instant::now();

        let (status, outcome) = match self.send(endpoint).await {
            Ok(response) => {
                let status = response.status().as_u16();
                let outcome = match endpoint {
                    Endpoint::Historical => read_json::<Vec<ReadingPayload>>(response)
                        .await
                        .and_then(|p| Ok(series_from_payload(p, self.config.zone)?))
                        .map(|series| format!("{} points", series.len())),
                    Endpoint::Current | Endpoint::Predict => read_json::<ReadingPayload>(response)
                        .await
                        .and_then(|p| Ok(p.into_reading(self.config.zone)?))
                        .map(|reading| {
                            format!(
                                "value {:.2} at {}",
                                reading.value,
                                reading.timestamp.to_rfc3339()
                            )
                        }),
                };
                (Some(status), outcome.map_err(|e| e.to_string()))
            }
            Err(e) => (None, Err(e.to_string())),
        };

        let latency = started.elapsed();
        match &outcome {
            Ok(summary) => tracing::debug!(endpoint = %endpoint, ?latency, %summary, "Probe succeeded"),
            Err(error) => tracing::warn!(endpoint = %endpoint, ?latency, %error, "Probe failed"),
        }

        ProbeReport {
            endpoint,
            status,
            latency,
            outcome,
        }
    }

    async fn send(&self, endpoint: Endpoint) -> Result<Response, FetchError> {
        let url = self.url(endpoint);
        tracing::debug!(url = %url, "GET");

        let response = self
            .client
            .get(&url)
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        Ok(response)
    }
}

/// Check the status and decode the body as JSON
async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, FetchError> {
    let status = response.status();
    if !status.is_success() {
        let text = response.text().await.unwrap_or_default();
        return Err(FetchError::status(status.as_u16(), &text));
    }

    let bytes = response.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}

#[async_trait]
impl DataSource for AqiClient {
    async fn current(&self) -> Result<Reading, FetchError> {
        self.fetch_reading(Endpoint::Current).await
    }

    async fn historical(&self) -> Result<HistoricalSeries, FetchError> {
        self.fetch_series().await
    }

    async fn prediction(&self) -> Result<Reading, FetchError> {
        self.fetch_reading(Endpoint::Predict).await
    }
}
