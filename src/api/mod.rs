//! AQI Backend API
//!
//! Client side of the air-quality backend.
//!
//! # Endpoints
//!
//! - `GET /api/current` - Latest observed AQI
//! - `GET /api/historical` - Historical series (backend order)
//! - `GET /api/predict` - Forecast AQI
//!
//! # Example
//!
//! ```rust,no_run
//! use aqi_dashboard::api::{AqiClient, ClientConfig, DataSource};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = AqiClient::new(ClientConfig::default())?;
//!     let current = client.current().await?;
//!     println!("AQI {:.2} at {}", current.value, current.timestamp);
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod dto;
pub mod error;
pub mod source;

pub use client::{AqiClient, ClientConfig, ProbeReport};
pub use error::FetchError;
pub use source::{DataSource, Endpoint};
