//! # AQI Dashboard
//!
//! Terminal dashboard for an air-quality backend: fetches the current AQI,
//! the historical series and a prediction, and renders them as text and a
//! line chart.
//!
//! ## Features
//!
//! - **Independent fetches**: each resource loads in its own task and fails on its own
//! - **Live state**: snapshots are published through a `watch` channel
//! - **Periodic refresh**: optional reload on a fixed interval
//! - **Output**: text dashboard with chart, SVG, JSON and CSV
//!
//! ## Modules
//!
//! - [`api`]: HTTP client for the backend endpoints
//! - [`model`]: readings, series and wire timestamp decoding
//! - [`state`]: slots, snapshots and the store
//! - [`controller`]: load cycles and refresh loop
//! - [`render`]: text, chart and export output
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use aqi_dashboard::api::{AqiClient, ClientConfig};
//! use aqi_dashboard::config::DisplayConfig;
//! use aqi_dashboard::controller::DashboardController;
//! use aqi_dashboard::render::DashboardView;
//! use aqi_dashboard::state::DashboardStore;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = AqiClient::new(ClientConfig::default())?;
//!     let controller = DashboardController::new(Arc::new(client), DashboardStore::new());
//!
//!     let snapshot = controller.load_settled().await;
//!     let view = DashboardView::new(&DisplayConfig::default())?;
//!     print!("{}", view.render(&snapshot));
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod controller;
pub mod logging;
pub mod model;
pub mod render;
pub mod state;

pub use api::{AqiClient, ClientConfig, DataSource, FetchError};
pub use config::Config;
pub use controller::{DashboardController, LoadHandle};
pub use state::{DashboardSnapshot, DashboardStore, Slot};
