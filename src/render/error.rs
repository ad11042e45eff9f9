//! Render error types

use thiserror::Error;

/// Errors that can occur while rendering or exporting the dashboard
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// strftime pattern chrono cannot format
    #[error("Invalid time format: {0:?}")]
    InvalidFormat(String),

    #[error("Unknown locale: {0:?}")]
    UnknownLocale(String),

    /// Export needs a slot that is not loaded
    #[error("Nothing to export: {0}")]
    NotLoaded(String),
}

pub type RenderResult<T> = Result<T, RenderError>;
