//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides; CLI flags
//! are applied on top by the binary.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::api::ClientConfig;
use crate::model::Zone;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub display: DisplayConfig,

    #[serde(default)]
    pub refresh: RefreshConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Backend connection configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://127.0.0.1:5000".to_string()
}

fn default_request_timeout() -> u64 {
    10
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

/// How values, timestamps and the chart are displayed
#[derive(Debug, Clone, Deserialize)]
pub struct DisplayConfig {
    #[serde(default)]
    pub timezone: Zone,

    /// strftime format for full timestamps
    #[serde(default = "default_datetime_format")]
    pub datetime_format: String,

    /// strftime format for chart axis dates
    #[serde(default = "default_date_format")]
    pub date_format: String,

    /// POSIX locale name for month/day names (e.g. "de_DE")
    #[serde(default)]
    pub locale: Option<String>,

    #[serde(default = "default_chart_width")]
    pub chart_width: usize,

    #[serde(default = "default_chart_height")]
    pub chart_height: usize,
}

fn default_datetime_format() -> String {
    "%Y-%m-%d %H:%M:%S".to_string()
}

fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}

fn default_chart_width() -> usize {
    72
}

fn default_chart_height() -> usize {
    16
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            timezone: Zone::default(),
            datetime_format: default_datetime_format(),
            date_format: default_date_format(),
            locale: None,
            chart_width: default_chart_width(),
            chart_height: default_chart_height(),
        }
    }
}

/// Periodic refresh for watch mode
#[derive(Debug, Clone, Deserialize)]
pub struct RefreshConfig {
    /// Seconds between refreshes, 0 disables
    #[serde(default = "default_refresh_interval")]
    pub interval_secs: u64,
}

fn default_refresh_interval() -> u64 {
    60
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_refresh_interval(),
        }
    }
}

impl RefreshConfig {
    pub fn interval(&self) -> Option<Duration> {
        (self.interval_secs > 0).then(|| Duration::from_secs(self.interval_secs))
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(ConfigError::Invalid(format!(
                "unknown log format {:?} (expected \"pretty\" or \"json\")",
                other
            ))),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub format: LogFormat,

    pub file: Option<String>,
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
            file: None,
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Config::default();
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Load from the first default location that exists, or environment only
    pub fn load_default() -> Result<Self, ConfigError> {
        for path in Self::default_paths() {
            if path.exists() {
                return Self::load_with_env(&path);
            }
        }

        Self::from_env()
    }

    /// Candidate config file locations, in lookup order
    pub fn default_paths() -> Vec<PathBuf> {
        [
            dirs::config_dir().map(|p| p.join("aqi-dashboard").join("config.toml")),
            Some(PathBuf::from("/etc/aqi-dashboard/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from a key lookup (environment in production)
    fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        // API overrides
        if let Some(url) = lookup("AQI_API_URL") {
            self.api.base_url = url;
        }
        if let Some(timeout) = lookup("AQI_REQUEST_TIMEOUT_SECS") {
            self.api.request_timeout_secs = parse_number("AQI_REQUEST_TIMEOUT_SECS", &timeout)?;
        }

        // Display overrides
        if let Some(zone) = lookup("AQI_TIMEZONE") {
            self.display.timezone = zone
                .parse()
                .map_err(|e: crate::model::TimestampError| ConfigError::Invalid(e.to_string()))?;
        }
        if let Some(locale) = lookup("AQI_LOCALE") {
            self.display.locale = Some(locale);
        }

        // Refresh overrides
        if let Some(secs) = lookup("AQI_REFRESH_SECS") {
            self.refresh.interval_secs = parse_number("AQI_REFRESH_SECS", &secs)?;
        }

        // Logging overrides
        if let Some(level) = lookup("AQI_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("AQI_LOG_FORMAT") {
            self.logging.format = format.parse()?;
        }

        Ok(())
    }

    /// Check values that deserialize fine but cannot be used
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api.base_url.trim().is_empty() {
            return Err(ConfigError::Invalid("api.base_url is empty".to_string()));
        }
        if !self.api.base_url.starts_with("http://") && !self.api.base_url.starts_with("https://") {
            return Err(ConfigError::Invalid(format!(
                "api.base_url must start with http:// or https://, got {:?}",
                self.api.base_url
            )));
        }
        if self.api.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "api.request_timeout_secs must be at least 1".to_string(),
            ));
        }
        if self.display.chart_width < 20 || self.display.chart_height < 4 {
            return Err(ConfigError::Invalid(
                "display.chart_width must be >= 20 and display.chart_height >= 4".to_string(),
            ));
        }
        Ok(())
    }

    /// Client settings derived from this config
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            base_url: self.api.base_url.clone(),
            request_timeout: Duration::from_secs(self.api.request_timeout_secs),
            zone: self.display.timezone,
        }
    }
}

fn parse_number(key: &str, value: &str) -> Result<u64, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Invalid(format!("{} must be a whole number, got {:?}", key, value)))
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# AQI Dashboard Configuration
#
# Environment variables override these settings:
# - AQI_API_URL
# - AQI_REQUEST_TIMEOUT_SECS
# - AQI_TIMEZONE
# - AQI_LOCALE
# - AQI_REFRESH_SECS
# - AQI_LOG_LEVEL
# - AQI_LOG_FORMAT

[api]
# Base URL of the AQI backend serving /api/current, /api/historical, /api/predict
base_url = "http://127.0.0.1:5000"

# Request timeout in seconds
request_timeout_secs = 10

[display]
# Time zone for displaying timestamps and reading offset-less ones: local or utc
timezone = "local"

# strftime formats for timestamps and chart axis dates
datetime_format = "%Y-%m-%d %H:%M:%S"
date_format = "%Y-%m-%d"

# Optional locale for month and day names
# locale = "en_US"

# Text chart size in characters
chart_width = 72
chart_height = 16

[refresh]
# Seconds between refreshes in watch mode (0 disables)
interval_secs = 60

[logging]
# Log level: trace, debug, info, warn, error
level = "warn"

# Log format: pretty or json
format = "pretty"

# Optional log file path (logs go to stderr otherwise)
# file = "/var/log/aqi-dashboard.log"
"#
    .to_string()
}
