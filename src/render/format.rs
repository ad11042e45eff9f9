//! Value and timestamp formatting
//!
//! Values are shown with exactly two decimals. Timestamps are formatted with
//! a strftime pattern in the configured zone and, optionally, a locale, so
//! the output depends only on the instant, the zone and the locale.

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Local, Locale, TimeZone, Utc};
use std::fmt::Display;

use super::error::{RenderError, RenderResult};
use crate::config::DisplayConfig;
use crate::model::Zone;

/// Format an AQI value with two decimals
pub fn format_value(value: f64) -> String {
    format!("{:.2}", value)
}

/// Formats instants for display
#[derive(Debug, Clone)]
pub struct TimeFormatter {
    zone: Zone,
    datetime_format: String,
    date_format: String,
    locale: Option<Locale>,
}

impl TimeFormatter {
    /// Build from display settings, rejecting unusable formats and locales
    pub fn new(display: &DisplayConfig) -> RenderResult<Self> {
        check_format(&display.datetime_format)?;
        check_format(&display.date_format)?;

        let locale = display
            .locale
            .as_deref()
            .map(parse_locale)
            .transpose()?;

        Ok(Self {
            zone: display.timezone,
            datetime_format: display.datetime_format.clone(),
            date_format: display.date_format.clone(),
            locale,
        })
    }

    /// Full date and time, e.g. for the current reading
    pub fn datetime(&self, ts: &DateTime<Utc>) -> String {
        self.render(ts, &self.datetime_format)
    }

    /// Date only, for chart axis labels
    pub fn date(&self, ts: &DateTime<Utc>) -> String {
        self.render(ts, &self.date_format)
    }

    fn render(&self, ts: &DateTime<Utc>, format: &str) -> String {
        match self.zone {
            Zone::Utc => self.apply(ts, format),
            Zone::Local => self.apply(&ts.with_timezone(&Local), format),
        }
    }

    fn apply<Tz>(&self, dt: &DateTime<Tz>, format: &str) -> String
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        match self.locale {
            Some(locale) => dt.format_localized(format, locale).to_string(),
            None => dt.format(format).to_string(),
        }
    }
}

impl Default for TimeFormatter {
    fn default() -> Self {
        Self {
            zone: Zone::default(),
            datetime_format: "%Y-%m-%d %H:%M:%S".to_string(),
            date_format: "%Y-%m-%d".to_string(),
            locale: None,
        }
    }
}

/// Formatting an invalid pattern makes `to_string` panic, so reject it early
fn check_format(format: &str) -> RenderResult<()> {
    if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        return Err(RenderError::InvalidFormat(format.to_string()));
    }
    Ok(())
}

fn parse_locale(name: &str) -> RenderResult<Locale> {
    Locale::try_from(name).map_err(|_| RenderError::UnknownLocale(name.to_string()))
}
