use std::fmt::Write;
use std::path::Path;

use anyhow::Context;
use chrono::{NaiveDate, Weekday};
use serde::Deserialize;
use tracing::info;

use crate::error::AggregateError;

pub const DEFAULT_LABEL_FORMAT: &str = "%b %-d";

/// Settings that shape the weekly buckets and their labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregatorConfig {
    pub week_start: Weekday,
    label_format: String,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            week_start: Weekday::Mon,
            label_format: DEFAULT_LABEL_FORMAT.to_string(),
        }
    }
}

impl AggregatorConfig {
    pub fn with_week_start(mut self, week_start: Weekday) -> Self {
        self.week_start = week_start;
        self
    }

    pub fn with_label_format(
        mut self,
        label_format: impl Into<String>,
    ) -> Result<Self, AggregateError> {
        let label_format = label_format.into();
        validate_label_format(&label_format)?;
        self.label_format = label_format;
        Ok(self)
    }

    /// A strftime pattern that renders any `NaiveDate`.
    pub fn label_format(&self) -> &str {
        &self.label_format
    }
}

#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub aggregator: AggregatorConfig,
    pub database_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    #[serde(default)]
    aggregator: RawAggregator,
    database_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawAggregator {
    week_start: Option<String>,
    label_format: Option<String>,
}

impl AppConfig {
    /// Reads the TOML file when given, then applies `DATABASE_URL` from the environment.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut config = match path {
            Some(path) => {
                let content = std::fs::read_to_string(path)
                    .with_context(|| format!("failed to read config {}", path.display()))?;
                let config = Self::from_toml(&content)
                    .with_context(|| format!("failed to parse config {}", path.display()))?;
                info!(path = %path.display(), "loaded configuration");
                config
            }
            None => Self::default(),
        };

        if let Ok(url) = std::env::var("DATABASE_URL") {
            config.database_url = Some(url);
        }

        Ok(config)
    }

    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        let raw: RawConfig = toml::from_str(content)?;
        let mut aggregator = AggregatorConfig::default();

        if let Some(value) = raw.aggregator.week_start {
            aggregator.week_start = parse_week_start(&value)?;
        }
        if let Some(value) = raw.aggregator.label_format {
            aggregator = aggregator.with_label_format(value)?;
        }

        Ok(Self {
            aggregator,
            database_url: raw.database_url,
        })
    }
}

pub fn parse_week_start(value: &str) -> Result<Weekday, AggregateError> {
    value
        .trim()
        .parse::<Weekday>()
        .map_err(|_| AggregateError::InvalidWeekStart {
            value: value.to_string(),
        })
}

/// Rejects patterns a date cannot be rendered with, including time and zone fields.
pub fn validate_label_format(value: &str) -> Result<(), AggregateError> {
    let mut rendered = String::new();
    let renders = write!(rendered, "{}", NaiveDate::MIN.format(value)).is_ok();
    if !renders || value.trim().is_empty() {
        return Err(AggregateError::InvalidLabelFormat {
            value: value.to_string(),
        });
    }
    Ok(())
}
