use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::error::AggregateError;

/// Trailing period a chart can be narrowed to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum TimeWindow {
    #[default]
    #[serde(rename = "ALL")]
    All,
    #[serde(rename = "1M")]
    OneMonth,
    #[serde(rename = "3M")]
    ThreeMonths,
    #[serde(rename = "6M")]
    SixMonths,
    #[serde(rename = "1Y")]
    OneYear,
}

impl TimeWindow {
    pub const ALL_WINDOWS: [TimeWindow; 5] = [
        TimeWindow::All,
        TimeWindow::OneMonth,
        TimeWindow::ThreeMonths,
        TimeWindow::SixMonths,
        TimeWindow::OneYear,
    ];

    /// Number of trailing days kept. Zero disables filtering.
    pub fn days(self) -> i64 {
        match self {
            TimeWindow::All => 0,
            TimeWindow::OneMonth => 30,
            TimeWindow::ThreeMonths => 90,
            TimeWindow::SixMonths => 180,
            TimeWindow::OneYear => 365,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            TimeWindow::All => "ALL",
            TimeWindow::OneMonth => "1M",
            TimeWindow::ThreeMonths => "3M",
            TimeWindow::SixMonths => "6M",
            TimeWindow::OneYear => "1Y",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            TimeWindow::All => "All time",
            TimeWindow::OneMonth => "Last month",
            TimeWindow::ThreeMonths => "Last 3 months",
            TimeWindow::SixMonths => "Last 6 months",
            TimeWindow::OneYear => "Last year",
        }
    }

    /// Earliest instant a bucket may start at, or `None` for `ALL`.
    pub fn cutoff(self, reference_now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self.days() {
            0 => None,
            days => Some(reference_now - Duration::days(days)),
        }
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TimeWindow {
    type Err = AggregateError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_uppercase();
        TimeWindow::ALL_WINDOWS
            .into_iter()
            .find(|window| window.name() == normalized)
            .ok_or_else(|| AggregateError::InvalidConfiguration {
                value: value.to_string(),
            })
    }
}
