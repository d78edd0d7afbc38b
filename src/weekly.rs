use std::collections::BTreeMap;
use std::fmt::Write;

use chrono::{DateTime, Utc};
use tracing::{debug, trace};

use crate::config::AggregatorConfig;
use crate::error::AggregateError;
use crate::models::{ApplicationDated, ChartPoint, WeekStart, WeeklySeries};
use crate::window::TimeWindow;

/// Skipped records beyond this many are counted but not logged one by one.
const SKIP_LOG_LIMIT: usize = 5;

/// Buckets dated records into weeks and trims them to a trailing window.
///
/// Stateless apart from its configuration: every call rebuilds the series
/// from scratch, so the same inputs always give the same output.
#[derive(Debug, Clone, Default)]
pub struct WeeklyAggregator {
    config: AggregatorConfig,
}

impl WeeklyAggregator {
    pub fn new(config: AggregatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AggregatorConfig {
        &self.config
    }

    /// Parses `period` before aggregating; unknown names are a configuration error.
    pub fn aggregate_period<I>(
        &self,
        records: I,
        period: &str,
        reference_now: DateTime<Utc>,
    ) -> Result<WeeklySeries, AggregateError>
    where
        I: IntoIterator,
        I::Item: ApplicationDated,
    {
        let window = period.parse::<TimeWindow>()?;
        Ok(self.aggregate(records, window, reference_now))
    }

    pub fn aggregate<I>(
        &self,
        records: I,
        window: TimeWindow,
        reference_now: DateTime<Utc>,
    ) -> WeeklySeries
    where
        I: IntoIterator,
        I::Item: ApplicationDated,
    {
        let mut counts: BTreeMap<WeekStart, u32> = BTreeMap::new();
        let mut total_records = 0usize;
        let mut skipped_records = 0usize;

        for (index, record) in records.into_iter().enumerate() {
            total_records += 1;
            let Some(applied_at) = record.application_date() else {
                skipped_records += 1;
                if skipped_records <= SKIP_LOG_LIMIT {
                    trace!(index, "record has no usable application date");
                }
                continue;
            };

            let key = WeekStart::containing(applied_at.date(), self.config.week_start);
            *counts.entry(key).or_insert(0) += 1;
        }

        let valid_records = total_records - skipped_records;
        let buckets_before_window = counts.len();
        debug!(
            total_records,
            valid_records,
            skipped_records,
            weeks = buckets_before_window,
            "bucketed application dates"
        );

        if let Some(cutoff) = window.cutoff(reference_now) {
            counts.retain(|week, _| week_start_instant(*week) >= cutoff);
            debug!(
                window = %window,
                cutoff = %cutoff,
                before = buckets_before_window,
                after = counts.len(),
                "filtered weeks to trailing window"
            );
        }

        let points = counts
            .into_iter()
            .map(|(date, count)| ChartPoint {
                date,
                count,
                formatted_label: self.format_label(date),
            })
            .collect();

        WeeklySeries {
            points,
            total_records,
            valid_records,
            skipped_records,
            buckets_before_window,
        }
    }

    pub fn format_label(&self, week: WeekStart) -> String {
        let mut label = String::new();
        match write!(label, "{}", week.date().format(self.config.label_format())) {
            Ok(()) => label,
            // Unreachable for validated formats.
            Err(_) => week.to_string(),
        }
    }
}

fn week_start_instant(week: WeekStart) -> DateTime<Utc> {
    week.date().and_time(chrono::NaiveTime::MIN).and_utc()
}
