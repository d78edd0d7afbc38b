use std::fmt;

use chrono::{Datelike, NaiveDate, NaiveDateTime, Weekday};
use serde::{Serialize, Serializer};

/// A record that may carry the date an application was sent.
pub trait ApplicationDated {
    /// UTC wall-clock time of the application, if one is known and valid.
    fn application_date(&self) -> Option<NaiveDateTime>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct JobPost {
    pub id: i64,
    pub company: String,
    pub job_title: String,
    pub status: String,
    pub application_date: Option<NaiveDateTime>,
}

impl ApplicationDated for JobPost {
    fn application_date(&self) -> Option<NaiveDateTime> {
        self.application_date
    }
}

impl<T: ApplicationDated> ApplicationDated for &T {
    fn application_date(&self) -> Option<NaiveDateTime> {
        T::application_date(self)
    }
}

/// First day of a calendar week, used as the bucket key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WeekStart(NaiveDate);

impl WeekStart {
    /// The latest `week_start` day at or before `date`.
    pub fn containing(date: NaiveDate, week_start: Weekday) -> Self {
        let offset = (date.weekday().num_days_from_monday() + 7
            - week_start.num_days_from_monday())
            % 7;
        WeekStart(date - chrono::Duration::days(i64::from(offset)))
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }
}

impl fmt::Display for WeekStart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl Serialize for WeekStart {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartPoint {
    pub date: WeekStart,
    pub count: u32,
    pub formatted_label: String,
}

/// Output of one aggregation pass, with the counters gathered along the way.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklySeries {
    pub points: Vec<ChartPoint>,
    pub total_records: usize,
    pub valid_records: usize,
    pub skipped_records: usize,
    pub buckets_before_window: usize,
}

impl WeeklySeries {
    pub fn total_applications(&self) -> u64 {
        self.points.iter().map(|point| u64::from(point.count)).sum()
    }

    pub fn busiest_week(&self) -> Option<&ChartPoint> {
        // Earliest week wins a tie.
        self.points
            .iter()
            .rev()
            .max_by_key(|point| point.count)
    }

    /// Mean applications over the weeks that had any.
    pub fn average_per_active_week(&self) -> f64 {
        if self.points.is_empty() {
            0.0
        } else {
            self.total_applications() as f64 / self.points.len() as f64
        }
    }
}
