//! Weekly job-application aggregation for Ladderly job searches.
//!
//! Job posts come from a Ladderly Postgres database or a CSV export, are
//! bucketed into calendar weeks by [`weekly::WeeklyAggregator`], and are
//! rendered as a terminal chart, JSON, or a markdown report.

pub mod chart;
pub mod config;
pub mod csv_source;
pub mod db;
pub mod error;
pub mod models;
pub mod report;
pub mod weekly;
pub mod window;

pub use chart::{ChartState, EmptyReason};
pub use config::{AggregatorConfig, AppConfig};
pub use error::AggregateError;
pub use models::{ApplicationDated, ChartPoint, JobPost, WeekStart, WeeklySeries};
pub use weekly::WeeklyAggregator;
pub use window::TimeWindow;
