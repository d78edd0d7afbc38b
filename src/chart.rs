use serde::Serialize;

use crate::models::{ChartPoint, WeeklySeries};
use crate::window::TimeWindow;

pub const CHART_TITLE: &str = "Weekly Applications";
pub const EMPTY_MESSAGE: &str = "No application data available for the selected period.";

/// Why a chart has nothing to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyReason {
    NoRecords,
    NoValidDates,
    NoDataInWindow,
}

impl EmptyReason {
    pub fn message(self) -> &'static str {
        match self {
            EmptyReason::NoRecords => "No job posts found.",
            EmptyReason::NoValidDates => "No job posts have an application date yet.",
            EmptyReason::NoDataInWindow => EMPTY_MESSAGE,
        }
    }

    /// Follow-up suggestion shown under the message, if any applies.
    pub fn hint(self, window: TimeWindow) -> Option<&'static str> {
        match self {
            EmptyReason::NoDataInWindow if window != TimeWindow::All => {
                Some("Try selecting a different time period such as \"ALL\".")
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChartState {
    Loading,
    Empty(EmptyReason),
    Ready(Vec<ChartPoint>),
}

impl ChartState {
    pub fn from_series(series: &WeeklySeries) -> Self {
        if !series.points.is_empty() {
            ChartState::Ready(series.points.clone())
        } else if series.total_records == 0 {
            ChartState::Empty(EmptyReason::NoRecords)
        } else if series.valid_records == 0 {
            ChartState::Empty(EmptyReason::NoValidDates)
        } else {
            ChartState::Empty(EmptyReason::NoDataInWindow)
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ChartState::Loading => "loading",
            ChartState::Empty(_) => "empty",
            ChartState::Ready(_) => "ready",
        }
    }

    pub fn empty_reason(&self) -> Option<EmptyReason> {
        match self {
            ChartState::Empty(reason) => Some(*reason),
            _ => None,
        }
    }

    pub fn points(&self) -> &[ChartPoint] {
        match self {
            ChartState::Ready(points) => points,
            _ => &[],
        }
    }
}

/// Hover text for one bar, e.g. "3 applications".
pub fn tooltip(point: &ChartPoint) -> String {
    let suffix = if point.count == 1 { "" } else { "s" };
    format!("{} application{}", point.count, suffix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc, Weekday};

    use crate::models::{JobPost, WeekStart};
    use crate::weekly::WeeklyAggregator;

    fn point(count: u32) -> ChartPoint {
        ChartPoint {
            date: WeekStart::containing(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), Weekday::Mon),
            count,
            formatted_label: "Jan 1".to_string(),
        }
    }

    #[test]
    fn ready_when_points_exist() {
        let series = WeeklySeries {
            points: vec![point(2)],
            total_records: 2,
            valid_records: 2,
            skipped_records: 0,
            buckets_before_window: 1,
        };
        assert_eq!(ChartState::from_series(&series), ChartState::Ready(vec![point(2)]));
    }

    #[test]
    fn distinguishes_empty_reasons() {
        let none = WeeklySeries::default();
        assert_eq!(
            ChartState::from_series(&none),
            ChartState::Empty(EmptyReason::NoRecords)
        );

        let undated = WeeklySeries {
            total_records: 3,
            skipped_records: 3,
            ..WeeklySeries::default()
        };
        assert_eq!(
            ChartState::from_series(&undated),
            ChartState::Empty(EmptyReason::NoValidDates)
        );

        let filtered = WeeklySeries {
            total_records: 3,
            valid_records: 3,
            buckets_before_window: 2,
            ..WeeklySeries::default()
        };
        assert_eq!(
            ChartState::from_series(&filtered),
            ChartState::Empty(EmptyReason::NoDataInWindow)
        );
    }

    #[test]
    fn suggests_all_only_when_window_is_narrower() {
        assert!(EmptyReason::NoDataInWindow
            .hint(TimeWindow::ThreeMonths)
            .unwrap()
            .contains("\"ALL\""));
        assert_eq!(EmptyReason::NoDataInWindow.hint(TimeWindow::All), None);
        assert_eq!(EmptyReason::NoRecords.hint(TimeWindow::ThreeMonths), None);
    }

    #[test]
    fn no_records_message_does_not_mention_a_period() {
        assert_eq!(EmptyReason::NoRecords.message(), "No job posts found.");
        assert_eq!(EmptyReason::NoDataInWindow.message(), EMPTY_MESSAGE);
    }

    #[test]
    fn tooltip_pluralizes() {
        assert_eq!(tooltip(&point(1)), "1 application");
        assert_eq!(tooltip(&point(4)), "4 applications");
    }

    #[test]
    fn aggregated_posts_outside_the_window_are_empty_in_window() {
        let posts: Vec<JobPost> = [(2023, 10, 2), (2023, 11, 15)]
            .into_iter()
            .enumerate()
            .map(|(i, (y, m, d))| JobPost {
                id: i as i64 + 1,
                company: "Acme".to_string(),
                job_title: "Engineer".to_string(),
                status: "APPLIED".to_string(),
                application_date: NaiveDate::from_ymd_opt(y, m, d)
                    .and_then(|date| date.and_hms_opt(10, 0, 0)),
            })
            .collect();
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let aggregator = WeeklyAggregator::default();

        let series = aggregator.aggregate(&posts, TimeWindow::OneMonth, now);
        let state = ChartState::from_series(&series);
        assert_eq!(state, ChartState::Empty(EmptyReason::NoDataInWindow));
        assert!(EmptyReason::NoDataInWindow
            .hint(TimeWindow::OneMonth)
            .unwrap()
            .contains("\"ALL\""));

        let everything = aggregator.aggregate(&posts, TimeWindow::All, now);
        assert_eq!(ChartState::from_series(&everything).points().len(), 2);
    }

    #[test]
    fn aggregated_undated_posts_have_no_valid_dates() {
        let posts = vec![JobPost {
            id: 1,
            company: "Acme".to_string(),
            job_title: "Engineer".to_string(),
            status: "APPLIED".to_string(),
            application_date: None,
        }];
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();

        let series = WeeklyAggregator::default().aggregate(&posts, TimeWindow::All, now);
        assert_eq!(
            ChartState::from_series(&series),
            ChartState::Empty(EmptyReason::NoValidDates)
        );

        let none: Vec<JobPost> = Vec::new();
        let series = WeeklyAggregator::default().aggregate(&none, TimeWindow::All, now);
        assert_eq!(
            ChartState::from_series(&series),
            ChartState::Empty(EmptyReason::NoRecords)
        );
    }

    #[test]
    fn state_kind_and_reason() {
        assert_eq!(ChartState::Loading.kind(), "loading");
        assert_eq!(ChartState::Ready(vec![point(1)]).kind(), "ready");
        let empty = ChartState::Empty(EmptyReason::NoValidDates);
        assert_eq!(empty.kind(), "empty");
        assert_eq!(empty.empty_reason(), Some(EmptyReason::NoValidDates));
        assert_eq!(ChartState::Loading.empty_reason(), None);
    }

    #[test]
    fn non_ready_states_have_no_points() {
        assert!(ChartState::Loading.points().is_empty());
        assert!(ChartState::Empty(EmptyReason::NoRecords).points().is_empty());
    }
}
