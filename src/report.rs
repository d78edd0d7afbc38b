use std::fmt::Write;

use chrono::{DateTime, Utc};
use serde_json::json;

use crate::chart::{self, ChartState, CHART_TITLE};
use crate::models::WeeklySeries;
use crate::window::TimeWindow;

const BAR_WIDTH: u32 = 40;

fn bar(count: u32, max: u32) -> String {
    let width = if max <= BAR_WIDTH {
        count
    } else {
        // Keep every non-empty week visible.
        ((count * BAR_WIDTH) / max).max(1)
    };
    "#".repeat(width as usize)
}

fn write_empty_state(output: &mut String, state: &ChartState, window: TimeWindow) {
    if let ChartState::Empty(reason) = state {
        let _ = writeln!(output, "{}", reason.message());
        if let Some(hint) = reason.hint(window) {
            let _ = writeln!(output, "{hint}");
        }
    } else if let ChartState::Loading = state {
        let _ = writeln!(output, "Loading application data...");
    }
}

/// Plain-text bar chart for the terminal.
pub fn render_table(state: &ChartState, window: TimeWindow) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "{} ({})", CHART_TITLE, window.description());

    let points = state.points();
    if points.is_empty() {
        write_empty_state(&mut output, state, window);
        return output;
    }

    let max = points.iter().map(|point| point.count).max().unwrap_or(1);
    for point in points {
        let _ = writeln!(
            output,
            "{:<8} {}  {:>4}  {}",
            point.formatted_label,
            point.date,
            point.count,
            bar(point.count, max)
        );
    }

    output
}

pub fn render_json(
    state: &ChartState,
    series: &WeeklySeries,
    window: TimeWindow,
) -> serde_json::Result<String> {
    let value = json!({
        "period": window,
        "periodDays": window.days(),
        "state": state.kind(),
        "emptyReason": state.empty_reason(),
        "points": state.points(),
        "diagnostics": {
            "totalRecords": series.total_records,
            "validRecords": series.valid_records,
            "skippedRecords": series.skipped_records,
            "weeksBeforeWindow": series.buckets_before_window,
        },
    });
    serde_json::to_string_pretty(&value)
}

pub fn build_report(
    scope: Option<&str>,
    window: TimeWindow,
    reference_now: DateTime<Utc>,
    series: &WeeklySeries,
) -> String {
    let state = ChartState::from_series(series);
    let mut output = String::new();
    let scope_label = scope.unwrap_or("all job posts");

    let _ = writeln!(output, "# Job Search Weekly Report");
    let _ = writeln!(
        output,
        "Generated for {} ({}, as of {})",
        scope_label,
        window.description().to_lowercase(),
        reference_now.date_naive()
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "## {CHART_TITLE}");

    match &state {
        ChartState::Ready(points) => {
            let _ = writeln!(output, "| Week of | Start date | Applications |");
            let _ = writeln!(output, "| --- | --- | ---: |");
            for point in points {
                let _ = writeln!(
                    output,
                    "| {} | {} | {} |",
                    point.formatted_label, point.date, point.count
                );
            }
        }
        _ => write_empty_state(&mut output, &state, window),
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Summary");
    let _ = writeln!(
        output,
        "- Applications in period: {}",
        series.total_applications()
    );
    let _ = writeln!(output, "- Active weeks: {}", series.points.len());
    if let Some(busiest) = series.busiest_week() {
        let _ = writeln!(
            output,
            "- Busiest week: {} ({})",
            busiest.date,
            chart::tooltip(busiest)
        );
        let _ = writeln!(
            output,
            "- Average per active week: {:.1}",
            series.average_per_active_week()
        );
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Data Quality");
    let _ = writeln!(
        output,
        "- {} of {} job posts had an application date",
        series.valid_records, series.total_records
    );
    if series.skipped_records > 0 {
        let _ = writeln!(
            output,
            "- {} job posts skipped for a missing or invalid date",
            series.skipped_records
        );
    }

    output
}
