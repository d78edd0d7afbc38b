use std::io::Read;
use std::path::Path;

use anyhow::Context;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::models::JobPost;

#[derive(Debug, Deserialize)]
struct CsvRow {
    id: Option<i64>,
    company: String,
    #[serde(default)]
    job_title: String,
    #[serde(default)]
    status: String,
    application_date: Option<String>,
}

/// Lenient date parsing. Anything unrecognized is treated as "no date".
pub fn parse_application_date(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.naive_utc());
    }

    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(value, format) {
            return Some(parsed);
        }
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .map(|date| date.and_time(chrono::NaiveTime::MIN))
}

pub fn read_job_posts<R: Read>(reader: R) -> anyhow::Result<Vec<JobPost>> {
    let mut reader = csv::Reader::from_reader(reader);
    let mut posts = Vec::new();

    for (index, result) in reader.deserialize::<CsvRow>().enumerate() {
        let row = result.with_context(|| format!("malformed CSV row {}", index + 1))?;
        let application_date = row
            .application_date
            .as_deref()
            .and_then(parse_application_date);

        if application_date.is_none() {
            if let Some(raw) = row
                .application_date
                .as_deref()
                .filter(|raw| !raw.trim().is_empty())
            {
                warn!(row = index + 1, value = raw, "unrecognized application date");
            }
        }

        posts.push(JobPost {
            id: row.id.unwrap_or(index as i64 + 1),
            company: row.company,
            job_title: row.job_title,
            status: row.status,
            application_date,
        });
    }

    debug!(rows = posts.len(), "read job posts from CSV");
    Ok(posts)
}

pub fn load_job_posts(path: &Path) -> anyhow::Result<Vec<JobPost>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    read_job_posts(file)
}
