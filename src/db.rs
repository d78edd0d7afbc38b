use anyhow::Context;
use chrono::NaiveDateTime;
use sqlx::{PgPool, Row};
use tracing::debug;

use crate::models::JobPost;

/// Name of a job search, or `None` when the id is unknown.
pub async fn fetch_job_search_name(
    pool: &PgPool,
    job_search_id: i32,
) -> anyhow::Result<Option<String>> {
    let row = sqlx::query(r#"SELECT "name" FROM "JobSearch" WHERE "id" = $1"#)
        .bind(job_search_id)
        .fetch_optional(pool)
        .await
        .context("failed to look up job search")?;

    Ok(row.map(|row| row.get("name")))
}

/// Every post in a job search, unpaginated.
pub async fn fetch_job_posts(pool: &PgPool, job_search_id: i32) -> anyhow::Result<Vec<JobPost>> {
    let records = sqlx::query(
        r#"
        SELECT "id", "company", "jobTitle", "status"::text AS "status", "initialApplicationDate"
        FROM "JobPostForCandidate"
        WHERE "jobSearchId" = $1
        ORDER BY "id"
        "#,
    )
    .bind(job_search_id)
    .fetch_all(pool)
    .await
    .context("failed to fetch job posts")?;

    let mut posts = Vec::with_capacity(records.len());

    for row in records {
        let id: i32 = row.get("id");
        let application_date: Option<NaiveDateTime> = row.get("initialApplicationDate");
        posts.push(JobPost {
            id: i64::from(id),
            company: row.get("company"),
            job_title: row.get("jobTitle"),
            status: row.get("status"),
            application_date,
        });
    }

    debug!(job_search_id, posts = posts.len(), "fetched job posts");
    Ok(posts)
}
