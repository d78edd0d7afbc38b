use std::path::PathBuf;

use anyhow::Context;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use clap::{Args, Parser, Subcommand, ValueEnum};
use sqlx::postgres::PgPoolOptions;
use tracing::info;
use tracing_subscriber::EnvFilter;

use ladderly_weekly::{csv_source, db, report};
use ladderly_weekly::{AppConfig, ChartState, JobPost, TimeWindow, WeeklyAggregator};

#[derive(Parser)]
#[command(name = "ladderly-weekly")]
#[command(about = "Weekly job application charts for Ladderly job searches", long_about = None)]
struct Cli {
    /// TOML file with [aggregator] settings
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
#[group(required = true, multiple = false)]
struct Source {
    /// CSV export with company, job_title, status, application_date columns
    #[arg(long)]
    csv: Option<PathBuf>,
    /// Job search id in the Ladderly database
    #[arg(long)]
    job_search: Option<i32>,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Print weekly application counts
    Weekly {
        #[command(flatten)]
        source: Source,
        /// One of ALL, 1M, 3M, 6M, 1Y
        #[arg(long, default_value = "ALL")]
        period: String,
        /// Reference date for the trailing window (defaults to today, UTC)
        #[arg(long)]
        now: Option<NaiveDate>,
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
    /// Generate a markdown report
    Report {
        #[command(flatten)]
        source: Source,
        #[arg(long, default_value = "ALL")]
        period: String,
        #[arg(long)]
        now: Option<NaiveDate>,
        #[arg(long, default_value = "weekly-report.md")]
        out: PathBuf,
    },
    /// List the available time periods
    Periods,
}

fn reference_instant(now: Option<NaiveDate>) -> DateTime<Utc> {
    match now {
        Some(date) => date.and_time(NaiveTime::MIN).and_utc(),
        None => Utc::now(),
    }
}

/// Loads posts from the selected source, with a label for report headings.
async fn load_posts(
    source: &Source,
    config: &AppConfig,
) -> anyhow::Result<(Vec<JobPost>, Option<String>)> {
    if let Some(path) = &source.csv {
        let posts = csv_source::load_job_posts(path)?;
        info!(path = %path.display(), posts = posts.len(), "loaded job posts");
        return Ok((posts, Some(path.display().to_string())));
    }

    let job_search_id = source
        .job_search
        .context("either --csv or --job-search is required")?;
    let database_url = config
        .database_url
        .as_deref()
        .context("DATABASE_URL must be set to read job posts from Postgres")?;

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await
        .context("failed to connect to Postgres")?;

    let name = db::fetch_job_search_name(&pool, job_search_id)
        .await?
        .with_context(|| format!("job search {job_search_id} not found"))?;
    let posts = db::fetch_job_posts(&pool, job_search_id).await?;
    info!(job_search_id, posts = posts.len(), "loaded job posts");

    Ok((posts, Some(name)))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref())?;
    let aggregator = WeeklyAggregator::new(config.aggregator.clone());

    match cli.command {
        Commands::Weekly {
            source,
            period,
            now,
            format,
        } => {
            let window: TimeWindow = period.parse()?;
            let (posts, _) = load_posts(&source, &config).await?;
            let series = aggregator.aggregate(&posts, window, reference_instant(now));
            let state = ChartState::from_series(&series);

            match format {
                OutputFormat::Table => print!("{}", report::render_table(&state, window)),
                OutputFormat::Json => println!("{}", report::render_json(&state, &series, window)?),
            }
        }
        Commands::Report {
            source,
            period,
            now,
            out,
        } => {
            let window: TimeWindow = period.parse()?;
            let reference_now = reference_instant(now);
            let (posts, scope) = load_posts(&source, &config).await?;
            let series = aggregator.aggregate(&posts, window, reference_now);
            let report = report::build_report(scope.as_deref(), window, reference_now, &series);
            std::fs::write(&out, report)
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("Report written to {}.", out.display());
        }
        Commands::Periods => {
            for window in TimeWindow::ALL_WINDOWS {
                println!(
                    "{:<4} {:>4} days  {}",
                    window.name(),
                    window.days(),
                    window.description()
                );
            }
        }
    }

    Ok(())
}
