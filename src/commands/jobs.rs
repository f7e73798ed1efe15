//! Jobs command - Background job management.
//!
//! ```bash
//! # Run the email and notification workers
//! address-book-api jobs work
//!
//! # Job counts per queue and status
//! address-book-api jobs list
//!
//! # Remove failed jobs, optionally from one queue
//! address-book-api jobs clear --queue emails
//! ```

use sea_orm::{ConnectionTrait, DatabaseConnection, DbBackend, Statement};

use crate::cli::args::{JobsAction, JobsArgs};
use crate::config::{Config, QUEUE_EMAILS, QUEUE_NOTIFICATIONS};
use crate::errors::{AppError, AppResult};
use crate::infra::{Database, JobQueue};
use crate::jobs::JobRunner;

/// Execute the jobs command
pub async fn execute(args: JobsArgs, config: Config) -> AppResult<()> {
    match args.action {
        JobsAction::Work => run_worker(&config).await,
        JobsAction::List => list_jobs(&config).await,
        JobsAction::Clear { queue } => clear_failed_jobs(&config, queue.as_deref()).await,
    }
}

/// Run the workers until Ctrl+C
async fn run_worker(config: &Config) -> AppResult<()> {
    let queue = JobQueue::connect(&config.database_url).await?;
    let runner = JobRunner::start(&queue);

    tracing::info!("Job worker started. Press Ctrl+C to stop.");

    tokio::signal::ctrl_c()
        .await
        .map_err(|e| AppError::internal(format!("Failed to listen for Ctrl+C: {}", e)))?;

    tracing::info!("Received shutdown signal, stopping worker...");
    runner.stop().await
}

async fn connect(config: &Config) -> AppResult<Option<DatabaseConnection>> {
    let db = Database::connect_without_migrations(config)
        .await?
        .get_connection();

    let row = db
        .query_one(Statement::from_string(
            DbBackend::Postgres,
            "SELECT EXISTS(SELECT 1 FROM information_schema.schemata WHERE schema_name = 'apalis') AS exists"
                .to_string(),
        ))
        .await?;

    let initialized = row
        .and_then(|r| r.try_get::<bool>("", "exists").ok())
        .unwrap_or(false);

    Ok(initialized.then_some(db))
}

/// Print pending/running/failed/done counts for each queue
async fn list_jobs(config: &Config) -> AppResult<()> {
    let Some(db) = connect(config).await? else {
        println!("Job queue not initialized. Run 'jobs work' or 'serve' first.");
        return Ok(());
    };

    let rows = db
        .query_all(Statement::from_string(
            DbBackend::Postgres,
            "SELECT job_type, status::text AS status, COUNT(*)::bigint AS count \
             FROM apalis.jobs GROUP BY job_type, status ORDER BY job_type, status"
                .to_string(),
        ))
        .await?;

    println!("\n{:<16} {:<10} {:>8}", "QUEUE", "STATUS", "COUNT");
    for queue in [QUEUE_EMAILS, QUEUE_NOTIFICATIONS] {
        let mut any = false;
        for row in &rows {
            let (Ok(job_type), Ok(status), Ok(count)) = (
                row.try_get::<String>("", "job_type"),
                row.try_get::<String>("", "status"),
                row.try_get::<i64>("", "count"),
            ) else {
                continue;
            };
            if job_type == queue {
                println!("{:<16} {:<10} {:>8}", queue, status, count);
                any = true;
            }
        }
        if !any {
            println!("{:<16} {:<10} {:>8}", queue, "-", 0);
        }
    }
    println!();

    Ok(())
}

/// Delete failed jobs
async fn clear_failed_jobs(config: &Config, queue: Option<&str>) -> AppResult<()> {
    if let Some(name) = queue {
        if name != QUEUE_EMAILS && name != QUEUE_NOTIFICATIONS {
            return Err(AppError::bad_request(format!("Unknown queue '{}'", name)));
        }
    }

    let Some(db) = connect(config).await? else {
        println!("Job queue not initialized. Nothing to clear.");
        return Ok(());
    };

    let statement = match queue {
        Some(name) => Statement::from_sql_and_values(
            DbBackend::Postgres,
            "DELETE FROM apalis.jobs WHERE status = 'Failed' AND job_type = $1",
            [name.into()],
        ),
        None => Statement::from_string(
            DbBackend::Postgres,
            "DELETE FROM apalis.jobs WHERE status = 'Failed'".to_string(),
        ),
    };

    let cleared = db.execute(statement).await?.rows_affected();
    println!("Cleared {} failed job(s).", cleared);

    Ok(())
}
