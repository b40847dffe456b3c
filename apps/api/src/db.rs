use anyhow::Result;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

/// Creates and returns a PostgreSQL connection pool.
pub async fn create_pool(database_url: &str) -> Result<PgPool> {
    info!("Connecting to PostgreSQL...");

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(std::time::Duration::from_secs(5))
        .connect(database_url)
        .await?;

    let (job_count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM job_postings")
        .fetch_one(&pool)
        .await?;
    info!("PostgreSQL connection pool established ({job_count} job postings)");
    Ok(pool)
}
