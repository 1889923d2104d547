//! SQLite pool setup and schema bootstrap.

use anyhow::{Context, Result};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions},
    SqlitePool,
};
use std::{str::FromStr, time::Duration};
use tracing::{info_span, Instrument};

pub const SCHEMA_SQL: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/sql/schema.sql"));

/// Open (creating if absent) the database behind `dsn` and apply the schema.
///
/// # Errors
/// Returns an error if the DSN is invalid, the file cannot be opened, or the
/// schema fails to apply.
pub async fn connect(dsn: &str) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(dsn)
        .with_context(|| format!("Invalid database DSN: {dsn}"))?
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(5));

    let pool = SqlitePoolOptions::new()
        .min_connections(1)
        .max_connections(5)
        .test_before_acquire(true)
        .connect_with(options)
        .await
        .context("Failed to connect to database")?;

    apply_schema(&pool).await?;

    Ok(pool)
}

/// Create any missing tables and indexes.
///
/// # Errors
/// Returns an error if a schema statement fails.
pub async fn apply_schema(pool: &SqlitePool) -> Result<()> {
    let span = info_span!("db.query", db.system = "sqlite", db.operation = "SCHEMA");
    sqlx::raw_sql(SCHEMA_SQL)
        .execute(pool)
        .instrument(span)
        .await
        .context("Failed to apply database schema")?;

    Ok(())
}

/// Single-connection in-memory pool with the schema applied.
///
/// The connection never idles out, otherwise the in-memory database would be
/// dropped between queries.
#[cfg(test)]
pub(crate) async fn memory_pool() -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await?;
    apply_schema(&pool).await?;
    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::Row;

    #[tokio::test]
    async fn schema_is_idempotent() -> Result<()> {
        let pool = memory_pool().await?;
        apply_schema(&pool).await?;

        let row = sqlx::query(
            "SELECT COUNT(*) AS tables FROM sqlite_master WHERE type = 'table' AND name IN \
             ('users', 'university_applications', 'subject_grades', 'sessions')",
        )
        .fetch_one(&pool)
        .await?;
        let tables: i64 = row.get("tables");
        assert_eq!(tables, 4);
        Ok(())
    }

    #[tokio::test]
    async fn connect_creates_missing_file() -> Result<()> {
        let path = std::env::temp_dir().join(format!("gradpath-{}.db", ulid::Ulid::new()));
        let dsn = format!("sqlite://{}", path.display());

        let pool = connect(&dsn).await?;
        pool.close().await;
        assert!(path.exists());

        let _ = std::fs::remove_file(&path);
        Ok(())
    }
}
