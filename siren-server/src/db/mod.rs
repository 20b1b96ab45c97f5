//! Database access for siren
//!
//! Incident records live in a single `ecases` table inside a SQLite database
//! reached through a connection string.

pub mod cases;

pub use cases::{CaseStore, SqliteCaseStore};

use anyhow::{Context, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

/// Initialize database connection pool and create tables
///
/// The database file and its parent directory are created when missing.
pub async fn init_database_pool(database_url: &str) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)
        .with_context(|| format!("Invalid database URL: {}", database_url))?
        .create_if_missing(true);

    // In-memory filenames have no parent directory
    if let Some(parent) = options.get_filename().parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
    }

    tracing::debug!("Connecting to database: {}", database_url);
    let pool = SqlitePoolOptions::new()
        .connect_with(options)
        .await
        .context("Failed to open database")?;

    init_tables(&pool).await?;

    Ok(pool)
}

/// Single-connection in-memory pool with tables created
///
/// One connection only: every `sqlite::memory:` connection is a separate
/// database.
pub async fn init_memory_pool() -> Result<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await?;

    init_tables(&pool).await?;

    Ok(pool)
}

/// Create the `ecases` table if it doesn't exist
pub async fn init_tables(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS ecases (
            id TEXT PRIMARY KEY,
            name TEXT,
            department TEXT,
            time TEXT,
            priority TEXT,
            location TEXT,
            summary TEXT,
            status TEXT,
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_ecases_department_time ON ecases (department, time)",
    )
    .execute(pool)
    .await?;

    tracing::info!("Database tables initialized (ecases)");

    Ok(())
}
