use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::PgPool;

use crate::config::{Config, StoreBackend};
use crate::store::{MemoryRecordStore, MoodRepo, PgRecordStore};

/// Opens the pool, checks the server answers, and applies migrations.
pub async fn create_pool(config: &Config) -> anyhow::Result<PgPool> {
    let options = config
        .database_url
        .parse::<PgConnectOptions>()
        .context("DATABASE_URL is not a valid Postgres URL")?
        .database(&config.database_name);

    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout_secs))
        .connect_with(options)
        .await
        .context("Failed to connect to the database")?;

    sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(&pool)
        .await
        .context("Database did not answer ping")?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;

    Ok(pool)
}

/// Builds the repository for the configured backend.
///
/// A Postgres connection failure is not fatal: the service falls back to
/// demo mode and every storage-backed endpoint answers 503.
pub async fn connect_repo(config: &Config) -> MoodRepo {
    match config.store_backend {
        StoreBackend::Memory => {
            tracing::info!("Using in-memory record store");
            MoodRepo::new(Arc::new(MemoryRecordStore::new()))
        }
        StoreBackend::Postgres => match create_pool(config).await {
            Ok(pool) => {
                tracing::info!(database = %config.database_name, "Database connection successful");
                MoodRepo::new(Arc::new(PgRecordStore::new(pool)))
            }
            Err(e) => {
                tracing::warn!(error = ?e, "Database connection failed, running in demo mode");
                MoodRepo::demo()
            }
        },
    }
}
