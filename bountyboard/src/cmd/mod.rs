pub mod migrate;
pub mod server;

use anyhow::{Context, Result};
use sqlx::{postgres::Postgres, Pool};
use std::env;

/// Opens the connection pool from `DATABASE_URL`.
pub async fn connect_database() -> Result<Pool<Postgres>> {
    let database_url: String = env::var("DATABASE_URL").with_context(|| {
        let message = "DATABASE_URL must be configured.";
        tracing::error!(message);
        message
    })?;

    let pool: Pool<Postgres> = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .with_context(|| {
            let message = "Failed to create database connection pool.";
            tracing::error!(message);
            message
        })?;

    Ok(pool)
}
