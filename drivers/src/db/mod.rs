//! Database layer for driver persistence.
//!
//! ```text
//! ┌─────────────┐
//! │   Service   │  (service::DriverService - validation, hashing, tokens)
//! └──────┬──────┘
//!        │
//!        ↓
//! ┌─────────────┐
//! │ Repositories│  (db::handlers - queries, PostgreSQL or in-memory)
//! └──────┬──────┘
//!        │
//!        ↓
//! ┌─────────────┐
//! │   Models    │  (db::models - store records)
//! └─────────────┘
//! ```
//!
//! Migrations live in `migrations/` and are applied with [`crate::migrator`].

use std::time::Duration;

use sqlx::{PgPool, postgres::PgPoolOptions};
use tracing::info;

use crate::config::DatabaseConfig;

pub mod errors;
pub mod handlers;
pub mod models;

fn non_zero_secs(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}

/// Build a connection pool from the configured settings.
pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, errors::DbError> {
    let settings = &config.pool;
    let pool = PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .min_connections(settings.min_connections)
        .acquire_timeout(Duration::from_secs(settings.acquire_timeout_secs))
        .idle_timeout(non_zero_secs(settings.idle_timeout_secs))
        .max_lifetime(non_zero_secs(settings.max_lifetime_secs))
        .connect(&config.url)
        .await?;

    info!(max_connections = settings.max_connections, "Database pool ready");
    Ok(pool)
}
