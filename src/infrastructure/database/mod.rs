//! PostgreSQL adapter: pool, schema migrations and the unit of work.

pub mod unit_of_work;

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::instrument;

use crate::config::DatabaseSettings;

pub use unit_of_work::{PgUnitOfWork, TransactionContext};

/// Open a pool sized by `settings`. Fails if the first connection cannot be
/// established within `acquire_timeout` seconds.
#[instrument(skip_all, fields(
    max_connections = settings.max_connections,
    min_connections = settings.min_connections,
))]
pub async fn create_pool(settings: &DatabaseSettings) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .min_connections(settings.min_connections)
        .acquire_timeout(Duration::from_secs(settings.acquire_timeout))
        .connect(&settings.url)
        .await?;
    tracing::debug!(size = pool.size(), "pool connected");
    Ok(pool)
}

/// Apply the embedded schema in `migrations/`.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    let migrator = sqlx::migrate!("./migrations");
    migrator.run(pool).await?;
    tracing::info!(count = migrator.iter().count(), "schema up to date");
    Ok(())
}
