/// Database access layer
///
/// Repositories expose free functions over `&PgPool`, one module per
/// aggregate. All cross-entity joins live here; services compose them.
pub mod comment_repo;
pub mod like_repo;
pub mod subscription_repo;
pub mod tweet_repo;
pub mod user_repo;
pub mod video_repo;

use crate::config::DatabaseConfig;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;

/// Build the shared connection pool from configuration.
pub async fn create_pool(cfg: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(cfg.max_connections)
        .acquire_timeout(Duration::from_secs(cfg.acquire_timeout_secs))
        .connect(&cfg.url)
        .await?;

    tracing::info!(max_connections = cfg.max_connections, "database pool ready");
    Ok(pool)
}

/// Apply pending schema migrations.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
