// Database module - provides data access layer

use color_eyre::Result;
use sqlx::postgres::PgPoolOptions;

// Re-export models for convenience
pub mod models;
pub use models::*;

// Internal modules
mod activity;
mod migrations;
mod question;
mod user;

pub use activity::{HistoryFilter, HistorySort, NewActivity};

// Main database handle
#[derive(Clone)]
pub struct Db {
    pool: sqlx::PgPool,
}

impl Db {
    pub async fn new(url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new().max_connections(8).connect(url).await?;

        // Verify connection
        let one: i32 = sqlx::query_scalar("SELECT 1").fetch_one(&pool).await?;
        assert_eq!(one, 1);

        migrations::run(&pool).await?;

        tracing::info!("database connection has been verified");

        Ok(Self { pool })
    }

    /// Build a handle without touching the network. No migrations run; the
    /// first query will fail if the server is unreachable. Used by tests that
    /// only exercise routing.
    pub fn connect_lazy(url: &str) -> Result<Self> {
        let pool = sqlx::PgPool::connect_lazy(url)?;
        Ok(Self { pool })
    }

    pub async fn migration_applied(&self, version: &str) -> Result<bool> {
        let applied: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM schema_migrations WHERE version = $1)",
        )
        .bind(version)
        .fetch_one(&self.pool)
        .await?;

        Ok(applied)
    }
}
