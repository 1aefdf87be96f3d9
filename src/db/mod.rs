//! Database pool, repositories and models.

pub mod models;
pub mod speakers;
pub mod users;

use sqlx::postgres::{PgPool, PgPoolOptions};

use crate::config::Config;
use crate::error::AppError;
pub use speakers::SpeakerRepository;
pub use users::AccountRepository;

/// Combined database context with all repositories
#[derive(Debug, Clone)]
pub struct Database {
    pub accounts: AccountRepository,
    pub speakers: SpeakerRepository,
    pool: PgPool,
}

impl Database {
    pub fn new(pool: PgPool) -> Self {
        Self {
            accounts: AccountRepository::new(pool.clone()),
            speakers: SpeakerRepository::new(pool.clone()),
            pool,
        }
    }

    /// Get the underlying connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Check database health by executing a simple query
    pub async fn health_check(&self) -> bool {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .is_ok()
    }
}

/// Create database connection pool with configuration
pub async fn create_pool(config: &Config) -> Result<PgPool, AppError> {
    PgPoolOptions::new()
        .min_connections(config.db_pool_min)
        .max_connections(config.db_pool_max)
        .acquire_timeout(config.db_connect_timeout())
        .connect(&config.database_url())
        .await
        .map_err(Into::into)
}
