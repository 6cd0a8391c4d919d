use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};
use tracing::info;

use crate::config::DatabaseConfig;
use crate::error::MaintenanceResult;

/// PostgreSQL connection pool.
///
/// The catalog query uses a pool of `max_connections`; the executor pool is
/// opened with [`DatabaseConnection::connect_with_pool_size`] so every running
/// worker holds its own connection.
#[derive(Debug, Clone)]
pub struct DatabaseConnection {
    pool: PgPool,
}

impl DatabaseConnection {
    pub async fn connect(config: &DatabaseConfig) -> MaintenanceResult<Self> {
        Self::connect_with_pool_size(config, config.max_connections).await
    }

    pub async fn connect_with_pool_size(
        config: &DatabaseConfig,
        max_connections: u32,
    ) -> MaintenanceResult<Self> {
        let options = config.connect_options()?;
        let max_connections = max_connections.max(1);

        info!(
            target_db = %config.redacted_connection_string(),
            max_connections,
            "Connecting to database"
        );

        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(config.acquire_timeout())
            .connect_with(options)
            .await?;

        Ok(Self { pool })
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn health_check(&self) -> MaintenanceResult<bool> {
        let row = sqlx::query("SELECT 1 as health")
            .fetch_one(&self.pool)
            .await?;

        let health: i32 = row.get("health");
        Ok(health == 1)
    }

    pub async fn close(self) {
        self.pool.close().await;
    }
}
