//! Catalog source backed by `information_schema`.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

use crate::error::{MaintenanceError, MaintenanceResult};
use crate::maintenance::{CatalogSource, ObjectName};

const LIST_TABLES_SQL: &str = "SELECT table_name::text \
     FROM information_schema.tables \
     WHERE table_schema = $1 AND table_type = 'BASE TABLE' \
     ORDER BY table_name";

/// Lists the base tables of one schema, ordered by name.
#[derive(Debug, Clone)]
pub struct PgCatalog {
    pool: PgPool,
    schema: String,
}

impl PgCatalog {
    pub fn new(pool: PgPool, schema: impl Into<String>) -> Self {
        Self {
            pool,
            schema: schema.into(),
        }
    }

    pub fn schema(&self) -> &str {
        &self.schema
    }
}

#[async_trait]
impl CatalogSource for PgCatalog {
    async fn list_objects(&self) -> MaintenanceResult<Vec<ObjectName>> {
        let names: Vec<String> = sqlx::query_scalar(LIST_TABLES_SQL)
            .bind(&self.schema)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                MaintenanceError::CatalogUnavailable(format!(
                    "listing tables in schema '{}': {e}",
                    self.schema
                ))
            })?;

        debug!(schema = %self.schema, tables = names.len(), "Listed tables");
        Ok(names.into_iter().map(ObjectName::from).collect())
    }
}
