//! Maintenance executor that refreshes planner statistics with `ANALYZE`.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::error::ExecutionError;
use crate::maintenance::{MaintenanceExecutor, ObjectName};

/// Runs `ANALYZE "schema"."table"` through the shared pool.
///
/// `PgPool` is internally synchronized, so one instance serves all workers.
#[derive(Debug, Clone)]
pub struct AnalyzeExecutor {
    pool: PgPool,
    schema: String,
}

impl AnalyzeExecutor {
    pub fn new(pool: PgPool, schema: impl Into<String>) -> Self {
        Self {
            pool,
            schema: schema.into(),
        }
    }

    pub fn statement_for(&self, object: &ObjectName) -> String {
        format!(
            "ANALYZE {}.{}",
            quote_identifier(&self.schema),
            quote_identifier(object.as_str())
        )
    }
}

#[async_trait]
impl MaintenanceExecutor for AnalyzeExecutor {
    async fn perform(&self, object: &ObjectName) -> Result<(), ExecutionError> {
        let statement = self.statement_for(object);
        sqlx::query(&statement)
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(|e| classify_error(object, e))
    }

    fn operation(&self) -> &str {
        "ANALYZE"
    }
}

/// Quote a PostgreSQL identifier, doubling any embedded quotes.
pub fn quote_identifier(identifier: &str) -> String {
    format!("\"{}\"", identifier.replace('"', "\"\""))
}

/// Only a closed pool means no further object can succeed. A broken socket
/// loses one connection, and the pool replaces it on the next acquire.
fn classify_error(object: &ObjectName, err: sqlx::Error) -> ExecutionError {
    match err {
        sqlx::Error::PoolClosed => ExecutionError::unavailable(object, err.to_string()),
        other => ExecutionError::failed(object, other.to_string()),
    }
}
