//! Error types for parallel-analyze.
//!
//! Run-level failures are [`MaintenanceError`] and abort the invocation.
//! Per-object failures are [`ExecutionError`] and only ever get reported.

use crate::maintenance::ObjectName;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum MaintenanceError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("Configuration error: {0}")]
    Configuration(String),
    #[error("Catalog unavailable: {0}")]
    CatalogUnavailable(String),
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Executor unavailable: {0}")]
    ExecutorUnavailable(String),
    #[error("Worker for batch {batch_index} did not complete: {reason}")]
    WorkerJoin { batch_index: usize, reason: String },
}

impl From<sqlx::Error> for MaintenanceError {
    fn from(err: sqlx::Error) -> Self {
        MaintenanceError::DatabaseError(err.to_string())
    }
}

impl From<config::ConfigError> for MaintenanceError {
    fn from(err: config::ConfigError) -> Self {
        MaintenanceError::Configuration(err.to_string())
    }
}

pub type MaintenanceResult<T> = std::result::Result<T, MaintenanceError>;

/// Failure of the maintenance operation for a single object.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExecutionError {
    /// The store rejected the operation for this object; batch-mates are unaffected
    #[error("Maintenance failed for {object}: {cause}")]
    Failed { object: ObjectName, cause: String },
    /// The shared executor can no longer reach the store
    #[error("Executor unavailable while processing {object}: {cause}")]
    Unavailable { object: ObjectName, cause: String },
}

impl ExecutionError {
    pub fn failed(object: &ObjectName, cause: impl Into<String>) -> Self {
        ExecutionError::Failed {
            object: object.clone(),
            cause: cause.into(),
        }
    }

    pub fn unavailable(object: &ObjectName, cause: impl Into<String>) -> Self {
        ExecutionError::Unavailable {
            object: object.clone(),
            cause: cause.into(),
        }
    }

    pub fn object(&self) -> &ObjectName {
        match self {
            ExecutionError::Failed { object, .. } | ExecutionError::Unavailable { object, .. } => {
                object
            }
        }
    }

    /// Fatal errors fail the whole run once every worker has finished.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ExecutionError::Unavailable { .. })
    }
}
