//! # Batch Maintenance Engine
//!
//! Partitions a list of catalog objects into fixed-size batches and runs a
//! maintenance operation over every object, one concurrent worker per batch.
//!
//! ## Flow
//!
//! ```text
//! CatalogSource ─► partition ─► Dispatcher ─┬─► BatchWorker ─► MaintenanceExecutor
//!                                           ├─► BatchWorker ─► MaintenanceExecutor
//!                                           └─► ...
//!                    ResultReporter ◄── one WorkResult per object
//! ```
//!
//! The store-facing pieces ([`CatalogSource`], [`MaintenanceExecutor`]) are
//! injected capabilities so the engine can be driven by PostgreSQL in
//! production and by in-memory fakes in tests.

pub mod batcher;
pub mod dispatcher;
pub mod reporter;
pub mod run;
pub mod worker;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{ExecutionError, MaintenanceResult};

pub use batcher::{partition, Batch, DEFAULT_BATCH_SIZE};
pub use dispatcher::{Dispatcher, RunSummary};
pub use reporter::{ResultReporter, TracingReporter};
pub use run::MaintenanceRun;
pub use worker::{BatchReport, BatchWorker, WorkOutcome, WorkResult};

/// Name of one maintainable object, as read from the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectName(String);

impl ObjectName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ObjectName {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl From<String> for ObjectName {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// Supplies the ordered list of objects a run operates on.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn list_objects(&self) -> MaintenanceResult<Vec<ObjectName>>;
}

/// Performs the maintenance operation for a single object.
///
/// One instance is shared by every worker of a run, so implementations must
/// tolerate concurrent calls.
#[async_trait]
pub trait MaintenanceExecutor: Send + Sync {
    async fn perform(&self, object: &ObjectName) -> Result<(), ExecutionError>;

    /// Label used in log output
    fn operation(&self) -> &str {
        "maintenance"
    }
}
