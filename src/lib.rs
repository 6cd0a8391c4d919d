#![allow(clippy::doc_markdown)] // Allow technical terms like PostgreSQL, SQLx in docs
#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Parallel Analyze
//!
//! Refreshes PostgreSQL planner statistics for every table in a schema by
//! splitting the tables into fixed-size batches and running each batch on its
//! own concurrent worker.
//!
//! ## Module Organization
//!
//! - [`maintenance`] - batching, workers and the concurrent dispatcher
//! - [`database`] - PostgreSQL catalog and `ANALYZE` executor
//! - [`config`] - layered configuration
//! - [`logging`] - structured logging setup
//! - [`error`] - run-level and per-object errors
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use parallel_analyze::config::ConfigLoader;
//! use parallel_analyze::database::{AnalyzeExecutor, DatabaseConnection, PgCatalog};
//! use parallel_analyze::maintenance::{Dispatcher, MaintenanceRun, TracingReporter};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ConfigLoader::new().load()?;
//! let db = DatabaseConnection::connect(&config.database).await?;
//!
//! let catalog = PgCatalog::new(db.pool().clone(), &config.batch.schema);
//! let run = MaintenanceRun::from_catalog(&catalog, config.batch.batch_size).await?;
//!
//! let executor = Arc::new(AnalyzeExecutor::new(db.pool().clone(), &config.batch.schema));
//! let dispatcher = Dispatcher::new(executor, Arc::new(TracingReporter::new("ANALYZE")));
//! let summary = run.execute(&dispatcher).await?;
//!
//! println!("analyzed {} tables, {} failed", summary.succeeded, summary.failed);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod database;
pub mod error;
pub mod logging;
pub mod maintenance;

pub use config::{ConfigLoader, MaintenanceConfig};
pub use error::{ExecutionError, MaintenanceError, MaintenanceResult};
pub use maintenance::{
    partition, Batch, CatalogSource, Dispatcher, MaintenanceExecutor, MaintenanceRun, ObjectName,
    ResultReporter, RunSummary, TracingReporter, WorkOutcome, WorkResult,
};
