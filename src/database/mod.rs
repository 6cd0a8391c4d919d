//! # Database Operations
//!
//! PostgreSQL implementations of the maintenance capabilities:
//!
//! - [`connection`] - pool construction and health checks
//! - [`catalog`] - table discovery through `information_schema`
//! - [`analyze`] - per-table `ANALYZE`
//!
//! ```rust,no_run
//! use parallel_analyze::config::DatabaseConfig;
//! use parallel_analyze::database::{AnalyzeExecutor, DatabaseConnection, PgCatalog};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let db = DatabaseConnection::connect(&DatabaseConfig::default()).await?;
//! let catalog = PgCatalog::new(db.pool().clone(), "public");
//! let executor = AnalyzeExecutor::new(db.pool().clone(), "public");
//! # Ok(())
//! # }
//! ```

pub mod analyze;
pub mod catalog;
pub mod connection;

pub use analyze::{quote_identifier, AnalyzeExecutor};
pub use catalog::PgCatalog;
pub use connection::DatabaseConnection;
