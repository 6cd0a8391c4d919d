//! # parallel-analyze
//!
//! Refreshes planner statistics for every table in a PostgreSQL schema,
//! running batches of tables concurrently.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use tracing::{error, info, warn};

use parallel_analyze::config::{ConfigLoader, LogFormat, MaintenanceConfig};
use parallel_analyze::database::{AnalyzeExecutor, DatabaseConnection, PgCatalog};
use parallel_analyze::logging::init_structured_logging;
use parallel_analyze::maintenance::{Dispatcher, MaintenanceRun, RunSummary, TracingReporter};
use parallel_analyze::MaintenanceError;

#[derive(Parser, Debug)]
#[command(name = "parallel-analyze")]
#[command(about = "Run ANALYZE on every table of a schema in concurrent batches")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    /// Configuration file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Database host
    #[arg(long)]
    host: Option<String>,

    /// Database port
    #[arg(long)]
    port: Option<u16>,

    /// Database user
    #[arg(long)]
    user: Option<String>,

    /// Database password
    #[arg(long, env = "PGPASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Database name
    #[arg(long)]
    dbname: Option<String>,

    /// SSL mode (disable, allow, prefer, require, verify-ca, verify-full)
    #[arg(long)]
    sslmode: Option<String>,

    /// Schema whose tables are analyzed
    #[arg(long)]
    schema: Option<String>,

    /// Number of tables per concurrent batch
    #[arg(short, long)]
    batch_size: Option<usize>,

    /// Maximum number of batches running at once (default: all of them)
    #[arg(long)]
    max_concurrent_batches: Option<usize>,

    /// List the planned batches without running ANALYZE
    #[arg(long)]
    dry_run: bool,

    /// Summary output format (text, json)
    #[arg(long, default_value = "text")]
    format: String,

    /// Log output format (text, json)
    #[arg(long)]
    log_format: Option<String>,

    /// Verbose output level (use multiple times for more verbosity)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Process exit codes
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExitCode {
    Success = 0,
    ConfigError = 1,
    DatabaseError = 2,
    ExecutorUnavailable = 3,
    WorkerJoinError = 4,
}

impl ExitCode {
    fn from_error(error: &anyhow::Error) -> Self {
        match error.downcast_ref::<MaintenanceError>() {
            Some(MaintenanceError::InvalidConfiguration(_) | MaintenanceError::Configuration(_)) => {
                ExitCode::ConfigError
            }
            Some(MaintenanceError::ExecutorUnavailable(_)) => ExitCode::ExecutorUnavailable,
            Some(MaintenanceError::WorkerJoin { .. }) => ExitCode::WorkerJoinError,
            Some(MaintenanceError::CatalogUnavailable(_) | MaintenanceError::DatabaseError(_))
            | None => ExitCode::DatabaseError,
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("parallel-analyze: {e:#}");
            process::exit(ExitCode::ConfigError as i32);
        }
    };

    init_structured_logging(&config.logging, cli.verbose);

    let exit_code = match run(&cli, config).await {
        Ok(()) => ExitCode::Success,
        Err(e) => {
            error!(error = %format!("{e:#}"), "Maintenance run failed");
            ExitCode::from_error(&e)
        }
    };

    process::exit(exit_code as i32);
}

fn load_config(cli: &Cli) -> Result<MaintenanceConfig> {
    let mut loader = ConfigLoader::new()
        .with_override_option("database.host", cli.host.clone())
        .with_override_option("database.port", cli.port.map(i64::from))
        .with_override_option("database.username", cli.user.clone())
        .with_override_option("database.password", cli.password.clone())
        .with_override_option("database.database", cli.dbname.clone())
        .with_override_option("database.ssl_mode", cli.sslmode.clone())
        .with_override_option("batch.schema", cli.schema.clone())
        .with_override_option("batch.batch_size", cli.batch_size.map(|n| n as i64))
        .with_override_option(
            "batch.max_concurrent_batches",
            cli.max_concurrent_batches.map(|n| n as i64),
        );

    if let Some(path) = &cli.config {
        loader = loader.with_file(path);
    }

    let mut config = loader.load().context("loading configuration")?;
    if let Some(format) = &cli.log_format {
        config.logging.format = format.parse()?;
    }
    Ok(config)
}

async fn run(cli: &Cli, config: MaintenanceConfig) -> Result<()> {
    config.validate()?;
    let summary_format: LogFormat = cli.format.parse()?;

    let catalog_db = DatabaseConnection::connect(&config.database)
        .await
        .context("connecting to database")?;
    let catalog = PgCatalog::new(catalog_db.pool().clone(), &config.batch.schema);
    let planned = MaintenanceRun::from_catalog(&catalog, config.batch.batch_size).await;
    catalog_db.close().await;
    let run = planned?;
    run.log_plan();

    if run.is_empty() {
        warn!(schema = %config.batch.schema, "No tables found; nothing to analyze");
    }

    if cli.dry_run {
        print_plan(&run);
        return Ok(());
    }

    let workers = config.batch.worker_concurrency(run.batches().len());
    let pool_size = u32::try_from(workers).unwrap_or(u32::MAX);
    let db = DatabaseConnection::connect_with_pool_size(&config.database, pool_size)
        .await
        .context("connecting executor pool")?;

    let executor = Arc::new(AnalyzeExecutor::new(db.pool().clone(), &config.batch.schema));
    let reporter = Arc::new(TracingReporter::new("ANALYZE"));
    let dispatcher = Dispatcher::new(executor, reporter)
        .with_max_concurrent_batches(config.batch.max_concurrent_batches)?;

    let result = run.execute(&dispatcher).await;
    db.close().await;
    let summary = result?;

    info!(
        run_id = %summary.run_id,
        succeeded = summary.succeeded,
        failed = summary.failed,
        "Maintenance run finished"
    );
    print_summary(&summary, summary_format)?;
    Ok(())
}

fn print_plan(run: &MaintenanceRun) {
    for batch in run.batches() {
        let names: Vec<&str> = batch.objects().iter().map(|o| o.as_str()).collect();
        println!("Batch {}: {:?}", batch.index() + 1, names);
    }
}

fn print_summary(summary: &RunSummary, format: LogFormat) -> Result<()> {
    match format {
        LogFormat::Json => println!("{}", serde_json::to_string_pretty(summary)?),
        LogFormat::Text => {
            println!("Run {}", summary.run_id);
            println!("  Batches:   {}", summary.batches);
            println!("  Tables:    {}", summary.objects);
            println!("  Analyzed:  {}", summary.succeeded);
            println!("  Failed:    {}", summary.failed);
            println!("  Elapsed:   {:.2?}", summary.elapsed);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_overrides_reach_config() {
        let cli = Cli::parse_from([
            "parallel-analyze",
            "--host",
            "db.internal",
            "--port",
            "6543",
            "--batch-size",
            "12",
            "--schema",
            "reporting",
            "--sslmode",
            "disable",
        ]);

        let config = load_config(&cli).unwrap();
        assert_eq!(config.database.host, "db.internal");
        assert_eq!(config.database.port, 6543);
        assert_eq!(config.database.ssl_mode, "disable");
        assert_eq!(config.batch.batch_size, 12);
        assert_eq!(config.batch.schema, "reporting");
    }

    #[test]
    fn test_zero_batch_size_is_config_error() {
        let cli = Cli::parse_from(["parallel-analyze", "--batch-size", "0"]);
        let config = load_config(&cli).unwrap();
        assert_eq!(config.batch.batch_size, 0);

        let err = anyhow::Error::new(config.validate().unwrap_err());
        assert_eq!(ExitCode::from_error(&err), ExitCode::ConfigError);
    }

    #[test]
    fn test_exit_code_mapping() {
        let err = anyhow::Error::new(MaintenanceError::ExecutorUnavailable("pool closed".into()));
        assert_eq!(ExitCode::from_error(&err), ExitCode::ExecutorUnavailable);

        let err = anyhow::Error::new(MaintenanceError::WorkerJoin {
            batch_index: 0,
            reason: "panicked".into(),
        });
        assert_eq!(ExitCode::from_error(&err), ExitCode::WorkerJoinError);

        let err = anyhow::Error::new(MaintenanceError::CatalogUnavailable("down".into()))
            .context("listing tables");
        assert_eq!(ExitCode::from_error(&err), ExitCode::DatabaseError);
    }
}
