//! # Structured Logging
//!
//! Installs the global `tracing` subscriber used by the CLI. Output is either
//! human-readable text or one JSON object per line.

use std::sync::OnceLock;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::config::{LogFormat, LoggingConfig};

static LOGGER_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Initialize logging once per process.
///
/// The filter comes from `RUST_LOG` when set, then from the configured level,
/// then from `-v` flags, and finally from the deployment environment.
pub fn init_structured_logging(config: &LoggingConfig, verbosity: u8) {
    LOGGER_INITIALIZED.get_or_init(|| {
        let environment = get_environment();
        let directive = resolve_filter_directive(config.level.as_deref(), verbosity, &environment);
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&directive));

        let layer = match config.format {
            LogFormat::Text => fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_level(true)
                .boxed(),
            LogFormat::Json => fmt::layer()
                .json()
                .with_target(true)
                .with_thread_ids(true)
                .with_current_span(true)
                .boxed(),
        };

        // Another subscriber may already be installed (e.g. by a test harness)
        if tracing_subscriber::registry()
            .with(layer.with_filter(filter))
            .try_init()
            .is_err()
        {
            tracing::debug!("Global tracing subscriber already initialized");
            return;
        }

        tracing::debug!(
            pid = std::process::id(),
            environment = %environment,
            format = ?config.format,
            "Structured logging initialized"
        );
    });
}

fn get_environment() -> String {
    std::env::var("PARALLEL_ANALYZE_ENV")
        .or_else(|_| std::env::var("APP_ENV"))
        .unwrap_or_else(|_| "development".to_string())
}

fn get_log_level(environment: &str) -> &'static str {
    match environment {
        "production" => "info",
        _ => "debug",
    }
}

fn resolve_filter_directive(level: Option<&str>, verbosity: u8, environment: &str) -> String {
    if let Some(level) = level.filter(|l| !l.is_empty()) {
        return level.to_string();
    }
    match verbosity {
        0 => get_log_level(environment).to_string(),
        1 => "debug".to_string(),
        _ => "trace".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_mapping() {
        assert_eq!(get_log_level("production"), "info");
        assert_eq!(get_log_level("development"), "debug");
        assert_eq!(get_log_level("staging"), "debug");
    }

    #[test]
    fn test_filter_directive_precedence() {
        assert_eq!(
            resolve_filter_directive(Some("parallel_analyze=trace"), 0, "production"),
            "parallel_analyze=trace"
        );
        assert_eq!(resolve_filter_directive(None, 0, "development"), "debug");
        assert_eq!(resolve_filter_directive(None, 0, "production"), "info");
        assert_eq!(resolve_filter_directive(Some(""), 1, "development"), "debug");
        assert_eq!(resolve_filter_directive(None, 3, "production"), "trace");
    }

    #[test]
    fn test_init_is_idempotent() {
        let config = LoggingConfig::default();
        init_structured_logging(&config, 0);
        init_structured_logging(&config, 2);
    }
}
