//! Reporting side-channel for per-object outcomes.

use tracing::{error, info};

use super::worker::{WorkOutcome, WorkResult};

/// Receives each [`WorkResult`] as soon as the worker produces it.
///
/// Called concurrently from every worker; implementations must not block.
pub trait ResultReporter: Send + Sync {
    fn emit(&self, result: &WorkResult);
}

/// Writes every result to the `tracing` subscriber.
#[derive(Debug, Clone, Default)]
pub struct TracingReporter {
    operation: String,
}

impl TracingReporter {
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
        }
    }
}

impl ResultReporter for TracingReporter {
    fn emit(&self, result: &WorkResult) {
        let duration_ms = result.duration.as_millis() as u64;

        match &result.outcome {
            WorkOutcome::Succeeded => info!(
                operation = %self.operation,
                object = %result.object,
                batch = result.batch_index,
                duration_ms,
                "Object processed"
            ),
            WorkOutcome::Failed(err) => error!(
                operation = %self.operation,
                object = %result.object,
                batch = result.batch_index,
                duration_ms,
                fatal = err.is_fatal(),
                error = %err,
                "Object processing failed"
            ),
        }
    }
}
