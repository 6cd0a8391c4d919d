//! Runs the maintenance operation over one batch, object by object.

use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info_span, warn, Instrument};

use super::reporter::ResultReporter;
use super::{Batch, MaintenanceExecutor, ObjectName};
use crate::error::ExecutionError;

/// Outcome of the maintenance operation for one object
#[derive(Debug, Clone, PartialEq)]
pub enum WorkOutcome {
    Succeeded,
    Failed(ExecutionError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct WorkResult {
    pub object: ObjectName,
    pub batch_index: usize,
    pub duration: Duration,
    pub outcome: WorkOutcome,
}

impl WorkResult {
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, WorkOutcome::Succeeded)
    }
}

/// Tally a worker hands back to the dispatcher when its batch is done.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchReport {
    pub batch_index: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub elapsed: Duration,
    /// First error that made the executor unusable, if any
    pub fatal: Option<ExecutionError>,
}

impl BatchReport {
    pub fn processed(&self) -> usize {
        self.succeeded + self.failed
    }
}

/// Processes a batch sequentially against the shared executor.
#[derive(Clone)]
pub struct BatchWorker {
    executor: Arc<dyn MaintenanceExecutor>,
    reporter: Arc<dyn ResultReporter>,
}

impl BatchWorker {
    pub fn new(executor: Arc<dyn MaintenanceExecutor>, reporter: Arc<dyn ResultReporter>) -> Self {
        Self { executor, reporter }
    }

    /// Run every object of `batch` in order.
    ///
    /// A failing object never stops the batch: its result is reported and the
    /// worker moves on to the next object.
    pub async fn run(&self, batch: Batch) -> BatchReport {
        let batch_index = batch.index();
        let span = info_span!("batch", index = batch_index, size = batch.len());

        async move {
            let started = Instant::now();
            let mut report = BatchReport {
                batch_index,
                succeeded: 0,
                failed: 0,
                elapsed: Duration::ZERO,
                fatal: None,
            };

            debug!(operation = self.executor.operation(), "Batch started");

            for object in batch.into_objects() {
                let result = self.process(object, batch_index).await;
                self.reporter.emit(&result);

                match result.outcome {
                    WorkOutcome::Succeeded => report.succeeded += 1,
                    WorkOutcome::Failed(err) => {
                        report.failed += 1;
                        if err.is_fatal() && report.fatal.is_none() {
                            warn!(error = %err, "Executor became unavailable");
                            report.fatal = Some(err);
                        }
                    }
                }
            }

            report.elapsed = started.elapsed();
            debug!(
                succeeded = report.succeeded,
                failed = report.failed,
                elapsed_ms = report.elapsed.as_millis() as u64,
                "Batch finished"
            );
            report
        }
        .instrument(span)
        .await
    }

    async fn process(&self, object: ObjectName, batch_index: usize) -> WorkResult {
        let started = Instant::now();
        let outcome = match self.executor.perform(&object).await {
            Ok(()) => WorkOutcome::Succeeded,
            Err(err) => WorkOutcome::Failed(err),
        };

        WorkResult {
            object,
            batch_index,
            duration: started.elapsed(),
            outcome,
        }
    }
}
