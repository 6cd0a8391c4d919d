//! # Dispatcher
//!
//! Launches one [`BatchWorker`] per batch on the tokio runtime and waits for all
//! of them at a single join point.
//!
//! The join handles are the completion signals: each spawned worker resolves its
//! handle exactly once, whether it returns normally or panics, so awaiting every
//! handle releases the caller only after all launched workers are done.
//!
//! Concurrency equals the number of batches unless `max_concurrent_batches` is
//! set, in which case a semaphore bounds how many workers run at once.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tracing::{debug, error, info, instrument};
use uuid::Uuid;

use super::reporter::ResultReporter;
use super::worker::{BatchReport, BatchWorker};
use super::{Batch, MaintenanceExecutor};
use crate::error::{ExecutionError, MaintenanceError, MaintenanceResult};

/// Aggregate of one completed run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub batches: usize,
    pub objects: usize,
    pub succeeded: usize,
    pub failed: usize,
    #[serde(rename = "elapsed_ms", serialize_with = "serialize_millis")]
    pub elapsed: Duration,
}

impl RunSummary {
    fn empty(run_id: Uuid, started_at: DateTime<Utc>) -> Self {
        Self {
            run_id,
            started_at,
            batches: 0,
            objects: 0,
            succeeded: 0,
            failed: 0,
            elapsed: Duration::ZERO,
        }
    }

    fn record(&mut self, report: &BatchReport) {
        self.batches += 1;
        self.objects += report.processed();
        self.succeeded += report.succeeded;
        self.failed += report.failed;
    }

    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }
}

fn serialize_millis<S: serde::Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(value.as_millis() as u64)
}

/// Fans batches out to concurrent workers and joins them.
#[derive(Clone)]
pub struct Dispatcher {
    worker: BatchWorker,
    max_concurrent_batches: Option<usize>,
}

impl Dispatcher {
    /// One concurrent worker per batch, no further cap.
    pub fn new(executor: Arc<dyn MaintenanceExecutor>, reporter: Arc<dyn ResultReporter>) -> Self {
        Self {
            worker: BatchWorker::new(executor, reporter),
            max_concurrent_batches: None,
        }
    }

    /// Bound the number of batches processed at the same time.
    ///
    /// `None` restores the default of one running worker per batch.
    pub fn with_max_concurrent_batches(mut self, limit: Option<usize>) -> MaintenanceResult<Self> {
        if limit == Some(0) {
            return Err(MaintenanceError::InvalidConfiguration(
                "max_concurrent_batches must be at least 1".to_string(),
            ));
        }
        self.max_concurrent_batches = limit;
        Ok(self)
    }

    pub fn max_concurrent_batches(&self) -> Option<usize> {
        self.max_concurrent_batches
    }

    /// Run every batch to completion and return the aggregate.
    ///
    /// Per-object failures are counted in the summary, not returned as errors.
    /// The call fails only when a worker dies without completing its batch or
    /// when the executor reported itself unusable; in both cases every other
    /// worker has already finished.
    #[instrument(skip(self, batches), fields(batch_count = batches.len()))]
    pub async fn execute(&self, batches: Vec<Batch>) -> MaintenanceResult<RunSummary> {
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        let started = Instant::now();

        if batches.is_empty() {
            debug!(%run_id, "No batches to dispatch");
            return Ok(RunSummary::empty(run_id, started_at));
        }

        let permits = self
            .max_concurrent_batches
            .map(|limit| Arc::new(Semaphore::new(limit)));

        info!(
            %run_id,
            batches = batches.len(),
            objects = batches.iter().map(Batch::len).sum::<usize>(),
            max_concurrent_batches = ?self.max_concurrent_batches,
            "Dispatching batches"
        );

        let mut indices = Vec::with_capacity(batches.len());
        let mut handles = Vec::with_capacity(batches.len());
        for batch in batches {
            let worker = self.worker.clone();
            let permits = permits.clone();
            indices.push(batch.index());

            handles.push(tokio::spawn(async move {
                // Held until the batch is done; the semaphore is never closed.
                let _permit = match permits {
                    Some(semaphore) => semaphore.acquire_owned().await.ok(),
                    None => None,
                };
                worker.run(batch).await
            }));
        }

        let joined = futures::future::join_all(handles).await;

        let mut summary = RunSummary::empty(run_id, started_at);
        let mut join_failure: Option<MaintenanceError> = None;
        let mut fatal: Option<ExecutionError> = None;

        for (batch_index, outcome) in indices.into_iter().zip(joined) {
            match outcome {
                Ok(report) => {
                    summary.record(&report);
                    if fatal.is_none() {
                        fatal = report.fatal;
                    }
                }
                Err(e) => {
                    error!(%run_id, batch = batch_index, error = %e, "Batch worker did not complete");
                    join_failure.get_or_insert(MaintenanceError::WorkerJoin {
                        batch_index,
                        reason: e.to_string(),
                    });
                }
            }
        }
        summary.elapsed = started.elapsed();

        info!(
            %run_id,
            batches = summary.batches,
            objects = summary.objects,
            succeeded = summary.succeeded,
            failed = summary.failed,
            elapsed_ms = summary.elapsed.as_millis() as u64,
            "All batches completed"
        );

        if let Some(err) = join_failure {
            return Err(err);
        }
        if let Some(err) = fatal {
            return Err(MaintenanceError::ExecutorUnavailable(err.to_string()));
        }

        Ok(summary)
    }
}
