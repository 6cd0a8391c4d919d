//! Splits an ordered object list into contiguous fixed-size batches.

use serde::Serialize;

use super::ObjectName;
use crate::error::{MaintenanceError, MaintenanceResult};

/// Batch size used when nothing else is configured
pub const DEFAULT_BATCH_SIZE: usize = 30;

/// A contiguous slice of the run's object list, processed by one worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Batch {
    index: usize,
    objects: Vec<ObjectName>,
}

impl Batch {
    pub fn new(index: usize, objects: Vec<ObjectName>) -> Self {
        Self { index, objects }
    }

    /// Zero-based position of this batch in partition order
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn objects(&self) -> &[ObjectName] {
        &self.objects
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn into_objects(self) -> Vec<ObjectName> {
        self.objects
    }
}

/// Partition `objects` into batches of at most `batch_size`, preserving order.
///
/// Produces `ceil(objects.len() / batch_size)` batches; only the last one may
/// be short. An empty input yields no batches.
pub fn partition(objects: &[ObjectName], batch_size: usize) -> MaintenanceResult<Vec<Batch>> {
    if batch_size == 0 {
        return Err(MaintenanceError::InvalidConfiguration(
            "batch_size must be at least 1".to_string(),
        ));
    }

    Ok(objects
        .chunks(batch_size)
        .enumerate()
        .map(|(index, chunk)| Batch::new(index, chunk.to_vec()))
        .collect())
}
