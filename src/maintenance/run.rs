//! State of a single invocation: the object list and its batches.

use tracing::{debug, info};

use super::batcher::{partition, Batch};
use super::dispatcher::{Dispatcher, RunSummary};
use super::{CatalogSource, ObjectName};
use crate::error::{MaintenanceError, MaintenanceResult};

/// Objects and batches planned for one run. Consumed by [`MaintenanceRun::execute`].
#[derive(Debug, Clone)]
pub struct MaintenanceRun {
    objects: Vec<ObjectName>,
    batches: Vec<Batch>,
    batch_size: usize,
}

impl MaintenanceRun {
    /// Partition `objects` into batches of `batch_size`.
    pub fn plan(objects: Vec<ObjectName>, batch_size: usize) -> MaintenanceResult<Self> {
        let batches = partition(&objects, batch_size)?;
        Ok(Self {
            objects,
            batches,
            batch_size,
        })
    }

    /// Validate `batch_size`, read the catalog, then partition.
    ///
    /// The batch size is checked before the catalog is touched so a bad
    /// configuration never reaches the store.
    pub async fn from_catalog(
        catalog: &dyn CatalogSource,
        batch_size: usize,
    ) -> MaintenanceResult<Self> {
        if batch_size == 0 {
            return Err(MaintenanceError::InvalidConfiguration(
                "batch_size must be at least 1".to_string(),
            ));
        }

        let objects = catalog.list_objects().await?;
        debug!(objects = objects.len(), "Catalog listed objects");
        Self::plan(objects, batch_size)
    }

    pub fn objects(&self) -> &[ObjectName] {
        &self.objects
    }

    pub fn batches(&self) -> &[Batch] {
        &self.batches
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Log the batch layout, one line per batch.
    pub fn log_plan(&self) {
        info!(
            objects = self.objects.len(),
            batches = self.batches.len(),
            batch_size = self.batch_size,
            "Planned maintenance run"
        );
        for batch in &self.batches {
            let names: Vec<&str> = batch.objects().iter().map(ObjectName::as_str).collect();
            info!(
                batch = batch.index() + 1,
                size = batch.len(),
                objects = ?names,
                "Batch planned"
            );
        }
    }

    pub async fn execute(self, dispatcher: &Dispatcher) -> MaintenanceResult<RunSummary> {
        dispatcher.execute(self.batches).await
    }
}
