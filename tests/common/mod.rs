//! Shared fakes for the maintenance engine tests.

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use parallel_analyze::{
    CatalogSource, ExecutionError, MaintenanceExecutor, MaintenanceResult, ObjectName,
    ResultReporter, WorkResult,
};

/// How the scripted executor should treat a given object
#[derive(Debug, Clone)]
pub enum Script {
    Fail(&'static str),
    Unavailable(&'static str),
    Delay(Duration),
}

/// Executor whose behaviour per object is scripted up front.
#[derive(Default)]
pub struct ScriptedExecutor {
    scripts: HashMap<String, Script>,
    default_delay: Option<Duration>,
    calls: Mutex<Vec<ObjectName>>,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

impl ScriptedExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_script(mut self, object: &str, script: Script) -> Self {
        self.scripts.insert(object.to_string(), script);
        self
    }

    pub fn with_default_delay(mut self, delay: Duration) -> Self {
        self.default_delay = Some(delay);
        self
    }

    pub fn calls(&self) -> Vec<ObjectName> {
        self.calls.lock().unwrap().clone()
    }

    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MaintenanceExecutor for ScriptedExecutor {
    async fn perform(&self, object: &ObjectName) -> Result<(), ExecutionError> {
        self.calls.lock().unwrap().push(object.clone());
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);

        let outcome = match self.scripts.get(object.as_str()) {
            Some(Script::Fail(cause)) => Err(ExecutionError::failed(object, *cause)),
            Some(Script::Unavailable(cause)) => Err(ExecutionError::unavailable(object, *cause)),
            Some(Script::Delay(delay)) => {
                tokio::time::sleep(*delay).await;
                Ok(())
            }
            None => {
                if let Some(delay) = self.default_delay {
                    tokio::time::sleep(delay).await;
                }
                Ok(())
            }
        };

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        outcome
    }

    fn operation(&self) -> &str {
        "SCRIPTED"
    }
}

/// Reporter that keeps every result it is handed.
#[derive(Default)]
pub struct CollectingReporter {
    results: Mutex<Vec<WorkResult>>,
}

impl CollectingReporter {
    pub fn results(&self) -> Vec<WorkResult> {
        self.results.lock().unwrap().clone()
    }

    pub fn count(&self) -> usize {
        self.results.lock().unwrap().len()
    }
}

impl ResultReporter for CollectingReporter {
    fn emit(&self, result: &WorkResult) {
        self.results.lock().unwrap().push(result.clone());
    }
}

/// Catalog returning a fixed object list.
pub struct StaticCatalog {
    objects: Vec<ObjectName>,
}

impl StaticCatalog {
    pub fn with_tables(count: usize) -> Self {
        Self {
            objects: table_names(count),
        }
    }
}

#[async_trait]
impl CatalogSource for StaticCatalog {
    async fn list_objects(&self) -> MaintenanceResult<Vec<ObjectName>> {
        Ok(self.objects.clone())
    }
}

pub fn table_names(count: usize) -> Vec<ObjectName> {
    (0..count)
        .map(|i| ObjectName::new(format!("table_{i:03}")))
        .collect()
}

pub fn shared<T>(value: T) -> Arc<T> {
    Arc::new(value)
}
