//! Aggregate status reporting.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::backend::{Backend, SharedBackend};
use crate::error::Result;
use crate::queue::QueueStore;
use crate::stat::{StatStore, STAT_FAILED, STAT_PROCESSED};

/// Read access to the worker-lifecycle subsystem.
///
/// The reporter only ever reads worker state; registration and heartbeats
/// belong to the worker layer.
#[async_trait]
pub trait WorkerRegistry: Send + Sync {
    /// Count all registered workers.
    async fn worker_count(&self) -> Result<usize>;

    /// Count the workers currently processing a job.
    async fn working_count(&self) -> Result<usize>;
}

/// Any backend can serve as the registry view over its worker collection.
#[async_trait]
impl WorkerRegistry for SharedBackend {
    async fn worker_count(&self) -> Result<usize> {
        Backend::worker_count(self).await
    }

    async fn working_count(&self) -> Result<usize> {
        Backend::working_count(self).await
    }
}

/// A point-in-time status snapshot of the whole store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusReport {
    /// Total items waiting across all queues.
    pub pending: usize,
    /// Jobs processed successfully, ever.
    pub processed: i64,
    /// Number of queues currently holding items.
    pub queues: usize,
    /// Registered workers.
    pub workers: usize,
    /// Workers currently processing a job.
    pub working: usize,
    /// Jobs failed, ever.
    pub failed: i64,
    /// Backing-store endpoint address(es).
    pub servers: Vec<String>,
}

/// Builds [`StatusReport`] snapshots from the queue store, the stat
/// counters, and the worker registry.
#[derive(Clone)]
pub struct StatusReporter<B: Backend + Clone = SharedBackend> {
    queues: QueueStore<B>,
    stats: StatStore<B>,
    registry: Arc<dyn WorkerRegistry>,
    backend: B,
}

impl StatusReporter<SharedBackend> {
    /// Create a reporter whose worker counts come from the backend's own
    /// worker collection.
    pub fn new(backend: impl Backend + 'static) -> Self {
        let backend = SharedBackend::new(backend);
        let registry: Arc<dyn WorkerRegistry> = Arc::new(backend.clone());
        Self::with_registry(backend, registry)
    }
}

impl<B: Backend + Clone> StatusReporter<B> {
    /// Create a reporter with an explicit worker registry.
    pub fn with_registry(backend: B, registry: Arc<dyn WorkerRegistry>) -> Self {
        Self {
            queues: QueueStore::with_backend(backend.clone()),
            stats: StatStore::with_backend(backend.clone()),
            registry,
            backend,
        }
    }

    /// Build a status snapshot.
    ///
    /// The counts are read one at a time, not in a store transaction, so a
    /// snapshot taken under load is a close approximation rather than a
    /// frozen instant.
    pub async fn report(&self) -> Result<StatusReport> {
        let queues = self.queues.queues().await?;

        let mut pending = 0;
        for queue in &queues {
            pending += self.queues.size(queue).await?;
        }

        Ok(StatusReport {
            pending,
            processed: self.stats.get(STAT_PROCESSED).await?,
            queues: queues.len(),
            workers: self.registry.worker_count().await?,
            working: self.registry.working_count().await?,
            failed: self.stats.get(STAT_FAILED).await?,
            servers: self.backend.servers(),
        })
    }
}
