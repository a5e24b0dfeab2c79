//! Backend abstraction for queue storage.
//!
//! This module provides a trait-based abstraction over the backing document
//! store. One logical store holds four collections: queue items, failure
//! records, stat counters, and worker records. Implementations must be
//! thread-safe (Send + Sync).
//!
//! Backends exchange encoded payloads (see [`crate::codec`]); the typed
//! stores layered on top do the encoding and decoding.

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::Result;

pub mod memory;

/// Backend trait for queue storage operations.
///
/// Correctness under concurrent consumers rests entirely on
/// [`take_latest`](Backend::take_latest): it must select and delete as one
/// indivisible operation visible to all callers. Nothing else in this
/// library locks.
#[async_trait]
pub trait Backend: Send + Sync {
    // ========== Queue Items ==========

    /// Append an encoded item to a queue with a fresh insertion marker.
    async fn push_item(&self, queue: &str, item_json: &str) -> Result<()>;

    /// Atomically select and delete the most recently inserted item of a
    /// queue, returning its encoded payload.
    ///
    /// Select-and-remove must be a single indivisible operation against the
    /// store; a separate read followed by a delete races with concurrent
    /// callers. Returns `None` when the queue holds no item: the backend
    /// classifies its own "nothing matched" signal and reports it as the
    /// typed empty result, never as an error.
    async fn take_latest(&self, queue: &str) -> Result<Option<String>>;

    /// List encoded items of a queue without removing them.
    ///
    /// The window `[start, start + count)` is taken in the order
    /// `take_latest` would consume the items (most-recent-first).
    async fn list_items(&self, queue: &str, start: usize, count: usize) -> Result<Vec<String>>;

    /// Get the number of items currently stored for a queue.
    async fn queue_len(&self, queue: &str) -> Result<usize>;

    /// List the distinct queue names currently holding at least one item.
    ///
    /// This is a derived view recomputed from live data, never separately
    /// maintained state.
    async fn queue_names(&self) -> Result<Vec<String>>;

    /// Delete all items of a queue. Idempotent on an empty or unknown queue.
    async fn remove_queue(&self, queue: &str) -> Result<()>;

    // ========== Failure Records ==========

    /// Append an encoded failure record.
    async fn push_failure(&self, record_json: &str) -> Result<()>;

    /// Get the number of stored failure records.
    async fn failure_len(&self) -> Result<usize>;

    /// List encoded failure records, most-recent-first, using the same
    /// window contract as `list_items`.
    async fn list_failures(&self, start: usize, count: usize) -> Result<Vec<String>>;

    /// Delete all failure records.
    async fn clear_failures(&self) -> Result<()>;

    // ========== Stat Counters ==========

    /// Increment a named counter and return the new value.
    ///
    /// The counter is created at zero on first use. This operation must be
    /// atomic with respect to concurrent increments of the same name.
    async fn incr_stat(&self, name: &str, by: i64) -> Result<i64>;

    /// Get the current value of a named counter (0 if never incremented).
    async fn get_stat(&self, name: &str) -> Result<i64>;

    /// Drop a named counter.
    async fn remove_stat(&self, name: &str) -> Result<()>;

    /// Drop all counters.
    async fn clear_stats(&self) -> Result<()>;

    // ========== Worker Records ==========

    /// Count all registered workers.
    ///
    /// Worker records are written by the worker-lifecycle layer; this
    /// library only reads them.
    async fn worker_count(&self) -> Result<usize>;

    /// Count the workers currently processing a job.
    async fn working_count(&self) -> Result<usize>;

    // ========== Administration ==========

    /// Wipe all four collections: items, failures, stats, and workers.
    async fn drop_all(&self) -> Result<()>;

    /// The endpoint address(es) backing this store, as `host:port` strings.
    fn servers(&self) -> Vec<String>;
}

/// A type-erased backend that can be shared across threads.
pub type DynBackend = Arc<dyn Backend>;

/// Wrapper around Arc<dyn Backend> for convenience.
#[derive(Clone)]
pub struct SharedBackend {
    inner: DynBackend,
}

impl SharedBackend {
    /// Create a new SharedBackend from any Backend implementation.
    pub fn new<B: Backend + 'static>(backend: B) -> Self {
        Self {
            inner: Arc::new(backend),
        }
    }

    /// Get a reference to the inner backend.
    pub fn inner(&self) -> &DynBackend {
        &self.inner
    }
}

#[async_trait]
impl Backend for SharedBackend {
    async fn push_item(&self, queue: &str, item_json: &str) -> Result<()> {
        self.inner.push_item(queue, item_json).await
    }

    async fn take_latest(&self, queue: &str) -> Result<Option<String>> {
        self.inner.take_latest(queue).await
    }

    async fn list_items(&self, queue: &str, start: usize, count: usize) -> Result<Vec<String>> {
        self.inner.list_items(queue, start, count).await
    }

    async fn queue_len(&self, queue: &str) -> Result<usize> {
        self.inner.queue_len(queue).await
    }

    async fn queue_names(&self) -> Result<Vec<String>> {
        self.inner.queue_names().await
    }

    async fn remove_queue(&self, queue: &str) -> Result<()> {
        self.inner.remove_queue(queue).await
    }

    async fn push_failure(&self, record_json: &str) -> Result<()> {
        self.inner.push_failure(record_json).await
    }

    async fn failure_len(&self) -> Result<usize> {
        self.inner.failure_len().await
    }

    async fn list_failures(&self, start: usize, count: usize) -> Result<Vec<String>> {
        self.inner.list_failures(start, count).await
    }

    async fn clear_failures(&self) -> Result<()> {
        self.inner.clear_failures().await
    }

    async fn incr_stat(&self, name: &str, by: i64) -> Result<i64> {
        self.inner.incr_stat(name, by).await
    }

    async fn get_stat(&self, name: &str) -> Result<i64> {
        self.inner.get_stat(name).await
    }

    async fn remove_stat(&self, name: &str) -> Result<()> {
        self.inner.remove_stat(name).await
    }

    async fn clear_stats(&self) -> Result<()> {
        self.inner.clear_stats().await
    }

    async fn worker_count(&self) -> Result<usize> {
        self.inner.worker_count().await
    }

    async fn working_count(&self) -> Result<usize> {
        self.inner.working_count().await
    }

    async fn drop_all(&self) -> Result<()> {
        self.inner.drop_all().await
    }

    fn servers(&self) -> Vec<String> {
        self.inner.servers()
    }
}
