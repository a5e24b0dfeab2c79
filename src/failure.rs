//! Failure records for inspecting job execution errors.

use serde::{Deserialize, Serialize};

use crate::backend::{Backend, SharedBackend};
use crate::codec;
use crate::error::Result;

/// A durable record of a job execution failure.
///
/// Created when a worker's job raises; immutable once saved. Records are
/// only removed in bulk via [`FailureStore::clear`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailureRecord {
    /// When the failure happened (Unix epoch seconds).
    pub failed_at: i64,
    /// The job's original arguments.
    pub payload: serde_json::Value,
    /// The error message.
    pub error: String,
    /// Backtrace lines, outermost frame first.
    pub backtrace: Vec<String>,
    /// Identifier of the worker that ran the job.
    pub worker: String,
    /// The queue the job was popped from.
    pub queue: String,
}

impl FailureRecord {
    /// Create a record stamped with the current time.
    pub fn new(
        queue: impl Into<String>,
        worker: impl Into<String>,
        payload: serde_json::Value,
        error: impl Into<String>,
    ) -> Self {
        Self {
            failed_at: current_timestamp(),
            payload,
            error: error.into(),
            backtrace: Vec::new(),
            worker: worker.into(),
            queue: queue.into(),
        }
    }

    /// Attach backtrace lines.
    pub fn with_backtrace(mut self, backtrace: Vec<String>) -> Self {
        self.backtrace = backtrace;
        self
    }
}

/// Store of failure records.
#[derive(Clone)]
pub struct FailureStore<B: Backend + Clone = SharedBackend> {
    backend: B,
}

impl FailureStore<SharedBackend> {
    /// Create a new failure store with a shared backend.
    pub fn new(backend: impl Backend + 'static) -> Self {
        Self {
            backend: SharedBackend::new(backend),
        }
    }
}

impl<B: Backend + Clone> FailureStore<B> {
    /// Create a new failure store with a specific backend.
    pub fn with_backend(backend: B) -> Self {
        Self { backend }
    }

    /// Append a failure record. No dedup, no cap.
    pub async fn save(&self, record: &FailureRecord) -> Result<()> {
        let record_json = codec::encode(record)?;
        self.backend.push_failure(&record_json).await?;

        tracing::debug!(queue = %record.queue, worker = %record.worker, "Failure saved");
        Ok(())
    }

    /// Get the number of stored failure records.
    pub async fn count(&self) -> Result<usize> {
        self.backend.failure_len().await
    }

    /// List records in the window `[start, start + count)`, most recent
    /// first.
    ///
    /// Always a sequence, even for `count == 1`: `list(0, 1)` returns a
    /// vector of length at most 1.
    pub async fn list(&self, start: usize, count: usize) -> Result<Vec<FailureRecord>> {
        let records = self.backend.list_failures(start, count).await?;
        records
            .iter()
            .map(|record_json| codec::decode(record_json))
            .collect()
    }

    /// Delete all failure records.
    pub async fn clear(&self) -> Result<()> {
        self.backend.clear_failures().await
    }
}

/// Get current Unix timestamp in seconds.
fn current_timestamp() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_secs() as i64
}
