//! Named stat counters for aggregate reporting.

use crate::backend::{Backend, SharedBackend};
use crate::error::Result;

/// Counter incremented for every successfully processed job.
pub const STAT_PROCESSED: &str = "processed";

/// Counter incremented for every failed job.
pub const STAT_FAILED: &str = "failed";

/// Store of named integer counters.
///
/// Counters are created at zero on first increment and only move up, except
/// for administrative resets. Each increment is a single atomic backend
/// operation, so concurrent callers never lose updates.
#[derive(Clone)]
pub struct StatStore<B: Backend + Clone = SharedBackend> {
    backend: B,
}

impl StatStore<SharedBackend> {
    /// Create a new stat store with a shared backend.
    pub fn new(backend: impl Backend + 'static) -> Self {
        Self {
            backend: SharedBackend::new(backend),
        }
    }
}

impl<B: Backend + Clone> StatStore<B> {
    /// Create a new stat store with a specific backend.
    pub fn with_backend(backend: B) -> Self {
        Self { backend }
    }

    /// Increment a counter by 1 and return the new value.
    pub async fn incr(&self, name: &str) -> Result<i64> {
        self.incr_by(name, 1).await
    }

    /// Increment a counter by `by` and return the new value.
    pub async fn incr_by(&self, name: &str, by: i64) -> Result<i64> {
        self.backend.incr_stat(name, by).await
    }

    /// Get a counter's current value (0 if never incremented).
    pub async fn get(&self, name: &str) -> Result<i64> {
        self.backend.get_stat(name).await
    }

    /// Reset one counter.
    pub async fn reset(&self, name: &str) -> Result<()> {
        self.backend.remove_stat(name).await
    }

    /// Reset every counter.
    pub async fn reset_all(&self) -> Result<()> {
        self.backend.clear_stats().await
    }
}
