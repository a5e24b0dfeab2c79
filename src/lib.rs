//! # monq - Document-Store Job Queue Engine
//!
//! A Rust library implementing the storage engine of a document-store-backed
//! job queue: named queues of encoded payloads, a failure-record store,
//! atomic stat counters, and an aggregate status report.
//!
//! ## Features
//!
//! - **Named queues**: Push arbitrary JSON-representable payloads, pop them
//!   most-recent-first with at-most-once delivery
//! - **Atomic pop**: Select-and-remove is one indivisible backend operation,
//!   safe under any number of concurrent consumers
//! - **Failure records**: Durable, inspectable records of job execution
//!   errors
//! - **Stat counters**: Atomically incremented counters for processed/failed
//!   totals
//! - **Status reports**: One snapshot combining queue depths, counters, and
//!   worker counts
//!
//! Consumers poll: `pop` on an empty queue returns immediately with `None`,
//! and there is no blocking wait primitive. Job invocation, worker
//! lifecycle, and retries are layers above this crate.
//!
//! ## Quick Start
//!
//! ### Producer
//!
//! ```rust,no_run
//! use monq::{MemoryBackend, QueueStore};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> monq::Result<()> {
//!     let store = QueueStore::new(MemoryBackend::new());
//!
//!     store.push("emails", &json!({"to": "a@x.com", "tries": 0})).await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ### Consumer
//!
//! ```rust,no_run
//! use monq::{FailureRecord, FailureStore, MemoryBackend, QueueStore, SharedBackend, StatStore};
//! use monq::{STAT_FAILED, STAT_PROCESSED};
//! use serde_json::Value;
//!
//! async fn run_job(payload: &Value) -> Result<(), String> {
//!     Ok(())
//! }
//!
//! #[tokio::main]
//! async fn main() -> monq::Result<()> {
//!     let backend = SharedBackend::new(MemoryBackend::new());
//!     let store = QueueStore::with_backend(backend.clone());
//!     let failures = FailureStore::with_backend(backend.clone());
//!     let stats = StatStore::with_backend(backend);
//!
//!     while let Some(payload) = store.pop::<Value>("emails").await? {
//!         match run_job(&payload).await {
//!             Ok(()) => {
//!                 stats.incr(STAT_PROCESSED).await?;
//!             }
//!             Err(error) => {
//!                 let record = FailureRecord::new("emails", "worker-1", payload, error);
//!                 failures.save(&record).await?;
//!                 stats.incr(STAT_FAILED).await?;
//!             }
//!         }
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod backend;
pub mod codec;
pub mod config;
pub mod error;
pub mod failure;
pub mod queue;
pub mod report;
pub mod stat;

// Re-export main types
pub use backend::memory::MemoryBackend;
pub use backend::{Backend, DynBackend, SharedBackend};
pub use config::{StoreConfig, DEFAULT_ENDPOINT};
pub use error::{MonqError, Result};
pub use failure::{FailureRecord, FailureStore};
pub use queue::QueueStore;
pub use report::{StatusReport, StatusReporter, WorkerRegistry};
pub use stat::{StatStore, STAT_FAILED, STAT_PROCESSED};
