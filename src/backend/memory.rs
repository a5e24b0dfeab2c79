//! In-memory backend implementation.
//!
//! A process-local document store with the same contracts as a remote one,
//! most importantly the indivisible `take_latest`. All collections live
//! behind a single mutex, so every operation the trait calls atomic is
//! atomic here. Useful as the default backend and for isolated test stores.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::backend::Backend;
use crate::config::StoreConfig;
use crate::error::Result;

/// A stored queue item.
///
/// `seq` is the store-assigned insertion marker; it increases monotonically
/// across the whole store and never repeats.
#[derive(Debug, Clone)]
struct ItemDoc {
    seq: u64,
    queue: String,
    item: String,
}

/// A worker record, written by the worker-lifecycle layer.
#[derive(Debug, Clone)]
struct WorkerDoc {
    id: String,
    working: bool,
}

/// The four collections of the store.
#[derive(Debug, Default)]
struct Collections {
    items: Vec<ItemDoc>,
    next_seq: u64,
    failures: Vec<String>,
    stats: HashMap<String, i64>,
    workers: Vec<WorkerDoc>,
}

impl Collections {
    /// Allocate a fresh insertion marker.
    fn allocate_seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }

    /// Index of the item with the greatest insertion marker for a queue.
    fn latest_index(&self, queue: &str) -> Option<usize> {
        self.items
            .iter()
            .enumerate()
            .filter(|(_, doc)| doc.queue == queue)
            .max_by_key(|(_, doc)| doc.seq)
            .map(|(idx, _)| idx)
    }
}

/// In-memory backend for queue storage.
#[derive(Clone)]
pub struct MemoryBackend {
    state: Arc<Mutex<Collections>>,
    endpoint: String,
}

impl MemoryBackend {
    /// Create a backend with the default endpoint configuration.
    pub fn new() -> Self {
        Self::connect(&StoreConfig::default())
    }

    /// Create a backend for the given endpoint configuration.
    ///
    /// Each call returns a fully independent store.
    pub fn connect(config: &StoreConfig) -> Self {
        Self {
            state: Arc::new(Mutex::new(Collections::default())),
            endpoint: config.address(),
        }
    }

    // Worker records are read-only from the queue core's perspective.
    // These hooks are for the worker-lifecycle layer and for tests.

    /// Register a worker record.
    pub async fn register_worker(&self, id: impl Into<String>) {
        let mut state = self.state.lock().await;
        state.workers.push(WorkerDoc {
            id: id.into(),
            working: false,
        });
    }

    /// Mark a registered worker as processing a job (or idle).
    pub async fn set_working(&self, id: &str, working: bool) {
        let mut state = self.state.lock().await;
        if let Some(doc) = state.workers.iter_mut().find(|doc| doc.id == id) {
            doc.working = working;
        }
    }

    /// Remove a worker record.
    pub async fn remove_worker(&self, id: &str) {
        let mut state = self.state.lock().await;
        state.workers.retain(|doc| doc.id != id);
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Backend for MemoryBackend {
    async fn push_item(&self, queue: &str, item_json: &str) -> Result<()> {
        let mut state = self.state.lock().await;
        let seq = state.allocate_seq();
        state.items.push(ItemDoc {
            seq,
            queue: queue.to_string(),
            item: item_json.to_string(),
        });
        Ok(())
    }

    async fn take_latest(&self, queue: &str) -> Result<Option<String>> {
        // Select and delete under one guard: indivisible to all callers.
        let mut state = self.state.lock().await;
        match state.latest_index(queue) {
            Some(idx) => Ok(Some(state.items.remove(idx).item)),
            None => Ok(None),
        }
    }

    async fn list_items(&self, queue: &str, start: usize, count: usize) -> Result<Vec<String>> {
        let state = self.state.lock().await;
        let mut matching: Vec<&ItemDoc> = state
            .items
            .iter()
            .filter(|doc| doc.queue == queue)
            .collect();
        matching.sort_by(|a, b| b.seq.cmp(&a.seq));

        Ok(matching
            .into_iter()
            .skip(start)
            .take(count)
            .map(|doc| doc.item.clone())
            .collect())
    }

    async fn queue_len(&self, queue: &str) -> Result<usize> {
        let state = self.state.lock().await;
        Ok(state.items.iter().filter(|doc| doc.queue == queue).count())
    }

    async fn queue_names(&self) -> Result<Vec<String>> {
        let state = self.state.lock().await;
        let names: BTreeSet<&str> = state.items.iter().map(|doc| doc.queue.as_str()).collect();
        Ok(names.into_iter().map(String::from).collect())
    }

    async fn remove_queue(&self, queue: &str) -> Result<()> {
        let mut state = self.state.lock().await;
        state.items.retain(|doc| doc.queue != queue);
        Ok(())
    }

    async fn push_failure(&self, record_json: &str) -> Result<()> {
        let mut state = self.state.lock().await;
        state.failures.push(record_json.to_string());
        Ok(())
    }

    async fn failure_len(&self) -> Result<usize> {
        let state = self.state.lock().await;
        Ok(state.failures.len())
    }

    async fn list_failures(&self, start: usize, count: usize) -> Result<Vec<String>> {
        let state = self.state.lock().await;
        Ok(state
            .failures
            .iter()
            .rev()
            .skip(start)
            .take(count)
            .cloned()
            .collect())
    }

    async fn clear_failures(&self) -> Result<()> {
        let mut state = self.state.lock().await;
        state.failures.clear();
        Ok(())
    }

    async fn incr_stat(&self, name: &str, by: i64) -> Result<i64> {
        let mut state = self.state.lock().await;
        let value = state.stats.entry(name.to_string()).or_insert(0);
        *value += by;
        Ok(*value)
    }

    async fn get_stat(&self, name: &str) -> Result<i64> {
        let state = self.state.lock().await;
        Ok(state.stats.get(name).copied().unwrap_or(0))
    }

    async fn remove_stat(&self, name: &str) -> Result<()> {
        let mut state = self.state.lock().await;
        state.stats.remove(name);
        Ok(())
    }

    async fn clear_stats(&self) -> Result<()> {
        let mut state = self.state.lock().await;
        state.stats.clear();
        Ok(())
    }

    async fn worker_count(&self) -> Result<usize> {
        let state = self.state.lock().await;
        Ok(state.workers.len())
    }

    async fn working_count(&self) -> Result<usize> {
        let state = self.state.lock().await;
        Ok(state.workers.iter().filter(|doc| doc.working).count())
    }

    async fn drop_all(&self) -> Result<()> {
        let mut state = self.state.lock().await;
        *state = Collections::default();
        Ok(())
    }

    fn servers(&self) -> Vec<String> {
        vec![self.endpoint.clone()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_take_latest_is_lifo() {
        let backend = MemoryBackend::new();
        backend.push_item("q", "\"first\"").await.unwrap();
        backend.push_item("q", "\"second\"").await.unwrap();
        backend.push_item("q", "\"third\"").await.unwrap();

        assert_eq!(
            backend.take_latest("q").await.unwrap(),
            Some("\"third\"".to_string())
        );
        assert_eq!(
            backend.take_latest("q").await.unwrap(),
            Some("\"second\"".to_string())
        );
        assert_eq!(
            backend.take_latest("q").await.unwrap(),
            Some("\"first\"".to_string())
        );
        assert_eq!(backend.take_latest("q").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_take_latest_empty_queue_is_none_not_error() {
        let backend = MemoryBackend::new();
        assert_eq!(backend.take_latest("missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_list_items_window() {
        let backend = MemoryBackend::new();
        for i in 0..5 {
            backend.push_item("q", &format!("{}", i)).await.unwrap();
        }

        // Most-recent-first: 4, 3, 2, 1, 0.
        let all = backend.list_items("q", 0, 10).await.unwrap();
        assert_eq!(all, vec!["4", "3", "2", "1", "0"]);

        let window = backend.list_items("q", 1, 2).await.unwrap();
        assert_eq!(window, vec!["3", "2"]);

        let past_end = backend.list_items("q", 10, 2).await.unwrap();
        assert!(past_end.is_empty());
    }

    #[tokio::test]
    async fn test_queue_names_is_derived() {
        let backend = MemoryBackend::new();
        assert!(backend.queue_names().await.unwrap().is_empty());

        backend.push_item("emails", "1").await.unwrap();
        backend.push_item("reports", "2").await.unwrap();
        assert_eq!(backend.queue_names().await.unwrap(), vec!["emails", "reports"]);

        backend.take_latest("emails").await.unwrap();
        assert_eq!(backend.queue_names().await.unwrap(), vec!["reports"]);
    }

    #[tokio::test]
    async fn test_remove_queue_is_idempotent() {
        let backend = MemoryBackend::new();
        backend.push_item("q", "1").await.unwrap();
        backend.push_item("other", "2").await.unwrap();

        backend.remove_queue("q").await.unwrap();
        assert_eq!(backend.queue_len("q").await.unwrap(), 0);
        assert_eq!(backend.queue_len("other").await.unwrap(), 1);

        // Already gone, still fine.
        backend.remove_queue("q").await.unwrap();
        backend.remove_queue("never-existed").await.unwrap();
    }

    #[tokio::test]
    async fn test_markers_survive_interleaved_pops() {
        let backend = MemoryBackend::new();
        backend.push_item("q", "1").await.unwrap();
        backend.push_item("q", "2").await.unwrap();
        backend.take_latest("q").await.unwrap();
        backend.push_item("q", "3").await.unwrap();

        // "3" was inserted after "2" was taken; it is still the newest.
        assert_eq!(
            backend.take_latest("q").await.unwrap(),
            Some("3".to_string())
        );
        assert_eq!(
            backend.take_latest("q").await.unwrap(),
            Some("1".to_string())
        );
    }

    #[tokio::test]
    async fn test_failures_most_recent_first() {
        let backend = MemoryBackend::new();
        backend.push_failure("\"a\"").await.unwrap();
        backend.push_failure("\"b\"").await.unwrap();
        backend.push_failure("\"c\"").await.unwrap();

        assert_eq!(backend.failure_len().await.unwrap(), 3);
        assert_eq!(
            backend.list_failures(0, 2).await.unwrap(),
            vec!["\"c\"", "\"b\""]
        );
        assert_eq!(backend.list_failures(2, 5).await.unwrap(), vec!["\"a\""]);

        backend.clear_failures().await.unwrap();
        assert_eq!(backend.failure_len().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_stats() {
        let backend = MemoryBackend::new();
        assert_eq!(backend.get_stat("processed").await.unwrap(), 0);
        assert_eq!(backend.incr_stat("processed", 1).await.unwrap(), 1);
        assert_eq!(backend.incr_stat("processed", 2).await.unwrap(), 3);

        backend.remove_stat("processed").await.unwrap();
        assert_eq!(backend.get_stat("processed").await.unwrap(), 0);

        backend.incr_stat("a", 1).await.unwrap();
        backend.incr_stat("b", 1).await.unwrap();
        backend.clear_stats().await.unwrap();
        assert_eq!(backend.get_stat("a").await.unwrap(), 0);
        assert_eq!(backend.get_stat("b").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_worker_records() {
        let backend = MemoryBackend::new();
        assert_eq!(backend.worker_count().await.unwrap(), 0);

        backend.register_worker("host-1:1234").await;
        backend.register_worker("host-2:5678").await;
        assert_eq!(backend.worker_count().await.unwrap(), 2);
        assert_eq!(backend.working_count().await.unwrap(), 0);

        backend.set_working("host-1:1234", true).await;
        assert_eq!(backend.working_count().await.unwrap(), 1);

        backend.remove_worker("host-1:1234").await;
        assert_eq!(backend.worker_count().await.unwrap(), 1);
        assert_eq!(backend.working_count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_drop_all() {
        let backend = MemoryBackend::new();
        backend.push_item("q", "1").await.unwrap();
        backend.push_failure("\"f\"").await.unwrap();
        backend.incr_stat("processed", 1).await.unwrap();
        backend.register_worker("w").await;

        backend.drop_all().await.unwrap();

        assert_eq!(backend.queue_len("q").await.unwrap(), 0);
        assert!(backend.queue_names().await.unwrap().is_empty());
        assert_eq!(backend.failure_len().await.unwrap(), 0);
        assert_eq!(backend.get_stat("processed").await.unwrap(), 0);
        assert_eq!(backend.worker_count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_servers_reports_endpoint() {
        let backend = MemoryBackend::new();
        assert_eq!(backend.servers(), vec!["localhost:27017".to_string()]);

        let config = StoreConfig::new("db.internal", 27018);
        let backend = MemoryBackend::connect(&config);
        assert_eq!(backend.servers(), vec!["db.internal:27018".to_string()]);
    }

    #[tokio::test]
    async fn test_connect_returns_independent_stores() {
        let config = StoreConfig::default();
        let a = MemoryBackend::connect(&config);
        let b = MemoryBackend::connect(&config);

        a.push_item("q", "1").await.unwrap();
        assert_eq!(a.queue_len("q").await.unwrap(), 1);
        assert_eq!(b.queue_len("q").await.unwrap(), 0);
    }
}
