//! Queue store: push, pop, peek, and queue management.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::backend::{Backend, SharedBackend};
use crate::codec;
use crate::error::Result;

/// Store for named queues of encoded job payloads.
///
/// Items are consumed most-recent-first: the last payload pushed to a queue
/// is the first one popped. A continuously refilled queue can therefore
/// starve its oldest items indefinitely; that is observed behavior this
/// store preserves, not a bug.
#[derive(Clone)]
pub struct QueueStore<B: Backend + Clone = SharedBackend> {
    backend: B,
}

impl QueueStore<SharedBackend> {
    /// Create a new queue store with a shared backend.
    pub fn new(backend: impl Backend + 'static) -> Self {
        Self {
            backend: SharedBackend::new(backend),
        }
    }
}

impl<B: Backend + Clone> QueueStore<B> {
    /// Create a new queue store with a specific backend.
    pub fn with_backend(backend: B) -> Self {
        Self { backend }
    }

    /// Push a payload onto a queue.
    ///
    /// The payload is encoded and appended with a fresh insertion marker.
    /// If the queue was empty it becomes visible in [`queues`](Self::queues).
    /// Push is fire-and-forget: it has no transactional relationship to any
    /// other operation.
    pub async fn push<T>(&self, queue: &str, payload: &T) -> Result<()>
    where
        T: Serialize + ?Sized,
    {
        let item_json = codec::encode(payload)?;
        self.backend.push_item(queue, &item_json).await?;

        tracing::debug!(queue = %queue, "Item pushed");
        Ok(())
    }

    /// Pop the most recently pushed payload off a queue.
    ///
    /// The select-and-remove is one indivisible backend operation, so
    /// concurrent callers never receive the same item and no item is lost
    /// between them. Returns `Ok(None)` immediately when the queue is empty;
    /// there is no blocking wait, so consumers run their own poll/backoff
    /// loop and trade poll interval against idle CPU.
    pub async fn pop<T>(&self, queue: &str) -> Result<Option<T>>
    where
        T: DeserializeOwned,
    {
        match self.backend.take_latest(queue).await? {
            Some(item_json) => {
                let payload = codec::decode(&item_json)?;
                tracing::debug!(queue = %queue, "Item popped");
                Ok(Some(payload))
            }
            None => Ok(None),
        }
    }

    /// Look at the payload at offset `start` without removing it.
    ///
    /// Offset 0 is the item `pop` would return next. This is the
    /// single-item shape of the peek contract; use
    /// [`peek_many`](Self::peek_many) for a window.
    pub async fn peek<T>(&self, queue: &str, start: usize) -> Result<Option<T>>
    where
        T: DeserializeOwned,
    {
        let items = self.backend.list_items(queue, start, 1).await?;
        match items.first() {
            Some(item_json) => Ok(Some(codec::decode(item_json)?)),
            None => Ok(None),
        }
    }

    /// Look at the window `[start, start + count)` of a queue without
    /// removing anything, in the order `pop` would consume it.
    ///
    /// Returns an empty vector when the window is past the end.
    pub async fn peek_many<T>(&self, queue: &str, start: usize, count: usize) -> Result<Vec<T>>
    where
        T: DeserializeOwned,
    {
        let items = self.backend.list_items(queue, start, count).await?;
        items.iter().map(|item_json| codec::decode(item_json)).collect()
    }

    /// Get the number of items currently stored for a queue.
    pub async fn size(&self, queue: &str) -> Result<usize> {
        self.backend.queue_len(queue).await
    }

    /// List the distinct queue names currently holding at least one item.
    ///
    /// Recomputed from live data on every call: popping a queue empty makes
    /// it disappear from this list with no separate bookkeeping.
    pub async fn queues(&self) -> Result<Vec<String>> {
        self.backend.queue_names().await
    }

    /// Delete all items of a queue unconditionally.
    pub async fn remove_queue(&self, queue: &str) -> Result<()> {
        self.backend.remove_queue(queue).await?;

        tracing::debug!(queue = %queue, "Queue removed");
        Ok(())
    }
}
