//! In-memory reference implementations of the store contracts.
//!
//! Both stores keep their documents in a `Vec` of `(id, record)` pairs
//! behind a `Mutex`, with a fresh UUID as the opaque document id. Handles
//! are cheaply cloneable (`Arc` interior), so the watcher, the maintenance
//! task, and tests can all hold the same store.

use std::sync::{Arc, Mutex, MutexGuard};

use tracing::debug;
use uuid::Uuid;

use filetrail_contracts::{ActivityEvent, Block, TrailError, TrailResult};

use crate::traits::{
    BlockStore, EventStore, PagedCollection, ACTIVITY_LOG_COLLECTION, BLOCKCHAIN_COLLECTION,
};

// ── Shared document container ─────────────────────────────────────────────────

/// A `Mutex`-guarded list of `(id, record)` pairs in insertion order.
struct Docs<T> {
    inner: Arc<Mutex<Vec<(String, T)>>>,
}

impl<T> Clone for Docs<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Clone> Docs<T> {
    fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn lock(&self) -> TrailResult<MutexGuard<'_, Vec<(String, T)>>> {
        self.inner.lock().map_err(|e| TrailError::Store {
            reason: format!("store lock poisoned: {}", e),
        })
    }

    fn insert(&self, record: T) -> TrailResult<()> {
        self.lock()?.push((Uuid::new_v4().to_string(), record));
        Ok(())
    }

    fn fetch_ids(&self, limit: usize) -> TrailResult<Vec<String>> {
        Ok(self
            .lock()?
            .iter()
            .take(limit)
            .map(|(id, _)| id.clone())
            .collect())
    }

    fn delete_batch(&self, ids: &[String]) -> TrailResult<usize> {
        let mut docs = self.lock()?;
        let before = docs.len();
        docs.retain(|(id, _)| !ids.contains(id));
        Ok(before - docs.len())
    }
}

// ── Block store ───────────────────────────────────────────────────────────────

/// In-memory `BlockStore` ordered by block timestamp.
#[derive(Clone)]
pub struct MemoryBlockStore {
    docs: Docs<Block>,
}

impl MemoryBlockStore {
    pub fn new() -> Self {
        Self { docs: Docs::new() }
    }
}

impl Default for MemoryBlockStore {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockStore for MemoryBlockStore {
    fn latest_block(&self) -> TrailResult<Option<Block>> {
        let docs = self.docs.lock()?;
        // max_by returns the last maximum, so equal timestamps resolve to
        // the most recently appended block.
        Ok(docs
            .iter()
            .max_by(|(_, a), (_, b)| a.timestamp.cmp(&b.timestamp))
            .map(|(_, block)| block.clone()))
    }

    fn append(&self, block: Block) -> TrailResult<()> {
        debug!(hash = %block.hash, previous_hash = %block.previous_hash, "appending block");
        self.docs.insert(block)
    }

    fn list_all(&self, ascending: bool) -> TrailResult<Vec<Block>> {
        let docs = self.docs.lock()?;
        let mut blocks: Vec<Block> = docs.iter().map(|(_, b)| b.clone()).collect();
        // Stable sort keeps insertion order for equal timestamps.
        blocks.sort_by_key(|b| b.timestamp);
        if !ascending {
            blocks.reverse();
        }
        Ok(blocks)
    }
}

impl PagedCollection for MemoryBlockStore {
    fn name(&self) -> &str {
        BLOCKCHAIN_COLLECTION
    }

    fn fetch_ids(&self, limit: usize) -> TrailResult<Vec<String>> {
        self.docs.fetch_ids(limit)
    }

    fn delete_batch(&self, ids: &[String]) -> TrailResult<usize> {
        self.docs.delete_batch(ids)
    }
}

// ── Event store ───────────────────────────────────────────────────────────────

/// In-memory `EventStore` ordered by event timestamp.
#[derive(Clone)]
pub struct MemoryEventStore {
    docs: Docs<ActivityEvent>,
}

impl MemoryEventStore {
    pub fn new() -> Self {
        Self { docs: Docs::new() }
    }
}

impl Default for MemoryEventStore {
    fn default() -> Self {
        Self::new()
    }
}

impl EventStore for MemoryEventStore {
    fn record(&self, event: ActivityEvent) -> TrailResult<()> {
        self.docs.insert(event)
    }

    fn list_all(&self, ascending: bool) -> TrailResult<Vec<ActivityEvent>> {
        let docs = self.docs.lock()?;
        let mut events: Vec<ActivityEvent> = docs.iter().map(|(_, e)| e.clone()).collect();
        events.sort_by_key(|e| e.timestamp);
        if !ascending {
            events.reverse();
        }
        Ok(events)
    }
}

impl PagedCollection for MemoryEventStore {
    fn name(&self) -> &str {
        ACTIVITY_LOG_COLLECTION
    }

    fn fetch_ids(&self, limit: usize) -> TrailResult<Vec<String>> {
        self.docs.fetch_ids(limit)
    }

    fn delete_batch(&self, ids: &[String]) -> TrailResult<usize> {
        self.docs.delete_batch(ids)
    }
}
