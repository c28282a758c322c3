//! # filetrail-store
//!
//! Store contracts for the FILETRAIL durable collections, the in-memory
//! reference implementations, and the administrative bulk-clear operation.
//!
//! The traits in [`traits`] are the seam between the chain logic and
//! whatever durable store a deployment uses. [`memory`] is the reference
//! implementation backing tests and the daemon's default wiring;
//! [`maintenance`] clears both collections with bounded, paged deletes.

pub mod maintenance;
pub mod memory;
pub mod traits;

pub use maintenance::{clear_all, CLEAR_PAGE_SIZE};
pub use memory::{MemoryBlockStore, MemoryEventStore};
pub use traits::{
    BlockStore, EventStore, PagedCollection, ACTIVITY_LOG_COLLECTION, BLOCKCHAIN_COLLECTION,
};

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use chrono::{TimeZone, Utc};

    use filetrail_chain::compute_block;
    use filetrail_contracts::{ActivityAction, ActivityEvent, Block, TrailResult};

    use super::maintenance::clear_all;
    use super::memory::{MemoryBlockStore, MemoryEventStore};
    use super::traits::{BlockStore, EventStore, PagedCollection};

    // ── Helpers ───────────────────────────────────────────────────────────────

    fn make_event(file_name: &str, secs: i64) -> ActivityEvent {
        ActivityEvent {
            user_id: "user-7".to_string(),
            user_email: "user@example.com".to_string(),
            action: ActivityAction::UploadFile,
            file_name: file_name.to_string(),
            file_url: None,
            timestamp: Utc.timestamp_opt(secs, 0).unwrap(),
        }
    }

    fn make_block(previous_hash: &str, file_name: &str, secs: i64) -> Block {
        let event = make_event(file_name, secs);
        compute_block(previous_hash, event.clone(), event.timestamp)
    }

    /// A `PagedCollection` wrapper that counts page fetches.
    struct CountingCollection {
        inner: MemoryEventStore,
        fetches: AtomicUsize,
    }

    impl PagedCollection for CountingCollection {
        fn name(&self) -> &str {
            self.inner.name()
        }

        fn fetch_ids(&self, limit: usize) -> TrailResult<Vec<String>> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            self.inner.fetch_ids(limit)
        }

        fn delete_batch(&self, ids: &[String]) -> TrailResult<usize> {
            self.inner.delete_batch(ids)
        }
    }

    // ── Block store ───────────────────────────────────────────────────────────

    #[test]
    fn empty_store_has_no_latest_block() {
        let store = MemoryBlockStore::new();
        assert!(store.latest_block().unwrap().is_none());
        assert!(store.list_all(true).unwrap().is_empty());
    }

    #[test]
    fn latest_block_is_greatest_timestamp() {
        let store = MemoryBlockStore::new();
        let first = make_block("0", "a.txt", 10);
        let second = make_block(&first.hash, "b.txt", 20);

        // Append out of order; latest must still be chosen by timestamp.
        store.append(second.clone()).unwrap();
        store.append(first.clone()).unwrap();

        assert_eq!(store.latest_block().unwrap().unwrap().hash, second.hash);
    }

    #[test]
    fn list_all_orders_by_timestamp() {
        let store = MemoryBlockStore::new();
        let first = make_block("0", "a.txt", 10);
        let second = make_block(&first.hash, "b.txt", 20);
        store.append(second.clone()).unwrap();
        store.append(first.clone()).unwrap();

        let ascending = store.list_all(true).unwrap();
        assert_eq!(ascending[0].hash, first.hash);
        assert_eq!(ascending[1].hash, second.hash);

        let descending = store.list_all(false).unwrap();
        assert_eq!(descending[0].hash, second.hash);
    }

    #[test]
    fn latest_block_timestamp_tie_resolves_to_last_append() {
        let store = MemoryBlockStore::new();
        let first = make_block("0", "a.txt", 10);
        let twin = make_block(&first.hash, "b.txt", 10);
        store.append(first).unwrap();
        store.append(twin.clone()).unwrap();

        assert_eq!(store.latest_block().unwrap().unwrap().hash, twin.hash);
    }

    // ── Event store ───────────────────────────────────────────────────────────

    #[test]
    fn event_store_round_trips_in_timestamp_order() {
        let store = MemoryEventStore::new();
        store.record(make_event("b.txt", 20)).unwrap();
        store.record(make_event("a.txt", 10)).unwrap();

        let events = store.list_all(true).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].file_name, "a.txt");
        assert_eq!(events[1].file_name, "b.txt");
    }

    // ── Maintenance ───────────────────────────────────────────────────────────

    /// 1200 documents at page size 500 take exactly 3 fetches (500, 500,
    /// 200) and leave the collection empty; a second clear deletes nothing.
    #[tokio::test]
    async fn clear_pages_through_large_collection() {
        let store = MemoryEventStore::new();
        for i in 0..1200i64 {
            store.record(make_event(&format!("f{}.txt", i), i)).unwrap();
        }
        let counting = Arc::new(CountingCollection {
            inner: store.clone(),
            fetches: AtomicUsize::new(0),
        });
        let collections: Vec<Arc<dyn PagedCollection>> = vec![counting.clone()];

        let deleted = clear_all(&collections, 500).await.unwrap();
        assert_eq!(deleted, 1200);
        assert_eq!(counting.fetches.load(Ordering::SeqCst), 3);
        assert!(store.list_all(true).unwrap().is_empty());

        // Idempotent: clearing again is a no-op reporting zero deleted.
        let deleted_again = clear_all(&collections, 500).await.unwrap();
        assert_eq!(deleted_again, 0);
    }

    /// Both collections clear concurrently under one call.
    #[tokio::test]
    async fn clear_all_covers_both_collections() {
        let events = MemoryEventStore::new();
        let blocks = MemoryBlockStore::new();
        events.record(make_event("a.txt", 1)).unwrap();
        blocks.append(make_block("0", "a.txt", 1)).unwrap();

        let collections: Vec<Arc<dyn PagedCollection>> =
            vec![Arc::new(events.clone()), Arc::new(blocks.clone())];
        let deleted = clear_all(&collections, 500).await.unwrap();

        assert_eq!(deleted, 2);
        assert!(events.list_all(true).unwrap().is_empty());
        assert!(blocks.latest_block().unwrap().is_none());
    }

    /// A collection holding exactly one full page takes two fetches: the
    /// second returns zero ids and terminates the loop.
    #[tokio::test]
    async fn clear_exact_page_boundary() {
        let store = MemoryEventStore::new();
        for i in 0..500i64 {
            store.record(make_event(&format!("f{}.txt", i), i)).unwrap();
        }
        let counting = Arc::new(CountingCollection {
            inner: store.clone(),
            fetches: AtomicUsize::new(0),
        });
        let collections: Vec<Arc<dyn PagedCollection>> = vec![counting.clone()];

        let deleted = clear_all(&collections, 500).await.unwrap();
        assert_eq!(deleted, 500);
        assert_eq!(counting.fetches.load(Ordering::SeqCst), 2);
    }
}
