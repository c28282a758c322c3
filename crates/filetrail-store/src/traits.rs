//! Store contracts for the FILETRAIL durable collections.
//!
//! Two collections exist: one holding raw `ActivityEvent` records and one
//! holding the `Block` chain. Each is a mapping from an opaque document id
//! to its record, queryable by timestamp with a limit. Implementations back
//! these traits with whatever durable store the deployment uses; the
//! in-memory implementations in this crate are the reference.

use filetrail_contracts::{ActivityEvent, Block, TrailResult};

/// Name of the collection holding raw activity events.
pub const ACTIVITY_LOG_COLLECTION: &str = "activityLogs";

/// Name of the collection holding the block chain.
pub const BLOCKCHAIN_COLLECTION: &str = "blockchain";

/// The append-only chain store.
///
/// This layer makes no linkage, uniqueness, or locking guarantee: `append`
/// durably adds whatever block it is given. Linking a block to the live tip
/// before appending is the watcher's responsibility, and serializing
/// concurrent appends is the caller's.
pub trait BlockStore: Send + Sync {
    /// The block with the greatest timestamp, or `None` when the chain is
    /// empty. Ties resolve to the most recently appended block.
    fn latest_block(&self) -> TrailResult<Option<Block>>;

    /// Durably add one block as a single atomic write.
    fn append(&self, block: Block) -> TrailResult<()>;

    /// The full chain, ordered by timestamp.
    fn list_all(&self, ascending: bool) -> TrailResult<Vec<Block>>;
}

/// The append-only activity event store.
///
/// Written by the UI collaborator on every upload/delete; read back for
/// rendering and for deriving the current-files view.
pub trait EventStore: Send + Sync {
    /// Durably add one event record.
    fn record(&self, event: ActivityEvent) -> TrailResult<()>;

    /// All events, ordered by timestamp.
    fn list_all(&self, ascending: bool) -> TrailResult<Vec<ActivityEvent>>;
}

/// The maintenance-facing view of a durable collection: enough surface to
/// page through document ids and batch-delete them, nothing more.
pub trait PagedCollection: Send + Sync {
    /// Collection name, for logs and error messages.
    fn name(&self) -> &str;

    /// Up to `limit` document ids currently in the collection.
    ///
    /// Order is unspecified; callers must not assume a stable cursor, since
    /// deletion changes what the next page contains.
    fn fetch_ids(&self, limit: usize) -> TrailResult<Vec<String>>;

    /// Delete the given documents in one batch. Ids not present are ignored.
    /// Returns how many documents were actually removed.
    fn delete_batch(&self, ids: &[String]) -> TrailResult<usize>;
}
