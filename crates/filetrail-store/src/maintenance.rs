//! Administrative bulk-clear of the durable collections.
//!
//! The clear is a bounded loop, not a recursion: fetch up to a page of
//! document ids, batch-delete them, and stop once a fetch returns fewer ids
//! than the page size. Deletion changes what "next page" means, so each
//! collection's loop is strictly sequential internally; distinct collections
//! run as independent tasks with no shared mutable state.

use std::sync::Arc;

use tracing::info;

use filetrail_contracts::{TrailError, TrailResult};

use crate::traits::PagedCollection;

/// Default documents per page for `clear_all`.
pub const CLEAR_PAGE_SIZE: usize = 500;

/// Clear every given collection, returning the total documents deleted.
///
/// Idempotent: clearing an already-empty collection deletes zero documents.
/// Any page failure aborts the whole operation and surfaces as
/// `TrailError::Maintenance` naming the collection that failed.
pub async fn clear_all(
    collections: &[Arc<dyn PagedCollection>],
    page_size: usize,
) -> TrailResult<u64> {
    let mut handles = Vec::with_capacity(collections.len());
    for collection in collections {
        let collection = Arc::clone(collection);
        handles.push(tokio::spawn(async move {
            clear_collection(collection.as_ref(), page_size)
        }));
    }

    let mut total = 0u64;
    for handle in handles {
        total += handle.await.map_err(|e| TrailError::Maintenance {
            collection: "<unknown>".to_string(),
            reason: format!("clear task panicked: {}", e),
        })??;
    }

    info!(deleted = total, "maintenance clear complete");
    Ok(total)
}

/// Clear one collection with the paged loop described in the module docs.
fn clear_collection(collection: &dyn PagedCollection, page_size: usize) -> TrailResult<u64> {
    let mut deleted = 0u64;

    loop {
        let ids = collection
            .fetch_ids(page_size)
            .map_err(|e| maintenance_error(collection, &e))?;
        let fetched = ids.len();

        if !ids.is_empty() {
            deleted += collection
                .delete_batch(&ids)
                .map_err(|e| maintenance_error(collection, &e))? as u64;
        }

        // A short page means the collection is drained.
        if fetched < page_size {
            break;
        }
    }

    info!(collection = collection.name(), deleted, "collection cleared");
    Ok(deleted)
}

fn maintenance_error(collection: &dyn PagedCollection, source: &TrailError) -> TrailError {
    TrailError::Maintenance {
        collection: collection.name().to_string(),
        reason: source.to_string(),
    }
}
