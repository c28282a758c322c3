//! Block hashing: the pure link-construction step of the chain.
//!
//! Hash input layout (bytes, in order):
//!   1. timestamp as epoch milliseconds, 8-byte little-endian
//!   2. canonical JSON of the activity event (serde_json, no pretty-printing,
//!      fields in struct declaration order)
//!   3. previous_hash as UTF-8 bytes (64 ASCII hex chars, or `"0"` for the
//!      genesis block)
//!
//! This layout is the tamper-evidence mechanism. Changing it, or the field
//! order inside `ActivityEvent`, invalidates every previously computed hash
//! and must be treated as a breaking format change.

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};

use filetrail_contracts::{ActivityEvent, Block};

/// Compute the SHA-256 hash of one block's content.
///
/// The hash commits to everything the block contains except the hash field
/// itself: its creation instant, the full activity payload, and its link to
/// the previous block.
///
/// Returns a lowercase 64-character hex string. Pure and deterministic:
/// identical inputs always produce identical output, which is what lets the
/// verifier recompute and compare.
///
/// # Panics
///
/// Panics if `activity` cannot be serialized to JSON, which cannot happen
/// for the well-formed `ActivityEvent` type.
pub fn hash_block(timestamp: DateTime<Utc>, activity: &ActivityEvent, previous_hash: &str) -> String {
    // serde_json::to_vec produces compact, deterministic JSON with struct
    // fields in declaration order across calls on the same value.
    let activity_json =
        serde_json::to_vec(activity).expect("ActivityEvent must always be serializable to JSON");

    let mut hasher = Sha256::new();
    hasher.update(timestamp.timestamp_millis().to_le_bytes());
    hasher.update(&activity_json);
    hasher.update(previous_hash.as_bytes());

    hex::encode(hasher.finalize())
}

/// Build the next block of a chain.
///
/// `previous_hash` is the hash of the current tip, or
/// `Block::GENESIS_PREVIOUS_HASH` when the chain is empty. No I/O and no
/// side effects; linkage against the live tip is the caller's job.
pub fn compute_block(
    previous_hash: &str,
    activity: ActivityEvent,
    timestamp: DateTime<Utc>,
) -> Block {
    let hash = hash_block(timestamp, &activity, previous_hash);
    Block {
        timestamp,
        activity,
        previous_hash: previous_hash.to_string(),
        hash,
    }
}
