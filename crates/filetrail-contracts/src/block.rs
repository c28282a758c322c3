//! Block type for the hash-linked audit chain.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::activity::ActivityEvent;

/// One entry in the hash-linked chain, binding an activity event to the
/// digest of the prior block.
///
/// Blocks are created exactly once by the watcher in response to one
/// `ActivityEvent` and never mutated or deleted under normal operation.
/// Modifying any field, including those of the embedded `activity`,
/// invalidates `hash` and breaks the linkage of every subsequent block,
/// which `verify_chain` detects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// Creation instant, copied verbatim from the event's server-assigned
    /// timestamp so hash order and store query order agree.
    pub timestamp: DateTime<Utc>,

    /// The activity this block commits to.
    pub activity: ActivityEvent,

    /// Hex SHA-256 of the previous block, or [`Block::GENESIS_PREVIOUS_HASH`]
    /// for the first block in the chain.
    pub previous_hash: String,

    /// Hex SHA-256 over this block's own content, excluding this field.
    ///
    /// Computed by `hash_block()` over (timestamp, activity, previous_hash)
    /// in that order.
    pub hash: String,
}

impl Block {
    /// The sentinel `previous_hash` carried by the first block of a chain.
    ///
    /// A single `"0"` cannot be the hex encoding of a SHA-256 digest, making
    /// genesis detection unambiguous.
    pub const GENESIS_PREVIOUS_HASH: &'static str = "0";

    /// True when this block is the first of its chain.
    pub fn is_genesis(&self) -> bool {
        self.previous_hash == Self::GENESIS_PREVIOUS_HASH
    }
}
