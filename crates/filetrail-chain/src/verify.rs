//! Chain integrity verification.

use filetrail_contracts::Block;

use crate::hash::hash_block;

/// Why a block failed verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyFault {
    /// The block's stored hash does not match the digest recomputed from its
    /// own content. Some field of the block was altered after hashing.
    HashMismatch,

    /// The block's `previous_hash` does not match the hash of the block
    /// before it (or the genesis sentinel at position 0). The chain was
    /// relinked, reordered, or truncated in the middle.
    LinkageMismatch,
}

/// The outcome of verifying a chain.
///
/// An empty chain is trivially `Valid`: there are no blocks to break.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationResult {
    Valid,
    Invalid {
        /// Position (ascending order, 0-based) of the first bad block.
        index: usize,
        fault: VerifyFault,
    },
}

impl VerificationResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, VerificationResult::Valid)
    }
}

/// Verify the integrity of a chain, given its blocks in ascending order.
///
/// Two rules are checked for every block, linkage first:
///
/// 1. **Linkage**: `previous_hash` equals the hash of the preceding block,
///    or `Block::GENESIS_PREVIOUS_HASH` at position 0.
/// 2. **Hash correctness**: the stored `hash` matches the value recomputed
///    from the block's own fields via [`hash_block`].
///
/// Scans in ascending order and short-circuits at the first violation,
/// reporting its index and fault kind.
pub fn verify_chain(blocks: &[Block]) -> VerificationResult {
    let mut expected_prev = Block::GENESIS_PREVIOUS_HASH.to_string();

    for (index, block) in blocks.iter().enumerate() {
        if block.previous_hash != expected_prev {
            return VerificationResult::Invalid {
                index,
                fault: VerifyFault::LinkageMismatch,
            };
        }

        let recomputed = hash_block(block.timestamp, &block.activity, &block.previous_hash);
        if block.hash != recomputed {
            return VerificationResult::Invalid {
                index,
                fault: VerifyFault::HashMismatch,
            };
        }

        expected_prev = block.hash.clone();
    }

    VerificationResult::Valid
}
