//! # filetrail-chain
//!
//! Hash-linking and verification primitives for the FILETRAIL audit chain.
//!
//! `hash_block` / `compute_block` build new blocks deterministically;
//! `verify_chain` walks a fetched chain and detects any tampering with
//! block content or linkage. Everything in this crate is pure: no I/O,
//! no clocks, no stores.

pub mod hash;
pub mod verify;

pub use hash::{compute_block, hash_block};
pub use verify::{verify_chain, VerificationResult, VerifyFault};

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use filetrail_contracts::{ActivityAction, ActivityEvent, Block};

    use super::{compute_block, hash_block, verify_chain, VerificationResult, VerifyFault};

    // ── Helpers ───────────────────────────────────────────────────────────────

    fn make_event(file_name: &str, secs: i64) -> ActivityEvent {
        ActivityEvent {
            user_id: "user-42".to_string(),
            user_email: "user@example.com".to_string(),
            action: ActivityAction::UploadFile,
            file_name: file_name.to_string(),
            file_url: Some(format!("https://files.example.com/{}", file_name)),
            timestamp: Utc.timestamp_opt(secs, 0).unwrap(),
        }
    }

    /// Build a correctly linked chain over the given events, in order.
    fn make_chain(events: Vec<ActivityEvent>) -> Vec<Block> {
        let mut blocks = Vec::new();
        let mut prev = Block::GENESIS_PREVIOUS_HASH.to_string();
        for event in events {
            let block = compute_block(&prev, event.clone(), event.timestamp);
            prev = block.hash.clone();
            blocks.push(block);
        }
        blocks
    }

    // ── Hashing ───────────────────────────────────────────────────────────────

    /// Identical inputs must always produce identical digests.
    #[test]
    fn test_hash_determinism() {
        let event = make_event("report.pdf", 100);
        let a = hash_block(event.timestamp, &event, "0");
        let b = hash_block(event.timestamp, &event, "0");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64, "digest must be 64 lowercase hex chars");
        assert!(a.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    /// Any change to any input must change the digest.
    #[test]
    fn test_hash_sensitivity() {
        let event = make_event("report.pdf", 100);
        let base = hash_block(event.timestamp, &event, "0");

        let mut renamed = event.clone();
        renamed.file_name = "Report.pdf".to_string();
        assert_ne!(base, hash_block(event.timestamp, &renamed, "0"));

        let later = Utc.timestamp_opt(101, 0).unwrap();
        assert_ne!(base, hash_block(later, &event, "0"));

        assert_ne!(base, hash_block(event.timestamp, &event, "1"));
    }

    #[test]
    fn test_compute_block_links_and_hashes() {
        let event = make_event("a.txt", 10);
        let block = compute_block("0", event.clone(), event.timestamp);
        assert!(block.is_genesis());
        assert_eq!(block.hash, hash_block(block.timestamp, &block.activity, "0"));
    }

    // ── Verification ──────────────────────────────────────────────────────────

    /// An empty chain is trivially valid.
    #[test]
    fn test_verify_empty_chain() {
        assert_eq!(verify_chain(&[]), VerificationResult::Valid);
    }

    /// A correctly built chain of n blocks verifies as valid, and each block
    /// links to its predecessor.
    #[test]
    fn test_verify_well_formed_chain() {
        let chain = make_chain(vec![
            make_event("a.txt", 1),
            make_event("b.txt", 2),
            make_event("c.txt", 3),
        ]);
        assert_eq!(chain.len(), 3);
        assert_eq!(chain[0].previous_hash, Block::GENESIS_PREVIOUS_HASH);
        assert_eq!(chain[1].previous_hash, chain[0].hash);
        assert_eq!(chain[2].previous_hash, chain[1].hash);
        assert_eq!(verify_chain(&chain), VerificationResult::Valid);
    }

    /// Flipping one character of a stored field is reported as a hash
    /// mismatch at that block's index.
    #[test]
    fn test_tampered_field_is_hash_mismatch() {
        let mut chain = make_chain(vec![
            make_event("a.txt", 1),
            make_event("b.txt", 2),
            make_event("c.txt", 3),
        ]);
        chain[1].activity.file_name = "B.txt".to_string();

        assert_eq!(
            verify_chain(&chain),
            VerificationResult::Invalid {
                index: 1,
                fault: VerifyFault::HashMismatch,
            }
        );
    }

    /// Pointing a block's previous_hash at an unrelated value is reported as
    /// a linkage mismatch at that block's index.
    #[test]
    fn test_foreign_previous_hash_is_linkage_mismatch() {
        let mut chain = make_chain(vec![make_event("a.txt", 1), make_event("b.txt", 2)]);
        chain[1].previous_hash = "f".repeat(64);

        assert_eq!(
            verify_chain(&chain),
            VerificationResult::Invalid {
                index: 1,
                fault: VerifyFault::LinkageMismatch,
            }
        );
    }

    /// A first block that does not carry the genesis sentinel fails at
    /// index 0.
    #[test]
    fn test_non_genesis_first_block_rejected() {
        let event = make_event("a.txt", 1);
        let block = compute_block(&"a".repeat(64), event.clone(), event.timestamp);

        assert_eq!(
            verify_chain(&[block]),
            VerificationResult::Invalid {
                index: 0,
                fault: VerifyFault::LinkageMismatch,
            }
        );
    }

    /// Dropping a middle block breaks linkage at the splice point.
    #[test]
    fn test_removed_block_detected() {
        let mut chain = make_chain(vec![
            make_event("a.txt", 1),
            make_event("b.txt", 2),
            make_event("c.txt", 3),
        ]);
        chain.remove(1);

        assert_eq!(
            verify_chain(&chain),
            VerificationResult::Invalid {
                index: 1,
                fault: VerifyFault::LinkageMismatch,
            }
        );
    }
}
