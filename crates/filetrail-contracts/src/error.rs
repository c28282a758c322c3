//! Runtime error types for the FILETRAIL workspace.
//!
//! All fallible operations return `TrailResult<T>`. Error variants carry
//! enough context to produce actionable log entries. Verification faults are
//! NOT errors: they are values of `VerificationResult` in filetrail-chain,
//! since a tampered chain is a finding to report, not a failure of the
//! verifier.

use thiserror::Error;

/// The unified error type for the FILETRAIL runtime.
#[derive(Debug, Error)]
pub enum TrailError {
    /// Talking to the durable store failed (I/O, network, poisoned lock).
    ///
    /// The watcher does not retry on this: re-deriving `previous_hash` after
    /// a transient failure could have changed, so the event is logged and
    /// dropped. The maintenance loop retries implicitly via its next fetch.
    #[error("store operation failed: {reason}")]
    Store { reason: String },

    /// The activity feed disconnected or refused a subscription.
    ///
    /// Logged by the watcher, which then resubscribes with backoff.
    #[error("activity feed subscription failed: {reason}")]
    Subscription { reason: String },

    /// A required configuration value is missing or invalid.
    #[error("configuration error: {reason}")]
    Config { reason: String },

    /// A bulk-clear loop failed partway through a collection.
    ///
    /// Aborts the whole maintenance operation; the daemon exits non-zero.
    #[error("maintenance failed on collection '{collection}': {reason}")]
    Maintenance { collection: String, reason: String },
}

/// Convenience alias used throughout the FILETRAIL crates.
pub type TrailResult<T> = Result<T, TrailError>;
