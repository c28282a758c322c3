//! # filetrail-watch
//!
//! The live side of the FILETRAIL audit chain: a subscription feed of
//! activity-log changes and the watcher that extends the chain exactly once
//! per newly observed event.

pub mod feed;
pub mod watcher;

pub use feed::{ActivityFeed, FeedChange, FeedMessage, Subscription};
pub use watcher::{ActivityWatcher, Backoff, LinkState};

// ── Tests ─────────────────────────────────────────────────────────────────────
