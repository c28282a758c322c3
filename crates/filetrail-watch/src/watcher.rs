//! The activity watcher: one chain extension per observed event.
//!
//! The watcher is the only writer of the block collection. It consumes feed
//! messages one at a time off a single queue, so its read-latest / compute /
//! append sequence never interleaves with itself and every new block links
//! to the true tip. The `BlockStore` contract does not enforce linkage, so
//! running several watchers against one chain remains a deployment hazard.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use filetrail_chain::compute_block;
use filetrail_contracts::{ActivityEvent, Block, TrailResult};
use filetrail_store::BlockStore;

use crate::feed::{ActivityFeed, FeedChange, Subscription};

/// The watcher's two-state linking machine.
///
/// `Idle` between events; `Linking` while one event's block is being
/// computed and appended. The transition back to `Idle` happens whether the
/// append succeeded or failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    Idle,
    Linking,
}

/// Resubscribe backoff bounds.
#[derive(Debug, Clone, Copy)]
pub struct Backoff {
    pub initial: Duration,
    pub max: Duration,
}

impl Default for Backoff {
    fn default() -> Self {
        Self {
            initial: Duration::from_millis(200),
            max: Duration::from_secs(5),
        }
    }
}

/// Why one pass over a subscription ended.
enum Drained {
    /// The shutdown signal fired; the watcher must stop for good.
    Shutdown,
    /// The feed disconnected without a shutdown; resubscribe with backoff.
    Disconnected { handled: u64 },
}

/// Subscribes to the activity feed and extends the chain exactly once per
/// newly observed event.
///
/// Holds no persistent state beyond the subscription: the previous hash is
/// rediscovered from the store on every append, so a restarted watcher
/// continues the existing chain seamlessly.
pub struct ActivityWatcher {
    blocks: Arc<dyn BlockStore>,
    backoff: Backoff,
    state: Mutex<LinkState>,
}

impl ActivityWatcher {
    pub fn new(blocks: Arc<dyn BlockStore>) -> Self {
        Self::with_backoff(blocks, Backoff::default())
    }

    pub fn with_backoff(blocks: Arc<dyn BlockStore>, backoff: Backoff) -> Self {
        Self {
            blocks,
            backoff,
            state: Mutex::new(LinkState::Idle),
        }
    }

    /// Current position in the linking state machine.
    pub fn link_state(&self) -> LinkState {
        *self.state.lock().expect("watcher state lock poisoned")
    }

    /// Chain one event: read the tip, compute the linked block, append it.
    ///
    /// The genesis case falls out naturally: an empty store yields the `"0"`
    /// sentinel as the previous hash. The event's server-assigned timestamp
    /// becomes the block timestamp, keeping hash order and store order in
    /// agreement.
    pub fn link_event(&self, activity: ActivityEvent) -> TrailResult<Block> {
        let previous_hash = self
            .blocks
            .latest_block()?
            .map(|tip| tip.hash)
            .unwrap_or_else(|| Block::GENESIS_PREVIOUS_HASH.to_string());

        let timestamp = activity.timestamp;
        let block = compute_block(&previous_hash, activity, timestamp);
        self.blocks.append(block.clone())?;
        Ok(block)
    }

    /// Run until the shutdown signal fires, resubscribing with exponential
    /// backoff whenever the feed disconnects.
    pub async fn run(self: Arc<Self>, feed: Arc<ActivityFeed>, mut shutdown: watch::Receiver<bool>) {
        let mut delay = self.backoff.initial;

        loop {
            let mut subscription = feed.subscribe();
            debug!("subscribed to activity feed");

            match self.drain(&mut subscription, &mut shutdown).await {
                Drained::Shutdown => {
                    info!("watcher shut down cleanly");
                    return;
                }
                Drained::Disconnected { handled } => {
                    // A subscription that delivered anything resets the
                    // backoff; only consecutive dead subscriptions grow it.
                    if handled > 0 {
                        delay = self.backoff.initial;
                    }
                    warn!(
                        delay_ms = delay.as_millis() as u64,
                        "activity feed disconnected; resubscribing"
                    );
                    tokio::select! {
                        _ = tokio::time::sleep(delay) => {}
                        changed = shutdown.changed() => {
                            // A dropped shutdown sender counts as shutdown.
                            if changed.is_err() || is_shutdown(&shutdown) {
                                info!("watcher shut down during resubscribe backoff");
                                return;
                            }
                        }
                    }
                    delay = (delay * 2).min(self.backoff.max);
                }
            }
        }
    }

    /// Consume one subscription until it disconnects or shutdown fires.
    async fn drain(
        &self,
        subscription: &mut Subscription,
        shutdown: &mut watch::Receiver<bool>,
    ) -> Drained {
        let mut handled = 0u64;

        loop {
            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() || is_shutdown(shutdown) {
                        return Drained::Shutdown;
                    }
                }
                message = subscription.next() => {
                    match message {
                        None => return Drained::Disconnected { handled },
                        Some(m) if m.change == FeedChange::Added => {
                            handled += 1;
                            self.handle_added(m.activity);
                        }
                        // Modified and removed records never extend the chain.
                        Some(m) => {
                            debug!(change = ?m.change, file = %m.activity.file_name, "ignoring non-added feed change");
                        }
                    }
                }
            }
        }
    }

    /// One Idle -> Linking -> Idle cycle.
    ///
    /// A failed append is logged and the event dropped: retrying blindly
    /// could double-write against a tip that moved in the meantime.
    fn handle_added(&self, activity: ActivityEvent) {
        *self.state.lock().expect("watcher state lock poisoned") = LinkState::Linking;

        match self.link_event(activity) {
            Ok(block) => {
                debug!(
                    hash = %block.hash,
                    previous_hash = %block.previous_hash,
                    file = %block.activity.file_name,
                    "chained activity event"
                );
            }
            Err(err) => {
                error!(error = %err, "failed to chain activity event; event dropped");
            }
        }

        *self.state.lock().expect("watcher state lock poisoned") = LinkState::Idle;
    }
}

fn is_shutdown(shutdown: &watch::Receiver<bool>) -> bool {
    *shutdown.borrow()
}
