//! The live activity feed and its subscription object.
//!
//! `ActivityFeed` is the producer half: the UI collaborator publishes one
//! message per observed change to the activity log. `Subscription` is the
//! consumer half held by the watcher. Delivery contract: messages arrive in
//! publication order, are never duplicated within one subscription's
//! lifetime, and a new subscription only ever sees messages published after
//! it was created, so resubscribing cannot replay already-seen events.

use std::sync::Mutex;

use tokio::sync::mpsc;

use filetrail_contracts::ActivityEvent;

/// How the activity log changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedChange {
    /// A new event was written. The only change kind that extends the chain.
    Added,
    /// An existing record was rewritten. Never chained.
    Modified,
    /// A record was erased. Never chained.
    Removed,
}

/// One feed delivery: a change kind plus the event it concerns.
#[derive(Debug, Clone)]
pub struct FeedMessage {
    pub change: FeedChange,
    pub activity: ActivityEvent,
}

/// The producer side of the activity feed.
///
/// Holds at most one live subscription. Publishing while no subscription is
/// active drops the message, matching the contract that a subscriber only
/// observes changes made during its own lifetime.
pub struct ActivityFeed {
    sender: Mutex<Option<mpsc::UnboundedSender<FeedMessage>>>,
}

impl ActivityFeed {
    pub fn new() -> Self {
        Self {
            sender: Mutex::new(None),
        }
    }

    /// Open a subscription, replacing any previous one.
    ///
    /// The previous subscription's receiver observes a disconnect on its
    /// next read.
    pub fn subscribe(&self) -> Subscription {
        let (tx, rx) = mpsc::unbounded_channel();
        *self.sender.lock().expect("feed sender lock poisoned") = Some(tx);
        Subscription { rx }
    }

    /// Publish one message to the live subscription.
    ///
    /// Returns true when a subscriber received it, false when no
    /// subscription is active (the message is dropped).
    pub fn publish(&self, message: FeedMessage) -> bool {
        let guard = self.sender.lock().expect("feed sender lock poisoned");
        match guard.as_ref() {
            Some(tx) => tx.send(message).is_ok(),
            None => false,
        }
    }

    /// Publish an `Added` change for `activity`.
    pub fn publish_added(&self, activity: ActivityEvent) -> bool {
        self.publish(FeedMessage {
            change: FeedChange::Added,
            activity,
        })
    }

    /// Simulate a feed failure: drop the live sender so the subscriber sees
    /// the stream end without a clean shutdown.
    pub fn disconnect(&self) {
        *self.sender.lock().expect("feed sender lock poisoned") = None;
    }
}

impl Default for ActivityFeed {
    fn default() -> Self {
        Self::new()
    }
}

/// The consumer half of one feed subscription.
pub struct Subscription {
    rx: mpsc::UnboundedReceiver<FeedMessage>,
}

impl Subscription {
    /// Next message, or `None` once the feed has disconnected.
    pub async fn next(&mut self) -> Option<FeedMessage> {
        self.rx.recv().await
    }

    /// Tear the subscription down. Messages already queued are discarded
    /// with the receiver; the feed's next publish reports no subscriber.
    pub fn cancel(mut self) {
        self.rx.close();
    }
}
