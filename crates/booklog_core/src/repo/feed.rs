//! Change feed for the `books` collection.
//!
//! # Responsibility
//! - Track live subscribers and fan out full-collection snapshots.
//! - Give each subscriber a handle whose drop releases its registration.
//!
//! # Invariants
//! - Every subscription receives an initial event before any later push.
//! - After a handle is dropped or unsubscribed the feed never delivers to it.
//! - Subscribers whose receiving end is gone are pruned on the next publish.

use crate::model::book::Book;
use log::debug;
use std::collections::BTreeMap;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

/// One push from the store to a subscriber.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedEvent {
    /// Full current collection, authoritative for display.
    Snapshot(Vec<Book>),
    /// The store could not produce a snapshot; data may be stale.
    Failed(String),
}

type SubscriberId = u64;

#[derive(Default)]
struct FeedRegistry {
    next_id: SubscriberId,
    subscribers: BTreeMap<SubscriberId, Sender<FeedEvent>>,
}

/// Fan-out hub owned by a store implementation.
#[derive(Clone, Default)]
pub struct SnapshotFeed {
    registry: Arc<Mutex<FeedRegistry>>,
}

impl SnapshotFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a subscriber and queues `initial` as its first event.
    pub fn subscribe(&self, initial: FeedEvent) -> BookSubscription {
        let (sender, receiver) = mpsc::channel();
        // Receiver is still in scope, so this send cannot fail.
        let _ = sender.send(initial);

        let mut registry = lock(&self.registry);
        let id = registry.next_id;
        registry.next_id += 1;
        registry.subscribers.insert(id, sender);
        debug!(
            "event=feed_subscribe module=feed status=ok subscriber={id} subscribers={}",
            registry.subscribers.len()
        );

        BookSubscription {
            id,
            receiver,
            registry: Arc::downgrade(&self.registry),
        }
    }

    /// Sends `event` to every live subscriber and returns how many got it.
    pub fn publish(&self, event: &FeedEvent) -> usize {
        let mut registry = lock(&self.registry);
        registry
            .subscribers
            .retain(|_, sender| sender.send(event.clone()).is_ok());
        registry.subscribers.len()
    }

    pub fn subscriber_count(&self) -> usize {
        lock(&self.registry).subscribers.len()
    }
}

/// Live subscription to the `books` collection.
///
/// Dropping the handle unsubscribes.
pub struct BookSubscription {
    id: SubscriberId,
    receiver: Receiver<FeedEvent>,
    registry: Weak<Mutex<FeedRegistry>>,
}

impl BookSubscription {
    /// Returns the next queued event without blocking.
    pub fn try_next(&self) -> Option<FeedEvent> {
        match self.receiver.try_recv() {
            Ok(event) => Some(event),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }

    /// Takes every queued event, oldest first.
    pub fn drain(&self) -> Vec<FeedEvent> {
        self.receiver.try_iter().collect()
    }

    /// Returns whether the store still delivers to this subscription.
    pub fn is_active(&self) -> bool {
        self.registry
            .upgrade()
            .is_some_and(|registry| lock(&registry).subscribers.contains_key(&self.id))
    }

    /// Releases the subscription explicitly.
    pub fn unsubscribe(self) {}
}

impl Drop for BookSubscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            let mut registry = lock(&registry);
            if registry.subscribers.remove(&self.id).is_some() {
                debug!(
                    "event=feed_unsubscribe module=feed status=ok subscriber={} subscribers={}",
                    self.id,
                    registry.subscribers.len()
                );
            }
        }
    }
}

fn lock(registry: &Mutex<FeedRegistry>) -> MutexGuard<'_, FeedRegistry> {
    registry.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::{FeedEvent, SnapshotFeed};

    #[test]
    fn initial_event_arrives_first() {
        let feed = SnapshotFeed::new();
        let subscription = feed.subscribe(FeedEvent::Snapshot(Vec::new()));
        feed.publish(&FeedEvent::Failed("offline".to_string()));

        assert_eq!(
            subscription.drain(),
            vec![
                FeedEvent::Snapshot(Vec::new()),
                FeedEvent::Failed("offline".to_string()),
            ]
        );
        assert_eq!(subscription.try_next(), None);
    }

    #[test]
    fn dropping_handle_releases_registration() {
        let feed = SnapshotFeed::new();
        let first = feed.subscribe(FeedEvent::Snapshot(Vec::new()));
        let second = feed.subscribe(FeedEvent::Snapshot(Vec::new()));
        assert_eq!(feed.subscriber_count(), 2);

        first.unsubscribe();
        assert_eq!(feed.subscriber_count(), 1);
        assert!(second.is_active());
        assert_eq!(feed.publish(&FeedEvent::Snapshot(Vec::new())), 1);
    }

    #[test]
    fn handle_outliving_feed_is_inactive() {
        let feed = SnapshotFeed::new();
        let subscription = feed.subscribe(FeedEvent::Snapshot(Vec::new()));
        drop(feed);

        assert!(!subscription.is_active());
        assert_eq!(subscription.try_next(), Some(FeedEvent::Snapshot(Vec::new())));
        assert_eq!(subscription.try_next(), None);
    }
}
