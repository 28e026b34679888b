//! In-process change bus
//!
//! Fans out value-change events to subscribers, keyed by [`Topic`]. The bus
//! is independent of any backing store: it never reads storage itself, it
//! only runs the closures accessors hand it.
//!
//! # Design
//!
//! - DashMap of topics, each with its own `parking_lot::Mutex`
//! - One unbounded tokio mpsc channel per subscriber: publishing never
//!   blocks and never drops, delivery is FIFO per subscriber
//! - Store mutation + fan-out run under the topic lock
//!   ([`ChangeBus::publish_after`]), and so does seeding
//!   ([`ChangeBus::subscribe`]). A new subscriber therefore sees the value
//!   current at registration first, then every later change exactly once.
//!
//! # Reentrancy
//!
//! Closures passed to `publish_after` and `subscribe` run with the topic
//! locked. They must not publish to or subscribe on the same topic.

use crate::subscription::RawSubscription;
use dashmap::DashMap;
use keeper_core::{RawValue, Topic};
use parking_lot::Mutex;
use rustc_hash::FxHasher;
use std::hash::BuildHasherDefault;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;

/// A change notification: the new raw value, or `None` for removal
pub type Event = Option<RawValue>;

type FxBuild = BuildHasherDefault<FxHasher>;

struct Subscriber {
    id: u64,
    tx: mpsc::UnboundedSender<Event>,
}

/// Ordered subscriber list for one topic
#[derive(Default)]
pub(crate) struct TopicState {
    subscribers: Vec<Subscriber>,
}

impl TopicState {
    // Delivers in subscription order, pruning receivers that went away.
    fn fan_out(&mut self, event: &Event) -> usize {
        self.subscribers.retain(|s| s.tx.send(event.clone()).is_ok());
        self.subscribers.len()
    }

    pub(crate) fn remove(&mut self, id: u64) {
        self.subscribers.retain(|s| s.id != id);
    }
}

pub(crate) struct BusInner {
    topics: DashMap<Topic, Arc<Mutex<TopicState>>, FxBuild>,
    next_id: AtomicU64,
}

impl BusInner {
    pub(crate) fn existing(&self, topic: &Topic) -> Option<Arc<Mutex<TopicState>>> {
        self.topics.get(topic).map(|t| Arc::clone(t.value()))
    }
}

/// Publish/subscribe channel for setting changes
///
/// Clone is cheap (just Arc clone); clones share subscribers.
#[derive(Clone)]
pub struct ChangeBus {
    inner: Arc<BusInner>,
}

impl ChangeBus {
    /// Create a bus with no subscribers
    pub fn new() -> Self {
        Self {
            inner: Arc::new(BusInner {
                topics: DashMap::with_hasher(FxBuild::default()),
                next_id: AtomicU64::new(0),
            }),
        }
    }

    // Topic states are created on first use and kept; the key set is closed.
    fn state(&self, topic: &Topic) -> Arc<Mutex<TopicState>> {
        if let Some(state) = self.inner.existing(topic) {
            return state;
        }
        Arc::clone(self.inner.topics.entry(*topic).or_default().value())
    }

    /// Deliver `event` to every current subscriber of `topic`
    ///
    /// Returns the number of subscribers it was delivered to.
    pub fn publish(&self, topic: &Topic, event: Event) -> usize {
        let state = self.state(topic);
        let mut guard = state.lock();
        let delivered = guard.fan_out(&event);
        tracing::debug!(target: "keeper::bus", %topic, delivered, "published change");
        delivered
    }

    /// Run `apply` under the topic lock and publish the event it returns
    ///
    /// If `apply` fails nothing is published and the error is returned.
    /// Accessors mutate the backing store inside `apply`, so a change and its
    /// notification are a single step for every subscriber of the topic.
    pub fn publish_after<F, E>(&self, topic: &Topic, apply: F) -> Result<usize, E>
    where
        F: FnOnce() -> Result<Event, E>,
    {
        let state = self.state(topic);
        let mut guard = state.lock();
        let event = apply()?;
        let delivered = guard.fan_out(&event);
        tracing::debug!(target: "keeper::bus", %topic, delivered, "published change");
        Ok(delivered)
    }

    /// Subscribe to `topic`, seeding the stream with `seed()`
    ///
    /// `seed` runs under the topic lock, so no change can land between
    /// computing the seed and registering the subscriber.
    pub fn subscribe<F>(&self, topic: &Topic, seed: F) -> RawSubscription
    where
        F: FnOnce() -> Event,
    {
        let state = self.state(topic);
        let mut guard = state.lock();

        let (tx, rx) = mpsc::unbounded_channel();
        // Receiver is alive, send cannot fail.
        let _ = tx.send(seed());

        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        guard.subscribers.push(Subscriber { id, tx });

        tracing::debug!(
            target: "keeper::bus",
            %topic,
            id,
            subscribers = guard.subscribers.len(),
            "subscribed"
        );
        RawSubscription::new(*topic, id, rx, Arc::downgrade(&self.inner))
    }

    /// Number of live subscriptions on `topic`
    pub fn subscriber_count(&self, topic: &Topic) -> usize {
        self.inner
            .existing(topic)
            .map(|state| state.lock().subscribers.len())
            .unwrap_or(0)
    }
}

impl Default for ChangeBus {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ChangeBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeBus")
            .field("topics", &self.inner.topics.len())
            .finish()
    }
}
