//! Subscriber side of the change bus
//!
//! A [`RawSubscription`] owns the receiving end of one subscriber channel.
//! Dropping or cancelling it unregisters from the bus synchronously; since
//! the receiver is dropped with it, nothing can be delivered afterwards.
//!
//! The stream ends (yields `None`) only if the bus itself is dropped.

use crate::bus::{BusInner, Event};
use futures::Stream;
use keeper_core::Topic;
use std::pin::Pin;
use std::sync::Weak;
use std::task::{Context, Poll};
use tokio::sync::mpsc;

pub use tokio::sync::mpsc::error::TryRecvError;

/// Live, seeded stream of raw change events for one topic
pub struct RawSubscription {
    topic: Topic,
    id: u64,
    rx: mpsc::UnboundedReceiver<Event>,
    bus: Weak<BusInner>,
}

impl RawSubscription {
    pub(crate) fn new(
        topic: Topic,
        id: u64,
        rx: mpsc::UnboundedReceiver<Event>,
        bus: Weak<BusInner>,
    ) -> Self {
        Self { topic, id, rx, bus }
    }

    /// Topic this subscription listens on
    pub fn topic(&self) -> &Topic {
        &self.topic
    }

    /// Take the next pending event without waiting
    pub fn try_recv(&mut self) -> Result<Event, TryRecvError> {
        self.rx.try_recv()
    }

    /// Wait for the next event
    ///
    /// Returns `None` once the bus has been dropped.
    pub async fn recv(&mut self) -> Option<Event> {
        self.rx.recv().await
    }

    /// Block the current thread until the next event
    ///
    /// # Panics
    ///
    /// Panics if called from within an asynchronous execution context.
    pub fn blocking_recv(&mut self) -> Option<Event> {
        self.rx.blocking_recv()
    }

    /// Take every event that is already pending
    pub fn drain(&mut self) -> Vec<Event> {
        let mut events = Vec::new();
        while let Ok(event) = self.rx.try_recv() {
            events.push(event);
        }
        events
    }

    /// Stop delivery. No event is delivered after this returns.
    pub fn cancel(self) {
        drop(self);
    }
}

impl Drop for RawSubscription {
    fn drop(&mut self) {
        if let Some(bus) = self.bus.upgrade() {
            if let Some(state) = bus.existing(&self.topic) {
                state.lock().remove(self.id);
            }
        }
        self.rx.close();
        tracing::debug!(target: "keeper::bus", topic = %self.topic, id = self.id, "unsubscribed");
    }
}

impl Stream for RawSubscription {
    type Item = Event;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Event>> {
        self.rx.poll_recv(cx)
    }
}

impl std::fmt::Debug for RawSubscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RawSubscription")
            .field("topic", &self.topic)
            .field("id", &self.id)
            .finish()
    }
}
