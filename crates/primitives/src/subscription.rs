//! Typed subscription stream
//!
//! Wraps a [`RawSubscription`] and decodes each event through the accessor's
//! codec. Values that fail to decode arrive as `None`, the same way `get`
//! reports them.

use crate::defaults::decode_or_absent;
use futures::Stream;
use keeper_concurrency::{Event, RawSubscription, TryRecvError};
use keeper_core::{Codec, Topic};
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

/// Seeded stream of a setting's values
pub struct Subscription<C: Codec> {
    raw: RawSubscription,
    codec: Arc<C>,
}

impl<C: Codec> Subscription<C> {
    pub(crate) fn new(raw: RawSubscription, codec: Arc<C>) -> Self {
        Self { raw, codec }
    }

    fn decode(&self, event: Event) -> Option<C::Value> {
        decode_or_absent(&*self.codec, self.raw.topic(), event)
    }

    /// Topic (slot) being observed
    pub fn topic(&self) -> &Topic {
        self.raw.topic()
    }

    /// Take the next pending value without waiting
    pub fn try_recv(&mut self) -> Result<Option<C::Value>, TryRecvError> {
        let event = self.raw.try_recv()?;
        Ok(self.decode(event))
    }

    /// Wait for the next value. `None` once the bus is gone.
    pub async fn recv(&mut self) -> Option<Option<C::Value>> {
        let event = self.raw.recv().await?;
        Some(self.decode(event))
    }

    /// Block the current thread until the next value
    ///
    /// # Panics
    ///
    /// Panics if called from within an asynchronous execution context.
    pub fn blocking_recv(&mut self) -> Option<Option<C::Value>> {
        let event = self.raw.blocking_recv()?;
        Some(self.decode(event))
    }

    /// Take every value that is already pending
    pub fn drain(&mut self) -> Vec<Option<C::Value>> {
        let events = self.raw.drain();
        events.into_iter().map(|e| self.decode(e)).collect()
    }

    /// Stop delivery. No value is delivered after this returns.
    pub fn cancel(self) {
        self.raw.cancel();
    }
}

impl<C: Codec> Stream for Subscription<C> {
    type Item = Option<C::Value>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        Pin::new(&mut this.raw)
            .poll_next(cx)
            .map(|event| event.map(|e| this.decode(e)))
    }
}

impl<C: Codec> std::fmt::Debug for Subscription<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("topic", self.raw.topic())
            .finish()
    }
}
