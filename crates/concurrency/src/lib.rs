//! Change notification for keeper
//!
//! [`ChangeBus`] fans out value changes per topic; [`RawSubscription`] is
//! the subscriber handle. Subscriptions are seeded with the current value
//! and then receive every later change in publish order.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod bus;
pub mod subscription;

pub use bus::{ChangeBus, Event};
pub use subscription::{RawSubscription, TryRecvError};
