//! Primitives layer for keeper
//!
//! This crate implements the typed setting accessor:
//! - Defaults: get/set/remove/subscribe for one key through one codec
//! - Subscription: seeded, decoded stream of a setting's values
//! - remove_all: best-effort reset of every key of one accessor kind
//!
//! All accessors are stateless facades over a backing store and change bus.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod defaults;
pub mod subscription;

use keeper_core::{IdentityCodec, Json, StructuredCodec};

pub use defaults::{remove_all, Defaults, RemoveAllReport};
pub use subscription::Subscription;

/// Accessor for values the store holds natively
pub type PrimitiveDefaults<K, T> = Defaults<K, IdentityCodec<T>>;

/// Accessor for serde values, JSON by default
pub type StructuredDefaults<K, T, F = Json> = Defaults<K, StructuredCodec<T, F>>;
