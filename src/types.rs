//! Public types for the keeper API.
//!
//! This module re-exports types from internal crates with a clean public interface.

// ============================================================================
// Public API types - these are what users should use
// ============================================================================

// Raw storage values and addressing
pub use keeper_core::{AccessorKind, RawValue, SettingKey, SlotId, Topic};

// Codecs
pub use keeper_core::{Codec, Format, IdentityCodec, Json, MessagePack, Primitive, StructuredCodec};

// Errors
pub use keeper_core::{DecodeError, EncodeError, Error, Result, StoreError};

// Backing stores and their configuration
pub use keeper_storage::{BackingStore, FileStore, MemoryStore, OpenOptions};

// Change notification
pub use keeper_concurrency::{ChangeBus, Event, RawSubscription, TryRecvError};

// Accessors
pub use keeper_primitives::{
    remove_all, Defaults, PrimitiveDefaults, RemoveAllReport, StructuredDefaults, Subscription,
};
